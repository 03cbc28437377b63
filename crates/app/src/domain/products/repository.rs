//! Catalog Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{Db, to_i32, to_i64, to_u32, to_u64},
    domain::{
        campaigns::records::{ActorUuid, CampaignUuid},
        errors::RepositoryError,
        products::records::{FlashDealProjection, ProductRecord, ProductUuid},
    },
};

const FIND_PRODUCT_SQL: &str = include_str!("sql/find_product.sql");
const FIND_PRODUCTS_SQL: &str = include_str!("sql/find_products.sql");
const UPDATE_PROJECTION_SQL: &str = include_str!("sql/update_projection.sql");

/// Catalog item store.
///
/// Soft-deleted products are invisible to every method.
#[automock]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Fetch a single product.
    async fn find_by_id(&self, product: ProductUuid) -> Result<ProductRecord, RepositoryError>;

    /// Fetch every product that exists out of `products`. Missing ids are skipped.
    async fn find_by_ids(
        &self,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductRecord>, RepositoryError>;

    /// Overwrite a product's deal projection, or clear it with `None`.
    async fn update_projection(
        &self,
        product: ProductUuid,
        projection: Option<FlashDealProjection>,
    ) -> Result<(), RepositoryError>;
}

#[derive(Debug, Clone)]
pub struct PgCatalogRepository {
    db: Db,
}

impl PgCatalogRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn find_by_id(&self, product: ProductUuid) -> Result<ProductRecord, RepositoryError> {
        let record = query_as::<Postgres, ProductRecord>(FIND_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(self.db.pool())
            .await?;

        Ok(record)
    }

    async fn find_by_ids(
        &self,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductRecord>, RepositoryError> {
        let uuids: Vec<Uuid> = products.iter().copied().map(ProductUuid::into_uuid).collect();

        let records = query_as::<Postgres, ProductRecord>(FIND_PRODUCTS_SQL)
            .bind(uuids)
            .fetch_all(self.db.pool())
            .await?;

        Ok(records)
    }

    async fn update_projection(
        &self,
        product: ProductUuid,
        projection: Option<FlashDealProjection>,
    ) -> Result<(), RepositoryError> {
        let rows_affected = match projection {
            Some(deal) => {
                query(UPDATE_PROJECTION_SQL)
                    .bind(product.into_uuid())
                    .bind(deal.campaign.into_uuid())
                    .bind(deal.is_active)
                    .bind(to_i64(deal.deal_price, "flash_deal_price")?)
                    .bind(deal.discount_percent)
                    .bind(SqlxTimestamp::from(deal.start_at))
                    .bind(SqlxTimestamp::from(deal.end_at))
                    .bind(to_i64(deal.max_quantity, "flash_deal_max_quantity")?)
                    .bind(to_i64(deal.sold_quantity, "flash_deal_sold_quantity")?)
                    .bind(to_i32(deal.priority, "flash_deal_priority")?)
                    .bind(deal.created_by.into_uuid())
                    .execute(self.db.pool())
                    .await?
            }
            None => {
                query(UPDATE_PROJECTION_SQL)
                    .bind(product.into_uuid())
                    .bind(None::<Uuid>)
                    .bind(false)
                    .bind(None::<i64>)
                    .bind(None::<Decimal>)
                    .bind(None::<SqlxTimestamp>)
                    .bind(None::<SqlxTimestamp>)
                    .bind(None::<i64>)
                    .bind(None::<i64>)
                    .bind(None::<i32>)
                    .bind(None::<Uuid>)
                    .execute(self.db.pool())
                    .await?
            }
        }
        .rows_affected();

        if rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let stock: i64 = row.try_get("stock")?;

        let flash_deal = match row.try_get::<Option<Uuid>, _>("flash_deal_campaign_uuid")? {
            Some(campaign) => Some(projection_from_row(row, campaign)?),
            None => None,
        };

        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            stock: to_u64(stock, "stock")?,
            flash_deal,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

fn projection_from_row(row: &PgRow, campaign: Uuid) -> sqlx::Result<FlashDealProjection> {
    Ok(FlashDealProjection {
        campaign: CampaignUuid::from_uuid(campaign),
        is_active: row.try_get("flash_deal_is_active")?,
        deal_price: to_u64(row.try_get("flash_deal_price")?, "flash_deal_price")?,
        discount_percent: row.try_get("flash_deal_discount_percent")?,
        start_at: row
            .try_get::<SqlxTimestamp, _>("flash_deal_start_at")?
            .to_jiff(),
        end_at: row.try_get::<SqlxTimestamp, _>("flash_deal_end_at")?.to_jiff(),
        max_quantity: to_u64(
            row.try_get("flash_deal_max_quantity")?,
            "flash_deal_max_quantity",
        )?,
        sold_quantity: to_u64(
            row.try_get("flash_deal_sold_quantity")?,
            "flash_deal_sold_quantity",
        )?,
        priority: to_u32(row.try_get("flash_deal_priority")?, "flash_deal_priority")?,
        created_by: ActorUuid::from_uuid(row.try_get("flash_deal_created_by")?),
    })
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use testresult::TestResult;

    use crate::test::{db::TestDb, helpers::owned_projection};

    use super::*;

    async fn setup() -> TestResult<(TestDb, PgCatalogRepository)> {
        let db = TestDb::new().await?;
        let repository = PgCatalogRepository::new(db.db());

        Ok((db, repository))
    }

    fn projection(campaign: CampaignUuid) -> FlashDealProjection {
        let start = Timestamp::UNIX_EPOCH + SignedDuration::from_hours(500_000);

        FlashDealProjection {
            start_at: start,
            end_at: start + SignedDuration::from_hours(3),
            ..owned_projection(campaign)
        }
    }

    #[tokio::test]
    async fn deleted_and_unknown_products_are_skipped() -> TestResult {
        let (db, repository) = setup().await?;
        let kept = db.insert_product(7).await?;
        let deleted = db.insert_product(7).await?;

        db.delete_product(deleted).await?;

        let found = repository
            .find_by_ids(&[deleted, kept, ProductUuid::new()])
            .await?;

        assert_eq!(
            found.iter().map(|record| (record.uuid, record.stock)).collect::<Vec<_>>(),
            vec![(kept, 7)]
        );

        for product in [deleted, ProductUuid::new()] {
            let result = repository.find_by_id(product).await;

            assert!(
                matches!(result, Err(RepositoryError::NotFound)),
                "expected NotFound, got {result:?}"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn projection_is_written_and_cleared() -> TestResult {
        let (db, repository) = setup().await?;
        let product = db.insert_product(7).await?;
        let deal = projection(CampaignUuid::new());

        repository
            .update_projection(product, Some(deal.clone()))
            .await?;

        let record = repository.find_by_id(product).await?;

        assert_eq!(record.flash_deal, Some(deal.clone()));
        assert_eq!(record.deal_owner(), Some(deal.campaign));

        repository.update_projection(product, None).await?;

        let record = repository.find_by_id(product).await?;

        assert_eq!(record.flash_deal, None);
        assert!(!record.has_active_deal(), "cleared product has no live deal");

        Ok(())
    }

    #[tokio::test]
    async fn projection_on_a_deleted_product_is_not_found() -> TestResult {
        let (db, repository) = setup().await?;
        let product = db.insert_product(7).await?;

        db.delete_product(product).await?;

        let result = repository
            .update_projection(product, Some(projection(CampaignUuid::new())))
            .await;

        assert!(
            matches!(result, Err(RepositoryError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }
}
