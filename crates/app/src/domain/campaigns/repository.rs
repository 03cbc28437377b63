//! Campaigns Repository

use std::{error::Error as StdError, str::FromStr};

use async_trait::async_trait;
use flashdeal::window::DealWindow;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use sqlx::{
    PgConnection, Postgres, Row, Transaction,
    postgres::{PgArguments, PgRow},
    query::Query,
    query, query_scalar,
};
use uuid::Uuid;

use crate::{
    database::{Db, to_i32, to_i64, to_u32, to_u64},
    domain::{
        campaigns::records::{
            ActorUuid, Audit, CampaignRecord, CampaignUuid, LineItemRecord, Limits, Metrics,
            Surface, Surfaces, Visibility,
        },
        errors::RepositoryError,
        products::records::ProductUuid,
    },
};

const FIND_CAMPAIGN_SQL: &str = include_str!("sql/find_campaign.sql");
const FIND_OVERLAPPING_CAMPAIGNS_SQL: &str = include_str!("sql/find_overlapping_campaigns.sql");
const FIND_DUE_CAMPAIGNS_SQL: &str = include_str!("sql/find_due_campaigns.sql");
const FIND_LINE_ITEMS_SQL: &str = include_str!("sql/find_line_items.sql");
const INSERT_CAMPAIGN_SQL: &str = include_str!("sql/insert_campaign.sql");
const UPDATE_CAMPAIGN_SQL: &str = include_str!("sql/update_campaign.sql");
const UPDATE_CAMPAIGN_STATUS_SQL: &str = include_str!("sql/update_campaign_status.sql");
const CAMPAIGN_EXISTS_SQL: &str = include_str!("sql/campaign_exists.sql");
const INSERT_LINE_ITEM_SQL: &str = include_str!("sql/insert_line_item.sql");
const DELETE_LINE_ITEMS_SQL: &str = include_str!("sql/delete_line_items.sql");

/// Parameters for the overlap candidate query.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapQuery {
    pub products: Vec<ProductUuid>,
    pub window: DealWindow,
    pub exclude: Option<CampaignUuid>,
}

/// Campaign store.
///
/// Soft-deleted campaigns are invisible to every read.
#[automock]
#[async_trait]
pub trait CampaignsRepository: Send + Sync {
    /// Fetch a single campaign with its line items.
    async fn find_by_id(&self, campaign: CampaignUuid) -> Result<CampaignRecord, RepositoryError>;

    /// Scheduled or active campaigns that share a product with the query and whose window
    /// intersects it.
    async fn find_overlapping(
        &self,
        query: OverlapQuery,
    ) -> Result<Vec<CampaignRecord>, RepositoryError>;

    /// Campaigns the clock should move at `now`: scheduled ones whose window has opened and
    /// unfinished ones whose window has closed.
    async fn find_due(&self, now: Timestamp) -> Result<Vec<CampaignRecord>, RepositoryError>;

    /// Store a new campaign.
    async fn insert(&self, campaign: &CampaignRecord) -> Result<CampaignRecord, RepositoryError>;

    /// Replace a stored campaign, including its line items.
    ///
    /// Fails with [`RepositoryError::Conflict`] when the stored version no longer matches
    /// `campaign.version`. The returned record carries the bumped version.
    async fn update(&self, campaign: &CampaignRecord) -> Result<CampaignRecord, RepositoryError>;

    /// Write a lifecycle transition: the status plus the pause and end audit fields.
    ///
    /// Line items and metrics are left as stored, so sales recorded since `campaign` was read
    /// survive. Version handling matches [`CampaignsRepository::update`]; the returned record is
    /// the stored row after the write.
    async fn update_status(
        &self,
        campaign: &CampaignRecord,
    ) -> Result<CampaignRecord, RepositoryError>;
}

#[derive(Debug, Clone)]
pub struct PgCampaignsRepository {
    db: Db,
}

impl PgCampaignsRepository {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    async fn hydrate(&self, rows: Vec<PgRow>) -> Result<Vec<CampaignRecord>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let uuids = rows
            .iter()
            .map(|row| row.try_get::<Uuid, _>("uuid"))
            .collect::<Result<Vec<_>, _>>()?;

        let item_rows = query(FIND_LINE_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(self.db.pool())
            .await?;

        let mut items: FxHashMap<Uuid, Vec<LineItemRecord>> = FxHashMap::default();

        for row in &item_rows {
            let campaign: Uuid = row.try_get("campaign_uuid")?;

            items
                .entry(campaign)
                .or_default()
                .push(line_item_from_row(row)?);
        }

        let campaigns = rows
            .iter()
            .map(|row| {
                let uuid: Uuid = row.try_get("uuid")?;

                campaign_from_row(row, items.remove(&uuid).unwrap_or_default())
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(campaigns)
    }
}

#[async_trait]
impl CampaignsRepository for PgCampaignsRepository {
    async fn find_by_id(&self, campaign: CampaignUuid) -> Result<CampaignRecord, RepositoryError> {
        let row = query(FIND_CAMPAIGN_SQL)
            .bind(campaign.into_uuid())
            .fetch_one(self.db.pool())
            .await?;

        self.hydrate(vec![row])
            .await?
            .pop()
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_overlapping(
        &self,
        overlap: OverlapQuery,
    ) -> Result<Vec<CampaignRecord>, RepositoryError> {
        let products: Vec<Uuid> = overlap
            .products
            .iter()
            .copied()
            .map(ProductUuid::into_uuid)
            .collect();

        let rows = query(FIND_OVERLAPPING_CAMPAIGNS_SQL)
            .bind(products)
            .bind(overlap.exclude.map(CampaignUuid::into_uuid))
            .bind(SqlxTimestamp::from(overlap.window.start()))
            .bind(SqlxTimestamp::from(overlap.window.end()))
            .fetch_all(self.db.pool())
            .await?;

        self.hydrate(rows).await
    }

    async fn find_due(&self, now: Timestamp) -> Result<Vec<CampaignRecord>, RepositoryError> {
        let rows = query(FIND_DUE_CAMPAIGNS_SQL)
            .bind(SqlxTimestamp::from(now))
            .fetch_all(self.db.pool())
            .await?;

        self.hydrate(rows).await
    }

    async fn insert(&self, campaign: &CampaignRecord) -> Result<CampaignRecord, RepositoryError> {
        let mut tx = self.db.begin().await?;

        bind_campaign(query(INSERT_CAMPAIGN_SQL), campaign)?
            .execute(&mut *tx)
            .await?;

        insert_line_items(&mut tx, campaign).await?;

        tx.commit().await?;

        Ok(campaign.clone())
    }

    async fn update(&self, campaign: &CampaignRecord) -> Result<CampaignRecord, RepositoryError> {
        let mut tx = self.db.begin().await?;

        let version: Option<i64> = bind_campaign(query(UPDATE_CAMPAIGN_SQL), campaign)?
            .fetch_optional(&mut *tx)
            .await?
            .map(|row| row.try_get("version"))
            .transpose()?;

        let Some(version) = version else {
            return Err(missing_or_stale(&mut *tx, campaign.uuid).await);
        };

        query(DELETE_LINE_ITEMS_SQL)
            .bind(campaign.uuid.into_uuid())
            .execute(&mut *tx)
            .await?;

        insert_line_items(&mut tx, campaign).await?;

        tx.commit().await?;

        Ok(CampaignRecord {
            version,
            ..campaign.clone()
        })
    }

    async fn update_status(
        &self,
        campaign: &CampaignRecord,
    ) -> Result<CampaignRecord, RepositoryError> {
        let audit = &campaign.audit;

        let row = query(UPDATE_CAMPAIGN_STATUS_SQL)
            .bind(campaign.uuid.into_uuid())
            .bind(campaign.status.as_str())
            .bind(audit.paused_by.map(ActorUuid::into_uuid))
            .bind(audit.paused_at.map(SqlxTimestamp::from))
            .bind(audit.ended_by.map(ActorUuid::into_uuid))
            .bind(audit.ended_at.map(SqlxTimestamp::from))
            .bind(campaign.version)
            .fetch_optional(self.db.pool())
            .await?;

        let Some(row) = row else {
            let mut conn = self.db.pool().acquire().await?;

            return Err(missing_or_stale(&mut *conn, campaign.uuid).await);
        };

        self.hydrate(vec![row])
            .await?
            .pop()
            .ok_or(RepositoryError::NotFound)
    }
}

/// Explain why a version-checked write touched no row.
async fn missing_or_stale(conn: &mut PgConnection, campaign: CampaignUuid) -> RepositoryError {
    let exists = query_scalar::<_, bool>(CAMPAIGN_EXISTS_SQL)
        .bind(campaign.into_uuid())
        .fetch_one(conn)
        .await;

    match exists {
        Ok(true) => RepositoryError::Conflict,
        Ok(false) => RepositoryError::NotFound,
        Err(error) => error.into(),
    }
}

/// Binds `$1..$30` shared by the insert and update statements.
fn bind_campaign<'q>(
    statement: Query<'q, Postgres, PgArguments>,
    campaign: &'q CampaignRecord,
) -> Result<Query<'q, Postgres, PgArguments>, sqlx::Error> {
    let Visibility {
        show_on_homepage,
        priority,
        badge_text,
        show_countdown,
        surfaces,
    } = &campaign.visibility;

    let Limits {
        max_orders_per_user,
        payment_methods,
        regions,
        require_captcha,
    } = &campaign.limits;

    let Metrics {
        revenue,
        units_sold,
        average_order_value,
        conversion_rate,
    } = &campaign.metrics;

    let audit = &campaign.audit;

    let surfaces: Vec<&'static str> = surfaces.iter().copied().map(Surface::as_str).collect();

    Ok(statement
        .bind(campaign.uuid.into_uuid())
        .bind(campaign.title.as_str())
        .bind(campaign.deal_kind.as_str())
        .bind(campaign.discount_mode.as_str())
        .bind(campaign.status.as_str())
        .bind(SqlxTimestamp::from(campaign.window.start()))
        .bind(SqlxTimestamp::from(campaign.window.end()))
        .bind(*show_on_homepage)
        .bind(to_i32(*priority, "priority")?)
        .bind(badge_text.as_deref())
        .bind(*show_countdown)
        .bind(surfaces)
        .bind(to_i32(*max_orders_per_user, "max_orders_per_user")?)
        .bind(payment_methods.clone())
        .bind(regions.clone())
        .bind(*require_captcha)
        .bind(to_i64(*revenue, "revenue")?)
        .bind(to_i64(*units_sold, "units_sold")?)
        .bind(*average_order_value)
        .bind(*conversion_rate)
        .bind(audit.created_by.into_uuid())
        .bind(SqlxTimestamp::from(audit.created_at))
        .bind(audit.updated_by.map(ActorUuid::into_uuid))
        .bind(audit.updated_at.map(SqlxTimestamp::from))
        .bind(audit.paused_by.map(ActorUuid::into_uuid))
        .bind(audit.paused_at.map(SqlxTimestamp::from))
        .bind(audit.ended_by.map(ActorUuid::into_uuid))
        .bind(audit.ended_at.map(SqlxTimestamp::from))
        .bind(audit.deleted_at.map(SqlxTimestamp::from))
        .bind(campaign.version))
}

async fn insert_line_items(
    tx: &mut Transaction<'_, Postgres>,
    campaign: &CampaignRecord,
) -> Result<(), sqlx::Error> {
    for (position, item) in campaign.line_items.iter().enumerate() {
        let position = i32::try_from(position).map_err(|e| sqlx::Error::ColumnDecode {
            index: "position".to_string(),
            source: Box::new(e),
        })?;

        query(INSERT_LINE_ITEM_SQL)
            .bind(campaign.uuid.into_uuid())
            .bind(position)
            .bind(item.product.into_uuid())
            .bind(to_i64(item.base_price, "base_price")?)
            .bind(to_i64(item.deal_price, "deal_price")?)
            .bind(item.discount_percent)
            .bind(to_i32(item.deal_quantity, "deal_quantity")?)
            .bind(to_i64(item.initial_stock, "initial_stock")?)
            .bind(to_i64(item.sold_quantity, "sold_quantity")?)
            .bind(to_i32(item.max_quantity_per_user, "max_quantity_per_user")?)
            .bind(to_i32(item.min_order_quantity, "min_order_quantity")?)
            .execute(&mut **tx)
            .await?;
    }

    Ok(())
}

fn parse_column<T>(row: &PgRow, column: &str) -> sqlx::Result<T>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    let value: String = row.try_get(column)?;

    value.parse().map_err(|e: T::Err| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

fn optional_timestamp(row: &PgRow, column: &str) -> sqlx::Result<Option<Timestamp>> {
    Ok(row
        .try_get::<Option<SqlxTimestamp>, _>(column)?
        .map(SqlxTimestamp::to_jiff))
}

fn optional_actor(row: &PgRow, column: &str) -> sqlx::Result<Option<ActorUuid>> {
    Ok(row
        .try_get::<Option<Uuid>, _>(column)?
        .map(ActorUuid::from_uuid))
}

fn campaign_from_row(row: &PgRow, line_items: Vec<LineItemRecord>) -> sqlx::Result<CampaignRecord> {
    let surfaces = row
        .try_get::<Vec<String>, _>("surfaces")?
        .iter()
        .map(|surface| surface.parse::<Surface>())
        .collect::<Result<Surfaces, _>>()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: "surfaces".to_string(),
            source: Box::new(e),
        })?;

    Ok(CampaignRecord {
        uuid: CampaignUuid::from_uuid(row.try_get("uuid")?),
        title: row.try_get("title")?,
        deal_kind: parse_column(row, "deal_kind")?,
        discount_mode: parse_column(row, "discount_mode")?,
        window: DealWindow::from_stored(
            row.try_get::<SqlxTimestamp, _>("start_at")?.to_jiff(),
            row.try_get::<SqlxTimestamp, _>("end_at")?.to_jiff(),
        ),
        line_items,
        status: parse_column(row, "status")?,
        visibility: Visibility {
            show_on_homepage: row.try_get("show_on_homepage")?,
            priority: to_u32(row.try_get("priority")?, "priority")?,
            badge_text: row.try_get("badge_text")?,
            show_countdown: row.try_get("show_countdown")?,
            surfaces,
        },
        limits: Limits {
            max_orders_per_user: to_u32(
                row.try_get("max_orders_per_user")?,
                "max_orders_per_user",
            )?,
            payment_methods: row.try_get("payment_methods")?,
            regions: row.try_get("regions")?,
            require_captcha: row.try_get("require_captcha")?,
        },
        audit: Audit {
            created_by: ActorUuid::from_uuid(row.try_get("created_by")?),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_by: optional_actor(row, "updated_by")?,
            updated_at: optional_timestamp(row, "updated_at")?,
            paused_by: optional_actor(row, "paused_by")?,
            paused_at: optional_timestamp(row, "paused_at")?,
            ended_by: optional_actor(row, "ended_by")?,
            ended_at: optional_timestamp(row, "ended_at")?,
            deleted_at: optional_timestamp(row, "deleted_at")?,
        },
        metrics: Metrics {
            revenue: to_u64(row.try_get("revenue")?, "revenue")?,
            units_sold: to_u64(row.try_get("units_sold")?, "units_sold")?,
            average_order_value: row.try_get("average_order_value")?,
            conversion_rate: row.try_get("conversion_rate")?,
        },
        version: row.try_get("version")?,
    })
}

fn line_item_from_row(row: &PgRow) -> sqlx::Result<LineItemRecord> {
    Ok(LineItemRecord {
        product: ProductUuid::from_uuid(row.try_get("product_uuid")?),
        base_price: to_u64(row.try_get("base_price")?, "base_price")?,
        deal_price: to_u64(row.try_get("deal_price")?, "deal_price")?,
        discount_percent: row.try_get("discount_percent")?,
        deal_quantity: to_u32(row.try_get("deal_quantity")?, "deal_quantity")?,
        initial_stock: to_u64(row.try_get("initial_stock")?, "initial_stock")?,
        sold_quantity: to_u64(row.try_get("sold_quantity")?, "sold_quantity")?,
        max_quantity_per_user: to_u32(
            row.try_get("max_quantity_per_user")?,
            "max_quantity_per_user",
        )?,
        min_order_quantity: to_u32(row.try_get("min_order_quantity")?, "min_order_quantity")?,
    })
}

#[cfg(test)]
mod tests {
    use flashdeal::lifecycle::CampaignStatus;
    use jiff::SignedDuration;
    use smallvec::smallvec;
    use testresult::TestResult;

    use crate::test::{
        db::TestDb,
        helpers::{campaign_with_products, line_item_record},
    };

    use super::*;

    /// Whole hours, so values survive `TIMESTAMPTZ`'s microsecond precision unchanged.
    fn at(hours: i64) -> Timestamp {
        Timestamp::UNIX_EPOCH + SignedDuration::from_hours(500_000 + hours)
    }

    async fn setup() -> TestResult<(TestDb, PgCampaignsRepository)> {
        let db = TestDb::new().await?;
        let repository = PgCampaignsRepository::new(db.db());

        Ok((db, repository))
    }

    async fn store(
        repository: &PgCampaignsRepository,
        products: &[ProductUuid],
        (start, end): (i64, i64),
        status: CampaignStatus,
    ) -> TestResult<CampaignRecord> {
        let campaign = campaign_with_products(products, at(start), at(end), status)?;

        Ok(repository.insert(&campaign).await?)
    }

    async fn soft_delete(db: &TestDb, campaign: CampaignUuid) -> TestResult {
        query("UPDATE campaigns SET deleted_at = now() WHERE uuid = $1")
            .bind(campaign.into_uuid())
            .execute(db.pool())
            .await?;

        Ok(())
    }

    fn uuids(campaigns: &[CampaignRecord]) -> Vec<CampaignUuid> {
        campaigns.iter().map(|campaign| campaign.uuid).collect()
    }

    #[tokio::test]
    async fn stored_campaign_reads_back_unchanged() -> TestResult {
        let (db, repository) = setup().await?;
        let first = db.insert_product(10).await?;
        let second = db.insert_product(10).await?;

        let mut campaign =
            campaign_with_products(&[second, first], at(0), at(3), CampaignStatus::Scheduled)?;

        campaign.visibility.badge_text = Some("-20%".to_string());
        campaign.visibility.surfaces = smallvec![Surface::Search];
        campaign.limits.payment_methods = vec!["card".to_string()];
        campaign.limits.regions = vec!["eu".to_string(), "uk".to_string()];

        repository.insert(&campaign).await?;

        assert_eq!(repository.find_by_id(campaign.uuid).await?, campaign);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_insert_is_refused() -> TestResult {
        let (db, repository) = setup().await?;
        let product = db.insert_product(10).await?;
        let campaign = store(&repository, &[product], (0, 2), CampaignStatus::Scheduled).await?;

        let result = repository.insert(&campaign).await;

        assert!(
            matches!(result, Err(RepositoryError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_and_deleted_campaigns_are_not_found() -> TestResult {
        let (db, repository) = setup().await?;
        let product = db.insert_product(10).await?;
        let campaign = store(&repository, &[product], (0, 2), CampaignStatus::Scheduled).await?;

        soft_delete(&db, campaign.uuid).await?;

        for uuid in [campaign.uuid, CampaignUuid::new()] {
            let result = repository.find_by_id(uuid).await;

            assert!(
                matches!(result, Err(RepositoryError::NotFound)),
                "expected NotFound, got {result:?}"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn update_replaces_line_items_and_bumps_version() -> TestResult {
        let (db, repository) = setup().await?;
        let dropped = db.insert_product(10).await?;
        let added = db.insert_product(10).await?;
        let campaign = store(&repository, &[dropped], (0, 2), CampaignStatus::Scheduled).await?;

        let edited = CampaignRecord {
            title: "Renamed".to_string(),
            window: DealWindow::new(at(1), at(4))?,
            line_items: vec![line_item_record(added, 5)],
            ..campaign.clone()
        };

        let saved = repository.update(&edited).await?;
        let found = repository.find_by_id(campaign.uuid).await?;

        assert_eq!(saved.version, 1);
        assert_eq!(found, saved);
        assert_eq!(found.title, "Renamed");
        assert_eq!(found.products().collect::<Vec<_>>(), vec![added]);

        Ok(())
    }

    #[tokio::test]
    async fn update_tells_stale_from_missing() -> TestResult {
        let (db, repository) = setup().await?;
        let product = db.insert_product(10).await?;
        let campaign = store(&repository, &[product], (0, 2), CampaignStatus::Scheduled).await?;

        repository.update(&campaign).await?;

        let stale = repository.update(&campaign).await;

        assert!(
            matches!(stale, Err(RepositoryError::Conflict)),
            "expected Conflict, got {stale:?}"
        );

        let unknown = CampaignRecord {
            uuid: CampaignUuid::new(),
            ..campaign.clone()
        };

        for (label, result) in [
            ("unknown", repository.update(&unknown).await),
            ("unknown status", repository.update_status(&unknown).await),
        ] {
            assert!(
                matches!(result, Err(RepositoryError::NotFound)),
                "{label}: expected NotFound, got {result:?}"
            );
        }

        soft_delete(&db, campaign.uuid).await?;

        let current = CampaignRecord {
            version: 1,
            ..campaign
        };
        let deleted = repository.update_status(&current).await;

        assert!(
            matches!(deleted, Err(RepositoryError::NotFound)),
            "expected NotFound, got {deleted:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn status_update_keeps_checkout_counters() -> TestResult {
        let (db, repository) = setup().await?;
        let product = db.insert_product(10).await?;
        let campaign = store(&repository, &[product], (0, 2), CampaignStatus::Active).await?;

        query("UPDATE campaign_line_items SET sold_quantity = sold_quantity + 3 WHERE campaign_uuid = $1")
            .bind(campaign.uuid.into_uuid())
            .execute(db.pool())
            .await?;

        query("UPDATE campaigns SET units_sold = units_sold + 3, revenue = revenue + 24000 WHERE uuid = $1")
            .bind(campaign.uuid.into_uuid())
            .execute(db.pool())
            .await?;

        let actor = ActorUuid::new();
        let mut ended = campaign.clone();

        ended.status = CampaignStatus::Ended;
        ended.audit.ended_by = Some(actor);
        ended.audit.ended_at = Some(at(1));

        let saved = repository.update_status(&ended).await?;

        assert_eq!(saved.status, CampaignStatus::Ended);
        assert_eq!(saved.version, campaign.version + 1);
        assert_eq!(saved.audit.ended_by, Some(actor));
        assert_eq!(saved.audit.ended_at, Some(at(1)));
        assert_eq!(saved.metrics.units_sold, 3);
        assert_eq!(saved.metrics.revenue, 24_000);
        assert_eq!(
            saved.line_items.first().map(|item| item.sold_quantity),
            Some(3)
        );
        assert_eq!(repository.find_by_id(campaign.uuid).await?, saved);

        Ok(())
    }

    #[tokio::test]
    async fn overlap_query_follows_the_claiming_rules() -> TestResult {
        let (db, repository) = setup().await?;
        let product = db.insert_product(10).await?;
        let elsewhere = db.insert_product(10).await?;

        let touching = store(&repository, &[product], (0, 2), CampaignStatus::Scheduled).await?;
        let active = store(&repository, &[product], (3, 5), CampaignStatus::Active).await?;
        store(&repository, &[product], (5, 6), CampaignStatus::Scheduled).await?;
        store(&repository, &[product], (2, 3), CampaignStatus::Ended).await?;
        store(&repository, &[product], (2, 4), CampaignStatus::Paused).await?;
        store(&repository, &[elsewhere], (2, 4), CampaignStatus::Scheduled).await?;

        let deleted = store(&repository, &[product], (2, 4), CampaignStatus::Scheduled).await?;
        soft_delete(&db, deleted.uuid).await?;

        let overlap = OverlapQuery {
            products: vec![product],
            window: DealWindow::new(at(2), at(4))?,
            exclude: None,
        };

        let found = repository.find_overlapping(overlap.clone()).await?;

        assert_eq!(uuids(&found), vec![touching.uuid, active.uuid]);

        let found = repository
            .find_overlapping(OverlapQuery {
                exclude: Some(active.uuid),
                ..overlap
            })
            .await?;

        assert_eq!(uuids(&found), vec![touching.uuid]);

        Ok(())
    }

    #[tokio::test]
    async fn due_query_finds_campaigns_the_clock_should_move() -> TestResult {
        let (db, repository) = setup().await?;
        let product = db.insert_product(10).await?;

        let overdue = store(&repository, &[product], (4, 10), CampaignStatus::Active).await?;
        let paused = store(&repository, &[product], (5, 9), CampaignStatus::Paused).await?;
        let opening = store(&repository, &[product], (9, 12), CampaignStatus::Scheduled).await?;
        store(&repository, &[product], (11, 13), CampaignStatus::Scheduled).await?;
        store(&repository, &[product], (9, 12), CampaignStatus::Active).await?;
        store(&repository, &[product], (1, 2), CampaignStatus::Ended).await?;

        let due = repository.find_due(at(10)).await?;

        assert_eq!(uuids(&due), vec![overdue.uuid, paused.uuid, opening.uuid]);

        Ok(())
    }
}
