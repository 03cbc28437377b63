//! Stock Reservation Check

use rustc_hash::FxHashMap;

use crate::domain::{
    campaigns::{
        errors::CampaignsServiceError,
        records::{CampaignUuid, LineItemRecord},
    },
    products::{
        CatalogRepository,
        records::{ProductRecord, ProductUuid},
    },
};

/// Check a single product against a requested deal stock.
///
/// A product owned by `claimant` itself (an edit of the owning campaign) is not considered
/// claimed.
pub(crate) fn verify_stock(
    product: &ProductRecord,
    requested: u64,
    claimant: Option<CampaignUuid>,
) -> Result<(), CampaignsServiceError> {
    if let Some(owner) = product.deal_owner()
        && Some(owner) != claimant
    {
        return Err(CampaignsServiceError::AlreadyClaimed {
            product: product.uuid,
            owner,
        });
    }

    if requested > product.stock {
        return Err(CampaignsServiceError::InsufficientStock {
            product: product.uuid,
            requested,
            available: product.stock,
            shortfall: requested - product.stock,
        });
    }

    Ok(())
}

/// Check every line item before anything is written. The first failing item, in line item
/// order, is reported.
pub(crate) async fn ensure_stock(
    catalog: &dyn CatalogRepository,
    line_items: &[LineItemRecord],
    claimant: Option<CampaignUuid>,
) -> Result<(), CampaignsServiceError> {
    let products: Vec<ProductUuid> = line_items.iter().map(|item| item.product).collect();

    let records: FxHashMap<ProductUuid, ProductRecord> = catalog
        .find_by_ids(&products)
        .await?
        .into_iter()
        .map(|record| (record.uuid, record))
        .collect();

    for item in line_items {
        let record = records
            .get(&item.product)
            .ok_or(CampaignsServiceError::ProductNotFound {
                product: item.product,
            })?;

        verify_stock(record, item.initial_stock, claimant)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::products::MockCatalogRepository,
        test::helpers::{line_item_record, owned_projection, product_record},
    };

    use super::*;

    #[test]
    fn stock_covering_request_passes() -> TestResult {
        verify_stock(&product_record(50), 50, None)?;

        Ok(())
    }

    #[test]
    fn shortfall_is_reported() {
        let product = product_record(50);

        let result = verify_stock(&product, 60, None);

        assert!(
            matches!(
                result,
                Err(CampaignsServiceError::InsufficientStock {
                    requested: 60,
                    available: 50,
                    shortfall: 10,
                    ..
                })
            ),
            "expected InsufficientStock, got {result:?}"
        );
    }

    #[test]
    fn product_owned_by_another_campaign_is_claimed() {
        let owner = CampaignUuid::new();
        let mut product = product_record(50);
        product.flash_deal = Some(owned_projection(owner));

        let result = verify_stock(&product, 1, Some(CampaignUuid::new()));

        assert!(
            matches!(result, Err(CampaignsServiceError::AlreadyClaimed { owner: o, .. }) if o == owner),
            "expected AlreadyClaimed, got {result:?}"
        );
    }

    #[test]
    fn own_projection_does_not_block_an_edit() -> TestResult {
        let owner = CampaignUuid::new();
        let mut product = product_record(50);
        product.flash_deal = Some(owned_projection(owner));

        verify_stock(&product, 1, Some(owner))?;

        Ok(())
    }

    #[test]
    fn inactive_projection_does_not_claim() -> TestResult {
        let mut projection = owned_projection(CampaignUuid::new());
        projection.is_active = false;

        let mut product = product_record(50);
        product.flash_deal = Some(projection);

        verify_stock(&product, 1, None)?;

        Ok(())
    }

    #[tokio::test]
    async fn missing_product_is_not_found() {
        let mut catalog = MockCatalogRepository::new();

        catalog.expect_find_by_ids().return_once(|_| Ok(Vec::new()));

        let missing = ProductUuid::new();

        let result = ensure_stock(
            &catalog,
            &[line_item_record(missing, 1)],
            None,
        )
        .await;

        assert!(
            matches!(result, Err(CampaignsServiceError::ProductNotFound { product }) if product == missing),
            "expected ProductNotFound, got {result:?}"
        );
    }
}
