//! Projection Synchronizer
//!
//! The only writer of the deal projection on products. Writes are atomic per product but not
//! across products: a failure part way through leaves the earlier products written and is
//! reported in the [`SyncReport`].

use std::{fmt, sync::Arc};

use thiserror::Error;
use tracing::warn;

use crate::domain::{
    campaigns::records::{CampaignRecord, CampaignUuid, LineItemRecord},
    errors::RepositoryError,
    products::{
        CatalogRepository,
        records::{FlashDealProjection, ProductUuid},
    },
};

/// Outcome of a synchronization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub synced: Vec<ProductUuid>,
    pub failed: Vec<ProductUuid>,
}

impl SyncReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    fn merge(mut self, other: Self) -> Self {
        self.synced.extend(other.synced);
        self.failed.extend(other.failed);
        self
    }
}

#[derive(Debug, Error)]
enum ApplyError {
    #[error("product's live deal belongs to campaign {owner}")]
    OwnedElsewhere { owner: CampaignUuid },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Clone)]
pub(crate) struct ProjectionSynchronizer {
    catalog: Arc<dyn CatalogRepository>,
}

impl fmt::Debug for ProjectionSynchronizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectionSynchronizer").finish_non_exhaustive()
    }
}

impl ProjectionSynchronizer {
    pub(crate) fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    /// Write the campaign's deal onto every line item's product.
    ///
    /// A product whose live deal belongs to another campaign is left alone and reported as
    /// failed.
    pub(crate) async fn apply(&self, campaign: &CampaignRecord) -> SyncReport {
        let mut report = SyncReport::default();

        for item in &campaign.line_items {
            match self.apply_one(campaign, item).await {
                Ok(()) => report.synced.push(item.product),
                Err(error) => {
                    warn!(
                        campaign_uuid = %campaign.uuid,
                        product_uuid = %item.product,
                        error = %error,
                        "failed to apply deal projection"
                    );

                    report.failed.push(item.product);
                }
            }
        }

        report
    }

    /// Clear the campaign's deal from `products`.
    ///
    /// Products whose projection is already clear, or now belongs to another campaign, are left
    /// alone and count as synced. So do products that no longer exist.
    pub(crate) async fn retract<I>(&self, campaign: CampaignUuid, products: I) -> SyncReport
    where
        I: IntoIterator<Item = ProductUuid>,
    {
        let mut report = SyncReport::default();

        for product in products {
            match self.retract_one(campaign, product).await {
                Ok(()) => report.synced.push(product),
                Err(error) => {
                    warn!(
                        campaign_uuid = %campaign,
                        product_uuid = %product,
                        error = %error,
                        "failed to retract deal projection"
                    );

                    report.failed.push(product);
                }
            }
        }

        report
    }

    /// Retract `dropped` and then apply the campaign's current line items.
    pub(crate) async fn replace<I>(&self, campaign: &CampaignRecord, dropped: I) -> SyncReport
    where
        I: IntoIterator<Item = ProductUuid>,
    {
        let retracted = self.retract(campaign.uuid, dropped).await;

        retracted.merge(self.apply(campaign).await)
    }

    async fn apply_one(
        &self,
        campaign: &CampaignRecord,
        item: &LineItemRecord,
    ) -> Result<(), ApplyError> {
        let record = self.catalog.find_by_id(item.product).await?;

        if let Some(owner) = record.deal_owner()
            && owner != campaign.uuid
        {
            return Err(ApplyError::OwnedElsewhere { owner });
        }

        let projection = FlashDealProjection::for_line_item(campaign, item);

        self.catalog
            .update_projection(item.product, Some(projection))
            .await?;

        Ok(())
    }

    async fn retract_one(
        &self,
        campaign: CampaignUuid,
        product: ProductUuid,
    ) -> Result<(), RepositoryError> {
        let record = match self.catalog.find_by_id(product).await {
            Ok(record) => record,
            Err(RepositoryError::NotFound) => return Ok(()),
            Err(error) => return Err(error),
        };

        let owned = record
            .flash_deal
            .as_ref()
            .is_some_and(|deal| deal.campaign == campaign);

        if !owned {
            return Ok(());
        }

        match self.catalog.update_projection(product, None).await {
            Ok(()) | Err(RepositoryError::NotFound) => Ok(()),
            Err(error) => Err(error),
        }
    }
}
