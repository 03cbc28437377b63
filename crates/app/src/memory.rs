//! In-memory stores
//!
//! Behave like the `PostgreSQL` repositories and back the service tests and local tooling.

use std::sync::Arc;

use async_trait::async_trait;
use flashdeal::{lifecycle::CampaignStatus, overlap::find_overlap};
use jiff::Timestamp;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;

use crate::domain::{
    campaigns::{
        CampaignsRepository, OverlapQuery,
        records::{CampaignRecord, CampaignUuid},
    },
    errors::RepositoryError,
    products::{
        CatalogRepository,
        records::{FlashDealProjection, ProductRecord, ProductUuid},
    },
};

#[derive(Debug, Clone, Default)]
pub struct MemoryCampaignsRepository {
    campaigns: Arc<RwLock<FxHashMap<CampaignUuid, CampaignRecord>>>,
}

impl MemoryCampaignsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored campaign, deleted ones included, in id order.
    pub async fn all(&self) -> Vec<CampaignRecord> {
        let mut campaigns: Vec<CampaignRecord> =
            self.campaigns.read().await.values().cloned().collect();

        campaigns.sort_by_key(|campaign| campaign.uuid);

        campaigns
    }

    /// Record a sale the way the checkout integration does: the counters move, the campaign's
    /// version does not.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] when the campaign or its line item for `product`
    /// does not exist.
    pub async fn record_sale(
        &self,
        campaign: CampaignUuid,
        product: ProductUuid,
        units: u64,
        revenue: u64,
    ) -> Result<(), RepositoryError> {
        let mut campaigns = self.campaigns.write().await;

        let record = campaigns
            .get_mut(&campaign)
            .filter(|record| !record.is_deleted())
            .ok_or(RepositoryError::NotFound)?;

        let item = record
            .line_items
            .iter_mut()
            .find(|item| item.product == product)
            .ok_or(RepositoryError::NotFound)?;

        item.sold_quantity += units;
        record.metrics.units_sold += units;
        record.metrics.revenue += revenue;

        Ok(())
    }

    fn stored_mut<'a>(
        campaigns: &'a mut FxHashMap<CampaignUuid, CampaignRecord>,
        campaign: &CampaignRecord,
    ) -> Result<&'a mut CampaignRecord, RepositoryError> {
        let stored = campaigns
            .get_mut(&campaign.uuid)
            .filter(|stored| !stored.is_deleted())
            .ok_or(RepositoryError::NotFound)?;

        if stored.version != campaign.version {
            return Err(RepositoryError::Conflict);
        }

        Ok(stored)
    }
}

#[async_trait]
impl CampaignsRepository for MemoryCampaignsRepository {
    async fn find_by_id(&self, campaign: CampaignUuid) -> Result<CampaignRecord, RepositoryError> {
        self.campaigns
            .read()
            .await
            .get(&campaign)
            .filter(|record| !record.is_deleted())
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_overlapping(
        &self,
        query: OverlapQuery,
    ) -> Result<Vec<CampaignRecord>, RepositoryError> {
        let campaigns = self.campaigns.read().await;
        let mut remaining: Vec<&CampaignRecord> = campaigns.values().collect();
        let mut overlapping = Vec::new();

        remaining.sort_by_key(|campaign| (campaign.window.start(), campaign.uuid));

        while let Some(overlap) = find_overlap(
            query.products.as_slice(),
            &query.window,
            query.exclude.as_ref(),
            remaining.iter().copied(),
        ) {
            remaining.retain(|campaign| campaign.uuid != overlap.campaign);

            if let Some(record) = campaigns.get(&overlap.campaign) {
                overlapping.push(record.clone());
            }
        }

        Ok(overlapping)
    }

    async fn find_due(&self, now: Timestamp) -> Result<Vec<CampaignRecord>, RepositoryError> {
        let mut due: Vec<CampaignRecord> = self
            .campaigns
            .read()
            .await
            .values()
            .filter(|campaign| !campaign.is_deleted() && !campaign.status.is_terminal())
            .filter(|campaign| {
                campaign.window.has_ended(now)
                    || (campaign.status == CampaignStatus::Scheduled
                        && campaign.window.has_started(now))
            })
            .cloned()
            .collect();

        due.sort_by_key(|campaign| (campaign.window.start(), campaign.uuid));

        Ok(due)
    }

    async fn insert(&self, campaign: &CampaignRecord) -> Result<CampaignRecord, RepositoryError> {
        let mut campaigns = self.campaigns.write().await;

        if campaigns.contains_key(&campaign.uuid) {
            return Err(RepositoryError::AlreadyExists);
        }

        campaigns.insert(campaign.uuid, campaign.clone());

        Ok(campaign.clone())
    }

    async fn update(&self, campaign: &CampaignRecord) -> Result<CampaignRecord, RepositoryError> {
        let mut campaigns = self.campaigns.write().await;
        let stored = Self::stored_mut(&mut campaigns, campaign)?;

        *stored = CampaignRecord {
            version: campaign.version + 1,
            ..campaign.clone()
        };

        Ok(stored.clone())
    }

    async fn update_status(
        &self,
        campaign: &CampaignRecord,
    ) -> Result<CampaignRecord, RepositoryError> {
        let mut campaigns = self.campaigns.write().await;
        let stored = Self::stored_mut(&mut campaigns, campaign)?;

        stored.status = campaign.status;
        stored.audit.paused_by = campaign.audit.paused_by;
        stored.audit.paused_at = campaign.audit.paused_at;
        stored.audit.ended_by = campaign.audit.ended_by;
        stored.audit.ended_at = campaign.audit.ended_at;
        stored.version += 1;

        Ok(stored.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogRepository {
    products: Arc<RwLock<FxHashMap<ProductUuid, ProductRecord>>>,
}

impl MemoryCatalogRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product with `stock` units and no deal.
    pub async fn add_product(&self, stock: u64) -> ProductUuid {
        let uuid = ProductUuid::new();
        let now = Timestamp::now();

        self.products.write().await.insert(
            uuid,
            ProductRecord {
                uuid,
                stock,
                flash_deal: None,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            },
        );

        uuid
    }

    /// Overwrite a product's live stock count.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] for an unknown product.
    pub async fn set_stock(&self, product: ProductUuid, stock: u64) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;

        let record = products
            .get_mut(&product)
            .ok_or(RepositoryError::NotFound)?;

        record.stock = stock;
        record.updated_at = Timestamp::now();

        Ok(())
    }

    /// Soft delete a product.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] for an unknown product.
    pub async fn delete_product(&self, product: ProductUuid) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;

        let record = products
            .get_mut(&product)
            .ok_or(RepositoryError::NotFound)?;

        record.deleted_at = Some(Timestamp::now());

        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for MemoryCatalogRepository {
    async fn find_by_id(&self, product: ProductUuid) -> Result<ProductRecord, RepositoryError> {
        self.products
            .read()
            .await
            .get(&product)
            .filter(|record| record.deleted_at.is_none())
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_by_ids(
        &self,
        products: &[ProductUuid],
    ) -> Result<Vec<ProductRecord>, RepositoryError> {
        let stored = self.products.read().await;

        let mut records: Vec<ProductRecord> = products
            .iter()
            .filter_map(|product| stored.get(product))
            .filter(|record| record.deleted_at.is_none())
            .cloned()
            .collect();

        records.sort_by_key(|record| record.uuid);
        records.dedup_by_key(|record| record.uuid);

        Ok(records)
    }

    async fn update_projection(
        &self,
        product: ProductUuid,
        projection: Option<FlashDealProjection>,
    ) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;

        let record = products
            .get_mut(&product)
            .filter(|record| record.deleted_at.is_none())
            .ok_or(RepositoryError::NotFound)?;

        record.flash_deal = projection;
        record.updated_at = Timestamp::now();

        Ok(())
    }
}
