//! Catalog Item Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    domain::campaigns::records::{ActorUuid, CampaignRecord, CampaignUuid, LineItemRecord},
    uuids::TypedUuid,
};

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub stock: u64,
    pub flash_deal: Option<FlashDealProjection>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl ProductRecord {
    /// Whether a live campaign currently owns the product.
    pub fn has_active_deal(&self) -> bool {
        self.flash_deal
            .as_ref()
            .is_some_and(|deal| deal.is_active)
    }

    /// Campaign owning the product's deal, if any.
    pub fn deal_owner(&self) -> Option<CampaignUuid> {
        self.flash_deal
            .as_ref()
            .filter(|deal| deal.is_active)
            .map(|deal| deal.campaign)
    }
}

/// Deal fields mirrored onto a product from the campaign that owns it.
///
/// A product without a projection has no live deal.
#[derive(Debug, Clone, PartialEq)]
pub struct FlashDealProjection {
    pub campaign: CampaignUuid,
    pub is_active: bool,
    pub deal_price: u64,
    pub discount_percent: Option<Decimal>,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub max_quantity: u64,
    pub sold_quantity: u64,
    pub priority: u32,
    pub created_by: ActorUuid,
}

impl FlashDealProjection {
    #[must_use]
    pub fn for_line_item(campaign: &CampaignRecord, item: &LineItemRecord) -> Self {
        Self {
            campaign: campaign.uuid,
            is_active: true,
            deal_price: item.deal_price,
            discount_percent: item.discount_percent,
            start_at: campaign.window.start(),
            end_at: campaign.window.end(),
            max_quantity: item.initial_stock,
            sold_quantity: item.sold_quantity,
            priority: campaign.visibility.priority,
            created_by: campaign.audit.created_by,
        }
    }
}
