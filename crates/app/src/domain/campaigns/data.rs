//! Campaign Data

use flashdeal::discounts::DiscountMode;
use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::domain::{
    campaigns::records::{CampaignUuid, DealKind, Limits, Visibility},
    products::records::ProductUuid,
};

/// New Campaign Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCampaign {
    pub uuid: CampaignUuid,
    pub discount_mode: DiscountMode,
    pub details: CampaignDetails,
}

/// Everything about a campaign an editor may replace while it is scheduled.
///
/// The discount mode is fixed at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignDetails {
    pub title: String,
    pub deal_kind: DealKind,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    pub line_items: Vec<NewLineItem>,
    pub visibility: Visibility,
    pub limits: Limits,
}

/// New Line Item Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewLineItem {
    pub product: ProductUuid,
    pub base_price: u64,
    pub deal_price: u64,
    pub discount_percent: Option<Decimal>,
    pub deal_quantity: u32,
    pub initial_stock: u64,
    pub max_quantity_per_user: u32,
    pub min_order_quantity: u32,
}
