//! Builders shared by unit tests.

use flashdeal::{
    discounts::DiscountMode,
    lifecycle::CampaignStatus,
    window::{DealWindow, WindowError},
};
use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;

use crate::domain::{
    campaigns::{
        data::{CampaignDetails, NewLineItem},
        records::{
            ActorUuid, Audit, CampaignRecord, CampaignUuid, DealKind, LineItemRecord, Limits,
            Metrics, Visibility,
        },
    },
    products::records::{FlashDealProjection, ProductRecord, ProductUuid},
};

/// Details for a campaign running from `now + start` to `now + end` hours.
pub(crate) fn details(
    now: Timestamp,
    start: i64,
    end: i64,
    line_items: Vec<NewLineItem>,
) -> CampaignDetails {
    CampaignDetails {
        title: "Midnight Madness".to_string(),
        deal_kind: DealKind::Flash,
        start_at: now + SignedDuration::from_hours(start),
        end_at: now + SignedDuration::from_hours(end),
        line_items,
        visibility: Visibility::default(),
        limits: Limits::default(),
    }
}

pub(crate) fn line_item(
    product: ProductUuid,
    base_price: u64,
    deal_price: u64,
    initial_stock: u64,
) -> NewLineItem {
    NewLineItem {
        product,
        base_price,
        deal_price,
        discount_percent: None,
        deal_quantity: 1,
        initial_stock,
        max_quantity_per_user: 1,
        min_order_quantity: 1,
    }
}

pub(crate) fn line_item_record(product: ProductUuid, initial_stock: u64) -> LineItemRecord {
    LineItemRecord {
        product,
        base_price: 10_000,
        deal_price: 8_000,
        discount_percent: Some(Decimal::from(20)),
        deal_quantity: 1,
        initial_stock,
        sold_quantity: 0,
        max_quantity_per_user: 1,
        min_order_quantity: 1,
    }
}

pub(crate) fn campaign_with_products(
    products: &[ProductUuid],
    start: Timestamp,
    end: Timestamp,
    status: CampaignStatus,
) -> Result<CampaignRecord, WindowError> {
    Ok(CampaignRecord {
        uuid: CampaignUuid::new(),
        title: "Stored campaign".to_string(),
        deal_kind: DealKind::Flash,
        discount_mode: DiscountMode::Percentage,
        window: DealWindow::new(start, end)?,
        line_items: products
            .iter()
            .map(|product| line_item_record(*product, 1))
            .collect(),
        status,
        visibility: Visibility::default(),
        limits: Limits::default(),
        audit: Audit::created(ActorUuid::new(), start),
        metrics: Metrics::default(),
        version: 0,
    })
}

pub(crate) fn campaign_record(
    product: ProductUuid,
    start: Timestamp,
    end: Timestamp,
    status: CampaignStatus,
) -> Result<CampaignRecord, WindowError> {
    campaign_with_products(&[product], start, end, status)
}

pub(crate) fn product_record(stock: u64) -> ProductRecord {
    let now = Timestamp::now();

    ProductRecord {
        uuid: ProductUuid::new(),
        stock,
        flash_deal: None,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

pub(crate) fn owned_projection(campaign: CampaignUuid) -> FlashDealProjection {
    let now = Timestamp::now();

    FlashDealProjection {
        campaign,
        is_active: true,
        deal_price: 8_000,
        discount_percent: Some(Decimal::from(20)),
        start_at: now,
        end_at: now + SignedDuration::from_hours(2),
        max_quantity: 10,
        sold_quantity: 0,
        priority: 0,
        created_by: ActorUuid::new(),
    }
}
