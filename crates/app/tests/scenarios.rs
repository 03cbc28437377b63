//! Campaign scenarios run against the in-memory stores

use std::sync::Arc;

use flashdeal::{discounts::DiscountMode, lifecycle::CampaignStatus};
use flashdeal_app::{
    domain::{
        campaigns::{
            CampaignsService, CampaignsServiceError, FlashDealService,
            data::{CampaignDetails, NewCampaign, NewLineItem},
            records::{ActorUuid, CampaignUuid, DealKind, Limits, Visibility},
        },
        products::{CatalogRepository, records::ProductUuid},
    },
    memory::{MemoryCampaignsRepository, MemoryCatalogRepository},
};
use jiff::{SignedDuration, Timestamp};
use testresult::TestResult;

struct Harness {
    catalog: Arc<MemoryCatalogRepository>,
    service: FlashDealService,
    actor: ActorUuid,
    now: Timestamp,
}

impl Harness {
    fn new() -> Self {
        let catalog = Arc::new(MemoryCatalogRepository::new());

        Self {
            service: FlashDealService::new(
                Arc::new(MemoryCampaignsRepository::new()),
                catalog.clone(),
            ),
            catalog,
            actor: ActorUuid::new(),
            now: Timestamp::now(),
        }
    }

    fn campaign(&self, start: i64, end: i64, items: &[(ProductUuid, u64)]) -> NewCampaign {
        NewCampaign {
            uuid: CampaignUuid::new(),
            discount_mode: DiscountMode::Percentage,
            details: CampaignDetails {
                title: "Weekend Blowout".to_string(),
                deal_kind: DealKind::Lightning,
                start_at: self.now + SignedDuration::from_hours(start),
                end_at: self.now + SignedDuration::from_hours(end),
                line_items: items
                    .iter()
                    .map(|(product, initial_stock)| NewLineItem {
                        product: *product,
                        base_price: 4_000,
                        deal_price: 3_000,
                        discount_percent: None,
                        deal_quantity: 1,
                        initial_stock: *initial_stock,
                        max_quantity_per_user: 2,
                        min_order_quantity: 1,
                    })
                    .collect(),
                visibility: Visibility::default(),
                limits: Limits::default(),
            },
        }
    }
}

#[tokio::test]
async fn scheduled_campaign_goes_live_on_its_product() -> TestResult {
    let harness = Harness::new();
    let product = harness.catalog.add_product(50).await;

    let campaign = harness
        .service
        .create_campaign(harness.actor, harness.campaign(2, 5, &[(product, 10)]))
        .await?;

    let deal = harness
        .catalog
        .find_by_id(product)
        .await?
        .flash_deal
        .ok_or("product should carry the deal")?;

    assert_eq!(campaign.status, CampaignStatus::Scheduled);
    assert!(deal.is_active, "projection should be live");
    assert_eq!(deal.deal_price, 3_000);
    assert_eq!(deal.campaign, campaign.uuid);

    Ok(())
}

#[tokio::test]
async fn overlapping_window_is_refused() -> TestResult {
    let harness = Harness::new();
    let product = harness.catalog.add_product(50).await;

    let existing = harness
        .service
        .create_campaign(harness.actor, harness.campaign(2, 5, &[(product, 10)]))
        .await?;

    let result = harness
        .service
        .create_campaign(harness.actor, harness.campaign(4, 6, &[(product, 10)]))
        .await;

    assert!(
        matches!(
            result,
            Err(CampaignsServiceError::OverlapConflict { campaign, product: p })
                if campaign == existing.uuid && p == product
        ),
        "expected OverlapConflict, got {result:?}"
    );

    Ok(())
}

#[tokio::test]
async fn oversized_reservation_reports_the_shortfall() -> TestResult {
    let harness = Harness::new();
    let product = harness.catalog.add_product(50).await;

    let result = harness
        .service
        .create_campaign(harness.actor, harness.campaign(2, 5, &[(product, 60)]))
        .await;

    assert!(
        matches!(
            result,
            Err(CampaignsServiceError::InsufficientStock { shortfall: 10, .. })
        ),
        "expected InsufficientStock, got {result:?}"
    );
    assert!(
        !harness.catalog.find_by_id(product).await?.has_active_deal(),
        "a refused campaign must not touch the product"
    );

    Ok(())
}

#[tokio::test]
async fn scheduled_campaign_cannot_be_paused() -> TestResult {
    let harness = Harness::new();
    let product = harness.catalog.add_product(50).await;

    let campaign = harness
        .service
        .create_campaign(harness.actor, harness.campaign(2, 5, &[(product, 10)]))
        .await?;

    let result = harness
        .service
        .pause_campaign(harness.actor, campaign.uuid)
        .await;

    assert!(
        matches!(result, Err(CampaignsServiceError::InvalidPauseSource { .. })),
        "expected InvalidPauseSource, got {result:?}"
    );

    Ok(())
}

#[tokio::test]
async fn ending_clears_every_product_once() -> TestResult {
    let harness = Harness::new();

    let mut products = Vec::new();

    for _ in 0..3 {
        products.push((harness.catalog.add_product(50).await, 5));
    }

    let campaign = harness
        .service
        .create_campaign(harness.actor, harness.campaign(2, 5, &products))
        .await?;

    harness.service.activate_campaign(campaign.uuid).await?;

    let ended = harness
        .service
        .end_campaign(harness.actor, campaign.uuid)
        .await?;

    assert_eq!(ended.status, CampaignStatus::Ended);

    for (product, _) in &products {
        assert!(
            !harness.catalog.find_by_id(*product).await?.has_active_deal(),
            "{product} should no longer be live"
        );
    }

    let again = harness
        .service
        .end_campaign(harness.actor, campaign.uuid)
        .await;

    assert!(
        matches!(again, Err(CampaignsServiceError::AlreadyEnded)),
        "expected AlreadyEnded, got {again:?}"
    );

    Ok(())
}
