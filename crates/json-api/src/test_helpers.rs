//! Test helpers.

use std::sync::Arc;

use flashdeal::{discounts::DiscountMode, lifecycle::CampaignStatus, window::DealWindow};
use flashdeal_app::{
    context::AppContext,
    domain::{
        campaigns::{
            MockCampaignsService,
            records::{
                ActorUuid, Audit, CampaignRecord, CampaignUuid, DealKind, LineItemRecord, Limits,
                Metrics, Visibility,
            },
        },
        products::records::ProductUuid,
    },
};
use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_ACTOR_UUID: ActorUuid =
    ActorUuid::from_uuid(Uuid::from_u128(0x0199_a5b2_7c1e_7a10_8e43_5b6a_2f0d_9c01));

#[salvo::handler]
pub(crate) async fn inject_actor(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_actor_uuid(TEST_ACTOR_UUID);
    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn campaigns_service(campaigns: MockCampaignsService, route: Router) -> Service {
    let state = State::from_app_context(AppContext {
        campaigns: Arc::new(campaigns),
    });

    Service::new(
        Router::new()
            .hoop(inject(state))
            .hoop(inject_actor)
            .push(route),
    )
}

pub(crate) fn make_campaign(uuid: CampaignUuid, status: CampaignStatus) -> CampaignRecord {
    let start = Timestamp::UNIX_EPOCH + SignedDuration::from_hours(2);

    CampaignRecord {
        uuid,
        title: "Midnight Sale".to_string(),
        deal_kind: DealKind::Flash,
        discount_mode: DiscountMode::Percentage,
        window: DealWindow::from_stored(start, start + SignedDuration::from_hours(3)),
        line_items: vec![LineItemRecord {
            product: ProductUuid::new(),
            base_price: 10_000,
            deal_price: 8_000,
            discount_percent: Some(Decimal::from(20)),
            deal_quantity: 5,
            initial_stock: 10,
            sold_quantity: 0,
            max_quantity_per_user: 1,
            min_order_quantity: 1,
        }],
        status,
        visibility: Visibility::default(),
        limits: Limits::default(),
        audit: Audit::created(TEST_ACTOR_UUID, Timestamp::UNIX_EPOCH),
        metrics: Metrics::default(),
        version: 1,
    }
}

