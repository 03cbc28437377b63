//! Create Campaign Handler

use std::sync::Arc;

use flashdeal_app::domain::campaigns::{CampaignsServiceError, data::NewCampaign};
use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};
use tracing::warn;

use crate::{
    campaigns::{errors::respond, requests::CreateCampaignRequest, responses::CampaignResponse},
    extensions::*,
    state::State,
};

/// Create Campaign Handler
///
/// Validates the campaign, checks it against existing campaigns and live stock, schedules it and
/// projects it onto its products.
#[endpoint(
    tags("campaigns"),
    summary = "Create Campaign",
    responses(
        (status_code = StatusCode::CREATED, description = "Campaign scheduled"),
        (status_code = StatusCode::ACCEPTED, description = "Campaign scheduled; some projections need reconciling"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid campaign payload"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing actor identity"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::CONFLICT, description = "Overlap, stock or claim conflict"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Discount is inconsistent with prices"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "campaigns.create",
    skip(json, depot, res),
    fields(
        actor_uuid = tracing::field::Empty,
        campaign_uuid = tracing::field::Empty,
        line_items = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCampaignRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CampaignResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_uuid_or_401()?;
    let campaign = NewCampaign::from(json.into_inner());
    let uuid = campaign.uuid;

    let span = tracing::Span::current();

    span.record("actor_uuid", tracing::field::display(actor));
    span.record("campaign_uuid", tracing::field::display(uuid));
    span.record(
        "line_items",
        tracing::field::display(campaign.details.line_items.len()),
    );

    let result = state.campaigns.create_campaign(actor, campaign).await;

    if matches!(
        result,
        Ok(_) | Err(CampaignsServiceError::PartialSyncFailure { .. })
    ) && let Err(error) = res.add_header(LOCATION, format!("/campaigns/{uuid}"), true)
    {
        warn!(campaign_uuid = %uuid, %error, "could not set location header");
    }

    respond(result, res, StatusCode::CREATED)
}

#[cfg(test)]
mod tests {
    use flashdeal::lifecycle::CampaignStatus;
    use flashdeal_app::domain::{
        campaigns::{MockCampaignsService, ValidationIssue, records::CampaignUuid},
        products::records::ProductUuid,
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::test_helpers::{TEST_ACTOR_UUID, campaigns_service, make_campaign};

    use super::*;

    fn make_service(campaigns: MockCampaignsService) -> Service {
        campaigns_service(campaigns, Router::with_path("campaigns").post(handler))
    }

    fn payload(uuid: Uuid) -> Value {
        json!({
            "uuid": uuid,
            "discount_mode": "percentage",
            "title": "Midnight Sale",
            "start_at": "2026-11-01T22:00:00Z",
            "end_at": "2026-11-02T02:00:00Z",
            "line_items": [{
                "product_uuid": "0199a5b2-7c1e-7a10-8e43-5b6a2f0d9c11",
                "base_price": 10000,
                "deal_price": 8000,
                "deal_quantity": 5,
                "initial_stock": 10
            }]
        })
    }

    #[tokio::test]
    async fn test_create_campaign_success() -> TestResult {
        let uuid = CampaignUuid::new();
        let campaign = make_campaign(uuid, CampaignStatus::Scheduled);

        let mut campaigns = MockCampaignsService::new();

        campaigns
            .expect_create_campaign()
            .once()
            .withf(move |actor, new| {
                *actor == TEST_ACTOR_UUID
                    && new.uuid == uuid
                    && new.details.title == "Midnight Sale"
                    && new.details.line_items.len() == 1
            })
            .return_once(move |_, _| Ok(campaign));

        let mut res = TestClient::post("http://example.com/campaigns")
            .json(&payload(uuid.into_uuid()))
            .send(&make_service(campaigns))
            .await;

        let body: CampaignResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/campaigns/{uuid}").as_str()));
        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.status, "scheduled");
        assert!(body.warnings.is_none(), "no warnings expected");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_campaign_malformed_json_returns_400() {
        let mut campaigns = MockCampaignsService::new();

        campaigns.expect_create_campaign().never();

        let res = TestClient::post("http://example.com/campaigns")
            .json(&json!({ "title": "missing everything else" }))
            .send(&make_service(campaigns))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_create_campaign_validation_returns_400() {
        let mut campaigns = MockCampaignsService::new();

        campaigns
            .expect_create_campaign()
            .once()
            .return_once(|_, _| {
                Err(CampaignsServiceError::Validation(vec![
                    ValidationIssue::EmptyTitle,
                ]))
            });

        let res = TestClient::post("http://example.com/campaigns")
            .json(&payload(Uuid::now_v7()))
            .send(&make_service(campaigns))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_create_campaign_inconsistent_discount_returns_422() {
        let mut campaigns = MockCampaignsService::new();

        campaigns
            .expect_create_campaign()
            .once()
            .return_once(|_, _| {
                Err(CampaignsServiceError::InconsistentDiscount {
                    product: ProductUuid::new(),
                    calculated: 20.into(),
                    provided: Some(30.into()),
                })
            });

        let res = TestClient::post("http://example.com/campaigns")
            .json(&payload(Uuid::now_v7()))
            .send(&make_service(campaigns))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
    }

    #[tokio::test]
    async fn test_create_campaign_overlap_returns_409() {
        let mut campaigns = MockCampaignsService::new();

        campaigns
            .expect_create_campaign()
            .once()
            .return_once(|_, _| {
                Err(CampaignsServiceError::OverlapConflict {
                    campaign: CampaignUuid::new(),
                    product: ProductUuid::new(),
                })
            });

        let res = TestClient::post("http://example.com/campaigns")
            .json(&payload(Uuid::now_v7()))
            .send(&make_service(campaigns))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
    }

    #[tokio::test]
    async fn test_create_campaign_insufficient_stock_returns_409() {
        let mut campaigns = MockCampaignsService::new();

        campaigns
            .expect_create_campaign()
            .once()
            .return_once(|_, _| {
                Err(CampaignsServiceError::InsufficientStock {
                    product: ProductUuid::new(),
                    requested: 60,
                    available: 50,
                    shortfall: 10,
                })
            });

        let res = TestClient::post("http://example.com/campaigns")
            .json(&payload(Uuid::now_v7()))
            .send(&make_service(campaigns))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
    }

    #[tokio::test]
    async fn test_create_campaign_partial_sync_returns_202_with_warnings() -> TestResult {
        let uuid = CampaignUuid::new();
        let campaign = make_campaign(uuid, CampaignStatus::Scheduled);
        let failed = campaign.line_items.iter().map(|item| item.product).collect::<Vec<_>>();
        let expected = failed.first().map(|product| product.into_uuid());

        let mut campaigns = MockCampaignsService::new();

        campaigns
            .expect_create_campaign()
            .once()
            .return_once(move |_, _| {
                Err(CampaignsServiceError::PartialSyncFailure {
                    campaign: Box::new(campaign),
                    synced: vec![],
                    failed,
                })
            });

        let mut res = TestClient::post("http://example.com/campaigns")
            .json(&payload(uuid.into_uuid()))
            .send(&make_service(campaigns))
            .await;

        let body: CampaignResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::ACCEPTED));

        let warnings = body.warnings.ok_or("expected warnings")?;

        assert_eq!(warnings.unsynced_products.first().copied(), expected);
        assert!(warnings.synced_products.is_empty(), "nothing was synced");

        Ok(())
    }
}
