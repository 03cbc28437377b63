//! Update Campaign Handler

use std::sync::Arc;

use flashdeal_app::domain::campaigns::data::CampaignDetails;
use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    campaigns::{errors::respond, requests::CampaignDetailsRequest, responses::CampaignResponse},
    extensions::*,
    state::State,
};

/// Update Campaign Handler
///
/// Replaces a scheduled campaign's details. The discount mode cannot be changed.
#[endpoint(
    tags("campaigns"),
    summary = "Update Campaign",
    responses(
        (status_code = StatusCode::OK, description = "Campaign updated"),
        (status_code = StatusCode::ACCEPTED, description = "Campaign updated; some projections need reconciling"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid campaign payload"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing actor identity"),
        (status_code = StatusCode::NOT_FOUND, description = "Campaign or product not found"),
        (status_code = StatusCode::CONFLICT, description = "Campaign is not scheduled, or conflicts with another campaign"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Discount is inconsistent with prices"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "campaigns.update",
    skip(campaign, json, depot, res),
    fields(
        actor_uuid = tracing::field::Empty,
        campaign_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    campaign: PathParam<Uuid>,
    json: JsonBody<CampaignDetailsRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CampaignResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_uuid_or_401()?;
    let campaign = campaign.into_inner();

    let span = tracing::Span::current();

    span.record("actor_uuid", tracing::field::display(actor));
    span.record("campaign_uuid", tracing::field::display(campaign));

    let result = state
        .campaigns
        .edit_campaign(
            actor,
            campaign.into(),
            CampaignDetails::from(json.into_inner()),
        )
        .await;

    respond(result, res, StatusCode::OK)
}

#[cfg(test)]
mod tests {
    use flashdeal::lifecycle::CampaignStatus;
    use flashdeal_app::domain::campaigns::{
        CampaignsServiceError, MockCampaignsService, records::CampaignUuid,
    };
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_ACTOR_UUID, campaigns_service, make_campaign};

    use super::*;

    fn make_service(campaigns: MockCampaignsService) -> Service {
        campaigns_service(campaigns, Router::with_path("campaigns/{campaign}").put(handler))
    }

    fn payload() -> Value {
        json!({
            "title": "Later Sale",
            "start_at": "2026-11-02T22:00:00Z",
            "end_at": "2026-11-03T02:00:00Z",
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
    async fn test_update_campaign_success() -> TestResult {
        let uuid = CampaignUuid::new();
        let mut campaign = make_campaign(uuid, CampaignStatus::Scheduled);

        campaign.title = "Later Sale".to_string();

        let mut campaigns = MockCampaignsService::new();

        campaigns
            .expect_edit_campaign()
            .once()
            .withf(move |actor, requested, details| {
                *actor == TEST_ACTOR_UUID && *requested == uuid && details.title == "Later Sale"
            })
            .return_once(move |_, _, _| Ok(campaign));

        let mut res = TestClient::put(format!("http://example.com/campaigns/{uuid}"))
            .json(&payload())
            .send(&make_service(campaigns))
            .await;

        let body: CampaignResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.title, "Later Sale");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_active_campaign_returns_409() {
        let mut campaigns = MockCampaignsService::new();

        campaigns
            .expect_edit_campaign()
            .once()
            .return_once(|_, _, _| {
                Err(CampaignsServiceError::EditNotAllowed {
                    status: CampaignStatus::Active,
                })
            });

        let res = TestClient::put(format!("http://example.com/campaigns/{}", Uuid::now_v7()))
            .json(&payload())
            .send(&make_service(campaigns))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
    }

    #[tokio::test]
    async fn test_update_missing_campaign_returns_404() {
        let mut campaigns = MockCampaignsService::new();

        campaigns
            .expect_edit_campaign()
            .once()
            .return_once(|_, _, _| Err(CampaignsServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/campaigns/{}", Uuid::now_v7()))
            .json(&payload())
            .send(&make_service(campaigns))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }
}
