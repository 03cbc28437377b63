//! End Campaign Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    campaigns::{errors::respond, responses::CampaignResponse},
    extensions::*,
    state::State,
};

/// End Campaign Handler
///
/// Finishes an active or paused campaign and clears its deal from its products.
#[endpoint(
    tags("campaigns"),
    summary = "End Campaign",
    responses(
        (status_code = StatusCode::OK, description = "Campaign ended"),
        (status_code = StatusCode::ACCEPTED, description = "Campaign ended; some projections need reconciling"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Missing actor identity"),
        (status_code = StatusCode::NOT_FOUND, description = "Campaign not found"),
        (status_code = StatusCode::CONFLICT, description = "Campaign has already ended or has not started"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "campaigns.end",
    skip(campaign, depot, res),
    fields(actor_uuid = tracing::field::Empty, campaign_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    campaign: PathParam<Uuid>,
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
        .end_campaign(actor, campaign.into())
        .await;

    respond(result, res, StatusCode::OK)
}
