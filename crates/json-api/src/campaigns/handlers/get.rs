//! Get Campaign Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    campaigns::{errors::respond, responses::CampaignResponse},
    extensions::*,
    state::State,
};

/// Get Campaign Handler
///
/// Returns a campaign with its line items.
#[endpoint(
    tags("campaigns"),
    summary = "Get Campaign",
    responses(
        (status_code = StatusCode::OK, description = "Campaign found"),
        (status_code = StatusCode::NOT_FOUND, description = "Campaign not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    campaign: PathParam<Uuid>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CampaignResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let result = state
        .campaigns
        .get_campaign(campaign.into_inner().into())
        .await;

    respond(result, res, StatusCode::OK)
}
