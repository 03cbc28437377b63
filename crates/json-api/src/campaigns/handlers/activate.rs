//! Activate Campaign Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    campaigns::{errors::respond, responses::CampaignResponse},
    extensions::*,
    state::State,
};

/// Activate Campaign Handler
///
/// Opens a scheduled campaign ahead of the clock sweep.
#[endpoint(
    tags("campaigns"),
    summary = "Activate Campaign",
    responses(
        (status_code = StatusCode::OK, description = "Campaign activated"),
        (status_code = StatusCode::ACCEPTED, description = "Campaign activated; some projections need reconciling"),
        (status_code = StatusCode::NOT_FOUND, description = "Campaign not found"),
        (status_code = StatusCode::CONFLICT, description = "Campaign is not scheduled"),
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
        .activate_campaign(campaign.into_inner().into())
        .await;

    respond(result, res, StatusCode::OK)
}
