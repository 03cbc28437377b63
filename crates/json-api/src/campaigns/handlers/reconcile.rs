//! Reconcile Campaign Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    campaigns::{errors::respond, responses::CampaignResponse},
    extensions::*,
    state::State,
};

/// Reconcile Campaign Handler
///
/// Rewrites the campaign's product projections to match its status. Safe to repeat.
#[endpoint(
    tags("campaigns"),
    summary = "Reconcile Campaign Projections",
    responses(
        (status_code = StatusCode::OK, description = "Projections match the campaign"),
        (status_code = StatusCode::ACCEPTED, description = "Some projections still need reconciling"),
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
        .reconcile_projections(campaign.into_inner().into())
        .await;

    respond(result, res, StatusCode::OK)
}
