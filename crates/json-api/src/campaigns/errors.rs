//! Campaign Errors

use flashdeal_app::domain::campaigns::{CampaignsServiceError, records::CampaignRecord};
use salvo::{http::StatusError, prelude::*};
use tracing::{error, warn};

use crate::campaigns::responses::CampaignResponse;

pub(crate) fn into_status_error(error: CampaignsServiceError) -> StatusError {
    let detail = error.to_string();

    match error {
        CampaignsServiceError::Validation(_) => StatusError::bad_request()
            .brief("Invalid campaign payload")
            .detail(detail),
        CampaignsServiceError::InconsistentDiscount { .. } => StatusError::unprocessable_entity()
            .brief("Discount is inconsistent with prices")
            .detail(detail),
        CampaignsServiceError::OverlapConflict { .. } => StatusError::conflict()
            .brief("Campaign overlaps an existing campaign")
            .detail(detail),
        CampaignsServiceError::InsufficientStock { .. } => StatusError::conflict()
            .brief("Insufficient stock")
            .detail(detail),
        CampaignsServiceError::AlreadyClaimed { .. } => StatusError::conflict()
            .brief("Product already in a live deal")
            .detail(detail),
        CampaignsServiceError::InvalidTransition { .. }
        | CampaignsServiceError::EditNotAllowed { .. }
        | CampaignsServiceError::InvalidPauseSource { .. }
        | CampaignsServiceError::AlreadyEnded => StatusError::conflict()
            .brief("Campaign cannot change state")
            .detail(detail),
        CampaignsServiceError::ConcurrentUpdate => StatusError::conflict()
            .brief("Campaign was modified concurrently")
            .detail(detail),
        CampaignsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Campaign already exists")
        }
        CampaignsServiceError::NotFound => StatusError::not_found().brief("Campaign not found"),
        CampaignsServiceError::ProductNotFound { .. } => StatusError::not_found()
            .brief("Product not found")
            .detail(detail),
        CampaignsServiceError::PartialSyncFailure { campaign, .. } => {
            error!(campaign_uuid = %campaign.uuid, "partial sync failure reached the error mapper");

            StatusError::internal_server_error()
        }
        CampaignsServiceError::Storage(source) => {
            error!("campaign storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// Turns a service outcome into a response.
///
/// A partially synchronized campaign was still committed, so it is returned as `202 Accepted`
/// with warnings rather than as an error.
pub(crate) fn respond(
    result: Result<CampaignRecord, CampaignsServiceError>,
    res: &mut Response,
    success: StatusCode,
) -> Result<Json<CampaignResponse>, StatusError> {
    match result {
        Ok(campaign) => {
            res.status_code(success);

            Ok(Json(campaign.into()))
        }
        Err(CampaignsServiceError::PartialSyncFailure {
            campaign,
            synced,
            failed,
        }) => {
            warn!(
                campaign_uuid = %campaign.uuid,
                unsynced = failed.len(),
                "campaign saved with unsynchronized projections"
            );

            res.status_code(StatusCode::ACCEPTED);

            Ok(Json(
                CampaignResponse::from(*campaign).with_unsynced(&synced, &failed),
            ))
        }
        Err(error) => Err(into_status_error(error)),
    }
}
