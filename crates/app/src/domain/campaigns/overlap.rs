//! Overlap Validator

use flashdeal::{overlap::find_overlap, window::DealWindow};

use crate::domain::{
    campaigns::{
        errors::CampaignsServiceError,
        records::{CampaignRecord, CampaignUuid},
        repository::{CampaignsRepository, OverlapQuery},
    },
    products::records::ProductUuid,
};

/// Fails with [`CampaignsServiceError::OverlapConflict`] when a scheduled or active campaign
/// other than `exclude` already claims one of `products` in an intersecting window.
///
/// The store narrows the candidates; the interval predicate is always re-applied here so that
/// every store agrees on what counts as an overlap.
pub(crate) async fn ensure_no_overlap(
    campaigns: &dyn CampaignsRepository,
    products: &[ProductUuid],
    window: DealWindow,
    exclude: Option<CampaignUuid>,
) -> Result<(), CampaignsServiceError> {
    let candidates = campaigns
        .find_overlapping(OverlapQuery {
            products: products.to_vec(),
            window,
            exclude,
        })
        .await?;

    match find_overlap::<CampaignRecord, _>(products, &window, exclude.as_ref(), &candidates) {
        Some(overlap) => Err(CampaignsServiceError::OverlapConflict {
            campaign: overlap.campaign,
            product: overlap.product,
        }),
        None => Ok(()),
    }
}
