//! Overlap Detection
//!
//! Two campaigns overlap when they share a product and their windows intersect while both still
//! claim their products (see [`CampaignStatus::claims_products`]). The check here is independent
//! of any store: callers fetch candidate campaigns however they like and hand them over as
//! [`ProductClaim`]s.

use std::hash::Hash;

use rustc_hash::FxHashSet;

use crate::{lifecycle::CampaignStatus, window::DealWindow};

/// A campaign as seen by the overlap check.
pub trait ProductClaim {
    /// Campaign identifier.
    type Campaign: PartialEq + Clone;

    /// Product identifier.
    type Product: Eq + Hash + Clone;

    /// Identifier of the claiming campaign.
    fn campaign(&self) -> Self::Campaign;

    /// Current campaign status.
    fn status(&self) -> CampaignStatus;

    /// Window the campaign claims its products for.
    fn window(&self) -> DealWindow;

    /// Whether the campaign has been soft deleted.
    fn is_deleted(&self) -> bool;

    /// Products the campaign claims.
    fn claimed_products(&self) -> impl Iterator<Item = Self::Product> + '_;
}

/// A conflict between a proposal and an existing campaign.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlap<C, P> {
    /// The existing campaign that already claims the product.
    pub campaign: C,

    /// The product both campaigns want.
    pub product: P,
}

/// Finds the first existing campaign that collides with a proposal.
///
/// Soft-deleted campaigns, campaigns that no longer claim products and the campaign identified by
/// `exclude` (the one being edited) are ignored. Candidate order decides which conflict is
/// reported when there are several.
pub fn find_overlap<'a, T, I>(
    products: &[T::Product],
    window: &DealWindow,
    exclude: Option<&T::Campaign>,
    candidates: I,
) -> Option<Overlap<T::Campaign, T::Product>>
where
    T: ProductClaim + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let proposed: FxHashSet<&T::Product> = products.iter().collect();

    candidates
        .into_iter()
        .filter(|claim| !claim.is_deleted() && claim.status().claims_products())
        .filter(|claim| exclude.is_none_or(|excluded| claim.campaign() != *excluded))
        .filter(|claim| claim.window().overlaps(window))
        .find_map(|claim| {
            claim
                .claimed_products()
                .find(|product| proposed.contains(product))
                .map(|product| Overlap {
                    campaign: claim.campaign(),
                    product,
                })
        })
}
