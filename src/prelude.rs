//! Flashdeal prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    discounts::{DiscountError, DiscountMode, compute_or_verify_discount},
    lifecycle::{CampaignStatus, LifecycleAction, LifecycleError, ProjectionEffect},
    overlap::{Overlap, ProductClaim, find_overlap},
    window::{DealWindow, MIN_WINDOW, WindowError},
};
