//! Campaigns service errors.

use flashdeal::{
    discounts::DiscountError,
    lifecycle::{CampaignStatus, LifecycleError},
    window::WindowError,
};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::{
    campaigns::records::{CampaignRecord, CampaignUuid},
    errors::RepositoryError,
    products::records::ProductUuid,
};

#[derive(Debug, Error)]
pub enum CampaignsServiceError {
    #[error("campaign input is invalid: {}", summarize(.0))]
    Validation(Vec<ValidationIssue>),

    #[error(
        "discount for product {product} is inconsistent: calculated {calculated}%, provided {provided:?}"
    )]
    InconsistentDiscount {
        product: ProductUuid,
        calculated: Decimal,
        provided: Option<Decimal>,
    },

    #[error("product {product} is already claimed by campaign {campaign} in an overlapping window")]
    OverlapConflict {
        campaign: CampaignUuid,
        product: ProductUuid,
    },

    #[error(
        "product {product} has {available} in stock but {requested} were requested (short by {shortfall})"
    )]
    InsufficientStock {
        product: ProductUuid,
        requested: u64,
        available: u64,
        shortfall: u64,
    },

    #[error("product {product} is already owned by live campaign {owner}")]
    AlreadyClaimed {
        product: ProductUuid,
        owner: CampaignUuid,
    },

    #[error("cannot move campaign from {from} to {to}")]
    InvalidTransition {
        from: CampaignStatus,
        to: CampaignStatus,
    },

    #[error("campaign is {status}; only scheduled campaigns can be edited")]
    EditNotAllowed { status: CampaignStatus },

    #[error("campaign is {status}; only active campaigns can be paused")]
    InvalidPauseSource { status: CampaignStatus },

    #[error("campaign has already ended")]
    AlreadyEnded,

    #[error(
        "campaign {} was saved but {} of {} product projections could not be synchronized",
        .campaign.uuid,
        .failed.len(),
        .synced.len() + .failed.len()
    )]
    PartialSyncFailure {
        campaign: Box<CampaignRecord>,
        synced: Vec<ProductUuid>,
        failed: Vec<ProductUuid>,
    },

    #[error("campaign not found")]
    NotFound,

    #[error("product {product} not found")]
    ProductNotFound { product: ProductUuid },

    #[error("campaign already exists")]
    AlreadyExists,

    #[error("campaign was modified concurrently")]
    ConcurrentUpdate,

    #[error("storage error")]
    Storage(#[source] RepositoryError),
}

impl From<RepositoryError> for CampaignsServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::AlreadyExists => Self::AlreadyExists,
            RepositoryError::Conflict => Self::ConcurrentUpdate,
            RepositoryError::Sql(_) => Self::Storage(error),
        }
    }
}

impl From<LifecycleError> for CampaignsServiceError {
    fn from(error: LifecycleError) -> Self {
        match error {
            LifecycleError::InvalidTransition { from, to } => Self::InvalidTransition { from, to },
            LifecycleError::EditNotAllowed { status } => Self::EditNotAllowed { status },
            LifecycleError::InvalidPauseSource { status } => Self::InvalidPauseSource { status },
            LifecycleError::AlreadyEnded => Self::AlreadyEnded,
        }
    }
}

impl CampaignsServiceError {
    pub(crate) fn from_discount(product: ProductUuid, error: DiscountError) -> Self {
        match error {
            DiscountError::InconsistentDiscount {
                calculated,
                provided,
            } => Self::InconsistentDiscount {
                product,
                calculated,
                provided,
            },
            DiscountError::ZeroBasePrice => {
                Self::Validation(vec![ValidationIssue::ZeroBasePrice { product }])
            }
        }
    }
}

/// A single problem with the shape of a campaign payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("campaign must have at least one line item")]
    NoLineItems,

    #[error("product {product} appears in more than one line item")]
    DuplicateProduct { product: ProductUuid },

    #[error("base price for product {product} must be greater than zero")]
    ZeroBasePrice { product: ProductUuid },

    #[error("deal price for product {product} must be greater than zero")]
    ZeroDealPrice { product: ProductUuid },

    #[error("discount percent {percent} for product {product} must be between 0 and 100")]
    PercentOutOfRange {
        product: ProductUuid,
        percent: Decimal,
    },

    #[error("{field} for product {product} must be at least 1")]
    QuantityBelowMinimum {
        product: ProductUuid,
        field: &'static str,
    },

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error("campaign must be eligible for at least one surface")]
    NoSurfaces,

    #[error("max orders per user must be at least 1")]
    MaxOrdersPerUserBelowOne,
}

impl ValidationIssue {
    /// Input field the issue relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "title",
            Self::NoLineItems | Self::DuplicateProduct { .. } => "line_items",
            Self::ZeroBasePrice { .. } => "line_items.base_price",
            Self::ZeroDealPrice { .. } => "line_items.deal_price",
            Self::PercentOutOfRange { .. } => "line_items.discount_percent",
            Self::QuantityBelowMinimum { field, .. } => *field,
            Self::Window(_) => "window",
            Self::NoSurfaces => "visibility.surfaces",
            Self::MaxOrdersPerUserBelowOne => "limits.max_orders_per_user",
        }
    }
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
