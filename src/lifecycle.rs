//! Campaign Lifecycle
//!
//! A campaign is created `scheduled`, becomes `active` when its window opens, may be `paused`
//! while active, and finishes `ended`. Ended is terminal.
//!
//! ```text
//!  (create) ──► scheduled ──activate──► active ──pause──► paused
//!                  │  ▲                   │                 │
//!                  └──┘ edit              └──────end────────┴──► ended
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Campaign status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    /// Committed and waiting for its window to open.
    Scheduled,

    /// Window open and selling.
    Active,

    /// Temporarily withdrawn by an operator.
    Paused,

    /// Finished. No further transitions are possible.
    Ended,
}

impl CampaignStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::Scheduled, Self::Active, Self::Paused, Self::Ended];

    /// Storage representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Ended => "ended",
        }
    }

    /// Whether a campaign in this status reserves its products' time windows.
    #[must_use]
    pub const fn claims_products(self) -> bool {
        matches!(self, Self::Scheduled | Self::Active)
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ended)
    }

    /// Applies `action`, returning the resulting status.
    ///
    /// # Errors
    ///
    /// - [`LifecycleError::EditNotAllowed`] when editing anything but a scheduled campaign.
    /// - [`LifecycleError::InvalidPauseSource`] when pausing anything but an active campaign.
    /// - [`LifecycleError::AlreadyEnded`] when ending an ended campaign.
    /// - [`LifecycleError::InvalidTransition`] for every other illegal move.
    pub const fn apply(self, action: LifecycleAction) -> Result<Self, LifecycleError> {
        match (self, action) {
            (Self::Scheduled, LifecycleAction::Edit) => Ok(Self::Scheduled),
            (status, LifecycleAction::Edit) => Err(LifecycleError::EditNotAllowed { status }),

            (Self::Scheduled, LifecycleAction::Activate) => Ok(Self::Active),

            (Self::Active, LifecycleAction::Pause) => Ok(Self::Paused),
            (status, LifecycleAction::Pause) => Err(LifecycleError::InvalidPauseSource { status }),

            (Self::Active | Self::Paused, LifecycleAction::End) => Ok(Self::Ended),
            (Self::Ended, LifecycleAction::End) => Err(LifecycleError::AlreadyEnded),

            (from, action) => Err(LifecycleError::InvalidTransition {
                from,
                to: action.target(),
            }),
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown campaign status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for CampaignStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// Something a caller or the clock asks a campaign to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleAction {
    /// Replace the campaign's details while it is still scheduled.
    Edit,

    /// Open the campaign (clock driven).
    Activate,

    /// Withdraw an active campaign temporarily.
    Pause,

    /// Finish the campaign, by an operator or because its window closed.
    End,
}

impl LifecycleAction {
    /// Status the action moves a campaign into when it succeeds.
    #[must_use]
    pub const fn target(self) -> CampaignStatus {
        match self {
            Self::Edit => CampaignStatus::Scheduled,
            Self::Activate => CampaignStatus::Active,
            Self::Pause => CampaignStatus::Paused,
            Self::End => CampaignStatus::Ended,
        }
    }

    /// What a successful action must do to the products' deal projections.
    #[must_use]
    pub const fn projection_effect(self) -> ProjectionEffect {
        match self {
            Self::Edit => ProjectionEffect::Replace,
            Self::Activate => ProjectionEffect::Apply,
            Self::Pause | Self::End => ProjectionEffect::Retract,
        }
    }
}

/// Projection work a transition requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectionEffect {
    /// Write the campaign's fields onto every product.
    Apply,

    /// Clear dropped products, then write the new line item set.
    Replace,

    /// Clear the campaign's fields from every product.
    Retract,
}

/// Lifecycle guard violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The requested move is not part of the lifecycle.
    #[error("cannot move campaign from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: CampaignStatus,

        /// Requested status.
        to: CampaignStatus,
    },

    /// Only scheduled campaigns may be edited.
    #[error("campaign is {status}; only scheduled campaigns can be edited")]
    EditNotAllowed {
        /// Current status.
        status: CampaignStatus,
    },

    /// Only active campaigns may be paused.
    #[error("campaign is {status}; only active campaigns can be paused")]
    InvalidPauseSource {
        /// Current status.
        status: CampaignStatus,
    },

    /// The campaign has already ended.
    #[error("campaign has already ended")]
    AlreadyEnded,
}
