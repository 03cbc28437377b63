//! Campaign Records

use std::{fmt, str::FromStr};

use flashdeal::{
    discounts::DiscountMode, lifecycle::CampaignStatus, overlap::ProductClaim,
    window::DealWindow,
};
use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{domain::products::records::ProductUuid, uuids::TypedUuid};

/// Campaign UUID
pub type CampaignUuid = TypedUuid<CampaignRecord>;

/// Whoever asked for a change, as supplied by the identity context.
#[derive(Debug)]
pub struct Actor;

/// Actor UUID
pub type ActorUuid = TypedUuid<Actor>;

/// Actor recorded for clock-driven transitions.
pub const SYSTEM_ACTOR: ActorUuid = ActorUuid::nil();

/// Campaign Record
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignRecord {
    pub uuid: CampaignUuid,
    pub title: String,
    pub deal_kind: DealKind,
    pub discount_mode: DiscountMode,
    pub window: DealWindow,
    pub line_items: Vec<LineItemRecord>,
    pub status: CampaignStatus,
    pub visibility: Visibility,
    pub limits: Limits,
    pub audit: Audit,
    pub metrics: Metrics,
    pub version: i64,
}

impl CampaignRecord {
    /// Products referenced by the line items, in line item order.
    pub fn products(&self) -> impl Iterator<Item = ProductUuid> + '_ {
        self.line_items.iter().map(|item| item.product)
    }

    pub fn is_deleted(&self) -> bool {
        self.audit.deleted_at.is_some()
    }
}

impl ProductClaim for CampaignRecord {
    type Campaign = CampaignUuid;
    type Product = ProductUuid;

    fn campaign(&self) -> CampaignUuid {
        self.uuid
    }

    fn status(&self) -> CampaignStatus {
        self.status
    }

    fn window(&self) -> DealWindow {
        self.window
    }

    fn is_deleted(&self) -> bool {
        CampaignRecord::is_deleted(self)
    }

    fn claimed_products(&self) -> impl Iterator<Item = ProductUuid> + '_ {
        self.products()
    }
}

/// One product's participation in a campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItemRecord {
    pub product: ProductUuid,
    pub base_price: u64,
    pub deal_price: u64,
    pub discount_percent: Option<Decimal>,
    pub deal_quantity: u32,
    pub initial_stock: u64,
    pub sold_quantity: u64,
    pub max_quantity_per_user: u32,
    pub min_order_quantity: u32,
}

/// Marketing label for a campaign. Has no effect on scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealKind {
    Flash,
    Lightning,
}

impl DealKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flash => "flash",
            Self::Lightning => "lightning",
        }
    }
}

impl fmt::Display for DealKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealKind {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "flash" => Ok(Self::Flash),
            "lightning" => Ok(Self::Lightning),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

/// Where a campaign may be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Homepage,
    Category,
    Search,
}

impl Surface {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Homepage => "homepage",
            Self::Category => "category",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Surface {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "homepage" => Ok(Self::Homepage),
            "category" => Ok(Self::Category),
            "search" => Ok(Self::Search),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

/// A stored enum value that is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown value: {0}")]
pub struct UnknownValue(pub String);

/// Eligible surfaces. There are only three, so they never spill to the heap.
pub type Surfaces = SmallVec<[Surface; 3]>;

/// Display settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visibility {
    pub show_on_homepage: bool,
    pub priority: u32,
    pub badge_text: Option<String>,
    pub show_countdown: bool,
    pub surfaces: Surfaces,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            show_on_homepage: false,
            priority: 0,
            badge_text: None,
            show_countdown: true,
            surfaces: SmallVec::from_buf([Surface::Homepage, Surface::Category, Surface::Search]),
        }
    }
}

/// Purchase restrictions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    pub max_orders_per_user: u32,
    pub payment_methods: Vec<String>,
    pub regions: Vec<String>,
    pub require_captcha: bool,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_orders_per_user: 1,
            payment_methods: Vec::new(),
            regions: Vec::new(),
            require_captcha: false,
        }
    }
}

/// Who changed the campaign and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Audit {
    pub created_by: ActorUuid,
    pub created_at: Timestamp,
    pub updated_by: Option<ActorUuid>,
    pub updated_at: Option<Timestamp>,
    pub paused_by: Option<ActorUuid>,
    pub paused_at: Option<Timestamp>,
    pub ended_by: Option<ActorUuid>,
    pub ended_at: Option<Timestamp>,
    pub deleted_at: Option<Timestamp>,
}

impl Audit {
    #[must_use]
    pub fn created(actor: ActorUuid, at: Timestamp) -> Self {
        Self {
            created_by: actor,
            created_at: at,
            updated_by: None,
            updated_at: None,
            paused_by: None,
            paused_at: None,
            ended_by: None,
            ended_at: None,
            deleted_at: None,
        }
    }
}

/// Sales figures maintained by checkout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metrics {
    pub revenue: u64,
    pub units_sold: u64,
    pub average_order_value: Decimal,
    pub conversion_rate: Decimal,
}
