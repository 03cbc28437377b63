//! Campaign files
//!
//! Operators describe campaigns in YAML:
//!
//! ```yaml
//! title: Midnight Sale
//! deal_kind: flash
//! discount_mode: percentage
//! start_at: 2026-11-01T22:00:00Z
//! end_at: 2026-11-02T02:00:00Z
//! line_items:
//!   - product: 0199a5b2-7c1e-7a10-8e43-5b6a2f0d9c11
//!     base_price: 10000
//!     deal_price: 8000
//!     deal_quantity: 5
//!     initial_stock: 10
//! visibility:
//!   badge_text: "-20%"
//!   surfaces: [homepage, search]
//! ```

use std::{fs, path::Path};

use flashdeal::discounts::DiscountMode;
use flashdeal_app::domain::campaigns::{
    data::{CampaignDetails, NewCampaign, NewLineItem},
    records::{CampaignUuid, DealKind, Limits, Surface, Visibility},
};
use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub(crate) enum CampaignFileError {
    #[error("failed to read campaign file")]
    Io(#[from] std::io::Error),

    #[error("failed to parse campaign file")]
    Yaml(#[from] serde_norway::Error),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CampaignFile {
    #[serde(default)]
    pub(crate) uuid: Option<Uuid>,

    title: String,

    #[serde(default = "default_deal_kind")]
    deal_kind: DealKind,

    #[serde(default)]
    pub(crate) discount_mode: Option<DiscountMode>,

    start_at: Timestamp,
    end_at: Timestamp,
    line_items: Vec<LineItemFile>,

    #[serde(default)]
    visibility: VisibilityFile,

    #[serde(default)]
    limits: LimitsFile,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LineItemFile {
    product: Uuid,
    base_price: u64,
    deal_price: u64,

    #[serde(default)]
    discount_percent: Option<Decimal>,

    deal_quantity: u32,
    initial_stock: u64,

    #[serde(default = "one")]
    max_quantity_per_user: u32,

    #[serde(default = "one")]
    min_order_quantity: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct VisibilityFile {
    show_on_homepage: Option<bool>,
    priority: Option<u32>,
    badge_text: Option<String>,
    show_countdown: Option<bool>,
    surfaces: Option<Vec<Surface>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LimitsFile {
    max_orders_per_user: Option<u32>,

    #[serde(default)]
    payment_methods: Vec<String>,

    #[serde(default)]
    regions: Vec<String>,

    #[serde(default)]
    require_captcha: bool,
}

const fn default_deal_kind() -> DealKind {
    DealKind::Flash
}

const fn one() -> u32 {
    1
}

impl CampaignFile {
    pub(crate) fn load(path: &Path) -> Result<Self, CampaignFileError> {
        let contents = fs::read_to_string(path)?;

        Self::parse(&contents)
    }

    pub(crate) fn parse(contents: &str) -> Result<Self, CampaignFileError> {
        Ok(serde_norway::from_str(contents)?)
    }

    /// New campaign from the file. A missing uuid is generated and a missing mode is `percentage`.
    pub(crate) fn into_new_campaign(self) -> NewCampaign {
        NewCampaign {
            uuid: self.uuid.map_or_else(CampaignUuid::new, CampaignUuid::from),
            discount_mode: self.discount_mode.unwrap_or(DiscountMode::Percentage),
            details: self.into_details(),
        }
    }

    pub(crate) fn into_details(self) -> CampaignDetails {
        let defaults = Visibility::default();

        let visibility = Visibility {
            show_on_homepage: self
                .visibility
                .show_on_homepage
                .unwrap_or(defaults.show_on_homepage),
            priority: self.visibility.priority.unwrap_or(defaults.priority),
            badge_text: self.visibility.badge_text,
            show_countdown: self
                .visibility
                .show_countdown
                .unwrap_or(defaults.show_countdown),
            surfaces: self
                .visibility
                .surfaces
                .map_or(defaults.surfaces, |surfaces| surfaces.into_iter().collect()),
        };

        let limits = Limits {
            max_orders_per_user: self
                .limits
                .max_orders_per_user
                .unwrap_or_else(|| Limits::default().max_orders_per_user),
            payment_methods: self.limits.payment_methods,
            regions: self.limits.regions,
            require_captcha: self.limits.require_captcha,
        };

        CampaignDetails {
            title: self.title,
            deal_kind: self.deal_kind,
            start_at: self.start_at,
            end_at: self.end_at,
            line_items: self
                .line_items
                .into_iter()
                .map(|item| NewLineItem {
                    product: item.product.into(),
                    base_price: item.base_price,
                    deal_price: item.deal_price,
                    discount_percent: item.discount_percent,
                    deal_quantity: item.deal_quantity,
                    initial_stock: item.initial_stock,
                    max_quantity_per_user: item.max_quantity_per_user,
                    min_order_quantity: item.min_order_quantity,
                })
                .collect(),
            visibility,
            limits,
        }
    }
}
