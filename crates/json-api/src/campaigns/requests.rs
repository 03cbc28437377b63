//! Campaign Requests

use flashdeal::discounts::DiscountMode;
use flashdeal_app::domain::campaigns::{
    data::{CampaignDetails, NewCampaign, NewLineItem},
    records::{CampaignUuid, DealKind, Limits, Surface, Visibility},
};
use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How line item discounts are expressed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum DiscountModeRequest {
    FlatPrice,
    Percentage,
}

impl From<DiscountModeRequest> for DiscountMode {
    fn from(mode: DiscountModeRequest) -> Self {
        match mode {
            DiscountModeRequest::FlatPrice => DiscountMode::FlatPrice,
            DiscountModeRequest::Percentage => DiscountMode::Percentage,
        }
    }
}

/// Marketing label for the campaign
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum DealKindRequest {
    #[default]
    Flash,
    Lightning,
}

impl From<DealKindRequest> for DealKind {
    fn from(kind: DealKindRequest) -> Self {
        match kind {
            DealKindRequest::Flash => DealKind::Flash,
            DealKindRequest::Lightning => DealKind::Lightning,
        }
    }
}

/// Where the campaign may be surfaced
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(crate) enum SurfaceRequest {
    Homepage,
    Category,
    Search,
}

impl From<SurfaceRequest> for Surface {
    fn from(surface: SurfaceRequest) -> Self {
        match surface {
            SurfaceRequest::Homepage => Surface::Homepage,
            SurfaceRequest::Category => Surface::Category,
            SurfaceRequest::Search => Surface::Search,
        }
    }
}

/// Create Campaign Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct CreateCampaignRequest {
    /// Client supplied id; generated when omitted
    #[serde(default)]
    pub uuid: Option<Uuid>,

    /// Fixed for the lifetime of the campaign
    pub discount_mode: DiscountModeRequest,

    #[serde(flatten)]
    pub details: CampaignDetailsRequest,
}

impl From<CreateCampaignRequest> for NewCampaign {
    fn from(request: CreateCampaignRequest) -> Self {
        NewCampaign {
            uuid: request
                .uuid
                .map_or_else(CampaignUuid::new, CampaignUuid::from_uuid),
            discount_mode: request.discount_mode.into(),
            details: request.details.into(),
        }
    }
}

/// Campaign details, shared by create and update
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct CampaignDetailsRequest {
    pub title: String,

    #[serde(default)]
    pub deal_kind: DealKindRequest,

    #[salvo(schema(value_type = String))]
    pub start_at: Timestamp,

    #[salvo(schema(value_type = String))]
    pub end_at: Timestamp,

    pub line_items: Vec<LineItemRequest>,

    #[serde(default)]
    pub visibility: VisibilityRequest,

    #[serde(default)]
    pub limits: LimitsRequest,
}

impl From<CampaignDetailsRequest> for CampaignDetails {
    fn from(request: CampaignDetailsRequest) -> Self {
        CampaignDetails {
            title: request.title,
            deal_kind: request.deal_kind.into(),
            start_at: request.start_at,
            end_at: request.end_at,
            line_items: request.line_items.into_iter().map(Into::into).collect(),
            visibility: request.visibility.into(),
            limits: request.limits.into(),
        }
    }
}

/// One product's participation in the campaign. Prices are in minor units.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct LineItemRequest {
    pub product_uuid: Uuid,
    pub base_price: u64,
    pub deal_price: u64,

    /// Percentage off the base price; calculated under `percentage` mode when omitted
    #[serde(default)]
    #[salvo(schema(value_type = Option<String>))]
    pub discount_percent: Option<Decimal>,

    pub deal_quantity: u32,

    /// Stock carved out for the deal
    pub initial_stock: u64,

    #[serde(default = "one")]
    pub max_quantity_per_user: u32,

    #[serde(default = "one")]
    pub min_order_quantity: u32,
}

impl From<LineItemRequest> for NewLineItem {
    fn from(request: LineItemRequest) -> Self {
        NewLineItem {
            product: request.product_uuid.into(),
            base_price: request.base_price,
            deal_price: request.deal_price,
            discount_percent: request.discount_percent,
            deal_quantity: request.deal_quantity,
            initial_stock: request.initial_stock,
            max_quantity_per_user: request.max_quantity_per_user,
            min_order_quantity: request.min_order_quantity,
        }
    }
}

/// Display settings; omitted fields take their defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub(crate) struct VisibilityRequest {
    pub show_on_homepage: Option<bool>,
    pub priority: Option<u32>,
    pub badge_text: Option<String>,
    pub show_countdown: Option<bool>,
    pub surfaces: Option<Vec<SurfaceRequest>>,
}

impl From<VisibilityRequest> for Visibility {
    fn from(request: VisibilityRequest) -> Self {
        let defaults = Visibility::default();

        Visibility {
            show_on_homepage: request
                .show_on_homepage
                .unwrap_or(defaults.show_on_homepage),
            priority: request.priority.unwrap_or(defaults.priority),
            badge_text: request.badge_text,
            show_countdown: request.show_countdown.unwrap_or(defaults.show_countdown),
            surfaces: request.surfaces.map_or(defaults.surfaces, |surfaces| {
                surfaces.into_iter().map(Surface::from).collect()
            }),
        }
    }
}

/// Purchase restrictions; omitted fields take their defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub(crate) struct LimitsRequest {
    pub max_orders_per_user: Option<u32>,

    #[serde(default)]
    pub payment_methods: Vec<String>,

    #[serde(default)]
    pub regions: Vec<String>,

    #[serde(default)]
    pub require_captcha: bool,
}

impl From<LimitsRequest> for Limits {
    fn from(request: LimitsRequest) -> Self {
        Limits {
            max_orders_per_user: request
                .max_orders_per_user
                .unwrap_or_else(|| Limits::default().max_orders_per_user),
            payment_methods: request.payment_methods,
            regions: request.regions,
            require_captcha: request.require_captcha,
        }
    }
}

const fn one() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn create_request_parses_with_defaults() -> TestResult {
        let json = r#"
            {
                "discount_mode": "percentage",
                "title": "Midnight Sale",
                "start_at": "2026-11-01T22:00:00Z",
                "end_at": "2026-11-02T02:00:00Z",
                "line_items": [
                    {
                        "product_uuid": "0199a5b2-7c1e-7a10-8e43-5b6a2f0d9c11",
                        "base_price": 10000,
                        "deal_price": 8000,
                        "discount_percent": "20",
                        "deal_quantity": 5,
                        "initial_stock": 10
                    }
                ]
            }
        "#;

        let request: CreateCampaignRequest = serde_json::from_str(json)?;
        let campaign = NewCampaign::from(request);

        assert_eq!(campaign.discount_mode, DiscountMode::Percentage);
        assert_eq!(campaign.details.deal_kind, DealKind::Flash);
        assert_eq!(campaign.details.visibility, Visibility::default());
        assert_eq!(campaign.details.limits, Limits::default());
        assert_eq!(
            campaign.details.start_at,
            Timestamp::from_str("2026-11-01T22:00:00Z")?
        );

        let [item] = campaign.details.line_items.as_slice() else {
            return Err("expected one line item".into());
        };

        assert_eq!(item.discount_percent, Some(Decimal::from(20)));
        assert_eq!(item.max_quantity_per_user, 1);

        Ok(())
    }

    #[test]
    fn surfaces_replace_the_default_set() {
        let visibility = Visibility::from(VisibilityRequest {
            surfaces: Some(vec![SurfaceRequest::Search]),
            ..VisibilityRequest::default()
        });

        assert_eq!(visibility.surfaces.as_slice(), &[Surface::Search]);
        assert!(visibility.show_countdown);
    }

    #[test]
    fn empty_surfaces_are_passed_through_for_validation() {
        let visibility = Visibility::from(VisibilityRequest {
            surfaces: Some(vec![]),
            ..VisibilityRequest::default()
        });

        assert!(visibility.surfaces.is_empty());
    }
}
