//! Campaign Responses

use std::string::ToString;

use flashdeal_app::domain::{
    campaigns::records::{Audit, CampaignRecord, LineItemRecord, Limits, Metrics, Visibility},
    products::records::ProductUuid,
};
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Campaign Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CampaignResponse {
    pub uuid: Uuid,
    pub title: String,
    pub deal_kind: String,
    pub discount_mode: String,

    /// One of `scheduled`, `active`, `paused` or `ended`
    pub status: String,

    pub start_at: String,
    pub end_at: String,
    pub line_items: Vec<LineItemResponse>,
    pub visibility: VisibilityResponse,
    pub limits: LimitsResponse,
    pub audit: AuditResponse,
    pub metrics: MetricsResponse,

    /// Present when the campaign was saved but some product projections were not updated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<SyncWarningsResponse>,
}

impl From<CampaignRecord> for CampaignResponse {
    fn from(campaign: CampaignRecord) -> Self {
        Self {
            uuid: campaign.uuid.into_uuid(),
            title: campaign.title,
            deal_kind: campaign.deal_kind.to_string(),
            discount_mode: campaign.discount_mode.to_string(),
            status: campaign.status.to_string(),
            start_at: campaign.window.start().to_string(),
            end_at: campaign.window.end().to_string(),
            line_items: campaign
                .line_items
                .into_iter()
                .map(LineItemResponse::from)
                .collect(),
            visibility: campaign.visibility.into(),
            limits: campaign.limits.into(),
            audit: campaign.audit.into(),
            metrics: campaign.metrics.into(),
            warnings: None,
        }
    }
}

impl CampaignResponse {
    pub(crate) fn with_unsynced(mut self, synced: &[ProductUuid], failed: &[ProductUuid]) -> Self {
        self.warnings = Some(SyncWarningsResponse {
            message: "campaign saved; some product projections need reconciling".to_string(),
            synced_products: synced.iter().copied().map(Uuid::from).collect(),
            unsynced_products: failed.iter().copied().map(Uuid::from).collect(),
        });

        self
    }
}

/// Projection synchronization warnings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SyncWarningsResponse {
    pub message: String,
    pub synced_products: Vec<Uuid>,
    pub unsynced_products: Vec<Uuid>,
}

/// Line Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LineItemResponse {
    pub product_uuid: Uuid,
    pub base_price: u64,
    pub deal_price: u64,
    pub discount_percent: Option<String>,
    pub deal_quantity: u32,
    pub initial_stock: u64,
    pub sold_quantity: u64,
    pub max_quantity_per_user: u32,
    pub min_order_quantity: u32,
}

impl From<LineItemRecord> for LineItemResponse {
    fn from(item: LineItemRecord) -> Self {
        Self {
            product_uuid: item.product.into_uuid(),
            base_price: item.base_price,
            deal_price: item.deal_price,
            discount_percent: item.discount_percent.as_ref().map(ToString::to_string),
            deal_quantity: item.deal_quantity,
            initial_stock: item.initial_stock,
            sold_quantity: item.sold_quantity,
            max_quantity_per_user: item.max_quantity_per_user,
            min_order_quantity: item.min_order_quantity,
        }
    }
}

/// Visibility Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VisibilityResponse {
    pub show_on_homepage: bool,
    pub priority: u32,
    pub badge_text: Option<String>,
    pub show_countdown: bool,
    pub surfaces: Vec<String>,
}

impl From<Visibility> for VisibilityResponse {
    fn from(visibility: Visibility) -> Self {
        Self {
            show_on_homepage: visibility.show_on_homepage,
            priority: visibility.priority,
            badge_text: visibility.badge_text,
            show_countdown: visibility.show_countdown,
            surfaces: visibility
                .surfaces
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Limits Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LimitsResponse {
    pub max_orders_per_user: u32,
    pub payment_methods: Vec<String>,
    pub regions: Vec<String>,
    pub require_captcha: bool,
}

impl From<Limits> for LimitsResponse {
    fn from(limits: Limits) -> Self {
        Self {
            max_orders_per_user: limits.max_orders_per_user,
            payment_methods: limits.payment_methods,
            regions: limits.regions,
            require_captcha: limits.require_captcha,
        }
    }
}

/// Audit Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AuditResponse {
    pub created_by: Uuid,
    pub created_at: String,
    pub updated_by: Option<Uuid>,
    pub updated_at: Option<String>,
    pub paused_by: Option<Uuid>,
    pub paused_at: Option<String>,
    pub ended_by: Option<Uuid>,
    pub ended_at: Option<String>,
}

impl From<Audit> for AuditResponse {
    fn from(audit: Audit) -> Self {
        Self {
            created_by: audit.created_by.into_uuid(),
            created_at: audit.created_at.to_string(),
            updated_by: audit.updated_by.map(Uuid::from),
            updated_at: audit.updated_at.as_ref().map(ToString::to_string),
            paused_by: audit.paused_by.map(Uuid::from),
            paused_at: audit.paused_at.as_ref().map(ToString::to_string),
            ended_by: audit.ended_by.map(Uuid::from),
            ended_at: audit.ended_at.as_ref().map(ToString::to_string),
        }
    }
}

/// Metrics Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MetricsResponse {
    pub revenue: u64,
    pub units_sold: u64,
    pub average_order_value: String,
    pub conversion_rate: String,
}

impl From<Metrics> for MetricsResponse {
    fn from(metrics: Metrics) -> Self {
        Self {
            revenue: metrics.revenue,
            units_sold: metrics.units_sold,
            average_order_value: metrics.average_order_value.to_string(),
            conversion_rate: metrics.conversion_rate.to_string(),
        }
    }
}
