//! Campaign payload validation.
//!
//! Shape checks collect every issue before reporting; discount checks run only once the shape is
//! sound. Nothing here touches a store.

use flashdeal::{
    discounts::{DiscountMode, compute_or_verify_discount},
    window::DealWindow,
};
use jiff::Timestamp;
use rust_decimal::Decimal;
use rustc_hash::FxHashSet;

use crate::domain::campaigns::{
    data::{CampaignDetails, NewLineItem},
    errors::{CampaignsServiceError, ValidationIssue},
    records::LineItemRecord,
};

/// Details that passed validation, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValidatedDetails {
    pub(crate) window: DealWindow,
    pub(crate) line_items: Vec<LineItemRecord>,
}

pub(crate) fn validate_details(
    details: &CampaignDetails,
    discount_mode: DiscountMode,
    now: Timestamp,
) -> Result<ValidatedDetails, CampaignsServiceError> {
    let mut issues = Vec::new();

    if details.title.trim().is_empty() {
        issues.push(ValidationIssue::EmptyTitle);
    }

    if details.line_items.is_empty() {
        issues.push(ValidationIssue::NoLineItems);
    }

    let mut seen = FxHashSet::default();

    for item in &details.line_items {
        if !seen.insert(item.product) {
            issues.push(ValidationIssue::DuplicateProduct {
                product: item.product,
            });
        }

        check_line_item(item, &mut issues);
    }

    let window = match DealWindow::new_upcoming(details.start_at, details.end_at, now) {
        Ok(window) => Some(window),
        Err(error) => {
            issues.push(ValidationIssue::Window(error));
            None
        }
    };

    if details.visibility.surfaces.is_empty() {
        issues.push(ValidationIssue::NoSurfaces);
    }

    if details.limits.max_orders_per_user < 1 {
        issues.push(ValidationIssue::MaxOrdersPerUserBelowOne);
    }

    let Some(window) = window.filter(|_| issues.is_empty()) else {
        return Err(CampaignsServiceError::Validation(issues));
    };

    let line_items = details
        .line_items
        .iter()
        .map(|item| line_item_record(item, discount_mode))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidatedDetails { window, line_items })
}

fn check_line_item(item: &NewLineItem, issues: &mut Vec<ValidationIssue>) {
    let product = item.product;

    if item.base_price == 0 {
        issues.push(ValidationIssue::ZeroBasePrice { product });
    }

    if item.deal_price == 0 {
        issues.push(ValidationIssue::ZeroDealPrice { product });
    }

    if let Some(percent) = item.discount_percent
        && !(Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&percent)
    {
        issues.push(ValidationIssue::PercentOutOfRange { product, percent });
    }

    let quantities = [
        ("line_items.deal_quantity", u64::from(item.deal_quantity)),
        ("line_items.initial_stock", item.initial_stock),
        (
            "line_items.max_quantity_per_user",
            u64::from(item.max_quantity_per_user),
        ),
        (
            "line_items.min_order_quantity",
            u64::from(item.min_order_quantity),
        ),
    ];

    for (field, value) in quantities {
        if value < 1 {
            issues.push(ValidationIssue::QuantityBelowMinimum { product, field });
        }
    }
}

fn line_item_record(
    item: &NewLineItem,
    discount_mode: DiscountMode,
) -> Result<LineItemRecord, CampaignsServiceError> {
    let discount_percent = compute_or_verify_discount(
        item.base_price,
        item.deal_price,
        discount_mode,
        item.discount_percent,
    )
    .map_err(|error| CampaignsServiceError::from_discount(item.product, error))?;

    Ok(LineItemRecord {
        product: item.product,
        base_price: item.base_price,
        deal_price: item.deal_price,
        discount_percent,
        deal_quantity: item.deal_quantity,
        initial_stock: item.initial_stock,
        sold_quantity: 0,
        max_quantity_per_user: item.max_quantity_per_user,
        min_order_quantity: item.min_order_quantity,
    })
}
