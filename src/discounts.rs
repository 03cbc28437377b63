//! Discounts

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest distance allowed between a supplied and a calculated percentage.
pub const PERCENT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Decimal places a calculated percentage is rounded to.
const PERCENT_SCALE: u32 = 2;

/// How a campaign expresses its line item discounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountMode {
    /// The deal price is authoritative; any percentage is informational.
    FlatPrice,

    /// The percentage must agree with the base and deal prices.
    Percentage,
}

impl DiscountMode {
    /// Storage representation of the mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FlatPrice => "flat_price",
            Self::Percentage => "percentage",
        }
    }
}

impl fmt::Display for DiscountMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown discount mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown discount mode: {0}")]
pub struct UnknownDiscountMode(pub String);

impl FromStr for DiscountMode {
    type Err = UnknownDiscountMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "flat_price" => Ok(Self::FlatPrice),
            "percentage" => Ok(Self::Percentage),
            other => Err(UnknownDiscountMode(other.to_string())),
        }
    }
}

/// Errors raised while reconciling prices with a discount percentage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscountError {
    /// The supplied percentage (or the implied one) disagrees with the prices.
    #[error("discount is inconsistent with prices: calculated {calculated}%, provided {provided:?}")]
    InconsistentDiscount {
        /// Percentage implied by the base and deal prices.
        calculated: Decimal,

        /// Percentage supplied by the caller, if any.
        provided: Option<Decimal>,
    },

    /// A price was zero, which leaves the percentage undefined.
    #[error("base price must be greater than zero")]
    ZeroBasePrice,
}

/// Percentage off `base_price` represented by `deal_price`, unrounded.
///
/// Prices are in minor units.
///
/// # Errors
///
/// Returns [`DiscountError::ZeroBasePrice`] when `base_price` is zero.
pub fn percent_off(base_price: u64, deal_price: u64) -> Result<Decimal, DiscountError> {
    if base_price == 0 {
        return Err(DiscountError::ZeroBasePrice);
    }

    let base = Decimal::from(base_price);
    let deal = Decimal::from(deal_price);

    Ok((base - deal) / base * Decimal::ONE_HUNDRED)
}

/// Computes or verifies a line item's discount percentage.
///
/// Under [`DiscountMode::Percentage`] the percentage implied by the prices is calculated. When no
/// percentage is supplied the calculated one is returned, rounded to two decimal places. When one
/// is supplied it must lie within [`PERCENT_TOLERANCE`] of the calculated value. A deal price
/// above the base price never verifies under this mode.
///
/// Under [`DiscountMode::FlatPrice`] nothing is checked and `provided` passes through.
///
/// # Errors
///
/// Returns [`DiscountError::InconsistentDiscount`] when the supplied or implied percentage does
/// not agree with the prices, and [`DiscountError::ZeroBasePrice`] when `base_price` is zero.
pub fn compute_or_verify_discount(
    base_price: u64,
    deal_price: u64,
    mode: DiscountMode,
    provided: Option<Decimal>,
) -> Result<Option<Decimal>, DiscountError> {
    match mode {
        DiscountMode::FlatPrice => Ok(provided),
        DiscountMode::Percentage => {
            let calculated = percent_off(base_price, deal_price)?;

            if calculated < Decimal::ZERO {
                return Err(DiscountError::InconsistentDiscount {
                    calculated: round_percent(calculated),
                    provided,
                });
            }

            match provided {
                None => Ok(Some(round_percent(calculated))),
                Some(percent) if (calculated - percent).abs() >= PERCENT_TOLERANCE => {
                    Err(DiscountError::InconsistentDiscount {
                        calculated: round_percent(calculated),
                        provided: Some(percent),
                    })
                }
                Some(percent) => Ok(Some(percent)),
            }
        }
    }
}

/// Deal price implied by applying `percent` to `base_price`, rounded to the nearest minor unit.
#[must_use]
pub fn deal_price_for(base_price: u64, percent: Decimal) -> Option<u64> {
    let base = Decimal::from(base_price);
    let factor = Decimal::ONE - percent / Decimal::ONE_HUNDRED;

    base.checked_mul(factor)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
}

fn round_percent(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(PERCENT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
