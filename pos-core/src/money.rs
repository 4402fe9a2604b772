//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts are stored as `f64` on the records; every sum, difference and
//! product goes through `Decimal` and is rounded back to cents
//! (half away from zero).

use crate::store::CheckoutError;
use rust_decimal::prelude::*;
use shared::error::ErrorCode;

const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary equality (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Default shortfall accepted when settling a checkout (0.10)
pub const DEFAULT_PAYMENT_TOLERANCE: f64 = 0.1;

/// Maximum accepted single amount or unit price
const MAX_AMOUNT: f64 = 1_000_000.0;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
pub fn require_finite(value: f64, field_name: &str) -> Result<(), CheckoutError> {
    if !value.is_finite() {
        return Err(CheckoutError::Validation(
            ErrorCode::InvalidFormat,
            format!("{} must be a finite number, got {}", field_name, value),
        ));
    }
    Ok(())
}

/// Validate a tendered / transferred amount: finite, positive once rounded
/// to cents, and within bounds. Returns the rounded amount.
pub fn validate_amount(value: f64, field_name: &str) -> Result<f64, CheckoutError> {
    require_finite(value, field_name)?;
    let rounded = to_f64(to_decimal(value));
    if rounded <= 0.0 {
        return Err(CheckoutError::Validation(
            ErrorCode::PaymentInvalidAmount,
            format!("{} must be greater than zero, got {}", field_name, value),
        ));
    }
    if value > MAX_AMOUNT {
        return Err(CheckoutError::Validation(
            ErrorCode::ValueOutOfRange,
            format!(
                "{} exceeds maximum allowed ({}), got {}",
                field_name, MAX_AMOUNT, value
            ),
        ));
    }
    Ok(rounded)
}

/// Validate a price or fee: finite, non-negative and within bounds.
/// Returns the rounded value.
pub fn validate_price(value: f64, field_name: &str) -> Result<f64, CheckoutError> {
    require_finite(value, field_name)?;
    if value < 0.0 {
        return Err(CheckoutError::Validation(
            ErrorCode::ProductInvalidPrice,
            format!("{} must be non-negative, got {}", field_name, value),
        ));
    }
    if value > MAX_AMOUNT {
        return Err(CheckoutError::Validation(
            ErrorCode::ValueOutOfRange,
            format!(
                "{} exceeds maximum allowed ({}), got {}",
                field_name, MAX_AMOUNT, value
            ),
        ));
    }
    Ok(to_f64(to_decimal(value)))
}

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded to cents
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Sum amounts with decimal precision
pub fn sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    to_f64(values.into_iter().map(to_decimal).sum())
}

pub fn add(a: f64, b: f64) -> f64 {
    to_f64(to_decimal(a) + to_decimal(b))
}

pub fn sub(a: f64, b: f64) -> f64 {
    to_f64(to_decimal(a) - to_decimal(b))
}

/// `max(0, a - b)`
pub fn saturating_sub(a: f64, b: f64) -> f64 {
    to_f64((to_decimal(a) - to_decimal(b)).max(Decimal::ZERO))
}

/// Line total: `unit_price * quantity`
pub fn line_total(unit_price: f64, quantity: u32) -> f64 {
    to_f64(to_decimal(unit_price) * Decimal::from(quantity))
}

/// Check whether `paid` covers `required` within `tolerance`
pub fn is_payment_sufficient(paid: f64, required: f64, tolerance: f64) -> bool {
    to_decimal(paid) >= to_decimal(required) - to_decimal(tolerance)
}

/// Compare two amounts within one cent
pub fn money_eq(a: f64, b: f64) -> bool {
    (to_decimal(a) - to_decimal(b)).abs() < MONEY_TOLERANCE
}

/// True when `a` exceeds `b` by at least a cent
pub fn exceeds(a: f64, b: f64) -> bool {
    to_decimal(a) - to_decimal(b) >= MONEY_TOLERANCE
}

pub fn is_positive(value: f64) -> bool {
    to_decimal(value) >= MONEY_TOLERANCE
}
