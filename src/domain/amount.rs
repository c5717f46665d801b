//! Conversion between decimal token amounts and on-chain base units.

use alloy_primitives::U256;
use rust_decimal::Decimal;

use crate::error::ValidationError;

/// Largest supported token precision; `Decimal` carries at most 28 digits of scale.
pub const MAX_DECIMALS: u32 = 28;

/// Convert a decimal token amount to base units, truncating extra precision.
///
/// # Errors
///
/// Returns [`ValidationError::NotPermitted`] for negative amounts or when the
/// scaled value does not fit in the decimal range.
pub fn to_base_units(amount: Decimal, decimals: u32) -> Result<U256, ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::NotPermitted {
            reason: format!("negative amount {amount}"),
        });
    }
    let scale = Decimal::from_i128_with_scale(10_i128.pow(decimals.min(MAX_DECIMALS)), 0);
    let scaled = amount
        .checked_mul(scale)
        .ok_or_else(|| ValidationError::NotPermitted {
            reason: format!("amount {amount} is out of range"),
        })?
        .trunc();
    let units = scaled.mantissa().unsigned_abs() / 10_u128.pow(scaled.scale());
    Ok(U256::from(units))
}

/// Convert base units back to a decimal amount, saturating above `Decimal::MAX`.
#[must_use]
pub fn from_base_units(units: U256, decimals: u32) -> Decimal {
    let int_val: u128 = units.try_into().unwrap_or(u128::MAX);
    let mut value = i128::try_from(int_val)
        .ok()
        .and_then(|v| Decimal::try_from_i128_with_scale(v, 0).ok())
        .unwrap_or(Decimal::MAX);
    let mut remaining = decimals.min(MAX_DECIMALS);
    while remaining > 0 {
        let step = remaining.min(9);
        value /= Decimal::from(10_u64.pow(step));
        remaining -= step;
    }
    value.normalize()
}
