//! Major/minor currency unit conversion.
//!
//! Razorpay takes and returns amounts in the smallest currency sub-unit
//! (paise for INR). Everything above the adapter works in major units.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{AppError, AppResult};

const MINOR_UNITS_PER_MAJOR: i64 = 100;
const MINOR_UNIT_SCALE: u32 = 2;

/// `amount × 100`, rounded half away from zero to a whole number of minor
/// units. Amounts with at most two fractional digits convert exactly.
pub fn to_minor_units(amount: Decimal) -> AppResult<i64> {
    let scaled = amount
        .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
        .ok_or_else(|| AppError::Validation(format!("Amount out of range: {}", amount)))?;

    scaled
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(|| AppError::Validation(format!("Amount out of range: {}", amount)))
}

pub fn to_major_units(minor: i64) -> Decimal {
    Decimal::new(minor, MINOR_UNIT_SCALE)
}
