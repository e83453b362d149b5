use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::DealFinanceError;
use crate::types::{Money, Rate};
use crate::DealFinanceResult;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Periodic (monthly) decimal rate from an annual percentage: 6 -> 0.005.
pub fn monthly_rate(annual_rate_percent: Rate) -> Rate {
    annual_rate_percent / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
}

/// Payment (PMT), spreadsheet sign convention: a positive present value
/// produces a negative payment.
pub fn pmt(rate: Rate, nper: u32, present_value: Money, future_value: Money) -> DealFinanceResult<Money> {
    if nper == 0 {
        return Err(DealFinanceError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    let overflow = || DealFinanceError::InvalidInput {
        field: "present_value".into(),
        reason: format!("Payment on {present_value} at {rate} over {nper} periods overflows"),
    };
    let total_value = present_value.checked_add(future_value).ok_or_else(overflow)?;

    if rate.is_zero() {
        return Ok(-total_value / Decimal::from(nper));
    }

    let factor = compound_factor(rate, nper)?;
    let annuity_factor = factor
        .checked_sub(Decimal::ONE)
        .and_then(|growth| growth.checked_div(rate))
        .ok_or_else(overflow)?;

    if annuity_factor.is_zero() {
        return Err(DealFinanceError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    let payment = present_value
        .checked_mul(factor)
        .and_then(|grown| grown.checked_add(future_value))
        .and_then(|owed| owed.checked_div(annuity_factor))
        .ok_or_else(overflow)?;
    Ok(-payment)
}

/// (1 + rate)^nper, failing instead of overflowing.
pub fn compound_factor(rate: Rate, nper: u32) -> DealFinanceResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powi(i64::from(nper))
        .ok_or_else(|| DealFinanceError::InvalidInput {
            field: "rate".into(),
            reason: format!("Compounding {rate} over {nper} periods overflows"),
        })
}
