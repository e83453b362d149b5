use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DealFinanceError;
use crate::time_value::{monthly_rate, pmt, MONTHS_PER_YEAR};
use crate::types::*;
use crate::DealFinanceResult;

/// A fixed-rate, fully amortising loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual rate as a percentage (10 = 10%)
    pub annual_rate_percent: Rate,
    pub term_years: u32,
}

/// Level payment and lifetime cost of a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub monthly_payment: Money,
    pub annual_payment: Money,
    pub total_cost: Money,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate_percent: Rate, term_years: u32) -> Self {
        LoanTerms {
            principal,
            annual_rate_percent,
            term_years,
        }
    }

    pub fn number_of_payments(&self) -> u32 {
        self.term_years.saturating_mul(MONTHS_PER_YEAR)
    }

    pub fn compute(&self) -> DealFinanceResult<LoanResult> {
        compute_loan(self.principal, self.annual_rate_percent, self.term_years)
    }
}

/// Monthly annuity payment, annualised payment and total cost of a loan.
///
/// A positive monthly rate uses the level-payment annuity formula
/// `P * r / (1 - (1 + r)^-n)`; a zero (or negative) rate amortises the
/// principal in a straight line. A zero-year term has no payments and is
/// reported as `DivisionByZero`.
pub fn compute_loan(
    principal: Money,
    annual_rate_percent: Rate,
    term_years: u32,
) -> DealFinanceResult<LoanResult> {
    let number_of_payments = term_years.saturating_mul(MONTHS_PER_YEAR);
    if number_of_payments == 0 {
        return Err(DealFinanceError::DivisionByZero {
            context: "loan payment over a zero-year term".into(),
        });
    }

    let rate = monthly_rate(annual_rate_percent);
    let monthly_payment = if rate > Decimal::ZERO {
        -pmt(rate, number_of_payments, principal, Decimal::ZERO)?
    } else {
        principal / Decimal::from(number_of_payments)
    };

    let annual_payment = monthly_payment
        .checked_mul(Decimal::from(MONTHS_PER_YEAR))
        .ok_or_else(|| out_of_range("annual_payment"))?;
    let total_cost = annual_payment
        .checked_mul(Decimal::from(term_years))
        .ok_or_else(|| out_of_range("total_cost"))?;

    Ok(LoanResult {
        monthly_payment,
        annual_payment,
        total_cost,
    })
}

fn out_of_range(field: &str) -> DealFinanceError {
    DealFinanceError::InvalidInput {
        field: field.into(),
        reason: "Result exceeds the representable range".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sba_reference_loan() {
        // 800k at 10% over 10 years => ~10,572.06/month
        let result = compute_loan(dec!(800000), dec!(10), 10).unwrap();
        assert!((result.monthly_payment - dec!(10572.06)).abs() < dec!(0.01));
        assert_eq!(result.annual_payment, result.monthly_payment * dec!(12));
        assert_eq!(result.total_cost, result.annual_payment * dec!(10));
    }

    #[test]
    fn test_seller_note_reference_loan() {
        // 100k at 5% over 10 years => ~1,060.66/month
        let result = compute_loan(dec!(100000), dec!(5), 10).unwrap();
        assert!((result.monthly_payment - dec!(1060.66)).abs() < dec!(0.01));
    }

    #[test]
    fn test_zero_rate_is_straight_line() {
        let result = compute_loan(dec!(120000), Decimal::ZERO, 10).unwrap();
        assert_eq!(result.monthly_payment, dec!(120000) / dec!(120));
        assert_eq!(result.monthly_payment, dec!(1000));
        assert_eq!(result.total_cost, dec!(120000));
    }

    #[test]
    fn test_negative_rate_is_straight_line() {
        let result = compute_loan(dec!(12000), dec!(-3), 1).unwrap();
        assert_eq!(result.monthly_payment, dec!(1000));
    }

    #[test]
    fn test_zero_term_is_division_by_zero() {
        let result = compute_loan(dec!(100000), dec!(5), 0);
        assert!(matches!(result, Err(DealFinanceError::DivisionByZero { .. })));
        let result = compute_loan(dec!(100000), Decimal::ZERO, 0);
        assert!(matches!(result, Err(DealFinanceError::DivisionByZero { .. })));
    }

    #[test]
    fn test_negative_principal_passes_through() {
        let result = compute_loan(dec!(-50000), dec!(8), 5).unwrap();
        assert!(result.monthly_payment < Decimal::ZERO);
    }

    #[test]
    fn test_extreme_rate_is_an_error_not_a_panic() {
        let result = compute_loan(dec!(4000000), dec!(200), 30);
        assert!(matches!(result, Err(DealFinanceError::InvalidInput { .. })));
        let result = compute_loan(Decimal::MAX, dec!(5), 30);
        assert!(result.is_err());
    }

    #[test]
    fn test_terms_compute_matches_function() {
        let terms = LoanTerms::new(dec!(250000), dec!(7), 15);
        assert_eq!(terms.number_of_payments(), 180);
        assert_eq!(
            terms.compute().unwrap(),
            compute_loan(dec!(250000), dec!(7), 15).unwrap()
        );
    }
}
