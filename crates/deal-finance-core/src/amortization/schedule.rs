use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::loan::{compute_loan, LoanTerms};
use crate::error::DealFinanceError;
use crate::time_value::{monthly_rate, MONTHS_PER_YEAR};
use crate::types::*;
use crate::DealFinanceResult;

/// Longest loan a schedule will be built for.
pub const MAX_SCHEDULE_YEARS: u32 = 100;

/// One year of a level-payment loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleYear {
    pub year: u32,
    pub opening_balance: Money,
    pub payments: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

/// Year-by-year amortization of a single loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub monthly_payment: Money,
    pub years: Vec<ScheduleYear>,
    pub total_paid: Money,
    pub total_interest: Money,
    pub total_principal: Money,
}

/// Build a year-by-year amortization schedule. Interest accrues monthly on
/// the opening balance; the final payment retires whatever balance is left
/// so the schedule always closes at zero.
pub fn build_amortization_schedule(
    terms: &LoanTerms,
) -> DealFinanceResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if terms.principal < Decimal::ZERO {
        return Err(DealFinanceError::InvalidInput {
            field: "principal".into(),
            reason: "Loan principal cannot be negative".into(),
        });
    }
    if terms.term_years == 0 {
        return Err(DealFinanceError::InvalidInput {
            field: "term_years".into(),
            reason: "Term must be at least 1 year".into(),
        });
    }
    if terms.term_years > MAX_SCHEDULE_YEARS {
        return Err(DealFinanceError::InvalidInput {
            field: "term_years".into(),
            reason: format!("Term must be at most {MAX_SCHEDULE_YEARS} years"),
        });
    }
    if terms.principal.is_zero() {
        warnings.push("Principal is zero; schedule contains no payments".into());
    }

    let loan = compute_loan(terms.principal, terms.annual_rate_percent, terms.term_years)?;
    let rate = monthly_rate(terms.annual_rate_percent).max(Decimal::ZERO);
    let last_month = terms.number_of_payments();

    let mut years = Vec::new();
    let mut balance = terms.principal;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;

    for year in 1..=terms.term_years {
        let opening_balance = balance;
        let mut interest = Decimal::ZERO;
        let mut payments = Decimal::ZERO;

        for m in 1..=MONTHS_PER_YEAR {
            let month = (year - 1) * MONTHS_PER_YEAR + m;
            let month_interest = balance * rate;
            let repaid = if month == last_month {
                balance
            } else {
                (loan.monthly_payment - month_interest).min(balance)
            };
            balance -= repaid;
            interest += month_interest;
            payments += month_interest + repaid;
        }

        total_interest += interest;
        total_paid += payments;

        years.push(ScheduleYear {
            year,
            opening_balance,
            payments,
            interest,
            principal: opening_balance - balance,
            closing_balance: balance,
        });
    }

    let output = AmortizationSchedule {
        monthly_payment: loan.monthly_payment,
        years,
        total_paid,
        total_interest,
        total_principal: terms.principal,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization, monthly compounding",
        terms,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_schedule_closes_at_zero() {
        let terms = LoanTerms::new(dec!(800000), dec!(10), 10);
        let out = build_amortization_schedule(&terms).unwrap().result;
        assert_eq!(out.years.len(), 10);
        assert_eq!(out.years[0].opening_balance, dec!(800000));
        assert_eq!(out.years.last().unwrap().closing_balance, Decimal::ZERO);
        let principal: Decimal = out.years.iter().map(|y| y.principal).sum();
        assert_eq!(principal, dec!(800000));
    }

    #[test]
    fn test_schedule_totals_match_loan_cost() {
        let terms = LoanTerms::new(dec!(800000), dec!(10), 10);
        let out = build_amortization_schedule(&terms).unwrap().result;
        let loan = terms.compute().unwrap();
        assert!((out.total_paid - loan.total_cost).abs() < dec!(0.01));
        assert_eq!(out.total_paid, out.total_interest + dec!(800000));
    }

    #[test]
    fn test_interest_declines_each_year() {
        let terms = LoanTerms::new(dec!(100000), dec!(5), 10);
        let out = build_amortization_schedule(&terms).unwrap().result;
        for pair in out.years.windows(2) {
            assert!(pair[1].interest < pair[0].interest);
            assert!(pair[1].principal > pair[0].principal);
        }
    }

    #[test]
    fn test_zero_rate_schedule_is_even() {
        let terms = LoanTerms::new(dec!(120000), Decimal::ZERO, 5);
        let out = build_amortization_schedule(&terms).unwrap().result;
        assert_eq!(out.total_interest, Decimal::ZERO);
        for y in &out.years {
            assert_eq!(y.principal, dec!(24000));
        }
    }

    #[test]
    fn test_zero_term_rejected() {
        let terms = LoanTerms::new(dec!(100000), dec!(5), 0);
        assert!(build_amortization_schedule(&terms).is_err());
    }

    #[test]
    fn test_term_above_limit_rejected() {
        let terms = LoanTerms::new(dec!(100000), Decimal::ZERO, MAX_SCHEDULE_YEARS + 1);
        assert!(matches!(
            build_amortization_schedule(&terms),
            Err(DealFinanceError::InvalidInput { .. })
        ));
        let terms = LoanTerms::new(dec!(100000), Decimal::ZERO, MAX_SCHEDULE_YEARS);
        assert_eq!(build_amortization_schedule(&terms).unwrap().result.years.len(), 100);
    }

    #[test]
    fn test_negative_principal_rejected() {
        let terms = LoanTerms::new(dec!(-1), dec!(5), 5);
        assert!(build_amortization_schedule(&terms).is_err());
    }
}
