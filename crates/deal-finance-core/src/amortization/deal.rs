use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::loan::{compute_loan, LoanResult};
use crate::config::CalculatorConfig;
use crate::fields::{CalculatedField, SliderField};
use crate::format;
use crate::types::*;

/// The eight slider values of an acquisition structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealInputs {
    pub purchase_price: Money,
    /// Down payment as a percentage of purchase price
    pub down_payment_percent: Rate,
    /// Seller note as a percentage of purchase price
    pub seller_note_percent: Rate,
    pub ebitda: Money,
    /// SBA annual interest rate, percent
    pub sba_interest_rate: Rate,
    pub sba_loan_term: u32,
    /// Seller note annual interest rate, percent
    pub seller_note_interest_rate: Rate,
    pub seller_note_term: u32,
}

impl Default for DealInputs {
    fn default() -> Self {
        DealInputs {
            purchase_price: dec!(1000000),
            down_payment_percent: dec!(10),
            seller_note_percent: dec!(10),
            ebitda: dec!(250000),
            sba_interest_rate: dec!(10),
            sba_loan_term: 10,
            seller_note_interest_rate: dec!(5),
            seller_note_term: 10,
        }
    }
}

impl DealInputs {
    /// Inputs built from per-field values. A field the lookup cannot supply
    /// reads as zero; terms are rounded to whole years and floored at zero.
    pub fn from_lookup(mut lookup: impl FnMut(SliderField) -> Option<Decimal>) -> Self {
        let mut get = |field| lookup(field).unwrap_or(Decimal::ZERO);
        DealInputs {
            purchase_price: get(SliderField::PurchasePrice),
            down_payment_percent: get(SliderField::DownPayment),
            seller_note_percent: get(SliderField::SellerNote),
            ebitda: get(SliderField::Ebitda),
            sba_interest_rate: get(SliderField::SbaInterestRate),
            sba_loan_term: whole_years(get(SliderField::SbaLoanTerm)),
            seller_note_interest_rate: get(SliderField::SellerNoteInterestRate),
            seller_note_term: whole_years(get(SliderField::SellerNoteTerm)),
        }
    }

    /// Slider defaults of a calculator layout.
    pub fn from_config(config: &CalculatorConfig) -> Self {
        Self::from_lookup(|field| config.slider(field).map(|s| s.default))
    }

    pub fn get(&self, field: SliderField) -> Decimal {
        match field {
            SliderField::PurchasePrice => self.purchase_price,
            SliderField::DownPayment => self.down_payment_percent,
            SliderField::SellerNote => self.seller_note_percent,
            SliderField::Ebitda => self.ebitda,
            SliderField::SbaInterestRate => self.sba_interest_rate,
            SliderField::SbaLoanTerm => Decimal::from(self.sba_loan_term),
            SliderField::SellerNoteInterestRate => self.seller_note_interest_rate,
            SliderField::SellerNoteTerm => Decimal::from(self.seller_note_term),
        }
    }

    /// Slider handle text for a field, e.g. `$1,000,000` or `10 years`.
    pub fn display(&self, field: SliderField) -> String {
        format::format_slider(field.unit(), self.get(field))
    }
}

fn whole_years(value: Decimal) -> u32 {
    value.round().to_u32().unwrap_or(0)
}

/// The fifteen derived figures. `None` marks a figure that is undefined
/// for the inputs (zero-year loan term, zero EBITDA).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealMetrics {
    pub down_payment: Money,
    pub seller_note: Money,
    pub need_to_finance: Money,
    pub cash_to_seller: Money,
    pub sba_loan_amount: Money,
    pub sba_loan: Option<LoanResult>,
    pub seller_loan: Option<LoanResult>,
    pub total_annual_loan_payments: Option<Money>,
    pub total_loan_cost: Option<Money>,
    pub remaining_ebitda: Option<Money>,
    pub ebitda_multiple: Option<Multiple>,
}

impl DealMetrics {
    pub fn value(&self, field: CalculatedField) -> Option<Decimal> {
        let sba = self.sba_loan.as_ref();
        let seller = self.seller_loan.as_ref();
        match field {
            CalculatedField::DownPaymentValue => Some(self.down_payment),
            CalculatedField::SellerNoteValue => Some(self.seller_note),
            CalculatedField::NeedToFinanceValue => Some(self.need_to_finance),
            CalculatedField::CashToSellerValue => Some(self.cash_to_seller),
            CalculatedField::SbaLoanValue => Some(self.sba_loan_amount),
            CalculatedField::SbaMonthlyPayment => sba.map(|l| l.monthly_payment),
            CalculatedField::SbaAnnualPayment => sba.map(|l| l.annual_payment),
            CalculatedField::SbaTotalLoanCost => sba.map(|l| l.total_cost),
            CalculatedField::SellerNoteMonthlyPayment => seller.map(|l| l.monthly_payment),
            CalculatedField::SellerNoteAnnualPayment => seller.map(|l| l.annual_payment),
            CalculatedField::SellerTotalLoanCost => seller.map(|l| l.total_cost),
            CalculatedField::TotalAnnualLoanPayments => self.total_annual_loan_payments,
            CalculatedField::TotalLoanCost => self.total_loan_cost,
            CalculatedField::RemainingEbitdaAfterLoanPayments => self.remaining_ebitda,
            CalculatedField::EbitdaMultiple => self.ebitda_multiple,
        }
    }

    /// Rendered figure: whole-dollar currency, or one decimal for the multiple.
    pub fn display(&self, field: CalculatedField) -> String {
        let value = self.value(field);
        if field.is_currency() {
            format::format_currency_opt(value)
        } else {
            format::format_multiple_opt(value)
        }
    }
}

/// Derive every output figure from the slider inputs. Pure: no state is
/// read or written, and nonsensical inputs (percentages over 100, zero
/// EBITDA) pass straight through.
pub fn compute_deal(inputs: &DealInputs) -> DealMetrics {
    compute_deal_collecting(inputs, &mut Vec::new())
}

/// [`compute_deal`] wrapped in the standard computation envelope, with a
/// warning for every figure that came out undefined.
pub fn analyze_deal(inputs: &DealInputs) -> ComputationOutput<DealMetrics> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let metrics = compute_deal_collecting(inputs, &mut warnings);

    let financed_percent = inputs
        .down_payment_percent
        .saturating_add(inputs.seller_note_percent);
    if financed_percent > dec!(100) {
        warnings.push(format!(
            "Down payment and seller note total {financed_percent}% of purchase price; amount to finance is negative"
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "SBA acquisition financing: level-payment annuity on SBA loan and seller note",
        inputs,
        warnings,
        elapsed,
        metrics,
    )
}

fn compute_deal_collecting(inputs: &DealInputs, warnings: &mut Vec<String>) -> DealMetrics {
    let price = inputs.purchase_price;
    let down_payment = percent_of(price, inputs.down_payment_percent, "Down payment", warnings);
    let seller_note = percent_of(price, inputs.seller_note_percent, "Seller note", warnings);
    let need_to_finance = saturate(
        price.checked_sub(down_payment).and_then(|v| v.checked_sub(seller_note)),
        price.saturating_sub(down_payment).saturating_sub(seller_note),
        "Need to finance",
        warnings,
    );
    let cash_to_seller = saturate(
        down_payment.checked_add(need_to_finance),
        down_payment.saturating_add(need_to_finance),
        "Cash to seller",
        warnings,
    );

    let mut loan = |name: &str, principal: Money, rate: Rate, term: u32| {
        match compute_loan(principal, rate, term) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::debug!(loan = name, error = %e, "loan payment undefined");
                warnings.push(format!("{name}: {e}"));
                None
            }
        }
    };

    let sba_loan = loan(
        "SBA loan",
        need_to_finance,
        inputs.sba_interest_rate,
        inputs.sba_loan_term,
    );
    let seller_loan = loan(
        "Seller note",
        seller_note,
        inputs.seller_note_interest_rate,
        inputs.seller_note_term,
    );

    let (total_annual_loan_payments, total_loan_cost) = match (&sba_loan, &seller_loan) {
        (Some(sba), Some(seller)) => (
            defined(
                sba.annual_payment.checked_add(seller.annual_payment),
                "Total annual loan payments",
                warnings,
            ),
            defined(
                sba.total_cost.checked_add(seller.total_cost),
                "Total loan cost",
                warnings,
            ),
        ),
        _ => (None, None),
    };
    let remaining_ebitda = total_annual_loan_payments.and_then(|total| {
        defined(inputs.ebitda.checked_sub(total), "Remaining EBITDA", warnings)
    });

    let ebitda_multiple = if inputs.ebitda.is_zero() {
        warnings.push("EBITDA is zero; EBITDA multiple is undefined".into());
        None
    } else {
        defined(price.checked_div(inputs.ebitda), "EBITDA multiple", warnings)
    };

    DealMetrics {
        down_payment,
        seller_note,
        need_to_finance,
        cash_to_seller,
        sba_loan_amount: need_to_finance,
        sba_loan,
        seller_loan,
        total_annual_loan_payments,
        total_loan_cost,
        remaining_ebitda,
        ebitda_multiple,
    }
}

/// `amount * percent / 100`, saturating at the edge of the decimal range.
fn percent_of(amount: Money, percent: Rate, name: &str, warnings: &mut Vec<String>) -> Money {
    saturate(
        amount.checked_mul(percent).map(|v| v / dec!(100)),
        (amount / dec!(100)).saturating_mul(percent),
        name,
        warnings,
    )
}

fn saturate(checked: Option<Money>, saturated: Money, name: &str, warnings: &mut Vec<String>) -> Money {
    checked.unwrap_or_else(|| {
        warnings.push(format!("{name} exceeds the representable range; value saturated"));
        saturated
    })
}

fn defined(checked: Option<Money>, name: &str, warnings: &mut Vec<String>) -> Option<Money> {
    if checked.is_none() {
        warnings.push(format!("{name} exceeds the representable range; value is undefined"));
    }
    checked
}
