//! Field catalogue shared by the calculator, the formatter and the scenario
//! store. Field ids are the keys used in captured scenarios and CSV headers,
//! so they must stay stable.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One of the eight user-controlled inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SliderField {
    PurchasePrice,
    DownPayment,
    SellerNote,
    Ebitda,
    SbaInterestRate,
    SbaLoanTerm,
    SellerNoteInterestRate,
    SellerNoteTerm,
}

impl SliderField {
    /// Display order of the input panel.
    pub const ALL: [SliderField; 8] = [
        SliderField::PurchasePrice,
        SliderField::DownPayment,
        SliderField::SellerNote,
        SliderField::Ebitda,
        SliderField::SbaInterestRate,
        SliderField::SbaLoanTerm,
        SliderField::SellerNoteInterestRate,
        SliderField::SellerNoteTerm,
    ];

    pub fn id(self) -> &'static str {
        match self {
            SliderField::PurchasePrice => "purchasePrice",
            SliderField::DownPayment => "downPayment",
            SliderField::SellerNote => "sellerNote",
            SliderField::Ebitda => "ebitda",
            SliderField::SbaInterestRate => "sbaInterestRate",
            SliderField::SbaLoanTerm => "sbaLoanTerm",
            SliderField::SellerNoteInterestRate => "sellerNoteInterestRate",
            SliderField::SellerNoteTerm => "sellerNoteTerm",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }

    pub fn label(self) -> &'static str {
        match self {
            SliderField::PurchasePrice => "Purchase Price ($)",
            SliderField::DownPayment => "Down Payment (%)",
            SliderField::SellerNote => "Seller Note (%)",
            SliderField::Ebitda => "EBITDA ($)",
            SliderField::SbaInterestRate => "SBA Interest Rate (%)",
            SliderField::SbaLoanTerm => "SBA Loan Term (Years)",
            SliderField::SellerNoteInterestRate => "Seller Note Interest Rate (%)",
            SliderField::SellerNoteTerm => "Seller Note Term (Years)",
        }
    }

    pub fn unit(self) -> SliderUnit {
        match self {
            SliderField::PurchasePrice | SliderField::Ebitda => SliderUnit::Currency,
            SliderField::SbaLoanTerm | SliderField::SellerNoteTerm => SliderUnit::Years,
            _ => SliderUnit::Percent,
        }
    }
}

/// One of the fifteen derived outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CalculatedField {
    DownPaymentValue,
    SellerNoteValue,
    NeedToFinanceValue,
    CashToSellerValue,
    SbaLoanValue,
    SbaMonthlyPayment,
    SbaAnnualPayment,
    SbaTotalLoanCost,
    SellerNoteMonthlyPayment,
    SellerNoteAnnualPayment,
    SellerTotalLoanCost,
    TotalAnnualLoanPayments,
    TotalLoanCost,
    RemainingEbitdaAfterLoanPayments,
    EbitdaMultiple,
}

impl CalculatedField {
    pub const ALL: [CalculatedField; 15] = [
        CalculatedField::DownPaymentValue,
        CalculatedField::SellerNoteValue,
        CalculatedField::NeedToFinanceValue,
        CalculatedField::CashToSellerValue,
        CalculatedField::SbaLoanValue,
        CalculatedField::SbaMonthlyPayment,
        CalculatedField::SbaAnnualPayment,
        CalculatedField::SbaTotalLoanCost,
        CalculatedField::SellerNoteMonthlyPayment,
        CalculatedField::SellerNoteAnnualPayment,
        CalculatedField::SellerTotalLoanCost,
        CalculatedField::TotalAnnualLoanPayments,
        CalculatedField::TotalLoanCost,
        CalculatedField::RemainingEbitdaAfterLoanPayments,
        CalculatedField::EbitdaMultiple,
    ];

    pub fn id(self) -> &'static str {
        match self {
            CalculatedField::DownPaymentValue => "downPaymentValue",
            CalculatedField::SellerNoteValue => "sellerNoteValue",
            CalculatedField::NeedToFinanceValue => "needToFinanceValue",
            CalculatedField::CashToSellerValue => "cashToSellerValue",
            CalculatedField::SbaLoanValue => "sbaLoanValue",
            CalculatedField::SbaMonthlyPayment => "sbaMonthlyPayment",
            CalculatedField::SbaAnnualPayment => "sbaAnnualPayment",
            CalculatedField::SbaTotalLoanCost => "sbaTotalLoanCost",
            CalculatedField::SellerNoteMonthlyPayment => "sellerNoteMonthlyPayment",
            CalculatedField::SellerNoteAnnualPayment => "sellerNoteAnnualPayment",
            CalculatedField::SellerTotalLoanCost => "sellerTotalLoanCost",
            CalculatedField::TotalAnnualLoanPayments => "totalAnnualLoanPayments",
            CalculatedField::TotalLoanCost => "totalLoanCost",
            CalculatedField::RemainingEbitdaAfterLoanPayments => "remainingEbitdaAfterLoanPayments",
            CalculatedField::EbitdaMultiple => "ebitdaMultiple",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }

    pub fn label(self) -> &'static str {
        match self {
            CalculatedField::DownPaymentValue => "Down Payment ($)",
            CalculatedField::SellerNoteValue => "Seller Note ($)",
            CalculatedField::NeedToFinanceValue => "Need to Finance ($)",
            CalculatedField::CashToSellerValue => "Cash to Seller ($)",
            CalculatedField::SbaLoanValue => "SBA Loan ($)",
            CalculatedField::SbaMonthlyPayment => "SBA Monthly Payment ($)",
            CalculatedField::SbaAnnualPayment => "SBA Annual Payment ($)",
            CalculatedField::SbaTotalLoanCost => "SBA Total Loan Cost ($)",
            CalculatedField::SellerNoteMonthlyPayment => "Seller Note Monthly Payment ($)",
            CalculatedField::SellerNoteAnnualPayment => "Seller Note Annual Payment ($)",
            CalculatedField::SellerTotalLoanCost => "Seller Total Loan Cost ($)",
            CalculatedField::TotalAnnualLoanPayments => "Total Annual Loan Payments ($)",
            CalculatedField::TotalLoanCost => "Total Loan Cost ($)",
            CalculatedField::RemainingEbitdaAfterLoanPayments => {
                "Remaining EBITDA After Loan Payments ($)"
            }
            CalculatedField::EbitdaMultiple => "EBITDA Multiple (Ratio)",
        }
    }

    /// Everything except the multiple renders as whole-unit currency.
    pub fn is_currency(self) -> bool {
        self != CalculatedField::EbitdaMultiple
    }
}

/// How a slider value is rendered next to its handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliderUnit {
    /// `$1,000,000`
    Currency,
    /// `10%`
    Percent,
    /// `10 years`
    Years,
}

/// Range, step and default of one slider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderSpec {
    pub field: SliderField,
    pub label: String,
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
    pub default: Decimal,
    pub unit: SliderUnit,
}

impl SliderSpec {
    fn new(field: SliderField, min: Decimal, max: Decimal, step: Decimal, default: Decimal) -> Self {
        SliderSpec {
            field,
            label: field.label().to_string(),
            min,
            max,
            step,
            default,
            unit: field.unit(),
        }
    }

    /// Clamp into range and snap to the nearest step above `min`.
    pub fn snap(&self, value: Decimal) -> Decimal {
        let clamped = value.max(self.min).min(self.max);
        if self.step <= Decimal::ZERO {
            return clamped;
        }
        let steps = ((clamped - self.min) / self.step)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        (self.min + steps * self.step).min(self.max)
    }

    /// Number of selectable positions, inclusive of both ends.
    pub fn positions(&self) -> u64 {
        if self.step <= Decimal::ZERO {
            return 1;
        }
        ((self.max - self.min) / self.step)
            .floor()
            .to_u64()
            .map_or(1, |n| n + 1)
    }
}

/// Slider layout of the original calculator.
pub fn default_slider_specs() -> Vec<SliderSpec> {
    vec![
        SliderSpec::new(SliderField::PurchasePrice, dec!(0), dec!(5000000), dec!(25000), dec!(1000000)),
        SliderSpec::new(SliderField::DownPayment, dec!(0), dec!(100), dec!(1), dec!(10)),
        SliderSpec::new(SliderField::SellerNote, dec!(0), dec!(100), dec!(1), dec!(10)),
        SliderSpec::new(SliderField::Ebitda, dec!(0), dec!(2000000), dec!(25000), dec!(250000)),
        SliderSpec::new(SliderField::SbaInterestRate, dec!(0), dec!(20), dec!(1), dec!(10)),
        SliderSpec::new(SliderField::SbaLoanTerm, dec!(0), dec!(30), dec!(1), dec!(10)),
        SliderSpec::new(SliderField::SellerNoteInterestRate, dec!(0), dec!(20), dec!(1), dec!(5)),
        SliderSpec::new(SliderField::SellerNoteTerm, dec!(0), dec!(30), dec!(1), dec!(10)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for f in SliderField::ALL {
            assert_eq!(SliderField::from_id(f.id()), Some(f));
        }
        for f in CalculatedField::ALL {
            assert_eq!(CalculatedField::from_id(f.id()), Some(f));
        }
        assert_eq!(SliderField::from_id("downPaymentValue"), None);
    }

    #[test]
    fn test_serde_uses_field_ids() {
        let json = serde_json::to_string(&CalculatedField::RemainingEbitdaAfterLoanPayments).unwrap();
        assert_eq!(json, "\"remainingEbitdaAfterLoanPayments\"");
        let field: SliderField = serde_json::from_str("\"sbaLoanTerm\"").unwrap();
        assert_eq!(field, SliderField::SbaLoanTerm);
    }

    #[test]
    fn test_snap_rounds_to_step() {
        let specs = default_slider_specs();
        let price = &specs[0];
        assert_eq!(price.snap(dec!(1012000)), dec!(1000000));
        assert_eq!(price.snap(dec!(1013000)), dec!(1025000));
        assert_eq!(price.snap(dec!(-5)), dec!(0));
        assert_eq!(price.snap(dec!(9000000)), dec!(5000000));
    }

    #[test]
    fn test_positions() {
        let specs = default_slider_specs();
        assert_eq!(specs[0].positions(), 201);
        assert_eq!(specs[5].positions(), 31);
    }

    #[test]
    fn test_units() {
        assert_eq!(SliderField::Ebitda.unit(), SliderUnit::Currency);
        assert_eq!(SliderField::SellerNote.unit(), SliderUnit::Percent);
        assert_eq!(SliderField::SellerNoteTerm.unit(), SliderUnit::Years);
        assert!(!CalculatedField::EbitdaMultiple.is_currency());
    }
}
