use crate::amortization::deal::{DealInputs, DealMetrics};
use crate::fields::{CalculatedField, SliderField};
use crate::scenarios::store::{CapturedValue, ScenarioValues};

/// Display strings for all 23 fields: sliders first, then computed figures,
/// in panel order. Values come from the formatter, never from rendered
/// output, so saved-scenario annotations can't leak into a new capture.
pub fn capture_values(inputs: &DealInputs, metrics: &DealMetrics) -> ScenarioValues {
    let mut values = ScenarioValues::default();
    for field in SliderField::ALL {
        values.insert(field.id(), CapturedValue::slider(inputs.display(field)));
    }
    for field in CalculatedField::ALL {
        values.insert(field.id(), CapturedValue::computed(metrics.display(field)));
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::deal::compute_deal;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    #[test]
    fn test_captures_every_field_in_order() {
        let inputs = DealInputs::default();
        let values = capture_values(&inputs, &compute_deal(&inputs));
        assert_eq!(values.len(), 23);
        let keys: Vec<&str> = values.keys().collect();
        assert_eq!(&keys[..3], &["purchasePrice", "downPayment", "sellerNote"]);
        assert_eq!(keys[8], "downPaymentValue");
    }

    #[test]
    fn test_reference_values() {
        let inputs = DealInputs::default();
        let values = capture_values(&inputs, &compute_deal(&inputs));
        assert_eq!(
            values.get("purchasePrice"),
            Some(&CapturedValue::slider("$1,000,000"))
        );
        assert_eq!(values.get("sbaLoanTerm"), Some(&CapturedValue::slider("10 years")));
        assert_eq!(
            values.get("needToFinanceValue"),
            Some(&CapturedValue::computed("$800,000"))
        );
        assert_eq!(
            values.get("sbaMonthlyPayment"),
            Some(&CapturedValue::computed("$10,572"))
        );
        assert_eq!(values.get("ebitdaMultiple"), Some(&CapturedValue::computed("4.0")));
    }

    #[test]
    fn test_undefined_figures_captured_as_marker() {
        let inputs = DealInputs {
            ebitda: Decimal::ZERO,
            sba_loan_term: 0,
            ..DealInputs::default()
        };
        let values = capture_values(&inputs, &compute_deal(&inputs));
        assert_eq!(values.get("ebitdaMultiple"), Some(&CapturedValue::computed("n/a")));
        assert_eq!(values.get("sbaMonthlyPayment"), Some(&CapturedValue::computed("n/a")));
        assert_eq!(values.get("ebitda"), Some(&CapturedValue::slider("$0")));
    }
}
