use serde::{Deserialize, Serialize};

use crate::amortization::deal::{DealInputs, DealMetrics};
use crate::fields::{CalculatedField, SliderField};
use crate::scenarios::store::{CapturedValue, Scenario};

/// A saved value shown next to the live one, in its scenario's colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMarker {
    pub scenario_id: u64,
    pub color: String,
    pub value: String,
}

/// One row of the comparison panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldComparison {
    pub field_id: String,
    pub label: String,
    pub current: String,
    pub markers: Vec<ScenarioMarker>,
}

/// Live display of every field plus one marker per held scenario, oldest
/// first. Slider rows fall back to a saved computed value when no slider
/// value was captured; computed rows only show computed values.
pub fn compare(
    scenarios: &[Scenario],
    inputs: &DealInputs,
    metrics: &DealMetrics,
) -> Vec<FieldComparison> {
    let sliders = SliderField::ALL.into_iter().map(|field| FieldComparison {
        field_id: field.id().to_string(),
        label: field.label().to_string(),
        current: inputs.display(field),
        markers: markers(scenarios, field.id(), |v| v.text()),
    });
    let computed = CalculatedField::ALL.into_iter().map(|field| FieldComparison {
        field_id: field.id().to_string(),
        label: field.label().to_string(),
        current: metrics.display(field),
        markers: markers(scenarios, field.id(), |v| v.current_value()),
    });
    sliders.chain(computed).collect()
}

fn markers(
    scenarios: &[Scenario],
    field_id: &str,
    pick: impl Fn(&CapturedValue) -> Option<&str>,
) -> Vec<ScenarioMarker> {
    scenarios
        .iter()
        .filter_map(|s| {
            let value = s.values.get(field_id).and_then(|v| pick(v))?;
            if value.is_empty() {
                return None;
            }
            Some(ScenarioMarker {
                scenario_id: s.id,
                color: s.color.clone(),
                value: value.to_string(),
            })
        })
        .collect()
}
