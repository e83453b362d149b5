use chrono::{Local, Utc};
use rand::Rng;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::amortization::deal::{DealInputs, DealMetrics};
use crate::config::{CalculatorConfig, MAX_SAVED_SCENARIOS, SCENARIO_COLORS};
use crate::scenarios::{capture, compare, demo, export, palette};
use crate::{DealFinanceError, DealFinanceResult};

/// A captured display string. Slider fields hold `sliderValue`, computed
/// fields `currentValue`; anything else loaded from JSON is kept as-is and
/// exported as an empty cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CapturedValue {
    Slider {
        #[serde(rename = "sliderValue")]
        slider_value: String,
    },
    Computed {
        #[serde(rename = "currentValue")]
        current_value: String,
    },
    Unrecognized(serde_json::Value),
}

impl CapturedValue {
    pub fn slider(value: impl Into<String>) -> Self {
        CapturedValue::Slider {
            slider_value: value.into(),
        }
    }

    pub fn computed(value: impl Into<String>) -> Self {
        CapturedValue::Computed {
            current_value: value.into(),
        }
    }

    /// The stored display string, whichever shape holds it.
    pub fn text(&self) -> Option<&str> {
        match self {
            CapturedValue::Slider { slider_value } => Some(slider_value),
            CapturedValue::Computed { current_value } => Some(current_value),
            CapturedValue::Unrecognized(_) => None,
        }
    }

    pub fn current_value(&self) -> Option<&str> {
        match self {
            CapturedValue::Computed { current_value } => Some(current_value),
            _ => None,
        }
    }
}

/// Field id -> captured value, kept in insertion order. The order is the
/// CSV column order, so it survives serialization as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioValues(Vec<(String, CapturedValue)>);

impl ScenarioValues {
    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: CapturedValue) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&CapturedValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CapturedValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ScenarioValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ScenarioValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValuesVisitor;

        impl<'de> Visitor<'de> for ValuesVisitor {
            type Value = ScenarioValues;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of field id to captured value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut values = ScenarioValues::default();
                while let Some((key, value)) = access.next_entry::<String, CapturedValue>()? {
                    values.insert(key, value);
                }
                Ok(values)
            }
        }

        deserializer.deserialize_map(ValuesVisitor)
    }
}

/// A saved snapshot of one set of inputs and outputs. Never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: u64,
    pub color: String,
    pub timestamp: String,
    pub values: ScenarioValues,
}

/// Result of appending a scenario to the history. `evicted` lists the
/// scenarios pushed out, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveOutcome {
    pub scenario: Scenario,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evicted: Vec<Scenario>,
}

fn default_capacity() -> usize {
    MAX_SAVED_SCENARIOS
}

fn default_palette() -> Vec<String> {
    SCENARIO_COLORS.iter().map(|c| c.to_string()).collect()
}

/// Bounded scenario history, oldest first. Appending past capacity evicts
/// from the front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoreRecord")]
pub struct ScenarioStore {
    scenarios: Vec<Scenario>,
    capacity: usize,
    palette: Vec<String>,
    last_id: u64,
}

/// Wire shape of a store, checked before it becomes a [`ScenarioStore`].
#[derive(Deserialize)]
struct StoreRecord {
    #[serde(default)]
    scenarios: Vec<Scenario>,
    #[serde(default = "default_capacity")]
    capacity: usize,
    #[serde(default = "default_palette")]
    palette: Vec<String>,
    #[serde(default)]
    last_id: u64,
}

impl TryFrom<StoreRecord> for ScenarioStore {
    type Error = DealFinanceError;

    fn try_from(record: StoreRecord) -> Result<Self, Self::Error> {
        if record.capacity == 0 {
            return Err(DealFinanceError::InvalidInput {
                field: "capacity".into(),
                reason: "At least one scenario must be storable".into(),
            });
        }
        if record.palette.is_empty() {
            return Err(DealFinanceError::InvalidInput {
                field: "palette".into(),
                reason: "Palette needs at least one colour".into(),
            });
        }
        let last_id = record
            .scenarios
            .iter()
            .map(|s| s.id)
            .fold(record.last_id, u64::max);
        if last_id == u64::MAX {
            return Err(DealFinanceError::InvalidInput {
                field: "last_id".into(),
                reason: "Scenario ids are exhausted".into(),
            });
        }
        Ok(ScenarioStore {
            scenarios: record.scenarios,
            capacity: record.capacity,
            palette: record.palette,
            last_id,
        })
    }
}

impl Default for ScenarioStore {
    fn default() -> Self {
        ScenarioStore {
            scenarios: Vec::new(),
            capacity: MAX_SAVED_SCENARIOS,
            palette: default_palette(),
            last_id: 0,
        }
    }
}

impl ScenarioStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &CalculatorConfig) -> Self {
        ScenarioStore {
            capacity: config.max_saved_scenarios.max(1),
            palette: config.palette.clone(),
            ..Self::default()
        }
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    pub fn last(&self) -> Option<&Scenario> {
        self.scenarios.last()
    }

    /// Millisecond timestamp id, bumped when needed so ids strictly increase.
    /// Saturates at `u64::MAX`.
    pub fn next_id(&mut self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let id = now.max(self.last_id.saturating_add(1));
        self.last_id = id;
        id
    }

    pub fn assign_color<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        palette::assign_color(&self.palette, &self.scenarios, rng)
    }

    /// Snapshot the current inputs and outputs as a new scenario. The store
    /// is only consulted for the id and colour; call [`save`](Self::save)
    /// to keep it.
    pub fn capture<R: Rng + ?Sized>(
        &mut self,
        inputs: &DealInputs,
        metrics: &DealMetrics,
        rng: &mut R,
    ) -> Scenario {
        let color = self.assign_color(rng);
        Scenario {
            id: self.next_id(),
            color,
            timestamp: Local::now().format("%-m/%-d/%Y, %-I:%M:%S %p").to_string(),
            values: capture::capture_values(inputs, metrics),
        }
    }

    /// Append a scenario, evicting the oldest when over capacity.
    pub fn save(&mut self, scenario: Scenario) -> SaveOutcome {
        self.last_id = self.last_id.max(scenario.id);
        self.scenarios.push(scenario.clone());
        let evicted = self.enforce_capacity();
        tracing::debug!(
            id = scenario.id,
            color = %scenario.color,
            held = self.scenarios.len(),
            evicted = evicted.len(),
            "scenario saved"
        );
        SaveOutcome { scenario, evicted }
    }

    /// Capture and save in one step, drawing palette fallbacks from the
    /// thread RNG.
    pub fn save_current(&mut self, inputs: &DealInputs, metrics: &DealMetrics) -> SaveOutcome {
        let scenario = self.capture(inputs, metrics, &mut rand::thread_rng());
        self.save(scenario)
    }

    /// Remove the most recent scenario. An empty history is a no-op and
    /// returns `None`.
    pub fn delete_last(&mut self) -> Option<Scenario> {
        let removed = self.scenarios.pop();
        match &removed {
            Some(s) => tracing::debug!(id = s.id, "last scenario deleted"),
            None => tracing::warn!("no scenarios to delete"),
        }
        removed
    }

    /// Append the built-in demo scenarios. Capacity still applies, so the
    /// oldest entries are evicted when the demo set does not fit.
    pub fn load_demo(&mut self) -> Vec<Scenario> {
        let base = self.next_id();
        let loaded = demo::demo_scenarios(base);
        let newest = loaded.last().map_or(base, |s| s.id);
        self.last_id = self.last_id.max(newest);
        self.scenarios.extend(loaded.iter().cloned());
        let evicted = self.enforce_capacity();
        tracing::debug!(
            loaded = loaded.len(),
            evicted = evicted.len(),
            held = self.scenarios.len(),
            "demo scenarios loaded"
        );
        loaded
    }

    /// CSV of every held scenario; `NothingToExport` when empty.
    pub fn export_csv(&self) -> DealFinanceResult<String> {
        export::export_csv(&self.scenarios)
    }

    /// Current display of every field, annotated with each saved value.
    pub fn compare(&self, inputs: &DealInputs, metrics: &DealMetrics) -> Vec<compare::FieldComparison> {
        compare::compare(&self.scenarios, inputs, metrics)
    }

    fn enforce_capacity(&mut self) -> Vec<Scenario> {
        let overflow = self.scenarios.len().saturating_sub(self.capacity);
        self.scenarios.drain(..overflow).collect()
    }
}
