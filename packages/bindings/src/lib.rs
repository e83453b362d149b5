use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use deal_finance_core::amortization::deal::{self, DealInputs};
use deal_finance_core::amortization::loan::LoanTerms;
use deal_finance_core::amortization::schedule;
use deal_finance_core::fields::{CalculatedField, SliderField};
use deal_finance_core::format;
use deal_finance_core::scenarios::{Scenario, ScenarioStore};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// An empty string starts a fresh history. Anything else is validated as it
/// is read (capacity, palette, ids).
fn parse_store(store_json: &str) -> NapiResult<ScenarioStore> {
    if store_json.trim().is_empty() {
        return Ok(ScenarioStore::new());
    }
    serde_json::from_str(store_json).map_err(to_napi_error)
}

#[derive(Serialize)]
struct StoreUpdate<T> {
    store: ScenarioStore,
    #[serde(flatten)]
    change: T,
}

fn store_update<T: Serialize>(store: ScenarioStore, change: T) -> NapiResult<String> {
    serde_json::to_string(&StoreUpdate { store, change }).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_deal(input_json: String) -> NapiResult<String> {
    let input: DealInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = deal::analyze_deal(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: LoanTerms = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = schedule::build_amortization_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn save_scenario(store_json: String, input_json: String) -> NapiResult<String> {
    let mut store = parse_store(&store_json)?;
    let input: DealInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let outcome = store.save_current(&input, &deal::compute_deal(&input));
    store_update(store, outcome)
}

#[derive(Serialize)]
struct Deleted {
    deleted: Option<Scenario>,
}

#[napi]
pub fn delete_last_scenario(store_json: String) -> NapiResult<String> {
    let mut store = parse_store(&store_json)?;
    let deleted = store.delete_last();
    store_update(store, Deleted { deleted })
}

#[derive(Serialize)]
struct Loaded {
    loaded: Vec<Scenario>,
}

#[napi]
pub fn load_demo_scenarios(store_json: String) -> NapiResult<String> {
    let mut store = parse_store(&store_json)?;
    let loaded = store.load_demo();
    store_update(store, Loaded { loaded })
}

#[napi]
pub fn export_scenarios_csv(store_json: String) -> NapiResult<String> {
    parse_store(&store_json)?.export_csv().map_err(to_napi_error)
}

#[napi]
pub fn compare_scenarios(store_json: String, input_json: String) -> NapiResult<String> {
    let store = parse_store(&store_json)?;
    let input: DealInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rows = store.compare(&input, &deal::compute_deal(&input));
    serde_json::to_string(&rows).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct DisplayRequest {
    field: String,
    value: Option<Decimal>,
}

/// Format one value the way its field is shown: `{"field": "ebitda", "value": "250000"}`.
#[napi]
pub fn format_display(input_json: String) -> NapiResult<String> {
    let req: DisplayRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    if let Some(field) = SliderField::from_id(&req.field) {
        let value = req.value.unwrap_or(Decimal::ZERO);
        return Ok(format::format_slider(field.unit(), value));
    }
    match CalculatedField::from_id(&req.field) {
        Some(field) if field.is_currency() => Ok(format::format_currency_opt(req.value)),
        Some(_) => Ok(format::format_multiple_opt(req.value)),
        None => Err(napi::Error::from_reason(format!("Unknown field: {}", req.field))),
    }
}
