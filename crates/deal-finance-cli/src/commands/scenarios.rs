use clap::{Args, ValueEnum};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;

use deal_finance_core::amortization::deal::{compute_deal, DealInputs};
use deal_finance_core::config::CalculatorConfig;
use deal_finance_core::scenarios::export::CSV_FILE_NAME;
use deal_finance_core::scenarios::ScenarioStore;

use crate::input;

#[derive(Debug, Clone, ValueEnum)]
pub enum ScenarioView {
    /// One row per field: live value plus each saved value
    Compare,
    /// The scenario history itself
    Store,
    /// The flat CSV rows as objects
    Csv,
}

/// Arguments for a scenario batch
#[derive(Args)]
pub struct ScenariosArgs {
    /// Path to JSON batch file (a list of deals, or {"current", "scenarios"})
    #[arg(long)]
    pub input: Option<String>,

    /// Load the three demo scenarios before saving the batch
    #[arg(long)]
    pub demo: bool,

    /// What to print
    #[arg(long, default_value = "compare")]
    pub view: ScenarioView,

    /// Also write the CSV export to this path (default scenarios.csv)
    #[arg(long, num_args = 0..=1, default_missing_value = CSV_FILE_NAME)]
    pub export: Option<String>,
}

/// Deals to save, in order, and the live deal they are compared against.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScenarioBatch {
    List(Vec<DealInputs>),
    Full {
        #[serde(default)]
        current: Option<DealInputs>,
        #[serde(default)]
        scenarios: Vec<DealInputs>,
    },
}

impl ScenarioBatch {
    fn into_parts(self) -> (Option<DealInputs>, Vec<DealInputs>) {
        match self {
            ScenarioBatch::List(deals) => (None, deals),
            ScenarioBatch::Full { current, scenarios } => (current, scenarios),
        }
    }
}

pub fn run_scenarios(
    args: ScenariosArgs,
    config: &CalculatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let batch: Option<ScenarioBatch> = if let Some(ref path) = args.input {
        Some(input::file::read_json(path)?)
    } else {
        input::stdin::read_stdin()?
    };
    let (current, deals) = batch.map(ScenarioBatch::into_parts).unwrap_or_default();

    if deals.is_empty() && !args.demo {
        return Err("No scenarios: provide --input <batch.json>, pipe a batch on stdin, or pass --demo".into());
    }

    let mut store = ScenarioStore::with_config(config);
    if args.demo {
        store.load_demo();
    }
    for deal in &deals {
        store.save_current(deal, &compute_deal(deal));
    }

    if let Some(ref path) = args.export {
        fs::write(path, store.export_csv()?)
            .map_err(|e| format!("Failed to write '{}': {}", path, e))?;
        tracing::info!(path = %path, scenarios = store.len(), "scenario CSV written");
    }

    match args.view {
        ScenarioView::Compare => {
            let live = current
                .or_else(|| deals.last().cloned())
                .unwrap_or_else(|| DealInputs::from_config(config));
            let rows = store.compare(&live, &compute_deal(&live));
            let flat: Vec<Value> = rows
                .into_iter()
                .map(|row| {
                    let saved: Vec<String> = row
                        .markers
                        .iter()
                        .map(|m| format!("{} {}", m.value, m.color))
                        .collect();
                    json!({
                        "field": row.label,
                        "current": row.current,
                        "saved": saved,
                    })
                })
                .collect();
            Ok(Value::Array(flat))
        }
        ScenarioView::Store => Ok(serde_json::to_value(&store)?),
        ScenarioView::Csv => csv_rows(&store.export_csv()?),
    }
}

/// Re-read the export as objects so every output format can render it.
fn csv_rows(text: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let mut rdr = csv::Reader::from_reader(text.as_bytes());
    let headers = rdr.headers()?.clone();
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let row: serde_json::Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), Value::String(v.to_string())))
            .collect();
        rows.push(Value::Object(row));
    }
    Ok(Value::Array(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_batch_accepts_plain_list() {
        let batch: ScenarioBatch = serde_json::from_value(json!([DealInputs::default()])).unwrap();
        let (current, deals) = batch.into_parts();
        assert!(current.is_none());
        assert_eq!(deals, vec![DealInputs::default()]);
    }

    #[test]
    fn test_batch_accepts_current_and_scenarios() {
        let batch: ScenarioBatch = serde_json::from_value(json!({
            "current": DealInputs::default(),
            "scenarios": [],
        }))
        .unwrap();
        let (current, deals) = batch.into_parts();
        assert_eq!(current, Some(DealInputs::default()));
        assert!(deals.is_empty());
    }

    #[test]
    fn test_csv_rows_keep_header_order() {
        let rows = csv_rows("purchasePrice,ebitdaMultiple\n1000000,4.0\n").unwrap();
        assert_eq!(
            rows,
            json!([{ "purchasePrice": "1000000", "ebitdaMultiple": "4.0" }])
        );
        let keys: Vec<&String> = rows[0].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["purchasePrice", "ebitdaMultiple"]);
    }
}
