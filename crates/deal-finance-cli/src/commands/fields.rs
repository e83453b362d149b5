use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use deal_finance_core::config::CalculatorConfig;
use deal_finance_core::fields::CalculatedField;

#[derive(Debug, Clone, ValueEnum)]
pub enum FieldKind {
    Slider,
    Computed,
    All,
}

/// Arguments for the field listing
#[derive(Args)]
pub struct FieldsArgs {
    /// Which fields to list
    #[arg(long, default_value = "all")]
    pub kind: FieldKind,
}

pub fn run_fields(args: FieldsArgs, config: &CalculatorConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let sliders = config.sliders.iter().map(|spec| {
        json!({
            "id": spec.field.id(),
            "label": spec.label,
            "kind": "slider",
            "min": spec.min,
            "max": spec.max,
            "step": spec.step,
            "default": spec.default,
            "positions": spec.positions(),
        })
    });
    let computed = CalculatedField::ALL.into_iter().map(|field| {
        json!({
            "id": field.id(),
            "label": field.label(),
            "kind": "computed",
            "format": if field.is_currency() { "currency" } else { "multiple" },
        })
    });

    let rows: Vec<Value> = match args.kind {
        FieldKind::Slider => sliders.collect(),
        FieldKind::Computed => computed.collect(),
        FieldKind::All => sliders.chain(computed).collect(),
    };
    Ok(Value::Array(rows))
}
