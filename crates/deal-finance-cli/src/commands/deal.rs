use clap::Args;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use deal_finance_core::amortization::deal::{self, DealInputs};
use deal_finance_core::amortization::loan::LoanTerms;
use deal_finance_core::amortization::schedule;
use deal_finance_core::config::CalculatorConfig;
use deal_finance_core::fields::{CalculatedField, SliderField};

use crate::input;

/// Arguments for a deal calculation. Flags override the slider defaults.
#[derive(Args)]
pub struct DealArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Down payment, percent of purchase price
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Seller note, percent of purchase price
    #[arg(long)]
    pub seller_note: Option<Decimal>,

    /// Annual EBITDA
    #[arg(long)]
    pub ebitda: Option<Decimal>,

    /// SBA loan annual interest rate, percent
    #[arg(long)]
    pub sba_rate: Option<Decimal>,

    /// SBA loan term in years
    #[arg(long)]
    pub sba_term: Option<u32>,

    /// Seller note annual interest rate, percent
    #[arg(long)]
    pub note_rate: Option<Decimal>,

    /// Seller note term in years
    #[arg(long)]
    pub note_term: Option<u32>,

    /// Clamp and round every input to its slider's range and step
    #[arg(long)]
    pub snap: bool,

    /// Print formatted display values instead of the full computation
    #[arg(long)]
    pub display: bool,
}

/// Resolve deal inputs from a file, piped JSON, or flags over defaults.
pub fn resolve_inputs(
    args: &DealArgs,
    config: &CalculatorConfig,
) -> Result<DealInputs, Box<dyn std::error::Error>> {
    let inputs: DealInputs = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        let defaults = DealInputs::from_config(config);
        DealInputs {
            purchase_price: args.purchase_price.unwrap_or(defaults.purchase_price),
            down_payment_percent: args.down_payment.unwrap_or(defaults.down_payment_percent),
            seller_note_percent: args.seller_note.unwrap_or(defaults.seller_note_percent),
            ebitda: args.ebitda.unwrap_or(defaults.ebitda),
            sba_interest_rate: args.sba_rate.unwrap_or(defaults.sba_interest_rate),
            sba_loan_term: args.sba_term.unwrap_or(defaults.sba_loan_term),
            seller_note_interest_rate: args.note_rate.unwrap_or(defaults.seller_note_interest_rate),
            seller_note_term: args.note_term.unwrap_or(defaults.seller_note_term),
        }
    };

    if !args.snap {
        return Ok(inputs);
    }
    Ok(DealInputs::from_lookup(|field| {
        let value = inputs.get(field);
        Some(config.slider(field).map_or(value, |spec| spec.snap(value)))
    }))
}

pub fn run_deal(args: DealArgs, config: &CalculatorConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = resolve_inputs(&args, config)?;
    let output = deal::analyze_deal(&inputs);

    if args.display {
        return Ok(Value::Object(display_map(&inputs, &output.result)));
    }
    Ok(serde_json::to_value(output)?)
}

fn display_map(inputs: &DealInputs, metrics: &deal::DealMetrics) -> Map<String, Value> {
    let mut map = Map::new();
    for field in SliderField::ALL {
        map.insert(field.id().into(), Value::String(inputs.display(field)));
    }
    for field in CalculatedField::ALL {
        map.insert(field.id().into(), Value::String(metrics.display(field)));
    }
    map
}

/// Arguments for an amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate, percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in years
    #[arg(long)]
    pub term: Option<u32>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        let principal = args
            .principal
            .ok_or("--principal is required (or provide --input)")?;
        let rate = args.rate.ok_or("--rate is required (or provide --input)")?;
        let term = args.term.ok_or("--term is required (or provide --input)")?;
        LoanTerms::new(principal, rate, term)
    };

    let result = schedule::build_amortization_schedule(&terms)?;
    Ok(serde_json::to_value(result)?)
}
