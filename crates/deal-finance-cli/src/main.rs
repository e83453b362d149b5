mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::deal::{DealArgs, ScheduleArgs};
use commands::fields::FieldsArgs;
use commands::scenarios::ScenariosArgs;

/// Acquisition financing calculator
#[derive(Parser)]
#[command(
    name = "dfa",
    version,
    about = "Acquisition financing calculator",
    long_about = "Evaluates small-business acquisition structures: down payment, \
                  seller note and SBA loan terms against EBITDA. Computes loan \
                  payments, total cost and the EBITDA multiple, and compares \
                  saved scenarios side by side with CSV export."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Calculator layout override (JSON or YAML)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute loan payments, total cost and EBITDA multiple for a deal
    Deal(DealArgs),
    /// Year-by-year amortization schedule for a single loan
    Schedule(ScheduleArgs),
    /// Save a batch of deals as scenarios, compare them and export CSV
    Scenarios(ScenariosArgs),
    /// List slider and computed fields
    Fields(FieldsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let config = match input::file::read_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Deal(args) => commands::deal::run_deal(args, &config),
        Commands::Schedule(args) => commands::deal::run_schedule(args),
        Commands::Scenarios(args) => commands::scenarios::run_scenarios(args, &config),
        Commands::Fields(args) => commands::fields::run_fields(args, &config),
        Commands::Version => {
            println!("dfa {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
