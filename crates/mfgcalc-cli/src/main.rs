mod commands;
mod input;
mod output;

use std::io;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use commands::benchmark::{BenchmarkArgs, BenchmarkCsvArgs};
use commands::cash_flow::{CashFlowArgs, WorkingCapitalArgs};
use commands::scenario::ScenarioArgs;
use commands::tax::TaxSavingsArgs;
use commands::valuation::ValuationArgs;
use commands::wizard::WizardArgs;
use commands::Context;

/// Financial estimates for manufacturing businesses
#[derive(Parser)]
#[command(
    name = "mfgcalc",
    version,
    about = "Financial estimates for manufacturing businesses",
    long_about = "Estimate business value, tax savings, industry benchmark gaps, \
                  cash flow and working capital for a manufacturing company, with \
                  decimal precision. Inputs come from flags, a JSON file or stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// TOML file overriding estimator assumptions and data locations
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log progress to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate business value by multiple, DCF and asset methods
    Valuation(ValuationArgs),
    /// Estimate tax savings from credits and accelerated depreciation
    TaxSavings(TaxSavingsArgs),
    /// Compare company ratios against an industry benchmark
    Benchmark(BenchmarkArgs),
    /// Export the company-vs-benchmark comparison as CSV
    BenchmarkCsv(BenchmarkCsvArgs),
    /// List industries with benchmark data
    Industries,
    /// Project monthly cash flow for the next 12 months
    CashFlow(CashFlowArgs),
    /// Cash conversion cycle and working capital tied up
    WorkingCapital(WorkingCapitalArgs),
    /// Run a calculator step by step
    Wizard(WizardArgs),
    /// Save, list, show and delete scenarios
    Scenario(ScenarioArgs),
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

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = Context::load(cli.config.as_deref()).and_then(|ctx| match cli.command {
        Commands::Valuation(args) => commands::valuation::run_valuation(args, &ctx),
        Commands::TaxSavings(args) => commands::tax::run_tax_savings(args, &ctx),
        Commands::Benchmark(args) => commands::benchmark::run_benchmark(args, &ctx),
        Commands::BenchmarkCsv(args) => commands::benchmark::run_benchmark_csv(args, &ctx),
        Commands::Industries => commands::benchmark::run_industries(&ctx),
        Commands::CashFlow(args) => commands::cash_flow::run_cash_flow(args, &ctx),
        Commands::WorkingCapital(args) => commands::cash_flow::run_working_capital(args, &ctx),
        Commands::Wizard(args) => commands::wizard::run_wizard(args, &ctx),
        Commands::Scenario(args) => commands::scenario::run_scenario(args, &ctx),
        Commands::Version => Ok(serde_json::json!({
            "name": "mfgcalc",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    });

    match result {
        Ok(value) => {
            if !value.is_null() {
                output::format_output(&cli.output, &value);
            }
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
