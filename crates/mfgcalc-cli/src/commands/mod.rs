pub mod benchmark;
pub mod cash_flow;
pub mod scenario;
pub mod tax;
pub mod valuation;
pub mod wizard;

use std::error::Error;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use mfgcalc_core::benchmarking::source::JsonBenchmarkSource;
use mfgcalc_core::benchmarking::{
    run_benchmark_analysis, BenchmarkInput, BenchmarkSource, CachedBenchmarkSource,
    StaticBenchmarkSource,
};
use mfgcalc_core::cash_flow::{
    analyze_working_capital, project_cash_flow, CashFlowInput, WorkingCapitalInput,
};
use mfgcalc_core::config::{load_config, EstimatorConfig};
use mfgcalc_core::tax::{estimate_tax_savings, TaxSavingsInput};
use mfgcalc_core::validation::{Validate, ValidationReport};
use mfgcalc_core::valuation::{estimate_business_value, BusinessValuationInput};
use mfgcalc_core::wizard::CalculatorKind;
use mfgcalc_core::{ComputationOutput, MfgCalcResult};

pub type CommandResult = Result<Value, Box<dyn Error>>;

const DEFAULT_SCENARIO_DIR: &str = ".mfgcalc/scenarios";

/// Configuration and data sources shared by every command.
pub struct Context {
    pub config: EstimatorConfig,
    pub source: CachedBenchmarkSource<Box<dyn BenchmarkSource>>,
}

impl Context {
    pub fn load(config_path: Option<&str>) -> Result<Self, Box<dyn Error>> {
        let config = match config_path {
            Some(path) => load_config(path)?,
            None => EstimatorConfig::default(),
        };

        let inner: Box<dyn BenchmarkSource> = match &config.data.benchmark_file {
            Some(path) => {
                tracing::debug!(path = %path.display(), "using benchmark file");
                Box::new(JsonBenchmarkSource::new(path))
            }
            None => Box::new(StaticBenchmarkSource::new()),
        };

        Ok(Self {
            config,
            source: CachedBenchmarkSource::new(inner),
        })
    }

    pub fn scenario_dir(&self) -> PathBuf {
        self.config
            .data
            .scenario_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCENARIO_DIR))
    }
}

/// Validate JSON input for `kind` and run its estimator.
pub fn estimate(kind: CalculatorKind, input: Value, ctx: &Context) -> CommandResult {
    let config = &ctx.config;
    match kind {
        CalculatorKind::Valuation => run(
            input,
            |i: &BusinessValuationInput| i.validate_with(&config.valuation),
            |i| estimate_business_value(i, &config.valuation),
        ),
        CalculatorKind::TaxSavings => run(input, TaxSavingsInput::validate, |i| {
            estimate_tax_savings(i, &config.tax)
        }),
        CalculatorKind::Benchmarking => run(input, BenchmarkInput::validate, |i| {
            run_benchmark_analysis(i, &ctx.source, false, &config.benchmarking)
        }),
        CalculatorKind::CashFlow => run(input, CashFlowInput::validate, |i| {
            project_cash_flow(i, &config.cash_flow)
        }),
        CalculatorKind::WorkingCapital => {
            run(input, WorkingCapitalInput::validate, analyze_working_capital)
        }
    }
}

fn run<T, O, V, F>(input: Value, validate: V, estimate: F) -> CommandResult
where
    T: DeserializeOwned,
    O: Serialize,
    V: FnOnce(&T) -> ValidationReport,
    F: FnOnce(&T) -> MfgCalcResult<ComputationOutput<O>>,
{
    let typed: T = serde_json::from_value(input)?;
    validate(&typed).into_result()?;
    Ok(serde_json::to_value(estimate(&typed)?)?)
}

/// Parse a calculator name such as `cash-flow` or `tax_savings`.
pub fn parse_calculator(name: &str) -> Result<CalculatorKind, Box<dyn Error>> {
    Ok(name.parse::<CalculatorKind>()?)
}
