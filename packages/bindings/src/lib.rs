use std::collections::BTreeMap;

use napi::Result as NapiResult;
use napi_derive::napi;

use mfgcalc_core::benchmarking::{BenchmarkSource, StaticBenchmarkSource};
use mfgcalc_core::config::{parse_config, EstimatorConfig};
use mfgcalc_core::validation::Validate;
use mfgcalc_core::wizard::{CalculatorKind, WizardSession};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse typed input and reject it with the field report when invalid.
fn parse_input<T>(input_json: &str) -> NapiResult<T>
where
    T: serde::de::DeserializeOwned + Validate,
{
    let input: T = serde_json::from_str(input_json).map_err(to_napi_error)?;
    input.validate().into_result().map_err(to_napi_error)?;
    Ok(input)
}

fn config_from(config_toml: Option<String>) -> NapiResult<EstimatorConfig> {
    match config_toml {
        Some(toml) => parse_config(&toml).map_err(to_napi_error),
        None => Ok(EstimatorConfig::default()),
    }
}

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

#[napi]
pub fn estimate_business_value(input_json: String, config_toml: Option<String>) -> NapiResult<String> {
    let config = config_from(config_toml)?;
    let input: mfgcalc_core::valuation::BusinessValuationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    input
        .validate_with(&config.valuation)
        .into_result()
        .map_err(to_napi_error)?;
    let output = mfgcalc_core::valuation::estimate_business_value(&input, &config.valuation)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Tax savings
// ---------------------------------------------------------------------------

#[napi]
pub fn estimate_tax_savings(input_json: String, config_toml: Option<String>) -> NapiResult<String> {
    let input: mfgcalc_core::tax::TaxSavingsInput = parse_input(&input_json)?;
    let config = config_from(config_toml)?;
    let output =
        mfgcalc_core::tax::estimate_tax_savings(&input, &config.tax).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Benchmarking
// ---------------------------------------------------------------------------

#[napi]
pub fn list_industries() -> NapiResult<String> {
    let industries = StaticBenchmarkSource::new()
        .fetch_industries()
        .map_err(to_napi_error)?;
    serde_json::to_string(&industries).map_err(to_napi_error)
}

#[napi]
pub fn analyze_benchmarks(input_json: String, config_toml: Option<String>) -> NapiResult<String> {
    let input: mfgcalc_core::benchmarking::BenchmarkInput = parse_input(&input_json)?;
    let config = config_from(config_toml)?;
    let output = mfgcalc_core::benchmarking::run_benchmark_analysis(
        &input,
        &StaticBenchmarkSource::new(),
        false,
        &config.benchmarking,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Company-vs-benchmark comparison as CSV text.
#[napi]
pub fn export_benchmark_csv(input_json: String) -> NapiResult<String> {
    let input: mfgcalc_core::benchmarking::BenchmarkInput = parse_input(&input_json)?;
    let benchmark = StaticBenchmarkSource::new()
        .fetch_benchmark_data(&input.industry_id, false)
        .map_err(to_napi_error)?;
    let rows = mfgcalc_core::benchmarking::export::comparison_rows(&input.ratios, &benchmark.ratios);
    mfgcalc_core::benchmarking::export::export_comparison_csv(&rows).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Cash flow
// ---------------------------------------------------------------------------

#[napi]
pub fn project_cash_flow(input_json: String, config_toml: Option<String>) -> NapiResult<String> {
    let input: mfgcalc_core::cash_flow::CashFlowInput = parse_input(&input_json)?;
    let config = config_from(config_toml)?;
    let output = mfgcalc_core::cash_flow::project_cash_flow(&input, &config.cash_flow)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_working_capital(input_json: String) -> NapiResult<String> {
    let input: mfgcalc_core::cash_flow::WorkingCapitalInput = parse_input(&input_json)?;
    let output =
        mfgcalc_core::cash_flow::analyze_working_capital(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Wizard forms
// ---------------------------------------------------------------------------

/// Step titles and field specs for a calculator's wizard.
#[napi]
pub fn calculator_steps(calculator: String) -> NapiResult<String> {
    let kind: CalculatorKind = calculator.parse().map_err(to_napi_error)?;
    serde_json::to_string(kind.steps()).map_err(to_napi_error)
}

/// Coerce raw form text (field name to string) and run the calculator.
#[napi]
pub fn submit_form(
    calculator: String,
    fields_json: String,
    config_toml: Option<String>,
) -> NapiResult<String> {
    let kind: CalculatorKind = calculator.parse().map_err(to_napi_error)?;
    let fields: BTreeMap<String, String> =
        serde_json::from_str(&fields_json).map_err(to_napi_error)?;
    let config = config_from(config_toml)?;

    let mut session = WizardSession::new(kind);
    for (name, raw) in &fields {
        session.set_field(name, raw).map_err(to_napi_error)?;
    }
    let estimate = session
        .submit(&config, &StaticBenchmarkSource::new())
        .map_err(to_napi_error)?;
    serde_json::to_string(estimate).map_err(to_napi_error)
}
