use std::fs;

use clap::Args;
use serde_json::Value;

use mfgcalc_core::benchmarking::export::{comparison_rows, export_comparison_csv};
use mfgcalc_core::benchmarking::{run_benchmark_analysis, BenchmarkInput, BenchmarkSource};
use mfgcalc_core::validation::Validate;

use super::{CommandResult, Context};
use crate::input;

/// Arguments for benchmark analysis
#[derive(Args)]
pub struct BenchmarkArgs {
    /// Path to JSON input file with company ratios
    #[arg(long)]
    pub input: Option<String>,

    /// Industry id, overriding the one in the input
    #[arg(long)]
    pub industry: Option<String>,

    /// Fetch benchmark data again instead of using the cached copy
    #[arg(long)]
    pub refresh: bool,

    /// Also write the company-vs-benchmark comparison to this CSV file
    #[arg(long)]
    pub export_csv: Option<String>,
}

pub fn run_benchmark(args: BenchmarkArgs, ctx: &Context) -> CommandResult {
    let mut data = input::require_input(args.input.as_deref(), "benchmark")?;
    if let (Some(industry), Value::Object(map)) = (args.industry, &mut data) {
        map.insert("industry_id".into(), Value::String(industry));
    }

    let company: BenchmarkInput = serde_json::from_value(data)?;
    company.validate().into_result()?;
    let output = run_benchmark_analysis(
        &company,
        &ctx.source,
        args.refresh,
        &ctx.config.benchmarking,
    )?;

    if let Some(path) = args.export_csv {
        fs::write(&path, export_comparison_csv(&output.result.comparison)?)
            .map_err(|e| format!("Failed to write '{}': {}", path, e))?;
        tracing::info!(%path, "wrote benchmark comparison");
    }

    Ok(serde_json::to_value(output)?)
}

/// Arguments for the comparison CSV export
#[derive(Args)]
pub struct BenchmarkCsvArgs {
    /// Path to JSON input file with company ratios
    #[arg(long)]
    pub input: Option<String>,

    /// Industry id, overriding the one in the input
    #[arg(long)]
    pub industry: Option<String>,
}

/// Print the company-vs-benchmark comparison as CSV on stdout.
///
/// Returns `Null` so the usual output formatting is skipped.
pub fn run_benchmark_csv(args: BenchmarkCsvArgs, ctx: &Context) -> CommandResult {
    let mut data = input::require_input(args.input.as_deref(), "benchmark-csv")?;
    if let (Some(industry), Value::Object(map)) = (args.industry, &mut data) {
        map.insert("industry_id".into(), Value::String(industry));
    }

    let company: BenchmarkInput = serde_json::from_value(data)?;
    company.validate().into_result()?;
    let benchmark = ctx.source.fetch_benchmark_data(&company.industry_id, false)?;
    print!(
        "{}",
        export_comparison_csv(&comparison_rows(&company.ratios, &benchmark.ratios))?
    );
    Ok(Value::Null)
}

/// List the industries benchmark data is available for.
pub fn run_industries(ctx: &Context) -> CommandResult {
    Ok(serde_json::to_value(ctx.source.fetch_industries()?)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_industries_lists_catalogue() {
        let ctx = Context::load(None).unwrap();
        let list = run_industries(&ctx).unwrap();
        let ids: Vec<&str> = list
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|i| i["id"].as_str())
            .collect();
        assert_eq!(ids.len(), 9);
        assert!(ids.contains(&"precision_machining"));
    }
}
