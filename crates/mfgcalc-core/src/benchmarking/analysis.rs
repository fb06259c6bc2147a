//! Benchmarking dashboard estimate: gap analysis, performance score and
//! comparison table for one company against one industry benchmark.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::industries::RatioSet;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::validation::{FieldChecks, Validate, ValidationReport};
use crate::MfgCalcResult;

use super::export::{comparison_rows, ComparisonRow};
use super::gaps::{analyze_gaps, total_dollar_impact, GapEntry};
use super::metrics::{MetricUnit, METRICS};
use super::score::{performance_score, BenchmarkAssumptions, PerformanceScore};
use super::source::{BenchmarkRecord, BenchmarkSource};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Company figures entered on the benchmarking dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkInput {
    pub company_name: String,
    pub industry_id: String,
    #[serde(default)]
    pub fiscal_year: Option<i32>,
    pub annual_revenue: Money,
    pub ratios: RatioSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkAnalysisOutput {
    pub company_name: String,
    pub industry_id: String,
    pub industry_name: String,
    pub performance: PerformanceScore,
    /// Underperforming metrics, highest priority first
    pub gaps: Vec<GapEntry>,
    pub total_estimated_impact: Money,
    pub comparison: Vec<ComparisonRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compare a company against an already-fetched benchmark record.
pub fn analyze_benchmarks(
    input: &BenchmarkInput,
    benchmark: &BenchmarkRecord,
    assumptions: &BenchmarkAssumptions,
) -> MfgCalcResult<ComputationOutput<BenchmarkAnalysisOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    tracing::debug!(
        company = %input.company_name,
        industry = %benchmark.industry_id,
        revenue = %input.annual_revenue,
        "analyzing benchmarks"
    );

    if input.industry_id != benchmark.industry_id {
        warnings.push(format!(
            "Input names industry '{}' but benchmark is for '{}'",
            input.industry_id, benchmark.industry_id
        ));
    }
    if input.annual_revenue <= Decimal::ZERO {
        warnings.push("Annual revenue is zero or negative; dollar impacts will be zero".into());
    }

    let gaps = analyze_gaps(
        &input.ratios,
        &benchmark.ratios,
        input.annual_revenue,
        &mut warnings,
    );
    let performance = performance_score(
        &input.ratios,
        &benchmark.ratios,
        &assumptions.category_weights,
        &mut warnings,
    );

    let output = BenchmarkAnalysisOutput {
        company_name: input.company_name.clone(),
        industry_id: benchmark.industry_id.clone(),
        industry_name: benchmark.industry_name.clone(),
        total_estimated_impact: total_dollar_impact(&gaps),
        performance,
        gaps,
        comparison: comparison_rows(&input.ratios, &benchmark.ratios),
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Industry ratio benchmarking (gap analysis and weighted performance score)",
        assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// Fetch the benchmark for `input.industry_id` and analyze against it.
pub fn run_benchmark_analysis(
    input: &BenchmarkInput,
    source: &dyn BenchmarkSource,
    force_refresh: bool,
    assumptions: &BenchmarkAssumptions,
) -> MfgCalcResult<ComputationOutput<BenchmarkAnalysisOutput>> {
    let benchmark = source.fetch_benchmark_data(&input.industry_id, force_refresh)?;
    analyze_benchmarks(input, &benchmark, assumptions)
}

const MAX_RATIO: Decimal = dec!(1000);
const MAX_ANNUAL_REVENUE: Decimal = dec!(1_000_000_000_000_000);

impl Validate for BenchmarkInput {
    fn validate(&self) -> ValidationReport {
        let mut checks = FieldChecks::new();
        checks
            .required_text("company_name", &self.company_name)
            .required_text("industry_id", &self.industry_id)
            .non_negative("annual_revenue", self.annual_revenue);
        if self.annual_revenue > MAX_ANNUAL_REVENUE {
            checks.fail("annual_revenue", format!("must be at most {MAX_ANNUAL_REVENUE}"));
        }

        for metric in METRICS {
            let field = format!("ratios.{}", metric.id());
            let value = metric.value(&self.ratios);
            match metric.unit() {
                MetricUnit::Percent => {
                    checks.range(&field, value, dec!(-100), dec!(100));
                }
                MetricUnit::Days => {
                    checks.range(&field, value, Decimal::ZERO, dec!(365));
                }
                MetricUnit::Ratio => {
                    checks.range(&field, value, -MAX_RATIO, MAX_RATIO);
                }
            }
        }
        if let Some(year) = self.fiscal_year {
            if !(1900..=2100).contains(&year) {
                checks.fail("fiscal_year", "must be between 1900 and 2100");
            }
        }
        checks.finish()
    }
}
