//! 0-100 performance score built from category-weighted performance ratios.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::industries::RatioSet;
use crate::types::Rate;

use super::metrics::{Direction, MetricCategory, METRICS};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Share of the 100-point score each category can earn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub profitability: Rate,
    pub liquidity: Rate,
    pub efficiency: Rate,
    pub leverage: Rate,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            profitability: dec!(0.40),
            liquidity: dec!(0.25),
            efficiency: dec!(0.25),
            leverage: dec!(0.10),
        }
    }
}

impl CategoryWeights {
    pub fn weight(&self, category: MetricCategory) -> Rate {
        match category {
            MetricCategory::Profitability => self.profitability,
            MetricCategory::Liquidity => self.liquidity,
            MetricCategory::Efficiency => self.efficiency,
            MetricCategory::Leverage => self.leverage,
        }
    }

    pub fn total(&self) -> Rate {
        self.profitability + self.liquidity + self.efficiency + self.leverage
    }
}

/// Tunable constants for the benchmarking estimator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkAssumptions {
    pub category_weights: CategoryWeights,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceRating {
    Excellent,
    Good,
    Fair,
    #[serde(rename = "Needs Attention")]
    NeedsAttention,
}

impl PerformanceRating {
    pub fn from_score(score: Decimal) -> Self {
        if score >= dec!(90) {
            PerformanceRating::Excellent
        } else if score >= dec!(75) {
            PerformanceRating::Good
        } else if score >= dec!(60) {
            PerformanceRating::Fair
        } else {
            PerformanceRating::NeedsAttention
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceRating::Excellent => "Excellent",
            PerformanceRating::Good => "Good",
            PerformanceRating::Fair => "Fair",
            PerformanceRating::NeedsAttention => "Needs Attention",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: MetricCategory,
    /// Maximum points available (weight × 100)
    pub cap: Decimal,
    pub score: Decimal,
    pub metrics_scored: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceScore {
    pub overall: Decimal,
    pub rating: PerformanceRating,
    pub categories: Vec<CategoryScore>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Score the company against the benchmark.
///
/// A metric's performance ratio is `company / benchmark` when higher is
/// better and `benchmark / company` when lower is better, so 1.0 means "at
/// benchmark". Each category earns its mean ratio times its cap, clamped to
/// `[0, cap]`.
pub fn performance_score(
    company: &RatioSet,
    benchmark: &RatioSet,
    weights: &CategoryWeights,
    warnings: &mut Vec<String>,
) -> PerformanceScore {
    let categories: Vec<CategoryScore> = MetricCategory::ALL
        .iter()
        .map(|&category| category_score(category, company, benchmark, weights, warnings))
        .collect();

    let overall = categories
        .iter()
        .map(|c| c.score)
        .sum::<Decimal>()
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);

    PerformanceScore {
        overall,
        rating: PerformanceRating::from_score(overall),
        categories,
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Largest performance ratio a single metric contributes.
const RATIO_LIMIT: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

fn category_score(
    category: MetricCategory,
    company: &RatioSet,
    benchmark: &RatioSet,
    weights: &CategoryWeights,
    warnings: &mut Vec<String>,
) -> CategoryScore {
    let cap = weights.weight(category) * Decimal::ONE_HUNDRED;

    let mut ratios: Vec<Decimal> = Vec::new();
    for metric in METRICS.iter().filter(|m| m.category() == category) {
        let company_value = metric.value(company);
        let benchmark_value = metric.value(benchmark);
        let (numerator, denominator) = match metric.direction() {
            Direction::HigherIsBetter => (company_value, benchmark_value),
            Direction::LowerIsBetter => (benchmark_value, company_value),
        };
        if denominator.is_zero() {
            warnings.push(format!("{} skipped in score: zero denominator", metric.label()));
            continue;
        }
        match numerator.checked_div(denominator) {
            Some(ratio) => ratios.push(ratio.clamp(-RATIO_LIMIT, RATIO_LIMIT)),
            None => warnings.push(format!("{} skipped in score: ratio out of range", metric.label())),
        }
    }

    let score = if ratios.is_empty() {
        Decimal::ZERO
    } else {
        let mean = ratios.iter().sum::<Decimal>() / Decimal::from(ratios.len());
        (mean * cap).clamp(Decimal::ZERO, cap.max(Decimal::ZERO))
    };

    CategoryScore {
        category,
        cap,
        score,
        metrics_scored: ratios.len(),
    }
}
