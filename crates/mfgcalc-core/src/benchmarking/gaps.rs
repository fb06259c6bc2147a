//! Gap analysis: where the company trails its industry, by how much, and
//! what closing the gap is worth.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::industries::RatioSet;
use crate::types::Money;

use super::metrics::{Metric, MetricCategory, MetricUnit, Severity, METRICS};

const DAYS_PER_YEAR: Decimal = Decimal::from_parts(365, 0, 0, false, 0);
const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// One metric on which the company underperforms its benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapEntry {
    pub category: MetricCategory,
    pub metric: Metric,
    pub company_value: Decimal,
    pub benchmark_value: Decimal,
    /// Shortfall in the metric's own unit, always positive
    pub gap: Decimal,
    /// Annual dollars at stake; ratio metrics have none
    pub estimated_dollar_impact: Option<Money>,
    pub severity: Severity,
    /// Gap relative to the benchmark, in percent
    pub priority_score: Decimal,
}

/// Dollar value of closing a gap.
///
/// Margin gaps are points of revenue. Day-count gaps release the share of the
/// average balance those days represent. Plain ratios are not priced.
pub fn dollar_impact(
    metric: Metric,
    gap: Decimal,
    company_value: Decimal,
    annual_revenue: Money,
) -> Option<Money> {
    match metric.unit() {
        MetricUnit::Percent => Some(gap / HUNDRED * annual_revenue),
        MetricUnit::Days => {
            if company_value.is_zero() {
                return Some(Decimal::ZERO);
            }
            let average_balance = annual_revenue / DAYS_PER_YEAR * company_value;
            Some(gap / company_value * average_balance)
        }
        MetricUnit::Ratio => None,
    }
}

/// Every underperforming metric, highest priority first.
pub fn analyze_gaps(
    company: &RatioSet,
    benchmark: &RatioSet,
    annual_revenue: Money,
    warnings: &mut Vec<String>,
) -> Vec<GapEntry> {
    let mut gaps: Vec<GapEntry> = METRICS
        .iter()
        .filter_map(|&metric| {
            let company_value = metric.value(company);
            let benchmark_value = metric.value(benchmark);
            let gap = metric.underperformance(company_value, benchmark_value)?;

            let priority_score = if benchmark_value.is_zero() {
                warnings.push(format!(
                    "{} benchmark is zero; priority not scored",
                    metric.label()
                ));
                Decimal::ZERO
            } else {
                match gap.checked_div(benchmark_value).and_then(|r| r.checked_mul(HUNDRED)) {
                    Some(score) => score.abs(),
                    None => {
                        warnings.push(format!(
                            "{} gap is out of range relative to its benchmark; priority not scored",
                            metric.label()
                        ));
                        Decimal::ZERO
                    }
                }
            };

            Some(GapEntry {
                category: metric.category(),
                metric,
                company_value,
                benchmark_value,
                gap,
                estimated_dollar_impact: dollar_impact(metric, gap, company_value, annual_revenue),
                severity: metric.severity_for_gap(gap),
                priority_score,
            })
        })
        .collect();

    // Stable sort keeps catalogue order among equal priorities
    gaps.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));
    gaps
}

/// Sum of the priced gaps.
pub fn total_dollar_impact(gaps: &[GapEntry]) -> Money {
    gaps.iter().filter_map(|g| g.estimated_dollar_impact).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::industries::find_industry;
    use rust_decimal_macros::dec;

    fn benchmark() -> RatioSet {
        find_industry("precision_machining").unwrap().ratios
    }

    #[test]
    fn test_gross_margin_gap_priced_on_revenue() {
        let impact = dollar_impact(Metric::GrossMargin, dec!(5), dec!(20), dec!(1_000_000));
        assert_eq!(impact, Some(dec!(50_000)));
    }

    #[test]
    fn test_days_gap_priced_on_average_balance() {
        // 15 extra DSO days on 3,650,000 revenue releases 15 days of sales
        let impact =
            dollar_impact(Metric::DaysSalesOutstanding, dec!(15), dec!(60), dec!(3_650_000));
        assert_eq!(impact, Some(dec!(150_000)));
    }

    #[test]
    fn test_ratio_gap_not_priced() {
        assert_eq!(dollar_impact(Metric::CurrentRatio, dec!(0.5), dec!(1.5), dec!(1_000_000)), None);
    }

    #[test]
    fn test_matching_benchmark_has_no_gaps() {
        let mut warnings = Vec::new();
        let gaps = analyze_gaps(&benchmark(), &benchmark(), dec!(1_000_000), &mut warnings);
        assert!(gaps.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_gaps_sorted_by_priority() {
        let mut company = benchmark();
        company.gross_margin = dec!(25); // 3 / 28 ≈ 10.7%
        company.days_sales_outstanding = dec!(67.5); // 22.5 / 45 = 50%
        company.current_ratio = dec!(2.5); // better than benchmark

        let mut warnings = Vec::new();
        let gaps = analyze_gaps(&company, &benchmark(), dec!(1_000_000), &mut warnings);

        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].metric, Metric::DaysSalesOutstanding);
        assert_eq!(gaps[0].priority_score, dec!(50));
        assert_eq!(gaps[0].severity, Severity::High);
        assert_eq!(gaps[1].metric, Metric::GrossMargin);
        assert_eq!(gaps[1].severity, Severity::Medium);
        assert_eq!(gaps[1].estimated_dollar_impact, Some(dec!(30_000)));
    }

    #[test]
    fn test_zero_benchmark_warns() {
        let mut bench = benchmark();
        bench.interest_coverage = Decimal::ZERO;
        let mut company = benchmark();
        company.interest_coverage = dec!(-1);

        let mut warnings = Vec::new();
        let gaps = analyze_gaps(&company, &bench, dec!(1_000_000), &mut warnings);
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].priority_score, Decimal::ZERO);
        assert_eq!(warnings.len(), 1);
    }
}
