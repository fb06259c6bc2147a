//! Catalogue of tracked ratios: category, unit, which direction is better,
//! and the gap sizes at which an underperformance becomes medium or high
//! severity.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::industries::RatioSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    Profitability,
    Liquidity,
    Efficiency,
    Leverage,
}

impl MetricCategory {
    pub const ALL: [MetricCategory; 4] = [
        MetricCategory::Profitability,
        MetricCategory::Liquidity,
        MetricCategory::Efficiency,
        MetricCategory::Leverage,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MetricCategory::Profitability => "Profitability",
            MetricCategory::Liquidity => "Liquidity",
            MetricCategory::Efficiency => "Efficiency",
            MetricCategory::Leverage => "Leverage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricUnit {
    /// Percentage points
    Percent,
    Days,
    /// Plain multiple (x)
    Ratio,
}

impl MetricUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            MetricUnit::Percent => "%",
            MetricUnit::Days => "days",
            MetricUnit::Ratio => "x",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    GrossMargin,
    OperatingMargin,
    NetMargin,
    EbitdaMargin,
    CurrentRatio,
    QuickRatio,
    DaysSalesOutstanding,
    DaysInventoryOutstanding,
    DaysPayableOutstanding,
    InventoryTurnover,
    AssetTurnover,
    DebtToEquity,
    InterestCoverage,
}

/// Every tracked metric, in report order.
pub const METRICS: [Metric; 13] = [
    Metric::GrossMargin,
    Metric::OperatingMargin,
    Metric::NetMargin,
    Metric::EbitdaMargin,
    Metric::CurrentRatio,
    Metric::QuickRatio,
    Metric::DaysSalesOutstanding,
    Metric::DaysInventoryOutstanding,
    Metric::DaysPayableOutstanding,
    Metric::InventoryTurnover,
    Metric::AssetTurnover,
    Metric::DebtToEquity,
    Metric::InterestCoverage,
];

impl Metric {
    /// Field name in [`RatioSet`] and in serialized output.
    pub fn id(&self) -> &'static str {
        match self {
            Metric::GrossMargin => "gross_margin",
            Metric::OperatingMargin => "operating_margin",
            Metric::NetMargin => "net_margin",
            Metric::EbitdaMargin => "ebitda_margin",
            Metric::CurrentRatio => "current_ratio",
            Metric::QuickRatio => "quick_ratio",
            Metric::DaysSalesOutstanding => "days_sales_outstanding",
            Metric::DaysInventoryOutstanding => "days_inventory_outstanding",
            Metric::DaysPayableOutstanding => "days_payable_outstanding",
            Metric::InventoryTurnover => "inventory_turnover",
            Metric::AssetTurnover => "asset_turnover",
            Metric::DebtToEquity => "debt_to_equity",
            Metric::InterestCoverage => "interest_coverage",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::GrossMargin => "Gross Profit Margin",
            Metric::OperatingMargin => "Operating Margin",
            Metric::NetMargin => "Net Profit Margin",
            Metric::EbitdaMargin => "EBITDA Margin",
            Metric::CurrentRatio => "Current Ratio",
            Metric::QuickRatio => "Quick Ratio",
            Metric::DaysSalesOutstanding => "Days Sales Outstanding",
            Metric::DaysInventoryOutstanding => "Days Inventory Outstanding",
            Metric::DaysPayableOutstanding => "Days Payable Outstanding",
            Metric::InventoryTurnover => "Inventory Turnover",
            Metric::AssetTurnover => "Asset Turnover",
            Metric::DebtToEquity => "Debt to Equity",
            Metric::InterestCoverage => "Interest Coverage",
        }
    }

    pub fn category(&self) -> MetricCategory {
        match self {
            Metric::GrossMargin
            | Metric::OperatingMargin
            | Metric::NetMargin
            | Metric::EbitdaMargin => MetricCategory::Profitability,
            Metric::CurrentRatio | Metric::QuickRatio => MetricCategory::Liquidity,
            Metric::DaysSalesOutstanding
            | Metric::DaysInventoryOutstanding
            | Metric::DaysPayableOutstanding
            | Metric::InventoryTurnover
            | Metric::AssetTurnover => MetricCategory::Efficiency,
            Metric::DebtToEquity | Metric::InterestCoverage => MetricCategory::Leverage,
        }
    }

    pub fn unit(&self) -> MetricUnit {
        match self.category() {
            MetricCategory::Profitability => MetricUnit::Percent,
            _ => match self {
                Metric::DaysSalesOutstanding
                | Metric::DaysInventoryOutstanding
                | Metric::DaysPayableOutstanding => MetricUnit::Days,
                _ => MetricUnit::Ratio,
            },
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Metric::DaysSalesOutstanding
            | Metric::DaysInventoryOutstanding
            | Metric::DebtToEquity => Direction::LowerIsBetter,
            _ => Direction::HigherIsBetter,
        }
    }

    /// Gap sizes (medium, high) in the metric's own unit.
    pub fn severity_thresholds(&self) -> (Decimal, Decimal) {
        match self {
            Metric::GrossMargin
            | Metric::OperatingMargin
            | Metric::NetMargin
            | Metric::EbitdaMargin => (dec!(2), dec!(5)),
            Metric::CurrentRatio => (dec!(0.25), dec!(0.5)),
            Metric::QuickRatio => (dec!(0.2), dec!(0.4)),
            Metric::DaysSalesOutstanding | Metric::DaysPayableOutstanding => (dec!(5), dec!(15)),
            Metric::DaysInventoryOutstanding => (dec!(10), dec!(30)),
            Metric::InventoryTurnover => (dec!(1), dec!(2)),
            Metric::AssetTurnover => (dec!(0.2), dec!(0.5)),
            Metric::DebtToEquity => (dec!(0.25), dec!(0.75)),
            Metric::InterestCoverage => (dec!(1), dec!(3)),
        }
    }

    pub fn severity_for_gap(&self, gap: Decimal) -> Severity {
        let (medium, high) = self.severity_thresholds();
        if gap >= high {
            Severity::High
        } else if gap >= medium {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn value(&self, ratios: &RatioSet) -> Decimal {
        match self {
            Metric::GrossMargin => ratios.gross_margin,
            Metric::OperatingMargin => ratios.operating_margin,
            Metric::NetMargin => ratios.net_margin,
            Metric::EbitdaMargin => ratios.ebitda_margin,
            Metric::CurrentRatio => ratios.current_ratio,
            Metric::QuickRatio => ratios.quick_ratio,
            Metric::DaysSalesOutstanding => ratios.days_sales_outstanding,
            Metric::DaysInventoryOutstanding => ratios.days_inventory_outstanding,
            Metric::DaysPayableOutstanding => ratios.days_payable_outstanding,
            Metric::InventoryTurnover => ratios.inventory_turnover,
            Metric::AssetTurnover => ratios.asset_turnover,
            Metric::DebtToEquity => ratios.debt_to_equity,
            Metric::InterestCoverage => ratios.interest_coverage,
        }
    }

    /// Shortfall against the benchmark in the metric's unit; `None` when the
    /// company is at or better than the benchmark.
    pub fn underperformance(&self, company: Decimal, benchmark: Decimal) -> Option<Decimal> {
        let gap = match self.direction() {
            Direction::HigherIsBetter => benchmark - company,
            Direction::LowerIsBetter => company - benchmark,
        };
        (gap > Decimal::ZERO).then_some(gap)
    }
}
