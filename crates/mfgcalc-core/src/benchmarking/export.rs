//! Side-by-side comparison table and its CSV rendering.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::industries::RatioSet;
use crate::MfgCalcResult;

use super::metrics::METRICS;

/// One row of the company-versus-industry table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub category: String,
    pub metric: String,
    pub value: Decimal,
    pub benchmark: Decimal,
    pub unit: String,
    /// `value - benchmark`
    pub difference: Decimal,
}

pub fn comparison_rows(company: &RatioSet, benchmark: &RatioSet) -> Vec<ComparisonRow> {
    METRICS
        .iter()
        .map(|metric| {
            let value = metric.value(company);
            let bench = metric.value(benchmark);
            ComparisonRow {
                category: metric.category().label().to_string(),
                metric: metric.label().to_string(),
                value,
                benchmark: bench,
                unit: metric.unit().symbol().to_string(),
                difference: value - bench,
            }
        })
        .collect()
}

/// Render comparison rows as CSV with a header line.
pub fn export_comparison_csv(rows: &[ComparisonRow]) -> MfgCalcResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| crate::MfgCalcError::SerializationError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| crate::MfgCalcError::SerializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::industries::find_industry;
    use rust_decimal_macros::dec;

    #[test]
    fn test_one_row_per_metric() {
        let bench = find_industry("chemicals").unwrap().ratios;
        let mut company = bench.clone();
        company.gross_margin = dec!(30);
        let rows = comparison_rows(&company, &bench);
        assert_eq!(rows.len(), METRICS.len());
        assert_eq!(rows[0].metric, "Gross Profit Margin");
        assert_eq!(rows[0].difference, dec!(-2));
        assert_eq!(rows[0].unit, "%");
    }

    #[test]
    fn test_csv_header_and_rows() {
        let bench = find_industry("chemicals").unwrap().ratios;
        let csv = export_comparison_csv(&comparison_rows(&bench, &bench)).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("category,metric,value,benchmark,unit,difference")
        );
        assert_eq!(lines.count(), METRICS.len());
        assert!(csv.contains("Profitability,Gross Profit Margin,32,32,%,0"));
    }
}
