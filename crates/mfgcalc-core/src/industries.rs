//! Built-in manufacturing segment catalogue.
//!
//! Each segment carries the EBITDA multiple range used by the valuation
//! estimator and the reference ratio set used by benchmarking.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Multiple;

/// Low/high EBITDA multiple for a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleRange {
    pub min: Multiple,
    pub max: Multiple,
}

/// Ratio fields shared by a company's figures and an industry benchmark.
///
/// Margins are in percentage points (25 = 25%), day counts in days and the
/// remaining ratios as plain multiples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatioSet {
    pub gross_margin: Decimal,
    pub operating_margin: Decimal,
    pub net_margin: Decimal,
    pub ebitda_margin: Decimal,
    pub current_ratio: Decimal,
    pub quick_ratio: Decimal,
    pub days_sales_outstanding: Decimal,
    pub days_inventory_outstanding: Decimal,
    pub days_payable_outstanding: Decimal,
    pub inventory_turnover: Decimal,
    pub asset_turnover: Decimal,
    pub debt_to_equity: Decimal,
    pub interest_coverage: Decimal,
}

/// A manufacturing segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryProfile {
    pub id: String,
    pub name: String,
    pub multiple_range: MultipleRange,
    pub ratios: RatioSet,
}

fn ratios(
    margins: [Decimal; 4],
    liquidity: [Decimal; 2],
    days: [Decimal; 3],
    turnover: [Decimal; 2],
    leverage: [Decimal; 2],
) -> RatioSet {
    RatioSet {
        gross_margin: margins[0],
        operating_margin: margins[1],
        net_margin: margins[2],
        ebitda_margin: margins[3],
        current_ratio: liquidity[0],
        quick_ratio: liquidity[1],
        days_sales_outstanding: days[0],
        days_inventory_outstanding: days[1],
        days_payable_outstanding: days[2],
        inventory_turnover: turnover[0],
        asset_turnover: turnover[1],
        debt_to_equity: leverage[0],
        interest_coverage: leverage[1],
    }
}

fn profile(id: &str, name: &str, range: (Decimal, Decimal), ratios: RatioSet) -> IndustryProfile {
    IndustryProfile {
        id: id.to_string(),
        name: name.to_string(),
        multiple_range: MultipleRange {
            min: range.0,
            max: range.1,
        },
        ratios,
    }
}

/// All built-in segments, in display order.
pub fn builtin_industries() -> Vec<IndustryProfile> {
    vec![
        profile(
            "precision_machining",
            "Precision Machining",
            (dec!(4.0), dec!(6.5)),
            ratios(
                [dec!(28), dec!(9), dec!(6), dec!(14)],
                [dec!(2.1), dec!(1.3)],
                [dec!(45), dec!(50), dec!(35)],
                [dec!(7.3), dec!(1.3)],
                [dec!(0.9), dec!(6.0)],
            ),
        ),
        profile(
            "metal_fabrication",
            "Metal Fabrication",
            (dec!(3.5), dec!(5.5)),
            ratios(
                [dec!(24), dec!(7), dec!(5), dec!(11)],
                [dec!(1.9), dec!(1.1)],
                [dec!(42), dec!(48), dec!(32)],
                [dec!(7.6), dec!(1.5)],
                [dec!(1.0), dec!(5.0)],
            ),
        ),
        profile(
            "plastics_rubber",
            "Plastics & Rubber Products",
            (dec!(4.0), dec!(6.0)),
            ratios(
                [dec!(25), dec!(8), dec!(5), dec!(12)],
                [dec!(1.8), dec!(1.0)],
                [dec!(44), dec!(46), dec!(38)],
                [dec!(7.9), dec!(1.4)],
                [dec!(1.1), dec!(4.5)],
            ),
        ),
        profile(
            "food_beverage",
            "Food & Beverage Processing",
            (dec!(5.0), dec!(8.0)),
            ratios(
                [dec!(30), dec!(8), dec!(5), dec!(12)],
                [dec!(1.6), dec!(0.8)],
                [dec!(28), dec!(35), dec!(30)],
                [dec!(10.4), dec!(1.8)],
                [dec!(1.2), dec!(5.5)],
            ),
        ),
        profile(
            "electronics",
            "Electronics & Components",
            (dec!(5.5), dec!(8.5)),
            ratios(
                [dec!(35), dec!(11), dec!(8), dec!(16)],
                [dec!(2.3), dec!(1.5)],
                [dec!(52), dec!(65), dec!(40)],
                [dec!(5.6), dec!(1.1)],
                [dec!(0.7), dec!(8.0)],
            ),
        ),
        profile(
            "industrial_equipment",
            "Industrial Machinery & Equipment",
            (dec!(4.5), dec!(7.0)),
            ratios(
                [dec!(30), dec!(9), dec!(6), dec!(13)],
                [dec!(2.0), dec!(1.1)],
                [dec!(50), dec!(75), dec!(38)],
                [dec!(4.9), dec!(1.1)],
                [dec!(0.9), dec!(6.5)],
            ),
        ),
        profile(
            "aerospace_defense",
            "Aerospace & Defense Components",
            (dec!(6.0), dec!(9.5)),
            ratios(
                [dec!(27), dec!(10), dec!(7), dec!(15)],
                [dec!(2.2), dec!(1.2)],
                [dec!(55), dec!(90), dec!(40)],
                [dec!(4.1), dec!(0.9)],
                [dec!(0.8), dec!(7.0)],
            ),
        ),
        profile(
            "automotive_parts",
            "Automotive Parts",
            (dec!(3.5), dec!(5.5)),
            ratios(
                [dec!(18), dec!(6), dec!(4), dec!(10)],
                [dec!(1.5), dec!(0.9)],
                [dec!(48), dec!(32), dec!(45)],
                [dec!(11.4), dec!(1.4)],
                [dec!(1.3), dec!(4.0)],
            ),
        ),
        profile(
            "chemicals",
            "Specialty Chemicals",
            (dec!(5.0), dec!(7.5)),
            ratios(
                [dec!(32), dec!(12), dec!(8), dec!(17)],
                [dec!(2.0), dec!(1.2)],
                [dec!(50), dec!(55), dec!(42)],
                [dec!(6.6), dec!(0.9)],
                [dec!(1.0), dec!(6.0)],
            ),
        ),
    ]
}

/// Look up a built-in segment by id.
pub fn find_industry(id: &str) -> Option<IndustryProfile> {
    builtin_industries().into_iter().find(|p| p.id == id)
}

/// EBITDA multiple range for a built-in segment.
pub fn industry_multiple_range(id: &str) -> Option<MultipleRange> {
    find_industry(id).map(|p| p.multiple_range)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_ids_unique() {
        let industries = builtin_industries();
        let mut ids: Vec<&str> = industries.iter().map(|p| p.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), industries.len());
    }

    #[test]
    fn test_multiple_ranges_ordered() {
        for p in builtin_industries() {
            assert!(p.multiple_range.min < p.multiple_range.max, "{}", p.id);
        }
    }

    #[test]
    fn test_lookup() {
        let range = industry_multiple_range("metal_fabrication").unwrap();
        assert_eq!(range.min, dec!(3.5));
        assert_eq!(range.max, dec!(5.5));
        assert!(find_industry("shipbuilding").is_none());
    }
}
