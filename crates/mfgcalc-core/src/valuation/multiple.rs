use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::industries::MultipleRange;
use crate::types::{Money, Multiple, Rate};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Five qualitative value drivers, each scored 1 (weak) to 5 (strong).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDrivers {
    pub customer_diversification: Decimal,
    pub recurring_revenue: Decimal,
    pub management_depth: Decimal,
    pub operational_efficiency: Decimal,
    pub growth_outlook: Decimal,
}

impl ValueDrivers {
    /// All drivers at the same score.
    pub fn uniform(score: Decimal) -> Self {
        Self {
            customer_diversification: score,
            recurring_revenue: score,
            management_depth: score,
            operational_efficiency: score,
            growth_outlook: score,
        }
    }

    pub(crate) fn named(&self) -> [(&'static str, Decimal); 5] {
        [
            ("customer_diversification", self.customer_diversification),
            ("recurring_revenue", self.recurring_revenue),
            ("management_depth", self.management_depth),
            ("operational_efficiency", self.operational_efficiency),
            ("growth_outlook", self.growth_outlook),
        ]
    }
}

/// Weight of each value driver in the composite score. Weights sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverWeights {
    pub customer_diversification: Rate,
    pub recurring_revenue: Rate,
    pub management_depth: Rate,
    pub operational_efficiency: Rate,
    pub growth_outlook: Rate,
}

impl Default for DriverWeights {
    fn default() -> Self {
        Self {
            customer_diversification: dec!(0.30),
            recurring_revenue: dec!(0.25),
            management_depth: dec!(0.20),
            operational_efficiency: dec!(0.15),
            growth_outlook: dec!(0.10),
        }
    }
}

impl DriverWeights {
    pub fn total(&self) -> Rate {
        self.customer_diversification
            + self.recurring_revenue
            + self.management_depth
            + self.operational_efficiency
            + self.growth_outlook
    }
}

/// Signed multiple adjustments (in turns of EBITDA) applied after interpolation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultipleAdjustments {
    pub market_conditions: Multiple,
    pub customer_concentration: Multiple,
    pub owner_dependence: Multiple,
    pub facility_condition: Multiple,
}

impl MultipleAdjustments {
    pub fn total(&self) -> Multiple {
        self.market_conditions
            + self.customer_concentration
            + self.owner_dependence
            + self.facility_condition
    }
}

/// Result of the market-multiple method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleMethodOutput {
    pub weighted_score: Decimal,
    pub base_multiple: Multiple,
    pub total_adjustment: Multiple,
    pub final_multiple: Multiple,
    pub value: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Weighted composite of the five driver scores.
pub fn weighted_driver_score(drivers: &ValueDrivers, weights: &DriverWeights) -> Decimal {
    drivers.customer_diversification * weights.customer_diversification
        + drivers.recurring_revenue * weights.recurring_revenue
        + drivers.management_depth * weights.management_depth
        + drivers.operational_efficiency * weights.operational_efficiency
        + drivers.growth_outlook * weights.growth_outlook
}

/// Linear interpolation across the industry range: a score of 1 maps to the
/// minimum multiple, 5 to the maximum.
pub fn interpolate_multiple(range: &MultipleRange, weighted_score: Decimal) -> Multiple {
    let position = (weighted_score - Decimal::ONE) / dec!(4);
    range.min + position * (range.max - range.min)
}

/// Value the business as adjusted EBITDA times the driver-adjusted multiple.
pub fn calculate_multiple_method(
    adjusted_ebitda: Money,
    range: &MultipleRange,
    drivers: &ValueDrivers,
    adjustments: &MultipleAdjustments,
    weights: &DriverWeights,
) -> MultipleMethodOutput {
    let weighted_score = weighted_driver_score(drivers, weights);
    let base_multiple = interpolate_multiple(range, weighted_score);
    let total_adjustment = adjustments.total();
    let final_multiple = base_multiple + total_adjustment;

    MultipleMethodOutput {
        weighted_score,
        base_multiple,
        total_adjustment,
        final_multiple,
        value: adjusted_ebitda * final_multiple,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn range_4_7() -> MultipleRange {
        MultipleRange {
            min: dec!(4),
            max: dec!(7),
        }
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        assert_eq!(DriverWeights::default().total(), Decimal::ONE);
    }

    #[test]
    fn test_uniform_scores_give_that_score() {
        let w = DriverWeights::default();
        assert_eq!(weighted_driver_score(&ValueDrivers::uniform(dec!(3)), &w), dec!(3));
        assert_eq!(weighted_driver_score(&ValueDrivers::uniform(dec!(5)), &w), dec!(5));
    }

    #[test]
    fn test_weighting_favours_customer_diversification() {
        let mut drivers = ValueDrivers::uniform(dec!(1));
        drivers.customer_diversification = dec!(5);
        let score = weighted_driver_score(&drivers, &DriverWeights::default());
        // 1 + 4 * 0.30
        assert_eq!(score, dec!(2.2));
    }

    #[test]
    fn test_interpolation_endpoints() {
        assert_eq!(interpolate_multiple(&range_4_7(), dec!(1)), dec!(4));
        assert_eq!(interpolate_multiple(&range_4_7(), dec!(5)), dec!(7));
        assert_eq!(interpolate_multiple(&range_4_7(), dec!(3)), dec!(5.5));
    }

    #[test]
    fn test_adjustments_added_to_multiple() {
        let adjustments = MultipleAdjustments {
            market_conditions: dec!(0.5),
            customer_concentration: dec!(-0.25),
            owner_dependence: dec!(-0.5),
            facility_condition: dec!(0.25),
        };
        let out = calculate_multiple_method(
            dec!(1_000_000),
            &range_4_7(),
            &ValueDrivers::uniform(dec!(3)),
            &adjustments,
            &DriverWeights::default(),
        );
        assert_eq!(out.total_adjustment, Decimal::ZERO);
        assert_eq!(out.final_multiple, dec!(5.5));
        assert_eq!(out.value, dec!(5_500_000));
    }

    #[test]
    fn test_reference_scenario() {
        let out = calculate_multiple_method(
            dec!(1_700_000),
            &range_4_7(),
            &ValueDrivers::uniform(dec!(3)),
            &MultipleAdjustments::default(),
            &DriverWeights::default(),
        );
        assert_eq!(out.weighted_score, dec!(3));
        assert_eq!(out.final_multiple, dec!(5.5));
        assert_eq!(out.value, dec!(9_350_000));
    }
}
