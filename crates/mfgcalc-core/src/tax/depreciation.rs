//! Accelerated depreciation: Section 179, bonus depreciation and cost
//! segregation. Savings are the deduction times the combined tax rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Qualifying equipment placed in service this year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentPurchases {
    pub enabled: bool,
    pub purchases: Money,
}

/// Owned production facility, for a cost segregation study.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingProfile {
    pub owns_building: bool,
    pub building_value: Money,
    pub building_age_years: u32,
}

/// Split of equipment purchases between Section 179 and bonus depreciation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentExpensing {
    pub section_179_deduction: Money,
    pub section_179_savings: Money,
    pub bonus_deduction: Money,
    pub bonus_savings: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostSegregation {
    pub eligible: bool,
    pub reclassified_basis: Money,
    pub savings: Money,
}

/// Expense purchases up to the Section 179 limit; bonus depreciation applies
/// to the remainder.
pub fn equipment_expensing(
    equipment: &EquipmentPurchases,
    section_179_limit: Money,
    bonus_rate: Rate,
    tax_rate: Rate,
) -> EquipmentExpensing {
    if !equipment.enabled || equipment.purchases <= Decimal::ZERO {
        return EquipmentExpensing {
            section_179_deduction: Decimal::ZERO,
            section_179_savings: Decimal::ZERO,
            bonus_deduction: Decimal::ZERO,
            bonus_savings: Decimal::ZERO,
        };
    }

    let section_179_deduction = equipment.purchases.min(section_179_limit);
    let bonus_deduction = (equipment.purchases - section_179_deduction) * bonus_rate;

    EquipmentExpensing {
        section_179_deduction,
        section_179_savings: section_179_deduction * tax_rate,
        bonus_deduction,
        bonus_savings: bonus_deduction * tax_rate,
    }
}

/// Reclassify a share of an owned building into shorter-lived property.
/// Buildings past their recovery period have nothing left to accelerate.
pub fn cost_segregation(
    building: &BuildingProfile,
    reclass_fraction: Rate,
    recovery_years: u32,
    tax_rate: Rate,
) -> CostSegregation {
    let eligible = building.owns_building
        && building.building_value > Decimal::ZERO
        && building.building_age_years < recovery_years;

    if !eligible {
        return CostSegregation {
            eligible: false,
            reclassified_basis: Decimal::ZERO,
            savings: Decimal::ZERO,
        };
    }

    let reclassified_basis = building.building_value * reclass_fraction;
    CostSegregation {
        eligible,
        reclassified_basis,
        savings: reclassified_basis * tax_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_purchases_under_limit_fully_expensed() {
        let eq = EquipmentPurchases {
            enabled: true,
            purchases: dec!(500_000),
        };
        let out = equipment_expensing(&eq, dec!(1_220_000), dec!(0.60), dec!(0.21));
        assert_eq!(out.section_179_deduction, dec!(500_000));
        assert_eq!(out.section_179_savings, dec!(105_000));
        assert_eq!(out.bonus_deduction, Decimal::ZERO);
    }

    #[test]
    fn test_excess_over_limit_gets_bonus() {
        let eq = EquipmentPurchases {
            enabled: true,
            purchases: dec!(1_720_000),
        };
        let out = equipment_expensing(&eq, dec!(1_220_000), dec!(0.60), dec!(0.21));
        assert_eq!(out.section_179_deduction, dec!(1_220_000));
        assert_eq!(out.bonus_deduction, dec!(300_000));
        assert_eq!(out.bonus_savings, dec!(63_000));
    }

    #[test]
    fn test_cost_segregation_eligible() {
        let b = BuildingProfile {
            owns_building: true,
            building_value: dec!(2_000_000),
            building_age_years: 10,
        };
        let out = cost_segregation(&b, dec!(0.25), 39, dec!(0.21));
        assert!(out.eligible);
        assert_eq!(out.reclassified_basis, dec!(500_000));
        assert_eq!(out.savings, dec!(105_000));
    }

    #[test]
    fn test_cost_segregation_old_or_leased_building() {
        let old = BuildingProfile {
            owns_building: true,
            building_value: dec!(2_000_000),
            building_age_years: 40,
        };
        assert!(!cost_segregation(&old, dec!(0.25), 39, dec!(0.21)).eligible);

        let leased = BuildingProfile {
            owns_building: false,
            building_value: dec!(2_000_000),
            building_age_years: 5,
        };
        assert_eq!(cost_segregation(&leased, dec!(0.25), 39, dec!(0.21)).savings, Decimal::ZERO);
    }
}
