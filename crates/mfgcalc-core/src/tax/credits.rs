//! Dollar-for-dollar credits: R&D, energy efficiency and WOTC.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Research activity for the R&D credit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchActivity {
    pub enabled: bool,
    /// Wages paid for qualified research
    pub wages: Money,
    /// Supplies consumed in qualified research
    pub supplies: Money,
    /// Amounts paid to third parties for research
    pub contract_research: Money,
    /// Also claim the state R&D credit on the same QRE
    pub claim_state_credit: bool,
}

/// Energy-efficiency upgrade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyUpgrade {
    pub enabled: bool,
    pub upgrade_cost: Money,
}

/// Work Opportunity Tax Credit hires by target group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hiring {
    pub enabled: bool,
    pub general_hires: u32,
    pub veteran_hires: u32,
    pub long_term_assistance_hires: u32,
}

impl Hiring {
    pub fn total_hires(&self) -> u64 {
        u64::from(self.general_hires)
            + u64::from(self.veteran_hires)
            + u64::from(self.long_term_assistance_hires)
    }
}

/// Maximum WOTC credit per hire by target group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WotcCredits {
    pub general: Money,
    pub veteran: Money,
    pub long_term_assistance: Money,
}

impl Default for WotcCredits {
    fn default() -> Self {
        Self {
            general: dec!(2400),
            veteran: dec!(9600),
            long_term_assistance: dec!(9000),
        }
    }
}

/// Qualified research expense: wages and supplies in full, contract research
/// at the statutory inclusion rate.
pub fn qualified_research_expense(research: &ResearchActivity, contract_inclusion: Rate) -> Money {
    if !research.enabled {
        return Decimal::ZERO;
    }
    research.wages + research.supplies + research.contract_research * contract_inclusion
}

pub fn energy_credit(energy: &EnergyUpgrade, rate: Rate) -> Money {
    if !energy.enabled {
        return Decimal::ZERO;
    }
    energy.upgrade_cost * rate
}

pub fn wotc_credit(hiring: &Hiring, credits: &WotcCredits) -> Money {
    if !hiring.enabled {
        return Decimal::ZERO;
    }
    Decimal::from(hiring.general_hires) * credits.general
        + Decimal::from(hiring.veteran_hires) * credits.veteran
        + Decimal::from(hiring.long_term_assistance_hires) * credits.long_term_assistance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qre_includes_65pct_of_contract_research() {
        let research = ResearchActivity {
            enabled: true,
            wages: dec!(100_000),
            supplies: dec!(20_000),
            contract_research: dec!(40_000),
            claim_state_credit: false,
        };
        assert_eq!(qualified_research_expense(&research, dec!(0.65)), dec!(146_000));
    }

    #[test]
    fn test_disabled_sections_contribute_nothing() {
        let research = ResearchActivity {
            enabled: false,
            wages: dec!(100_000),
            ..Default::default()
        };
        assert_eq!(qualified_research_expense(&research, dec!(0.65)), Decimal::ZERO);

        let energy = EnergyUpgrade {
            enabled: false,
            upgrade_cost: dec!(50_000),
        };
        assert_eq!(energy_credit(&energy, dec!(0.30)), Decimal::ZERO);
    }

    #[test]
    fn test_wotc_per_group() {
        let hiring = Hiring {
            enabled: true,
            general_hires: 2,
            veteran_hires: 1,
            long_term_assistance_hires: 1,
        };
        assert_eq!(hiring.total_hires(), 4);
        // 2 * 2,400 + 9,600 + 9,000
        assert_eq!(wotc_credit(&hiring, &WotcCredits::default()), dec!(23_400));
    }

    #[test]
    fn test_energy_credit() {
        let energy = EnergyUpgrade {
            enabled: true,
            upgrade_cost: dec!(80_000),
        };
        assert_eq!(energy_credit(&energy, dec!(0.30)), dec!(24_000));
    }
}
