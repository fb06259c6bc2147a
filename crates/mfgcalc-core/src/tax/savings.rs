use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::validation::{FieldChecks, Validate, ValidationReport};
use crate::MfgCalcResult;

use super::credits::{
    energy_credit, qualified_research_expense, wotc_credit, EnergyUpgrade, Hiring,
    ResearchActivity, WotcCredits,
};
use super::depreciation::{
    cost_segregation, equipment_expensing, BuildingProfile, EquipmentPurchases,
};
use super::state::{state_profile, unlisted_state};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Statutory figures behind each savings category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxAssumptions {
    pub federal_rate: Rate,
    pub rnd_credit_rate: Rate,
    /// Share of contract research that counts as QRE
    pub contract_research_inclusion: Rate,
    pub section_179_limit: Money,
    pub bonus_depreciation_rate: Rate,
    /// Share of building basis reclassified by a cost segregation study
    pub cost_segregation_fraction: Rate,
    /// Recovery period of non-residential real property, in years
    pub building_recovery_years: u32,
    pub energy_credit_rate: Rate,
    pub wotc: WotcCredits,
    /// Gross receipts below which the R&D credit can offset payroll tax
    pub payroll_offset_revenue_limit: Money,
    pub payroll_offset_cap: Money,
}

impl Default for TaxAssumptions {
    fn default() -> Self {
        Self {
            federal_rate: dec!(0.21),
            rnd_credit_rate: dec!(0.10),
            contract_research_inclusion: dec!(0.65),
            section_179_limit: dec!(1_220_000),
            bonus_depreciation_rate: dec!(0.60),
            cost_segregation_fraction: dec!(0.25),
            building_recovery_years: 39,
            energy_credit_rate: dec!(0.30),
            wotc: WotcCredits::default(),
            payroll_offset_revenue_limit: dec!(5_000_000),
            payroll_offset_cap: dec!(500_000),
        }
    }
}

/// Input record for the tax savings calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxSavingsInput {
    pub annual_revenue: Money,
    pub taxable_income: Money,
    pub employee_count: u32,
    /// Two-letter state code
    pub state: String,
    #[serde(default)]
    pub research: ResearchActivity,
    #[serde(default)]
    pub equipment: EquipmentPurchases,
    #[serde(default)]
    pub building: BuildingProfile,
    #[serde(default)]
    pub energy: EnergyUpgrade,
    #[serde(default)]
    pub hiring: Hiring,
}

/// Savings by category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsBreakdown {
    pub rnd_credit: Money,
    pub state_rnd_credit: Money,
    pub section_179: Money,
    pub bonus_depreciation: Money,
    pub cost_segregation: Money,
    pub energy_credit: Money,
    pub wotc: Money,
}

impl SavingsBreakdown {
    pub fn total(&self) -> Money {
        self.rnd_credit
            + self.state_rnd_credit
            + self.section_179
            + self.bonus_depreciation
            + self.cost_segregation
            + self.energy_credit
            + self.wotc
    }
}

/// Output of the tax savings calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSavingsOutput {
    pub breakdown: SavingsBreakdown,
    pub total_savings: Money,
    pub qualified_research_expense: Money,
    /// Federal plus state income tax rate
    pub combined_tax_rate: Rate,
    /// Combined rate less savings as a share of taxable income, in percentage points
    pub effective_tax_rate: Percent,
    pub payroll_offset_eligible: bool,
    /// Portion of the R&D credit usable against payroll tax
    pub payroll_offset_available: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Estimate first-year tax savings across every category.
pub fn estimate_tax_savings(
    input: &TaxSavingsInput,
    assumptions: &TaxAssumptions,
) -> MfgCalcResult<ComputationOutput<TaxSavingsOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    tracing::debug!(
        revenue = %input.annual_revenue,
        taxable_income = %input.taxable_income,
        state = %input.state,
        "estimating tax savings"
    );

    let state = state_profile(&input.state).unwrap_or_else(|| {
        tracing::warn!(state = %input.state, "state not in tax table");
        warnings.push(format!(
            "State '{}' is not in the state tax table; state income tax and state credits are excluded",
            input.state
        ));
        unlisted_state()
    });
    let combined_tax_rate = assumptions.federal_rate + state.income_tax_rate;

    let qre = qualified_research_expense(&input.research, assumptions.contract_research_inclusion);
    let expensing = equipment_expensing(
        &input.equipment,
        assumptions.section_179_limit,
        assumptions.bonus_depreciation_rate,
        combined_tax_rate,
    );
    let cost_seg = cost_segregation(
        &input.building,
        assumptions.cost_segregation_fraction,
        assumptions.building_recovery_years,
        combined_tax_rate,
    );
    if input.building.owns_building && !cost_seg.eligible {
        warnings.push(format!(
            "Building is {} years old; cost segregation applies only within the {}-year recovery period",
            input.building.building_age_years, assumptions.building_recovery_years
        ));
    }

    let state_rnd_credit = if input.research.claim_state_credit {
        qre * state.rnd_credit_rate
    } else {
        Decimal::ZERO
    };
    let breakdown = SavingsBreakdown {
        rnd_credit: qre * assumptions.rnd_credit_rate,
        state_rnd_credit,
        section_179: expensing.section_179_savings,
        bonus_depreciation: expensing.bonus_savings,
        cost_segregation: cost_seg.savings,
        energy_credit: energy_credit(&input.energy, assumptions.energy_credit_rate),
        wotc: wotc_credit(&input.hiring, &assumptions.wotc),
    };
    let total_savings = breakdown.total();

    if input.hiring.enabled && input.hiring.total_hires() > u64::from(input.employee_count) {
        warnings.push(format!(
            "WOTC hires ({}) exceed the reported employee count ({})",
            input.hiring.total_hires(),
            input.employee_count
        ));
    }

    let effective_tax_rate = if input.taxable_income > Decimal::ZERO {
        combined_tax_rate * dec!(100) - total_savings / input.taxable_income * dec!(100)
    } else {
        warnings.push("Taxable income is zero or negative; effective rate shown without savings".into());
        combined_tax_rate * dec!(100)
    };
    if effective_tax_rate < Decimal::ZERO {
        warnings.push(format!(
            "Savings exceed the tax on reported income; effective rate is {effective_tax_rate:.1}%"
        ));
    }

    let payroll_offset_eligible = input.research.enabled
        && input.annual_revenue < assumptions.payroll_offset_revenue_limit;
    let payroll_offset_available = if payroll_offset_eligible {
        breakdown.rnd_credit.min(assumptions.payroll_offset_cap)
    } else {
        Decimal::ZERO
    };

    let output = TaxSavingsOutput {
        breakdown,
        total_savings,
        qualified_research_expense: qre,
        combined_tax_rate,
        effective_tax_rate,
        payroll_offset_eligible,
        payroll_offset_available,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Category-based tax savings estimate (R&D, expensing, cost segregation, energy, WOTC)",
        assumptions,
        warnings,
        elapsed,
        output,
    ))
}

impl Validate for TaxSavingsInput {
    fn validate(&self) -> ValidationReport {
        let mut checks = FieldChecks::new();
        checks
            .non_negative("annual_revenue", self.annual_revenue)
            .required_text("state", &self.state)
            .non_negative("research.wages", self.research.wages)
            .non_negative("research.supplies", self.research.supplies)
            .non_negative("research.contract_research", self.research.contract_research)
            .non_negative("equipment.purchases", self.equipment.purchases)
            .non_negative("building.building_value", self.building.building_value)
            .count_range("building.building_age_years", self.building.building_age_years, 0, 200)
            .non_negative("energy.upgrade_cost", self.energy.upgrade_cost)
            .count_range("employee_count", self.employee_count, 1, 100_000)
            .count_range("hiring.general_hires", self.hiring.general_hires, 0, 100_000)
            .count_range("hiring.veteran_hires", self.hiring.veteran_hires, 0, 100_000)
            .count_range(
                "hiring.long_term_assistance_hires",
                self.hiring.long_term_assistance_hires,
                0,
                100_000,
            );
        if self.state.trim().len() > 2 {
            checks.fail("state", "use the two-letter state code");
        }
        checks.finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
