//! Business valuation estimate for owner-operated manufacturers.
//!
//! Three independent methods are computed from one input record and combined
//! into a low / midpoint / high range:
//! - market multiple of adjusted EBITDA, positioned inside the industry range
//!   by five weighted value drivers and shifted by four signed adjustments
//! - owner-level DCF with a capped Gordon-growth terminal value
//! - net assets (tangible + intangible − liabilities)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::industries::MultipleRange;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::validation::{FieldChecks, Validate, ValidationReport};
use crate::MfgCalcResult;

use super::dcf::{calculate_dcf_method, DcfMethodInput, DcfMethodOutput};
use super::multiple::{
    calculate_multiple_method, DriverWeights, MultipleAdjustments, MultipleMethodOutput,
    ValueDrivers,
};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Tunable constants for the valuation estimator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationAssumptions {
    pub driver_weights: DriverWeights,
    /// Band applied outward to the lowest and highest method values
    pub range_band: Rate,
    /// Ceiling on the perpetual growth rate used in the terminal value
    pub terminal_growth_cap: Rate,
}

impl Default for ValuationAssumptions {
    fn default() -> Self {
        Self {
            driver_weights: DriverWeights::default(),
            range_band: dec!(0.10),
            terminal_growth_cap: dec!(0.03),
        }
    }
}

/// Input record for the valuation calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessValuationInput {
    /// Reported EBITDA for the trailing twelve months
    pub ebitda: Money,
    /// Owner compensation and one-off expenses added back
    pub owner_addbacks: Money,
    pub annual_capex: Money,
    pub working_capital: Money,
    pub total_debt: Money,
    pub tangible_assets: Money,
    pub intangible_assets: Money,
    pub total_liabilities: Money,
    /// Industry EBITDA multiple range
    pub industry_multiple: MultipleRange,
    pub value_drivers: ValueDrivers,
    #[serde(default)]
    pub adjustments: MultipleAdjustments,
    /// Projected annual growth rate
    pub growth_rate: Rate,
    /// Discount rate for the DCF method
    pub discount_rate: Rate,
    /// DCF horizon in years
    pub projection_years: u32,
}

/// Net-asset method result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMethodOutput {
    pub tangible_assets: Money,
    pub intangible_assets: Money,
    pub total_liabilities: Money,
    pub value: Money,
}

/// Combined valuation range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub low: Money,
    pub midpoint: Money,
    pub high: Money,
}

/// Output of the valuation calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessValuationOutput {
    pub adjusted_ebitda: Money,
    pub multiple_method: MultipleMethodOutput,
    pub dcf_method: DcfMethodOutput,
    pub asset_method: AssetMethodOutput,
    pub range: ValueRange,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Estimate business value by the multiple, DCF and asset methods.
///
/// Degenerate figures (negative EBITDA, scores outside 1-5, negative method
/// values) are not rejected; they are reported as warnings.
pub fn estimate_business_value(
    input: &BusinessValuationInput,
    assumptions: &ValuationAssumptions,
) -> MfgCalcResult<ComputationOutput<BusinessValuationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    tracing::debug!(
        ebitda = %input.ebitda,
        addbacks = %input.owner_addbacks,
        years = input.projection_years,
        "estimating business value"
    );

    collect_input_warnings(input, &mut warnings);

    let adjusted_ebitda = input.ebitda + input.owner_addbacks;

    let multiple_method = calculate_multiple_method(
        adjusted_ebitda,
        &input.industry_multiple,
        &input.value_drivers,
        &input.adjustments,
        &assumptions.driver_weights,
    );
    if multiple_method.final_multiple < Decimal::ZERO {
        warnings.push(format!(
            "Adjustments push the multiple below zero ({:.2}x)",
            multiple_method.final_multiple
        ));
    }

    let dcf_method = calculate_dcf_method(&DcfMethodInput {
        base_ebitda: adjusted_ebitda,
        annual_capex: input.annual_capex,
        working_capital: input.working_capital,
        total_debt: input.total_debt,
        growth_rate: input.growth_rate,
        discount_rate: input.discount_rate,
        projection_years: input.projection_years,
        terminal_growth_cap: assumptions.terminal_growth_cap,
    })?;

    let asset_method = AssetMethodOutput {
        tangible_assets: input.tangible_assets,
        intangible_assets: input.intangible_assets,
        total_liabilities: input.total_liabilities,
        value: input.tangible_assets + input.intangible_assets - input.total_liabilities,
    };

    let method_values = [
        ("multiple", multiple_method.value),
        ("dcf", dcf_method.equity_value),
        ("asset", asset_method.value),
    ];
    for (name, value) in &method_values {
        if *value < Decimal::ZERO {
            warnings.push(format!("The {name} method produced a negative value ({value:.0})"));
        }
    }

    let values = method_values.map(|(_, v)| v);
    let range = combine_methods(&values, assumptions.range_band);

    let output = BusinessValuationOutput {
        adjusted_ebitda,
        multiple_method,
        dcf_method,
        asset_method,
        range,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Blended valuation (EBITDA multiple, DCF, net assets)",
        assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// Combine method values into a range: the band is applied outward to the
/// lowest and highest values, and the midpoint is their arithmetic mean.
pub fn combine_methods(values: &[Money], band: Rate) -> ValueRange {
    if values.is_empty() {
        return ValueRange {
            low: Decimal::ZERO,
            midpoint: Decimal::ZERO,
            high: Decimal::ZERO,
        };
    }

    let min = values.iter().copied().min().unwrap_or(Decimal::ZERO);
    let max = values.iter().copied().max().unwrap_or(Decimal::ZERO);
    let midpoint = values.iter().copied().sum::<Decimal>() / Decimal::from(values.len() as u64);

    ValueRange {
        low: min - min.abs() * band,
        midpoint,
        high: max + max.abs() * band,
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn collect_input_warnings(input: &BusinessValuationInput, warnings: &mut Vec<String>) {
    if input.ebitda < Decimal::ZERO {
        warnings.push("Negative EBITDA: the multiple method will value the business below zero".into());
    }
    for (name, score) in input.value_drivers.named() {
        if score < Decimal::ONE || score > dec!(5) {
            warnings.push(format!(
                "Value driver '{name}' score {score} is outside 1-5; the multiple is extrapolated beyond the industry range"
            ));
        }
    }
    if input.industry_multiple.min > input.industry_multiple.max {
        warnings.push("Industry multiple minimum exceeds maximum".into());
    }
}

impl BusinessValuationInput {
    /// Field checks against the terminal-growth cap the estimator will use.
    pub fn validate_with(&self, assumptions: &ValuationAssumptions) -> ValidationReport {
        let mut checks = FieldChecks::new();
        checks
            .non_negative("owner_addbacks", self.owner_addbacks)
            .non_negative("annual_capex", self.annual_capex)
            .non_negative("working_capital", self.working_capital)
            .non_negative("total_debt", self.total_debt)
            .non_negative("tangible_assets", self.tangible_assets)
            .non_negative("intangible_assets", self.intangible_assets)
            .non_negative("total_liabilities", self.total_liabilities)
            .positive("industry_multiple.min", self.industry_multiple.min)
            .positive("industry_multiple.max", self.industry_multiple.max)
            .range("growth_rate", self.growth_rate, dec!(-0.5), dec!(1))
            .range("discount_rate", self.discount_rate, dec!(0.01), dec!(1))
            .count_range("projection_years", self.projection_years, 1, 30);

        if self.industry_multiple.min > self.industry_multiple.max {
            checks.fail("industry_multiple.max", "must be at least the minimum multiple");
        }
        for (name, score) in self.value_drivers.named() {
            checks.range(&format!("value_drivers.{name}"), score, Decimal::ONE, dec!(5));
        }
        let adjustments = [
            ("adjustments.market_conditions", self.adjustments.market_conditions),
            ("adjustments.customer_concentration", self.adjustments.customer_concentration),
            ("adjustments.owner_dependence", self.adjustments.owner_dependence),
            ("adjustments.facility_condition", self.adjustments.facility_condition),
        ];
        for (field, value) in adjustments {
            checks.range(field, value, dec!(-3), dec!(3));
        }
        if self.discount_rate <= self.growth_rate.min(assumptions.terminal_growth_cap) {
            checks.fail("discount_rate", "must exceed the long-term growth rate");
        }
        checks.finish()
    }
}

impl Validate for BusinessValuationInput {
    fn validate(&self) -> ValidationReport {
        self.validate_with(&ValuationAssumptions::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
