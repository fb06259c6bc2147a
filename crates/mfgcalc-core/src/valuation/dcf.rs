use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::MfgCalcError;
use crate::time_value::{compound_factor, discount, npv};
use crate::types::{Money, Rate};
use crate::MfgCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Cash-flow drivers for the owner-level DCF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DcfMethodInput {
    /// Year-0 EBITDA (normally adjusted EBITDA)
    pub base_ebitda: Money,
    /// Maintenance capex, held flat across the horizon
    pub annual_capex: Money,
    /// Current working capital; grows with the business
    pub working_capital: Money,
    /// Debt deducted in the equity bridge
    pub total_debt: Money,
    /// Annual EBITDA growth rate
    pub growth_rate: Rate,
    /// Discount rate applied to each year's free cash flow
    pub discount_rate: Rate,
    /// Explicit projection horizon in years
    pub projection_years: u32,
    /// Ceiling applied to the perpetual growth rate in the terminal value
    pub terminal_growth_cap: Rate,
}

/// A single projected year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DcfYear {
    pub year: u32,
    pub ebitda: Money,
    pub capex: Money,
    pub incremental_working_capital: Money,
    pub free_cash_flow: Money,
    pub present_value: Money,
}

/// Result of the DCF method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DcfMethodOutput {
    pub projections: Vec<DcfYear>,
    pub pv_of_cash_flows: Money,
    pub terminal_growth_used: Rate,
    pub terminal_value: Money,
    pub pv_of_terminal: Money,
    pub enterprise_value: Money,
    /// Enterprise value less total debt
    pub equity_value: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project free cash flow, discount it, and add a Gordon-growth terminal value.
pub fn calculate_dcf_method(input: &DcfMethodInput) -> MfgCalcResult<DcfMethodOutput> {
    if input.projection_years == 0 {
        return Err(MfgCalcError::InsufficientData(
            "DCF needs at least one projection year".into(),
        ));
    }

    let terminal_growth = input.growth_rate.min(input.terminal_growth_cap);
    let spread = input.discount_rate - terminal_growth;
    if spread <= Decimal::ZERO {
        return Err(MfgCalcError::FinancialImpossibility(format!(
            "Discount rate ({}) must exceed terminal growth ({terminal_growth}) for a Gordon-growth terminal value",
            input.discount_rate
        )));
    }

    let projections = build_projections(input)?;
    // Year 0 carries no cash flow; year t is discounted t periods.
    let cash_flows: Vec<Money> = std::iter::once(Decimal::ZERO)
        .chain(projections.iter().map(|p| p.free_cash_flow))
        .collect();
    let pv_of_cash_flows = npv(input.discount_rate, &cash_flows)?;

    let last_fcf = projections
        .last()
        .map(|p| p.free_cash_flow)
        .ok_or_else(|| MfgCalcError::InsufficientData("No projection years generated".into()))?;

    let terminal_value = last_fcf * (Decimal::ONE + terminal_growth) / spread;
    let pv_of_terminal = discount(terminal_value, input.discount_rate, input.projection_years)?;
    let enterprise_value = pv_of_cash_flows + pv_of_terminal;

    Ok(DcfMethodOutput {
        projections,
        pv_of_cash_flows,
        terminal_growth_used: terminal_growth,
        terminal_value,
        pv_of_terminal,
        enterprise_value,
        equity_value: enterprise_value - input.total_debt,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn build_projections(input: &DcfMethodInput) -> MfgCalcResult<Vec<DcfYear>> {
    let g = input.growth_rate;
    let mut projections = Vec::with_capacity(input.projection_years as usize);

    for year in 1..=input.projection_years {
        let ebitda = input.base_ebitda * compound_factor(g, year);
        // Working capital scales with the business; only the increase is a cash charge.
        let incremental_working_capital = input.working_capital * compound_factor(g, year - 1) * g;
        let free_cash_flow = ebitda - input.annual_capex - incremental_working_capital;
        let present_value = discount(free_cash_flow, input.discount_rate, year)?;

        projections.push(DcfYear {
            year,
            ebitda,
            capex: input.annual_capex,
            incremental_working_capital,
            free_cash_flow,
            present_value,
        });
    }

    Ok(projections)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_input() -> DcfMethodInput {
        DcfMethodInput {
            base_ebitda: dec!(1_000_000),
            annual_capex: dec!(100_000),
            working_capital: dec!(500_000),
            total_debt: dec!(250_000),
            growth_rate: dec!(0.05),
            discount_rate: dec!(0.15),
            projection_years: 5,
            terminal_growth_cap: dec!(0.03),
        }
    }

    #[test]
    fn test_year1_cash_flow() {
        let out = calculate_dcf_method(&sample_input()).unwrap();
        let y1 = &out.projections[0];
        // EBITDA = 1,000,000 * 1.05
        assert_eq!(y1.ebitda, dec!(1_050_000));
        // Incremental WC = 500,000 * 0.05
        assert_eq!(y1.incremental_working_capital, dec!(25_000));
        // FCF = 1,050,000 - 100,000 - 25,000
        assert_eq!(y1.free_cash_flow, dec!(925_000));
        assert_eq!(y1.present_value, dec!(925_000) / dec!(1.15));
    }

    #[test]
    fn test_projection_count_matches_horizon() {
        let out = calculate_dcf_method(&sample_input()).unwrap();
        assert_eq!(out.projections.len(), 5);
        assert_eq!(out.projections.last().unwrap().year, 5);
    }

    #[test]
    fn test_terminal_growth_capped() {
        let out = calculate_dcf_method(&sample_input()).unwrap();
        assert_eq!(out.terminal_growth_used, dec!(0.03));

        let mut low_growth = sample_input();
        low_growth.growth_rate = dec!(0.02);
        let out = calculate_dcf_method(&low_growth).unwrap();
        assert_eq!(out.terminal_growth_used, dec!(0.02));
    }

    #[test]
    fn test_gordon_terminal_value() {
        let out = calculate_dcf_method(&sample_input()).unwrap();
        let last_fcf = out.projections.last().unwrap().free_cash_flow;
        assert_eq!(out.terminal_value, last_fcf * dec!(1.03) / dec!(0.12));
    }

    #[test]
    fn test_pv_of_cash_flows_matches_yearly_present_values() {
        let out = calculate_dcf_method(&sample_input()).unwrap();
        let summed: Decimal = out.projections.iter().map(|p| p.present_value).sum();
        assert_eq!(out.pv_of_cash_flows, summed);
    }

    #[test]
    fn test_equity_bridge() {
        let out = calculate_dcf_method(&sample_input()).unwrap();
        assert_eq!(out.enterprise_value, out.pv_of_cash_flows + out.pv_of_terminal);
        assert_eq!(out.equity_value, out.enterprise_value - dec!(250_000));
    }

    #[test]
    fn test_zero_growth_has_no_wc_charge() {
        let mut input = sample_input();
        input.growth_rate = Decimal::ZERO;
        let out = calculate_dcf_method(&input).unwrap();
        for p in &out.projections {
            assert_eq!(p.incremental_working_capital, Decimal::ZERO);
            assert_eq!(p.free_cash_flow, dec!(900_000));
        }
    }

    #[test]
    fn test_discount_rate_below_terminal_growth_rejected() {
        let mut input = sample_input();
        input.discount_rate = dec!(0.03);
        assert!(matches!(
            calculate_dcf_method(&input),
            Err(MfgCalcError::FinancialImpossibility(_))
        ));
    }

    #[test]
    fn test_zero_years_rejected() {
        let mut input = sample_input();
        input.projection_years = 0;
        assert!(calculate_dcf_method(&input).is_err());
    }
}
