//! Twelve-month cash flow projection for the cash-flow planner.
//!
//! Sales are collected and raw materials paid on payment terms, so receipts
//! and material payments trail the months they are earned or incurred. A
//! terms length that is not a whole number of 30-day months is split
//! linearly between the two neighbouring months.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::time_value::{compound_factor, month_lag};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::validation::{FieldChecks, Validate, ValidationReport};
use crate::MfgCalcResult;

/// Months simulated by the planner.
pub const PROJECTION_MONTHS: u32 = 12;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CashFlowAssumptions {
    /// Rate applied to positive monthly operating profit when taxes are on
    pub tax_rate: Rate,
}

impl Default for CashFlowAssumptions {
    fn default() -> Self {
        Self {
            tax_rate: dec!(0.25),
        }
    }
}

/// A one-off amount landing in a single month (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashEvent {
    pub amount: Money,
    pub month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowInput {
    pub starting_cash: Money,
    pub monthly_revenue: Money,
    /// Month-over-month revenue growth
    pub monthly_growth_rate: Rate,
    /// Raw materials as a fraction of revenue
    pub raw_material_pct: Rate,
    pub monthly_labor: Money,
    pub monthly_overhead: Money,
    pub customer_payment_days: Decimal,
    pub supplier_payment_days: Decimal,
    /// Equipment purchase paid in full in its month
    #[serde(default)]
    pub capex_event: Option<CashEvent>,
    /// Loan or equity proceeds received in its month
    #[serde(default)]
    pub financing_event: Option<CashEvent>,
    #[serde(default)]
    pub include_taxes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCashFlow {
    pub month: u32,
    pub revenue: Money,
    pub collections: Money,
    pub financing: Money,
    pub material_payments: Money,
    pub labor: Money,
    pub overhead: Money,
    pub taxes: Money,
    pub capex: Money,
    pub cash_in: Money,
    pub cash_out: Money,
    pub net_flow: Money,
    pub ending_cash: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowSummary {
    pub ending_cash: Money,
    pub lowest_cash: Money,
    pub lowest_cash_month: u32,
    pub months_below_zero: u32,
    pub total_net_flow: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowProjection {
    pub months: Vec<MonthlyCashFlow>,
    pub summary: CashFlowSummary,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn project_cash_flow(
    input: &CashFlowInput,
    assumptions: &CashFlowAssumptions,
) -> MfgCalcResult<ComputationOutput<CashFlowProjection>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    tracing::debug!(
        starting_cash = %input.starting_cash,
        monthly_revenue = %input.monthly_revenue,
        growth = %input.monthly_growth_rate,
        "projecting cash flow"
    );

    for (name, event) in [("Capex", input.capex_event), ("Financing", input.financing_event)] {
        if let Some(e) = event {
            if e.month == 0 || e.month > PROJECTION_MONTHS {
                warnings.push(format!(
                    "{name} event in month {} falls outside the {PROJECTION_MONTHS}-month window and is ignored",
                    e.month
                ));
            }
        }
    }

    let revenue_at = |m: i64| revenue_for_month(input, m);
    let material_at = |m: i64| revenue_for_month(input, m) * input.raw_material_pct;
    let customer_lag = month_lag(input.customer_payment_days);
    let supplier_lag = month_lag(input.supplier_payment_days);

    let mut months = Vec::with_capacity(PROJECTION_MONTHS as usize);
    let mut cash = input.starting_cash;

    for month in 1..=PROJECTION_MONTHS {
        let m = i64::from(month);
        let revenue = revenue_at(m);
        let collections = lagged(m, customer_lag, &revenue_at);
        let material_payments = lagged(m, supplier_lag, &material_at);

        let taxes = if input.include_taxes {
            let operating_profit = revenue
                - revenue * input.raw_material_pct
                - input.monthly_labor
                - input.monthly_overhead;
            operating_profit.max(Decimal::ZERO) * assumptions.tax_rate
        } else {
            Decimal::ZERO
        };

        let capex = event_amount(input.capex_event, month);
        let financing = event_amount(input.financing_event, month);

        let cash_in = collections + financing;
        let cash_out =
            material_payments + input.monthly_labor + input.monthly_overhead + taxes + capex;
        let net_flow = cash_in - cash_out;
        cash += net_flow;

        months.push(MonthlyCashFlow {
            month,
            revenue,
            collections,
            financing,
            material_payments,
            labor: input.monthly_labor,
            overhead: input.monthly_overhead,
            taxes,
            capex,
            cash_in,
            cash_out,
            net_flow,
            ending_cash: cash,
        });
    }

    let summary = summarize(input.starting_cash, &months);
    if summary.months_below_zero > 0 {
        warnings.push(format!(
            "Cash balance is negative in {} month(s); lowest point {:.0} in month {}",
            summary.months_below_zero, summary.lowest_cash, summary.lowest_cash_month
        ));
    }

    let output = CashFlowProjection { months, summary };
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "12-month direct cash flow projection with payment-term lags",
        assumptions,
        warnings,
        elapsed,
        output,
    ))
}

impl Validate for CashFlowInput {
    fn validate(&self) -> ValidationReport {
        let mut checks = FieldChecks::new();
        checks
            .non_negative("monthly_revenue", self.monthly_revenue)
            .range("monthly_growth_rate", self.monthly_growth_rate, dec!(-0.5), dec!(0.5))
            .range("raw_material_pct", self.raw_material_pct, Decimal::ZERO, Decimal::ONE)
            .non_negative("monthly_labor", self.monthly_labor)
            .non_negative("monthly_overhead", self.monthly_overhead)
            .range("customer_payment_days", self.customer_payment_days, Decimal::ZERO, dec!(180))
            .range("supplier_payment_days", self.supplier_payment_days, Decimal::ZERO, dec!(180));

        if let Some(e) = self.capex_event {
            checks
                .non_negative("capex_event.amount", e.amount)
                .count_range("capex_event.month", e.month, 1, PROJECTION_MONTHS);
        }
        if let Some(e) = self.financing_event {
            checks
                .non_negative("financing_event.amount", e.amount)
                .count_range("financing_event.month", e.month, 1, PROJECTION_MONTHS);
        }
        checks.finish()
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Revenue earned in month `m`; months before the window run at the base rate.
fn revenue_for_month(input: &CashFlowInput, m: i64) -> Money {
    if m < 1 {
        return input.monthly_revenue;
    }
    let periods = u32::try_from(m - 1).unwrap_or(0);
    input.monthly_revenue * compound_factor(input.monthly_growth_rate, periods)
}

/// Amount settling in month `m` for a series paid `whole + frac` months late.
fn lagged(m: i64, (whole, frac): (u32, Decimal), series: &dyn Fn(i64) -> Money) -> Money {
    let source = m - i64::from(whole);
    let on_time = series(source) * (Decimal::ONE - frac);
    if frac.is_zero() {
        return on_time;
    }
    on_time + series(source - 1) * frac
}

fn event_amount(event: Option<CashEvent>, month: u32) -> Money {
    match event {
        Some(e) if e.month == month => e.amount,
        _ => Decimal::ZERO,
    }
}

fn summarize(starting_cash: Money, months: &[MonthlyCashFlow]) -> CashFlowSummary {
    let mut lowest_cash = starting_cash;
    let mut lowest_cash_month = 0;
    let mut months_below_zero = 0;
    let mut total_net_flow = Decimal::ZERO;

    for row in months {
        total_net_flow += row.net_flow;
        if row.ending_cash < lowest_cash {
            lowest_cash = row.ending_cash;
            lowest_cash_month = row.month;
        }
        if row.ending_cash < Decimal::ZERO {
            months_below_zero += 1;
        }
    }

    CashFlowSummary {
        ending_cash: months.last().map_or(starting_cash, |r| r.ending_cash),
        lowest_cash,
        lowest_cash_month,
        months_below_zero,
        total_net_flow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_input() -> CashFlowInput {
        CashFlowInput {
            starting_cash: dec!(50_000),
            monthly_revenue: dec!(100_000),
            monthly_growth_rate: Decimal::ZERO,
            raw_material_pct: dec!(0.40),
            monthly_labor: dec!(20_000),
            monthly_overhead: dec!(10_000),
            customer_payment_days: Decimal::ZERO,
            supplier_payment_days: Decimal::ZERO,
            capex_event: None,
            financing_event: None,
            include_taxes: false,
        }
    }

    #[test]
    fn test_flat_business_accumulates_margin() {
        let out = project_cash_flow(&flat_input(), &CashFlowAssumptions::default()).unwrap();
        let p = &out.result;
        assert_eq!(p.months.len(), 12);
        assert!(p.months.iter().all(|m| m.net_flow == dec!(30_000)));
        assert_eq!(p.summary.ending_cash, dec!(410_000));
        assert_eq!(p.summary.total_net_flow, dec!(360_000));
        assert_eq!(p.summary.months_below_zero, 0);
        // Cash never dips below the opening balance
        assert_eq!(p.summary.lowest_cash_month, 0);
    }

    #[test]
    fn test_taxes_on_positive_profit() {
        let mut input = flat_input();
        input.include_taxes = true;
        let out = project_cash_flow(&input, &CashFlowAssumptions::default()).unwrap();
        assert_eq!(out.result.months[0].taxes, dec!(7_500));
        assert_eq!(out.result.summary.ending_cash, dec!(320_000));
    }

    #[test]
    fn test_no_taxes_on_losses() {
        let mut input = flat_input();
        input.include_taxes = true;
        input.monthly_overhead = dec!(80_000);
        let out = project_cash_flow(&input, &CashFlowAssumptions::default()).unwrap();
        assert!(out.result.months.iter().all(|m| m.taxes.is_zero()));
    }

    #[test]
    fn test_whole_month_collection_lag() {
        let mut input = flat_input();
        input.monthly_growth_rate = dec!(0.10);
        input.customer_payment_days = dec!(30);
        let out = project_cash_flow(&input, &CashFlowAssumptions::default()).unwrap();
        let m = &out.result.months;
        assert_eq!(m[0].collections, dec!(100_000));
        assert_eq!(m[1].collections, dec!(100_000));
        assert_eq!(m[2].collections, dec!(110_000));
        assert_eq!(m[2].revenue, dec!(121_000));
    }

    #[test]
    fn test_fractional_lag_splits_between_months() {
        let mut input = flat_input();
        input.monthly_growth_rate = dec!(0.10);
        input.customer_payment_days = dec!(45);
        let out = project_cash_flow(&input, &CashFlowAssumptions::default()).unwrap();
        // Half of month 2 (110,000) and half of month 1 (100,000)
        assert_eq!(out.result.months[2].collections, dec!(105_000));
    }

    #[test]
    fn test_events_apply_in_target_month_only() {
        let mut input = flat_input();
        input.capex_event = Some(CashEvent {
            amount: dec!(200_000),
            month: 3,
        });
        input.financing_event = Some(CashEvent {
            amount: dec!(100_000),
            month: 4,
        });
        let out = project_cash_flow(&input, &CashFlowAssumptions::default()).unwrap();
        let m = &out.result.months;
        assert_eq!(m[2].capex, dec!(200_000));
        assert_eq!(m[2].net_flow, dec!(-170_000));
        assert_eq!(m[3].financing, dec!(100_000));
        assert!(m.iter().filter(|r| !r.capex.is_zero()).count() == 1);
        // 50k + 3 * 30k - 200k
        assert_eq!(out.result.summary.lowest_cash, dec!(-60_000));
        assert_eq!(out.result.summary.lowest_cash_month, 3);
        assert_eq!(out.result.summary.months_below_zero, 1);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_out_of_window_event_warns() {
        let mut input = flat_input();
        input.capex_event = Some(CashEvent {
            amount: dec!(10_000),
            month: 14,
        });
        let out = project_cash_flow(&input, &CashFlowAssumptions::default()).unwrap();
        assert_eq!(out.result.summary.ending_cash, dec!(410_000));
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(input.validate().for_field("capex_event.month").count(), 1);
    }
}
