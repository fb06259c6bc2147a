use clap::Args;
use rust_decimal::Decimal;

use mfgcalc_core::cash_flow::WorkingCapitalInput;
use mfgcalc_core::wizard::CalculatorKind;

use super::{estimate, CommandResult, Context};
use crate::input;

/// Arguments for the 12-month cash-flow projection
#[derive(Args)]
pub struct CashFlowArgs {
    /// Path to JSON input file with the monthly operating plan
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the working-capital calculator
#[derive(Args)]
pub struct WorkingCapitalArgs {
    #[arg(long)]
    pub annual_revenue: Option<Decimal>,

    /// Days inventory outstanding
    #[arg(long, alias = "dio")]
    pub days_inventory: Option<Decimal>,

    /// Days sales outstanding
    #[arg(long, alias = "dso")]
    pub days_receivable: Option<Decimal>,

    /// Days payable outstanding
    #[arg(long, alias = "dpo")]
    pub days_payable: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_cash_flow(args: CashFlowArgs, ctx: &Context) -> CommandResult {
    let data = input::require_input(args.input.as_deref(), "cash-flow")?;
    estimate(CalculatorKind::CashFlow, data, ctx)
}

pub fn run_working_capital(args: WorkingCapitalArgs, ctx: &Context) -> CommandResult {
    let data = match input::read_input(args.input.as_deref())? {
        Some(data) => data,
        None => serde_json::to_value(WorkingCapitalInput {
            annual_revenue: args
                .annual_revenue
                .ok_or("--annual-revenue is required (or provide --input)")?,
            days_inventory: args
                .days_inventory
                .ok_or("--days-inventory is required (or provide --input)")?,
            days_receivable: args
                .days_receivable
                .ok_or("--days-receivable is required (or provide --input)")?,
            days_payable: args
                .days_payable
                .ok_or("--days-payable is required (or provide --input)")?,
        })?,
    };
    estimate(CalculatorKind::WorkingCapital, data, ctx)
}
