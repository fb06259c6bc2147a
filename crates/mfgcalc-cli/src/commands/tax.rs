use clap::Args;
use serde_json::Value;

use mfgcalc_core::wizard::CalculatorKind;

use super::{estimate, CommandResult, Context};
use crate::input;

/// Arguments for the tax-savings estimate
#[derive(Args)]
pub struct TaxSavingsArgs {
    /// Path to JSON input file with company and incentive details
    #[arg(long)]
    pub input: Option<String>,

    /// Two-letter state code, overriding the one in the input
    #[arg(long)]
    pub state: Option<String>,
}

pub fn run_tax_savings(args: TaxSavingsArgs, ctx: &Context) -> CommandResult {
    let mut data = input::require_input(args.input.as_deref(), "tax-savings")?;
    if let (Some(state), Value::Object(map)) = (args.state, &mut data) {
        map.insert("state".into(), Value::String(state.to_ascii_uppercase()));
    }
    estimate(CalculatorKind::TaxSavings, data, ctx)
}
