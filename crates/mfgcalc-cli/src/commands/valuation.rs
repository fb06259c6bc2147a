use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use mfgcalc_core::benchmarking::BenchmarkSource;
use mfgcalc_core::industries::MultipleRange;
use mfgcalc_core::valuation::multiple::{MultipleAdjustments, ValueDrivers};
use mfgcalc_core::valuation::BusinessValuationInput;
use mfgcalc_core::wizard::CalculatorKind;

use super::{estimate, CommandResult, Context};
use crate::input;

/// Arguments for the business valuation estimate
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ValuationArgs {
    /// Trailing twelve-month EBITDA
    #[arg(long)]
    pub ebitda: Option<Decimal>,

    /// Owner compensation and one-off expenses added back to EBITDA
    #[arg(long, default_value = "0")]
    pub owner_addbacks: Decimal,

    /// Annual maintenance capital expenditure
    #[arg(long, default_value = "0")]
    pub annual_capex: Decimal,

    #[arg(long, default_value = "0")]
    pub working_capital: Decimal,

    #[arg(long, default_value = "0")]
    pub total_debt: Decimal,

    #[arg(long, default_value = "0")]
    pub tangible_assets: Decimal,

    #[arg(long, default_value = "0")]
    pub intangible_assets: Decimal,

    #[arg(long, default_value = "0")]
    pub total_liabilities: Decimal,

    /// Industry id whose EBITDA multiple range is used (see `industries`)
    #[arg(long)]
    pub industry: Option<String>,

    /// Low end of the EBITDA multiple range (with --multiple-max, instead of --industry)
    #[arg(long)]
    pub multiple_min: Option<Decimal>,

    #[arg(long)]
    pub multiple_max: Option<Decimal>,

    /// Score from 1 to 5 applied to every value driver
    #[arg(long, default_value = "3")]
    pub driver_score: Decimal,

    /// Annual growth rate (e.g. 0.05 for 5%)
    #[arg(long)]
    pub growth_rate: Option<Decimal>,

    /// Discount rate (e.g. 0.18 for 18%)
    #[arg(long)]
    pub discount_rate: Option<Decimal>,

    /// DCF projection years
    #[arg(long, default_value = "5")]
    pub years: u32,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_valuation(args: ValuationArgs, ctx: &Context) -> CommandResult {
    let data = match input::read_input(args.input.as_deref())? {
        Some(data) => data,
        None => serde_json::to_value(input_from_flags(&args, ctx)?)?,
    };
    estimate(CalculatorKind::Valuation, data, ctx)
}

fn input_from_flags(
    args: &ValuationArgs,
    ctx: &Context,
) -> Result<BusinessValuationInput, Box<dyn std::error::Error>> {
    let industry_multiple = match (&args.industry, args.multiple_min, args.multiple_max) {
        (Some(id), _, _) => ctx
            .source
            .fetch_industries()?
            .into_iter()
            .find(|i| &i.id == id)
            .map(|i| i.multiple_range)
            .ok_or_else(|| format!("Unknown industry '{id}' (run `mfgcalc industries`)"))?,
        (None, Some(min), Some(max)) => MultipleRange { min, max },
        _ => return Err("--industry or both --multiple-min and --multiple-max are required (or provide --input)".into()),
    };

    Ok(BusinessValuationInput {
        ebitda: args
            .ebitda
            .ok_or("--ebitda is required (or provide --input)")?,
        owner_addbacks: args.owner_addbacks,
        annual_capex: args.annual_capex,
        working_capital: args.working_capital,
        total_debt: args.total_debt,
        tangible_assets: args.tangible_assets,
        intangible_assets: args.intangible_assets,
        total_liabilities: args.total_liabilities,
        industry_multiple,
        value_drivers: ValueDrivers::uniform(args.driver_score),
        adjustments: MultipleAdjustments::default(),
        growth_rate: args.growth_rate.unwrap_or(dec!(0.03)),
        discount_rate: args
            .discount_rate
            .ok_or("--discount-rate is required (or provide --input)")?,
        projection_years: args.years,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args() -> ValuationArgs {
        ValuationArgs {
            ebitda: Some(dec!(1_500_000)),
            owner_addbacks: dec!(200_000),
            annual_capex: dec!(150_000),
            working_capital: dec!(800_000),
            total_debt: dec!(1_000_000),
            tangible_assets: dec!(4_000_000),
            intangible_assets: dec!(500_000),
            total_liabilities: dec!(1_500_000),
            industry: None,
            multiple_min: Some(dec!(4)),
            multiple_max: Some(dec!(7)),
            driver_score: dec!(3),
            growth_rate: Some(dec!(0.05)),
            discount_rate: Some(dec!(0.18)),
            years: 5,
            input: None,
        }
    }

    #[test]
    fn test_flags_build_reference_input() {
        let ctx = Context::load(None).unwrap();
        let input = input_from_flags(&args(), &ctx).unwrap();
        let out = estimate(CalculatorKind::Valuation, serde_json::to_value(input).unwrap(), &ctx)
            .unwrap();
        let value: Decimal =
            serde_json::from_value(out["result"]["multiple_method"]["value"].clone()).unwrap();
        assert_eq!(value, dec!(9_350_000));
    }

    #[test]
    fn test_industry_flag_resolves_range() {
        let ctx = Context::load(None).unwrap();
        let mut a = args();
        a.industry = Some("food_beverage".into());
        let input = input_from_flags(&a, &ctx).unwrap();
        assert_eq!(input.industry_multiple, MultipleRange { min: dec!(5), max: dec!(8) });
    }

    #[test]
    fn test_missing_multiple_is_an_error() {
        let ctx = Context::load(None).unwrap();
        let mut a = args();
        a.multiple_max = None;
        assert!(input_from_flags(&a, &ctx).is_err());
    }
}
