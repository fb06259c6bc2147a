use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::MfgCalcError;
use crate::types::{Money, Rate};
use crate::MfgCalcResult;

/// `(1 + rate)^periods` by repeated multiplication, so results stay exact for
/// the short horizons the calculators use.
pub fn compound_factor(rate: Rate, periods: u32) -> Decimal {
    let one_plus_r = Decimal::ONE + rate;
    let mut factor = Decimal::ONE;
    for _ in 0..periods {
        factor *= one_plus_r;
    }
    factor
}

/// Present value of a single amount received `periods` from now.
pub fn discount(amount: Money, rate: Rate, periods: u32) -> MfgCalcResult<Money> {
    if rate <= dec!(-1) {
        return Err(MfgCalcError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }
    let factor = compound_factor(rate, periods);
    if factor.is_zero() {
        return Err(MfgCalcError::DivisionByZero {
            context: format!("discount factor at period {periods}"),
        });
    }
    Ok(amount / factor)
}

/// Net Present Value of a series of cash flows, the first at t = 0.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> MfgCalcResult<Money> {
    let mut result = Decimal::ZERO;
    for (t, cf) in cash_flows.iter().enumerate() {
        result += discount(*cf, rate, t as u32)?;
    }
    Ok(result)
}

/// Split a payment-terms lag in days into whole months plus the fractional
/// remainder, using 30-day months.
pub fn month_lag(days: Decimal) -> (u32, Decimal) {
    if days <= Decimal::ZERO {
        return (0, Decimal::ZERO);
    }
    let months = days / dec!(30);
    let whole = months.trunc();
    (whole.to_u32().unwrap_or(u32::MAX), months - whole)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compound_factor_exact() {
        assert_eq!(compound_factor(dec!(0.10), 2), dec!(1.21));
        assert_eq!(compound_factor(dec!(0.05), 0), Decimal::ONE);
    }

    #[test]
    fn test_discount_single_amount() {
        let pv = discount(dec!(121), dec!(0.10), 2).unwrap();
        assert_eq!(pv, dec!(100));
    }

    #[test]
    fn test_discount_rejects_minus_100_pct() {
        assert!(discount(dec!(100), dec!(-1), 1).is_err());
    }

    #[test]
    fn test_npv_basic() {
        let cfs = vec![dec!(-1000), dec!(300), dec!(400), dec!(500)];
        let result = npv(dec!(0.10), &cfs).unwrap();
        // -1000 + 300/1.1 + 400/1.21 + 500/1.331 ≈ -21.04
        assert!((result - dec!(-21.04)).abs() < dec!(0.01));
    }

    #[test]
    fn test_npv_zero_rate() {
        let cfs = vec![dec!(-100), dec!(50), dec!(50), dec!(50)];
        assert_eq!(npv(dec!(0.0), &cfs).unwrap(), dec!(50));
    }

    #[test]
    fn test_month_lag_split() {
        assert_eq!(month_lag(dec!(45)), (1, dec!(0.5)));
        assert_eq!(month_lag(dec!(30)), (1, Decimal::ZERO));
        assert_eq!(month_lag(dec!(0)), (0, Decimal::ZERO));
        assert_eq!(month_lag(dec!(-10)), (0, Decimal::ZERO));
    }
}
