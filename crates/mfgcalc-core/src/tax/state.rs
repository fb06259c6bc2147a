//! State corporate income tax rates and state R&D credit rates.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::types::Rate;

/// Per-state figures used by the tax savings estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateTaxProfile {
    pub code: &'static str,
    /// Flat corporate income tax rate
    pub income_tax_rate: Rate,
    /// State R&D credit as a fraction of qualified research expense
    pub rnd_credit_rate: Rate,
}

const STATES: &[StateTaxProfile] = &[
    StateTaxProfile { code: "CA", income_tax_rate: dec!(0.0884), rnd_credit_rate: dec!(0.15) },
    StateTaxProfile { code: "GA", income_tax_rate: dec!(0.0539), rnd_credit_rate: dec!(0.10) },
    StateTaxProfile { code: "IL", income_tax_rate: dec!(0.095), rnd_credit_rate: dec!(0.065) },
    StateTaxProfile { code: "IN", income_tax_rate: dec!(0.049), rnd_credit_rate: dec!(0.15) },
    StateTaxProfile { code: "MA", income_tax_rate: dec!(0.08), rnd_credit_rate: dec!(0.10) },
    StateTaxProfile { code: "MI", income_tax_rate: dec!(0.06), rnd_credit_rate: dec!(0.0) },
    StateTaxProfile { code: "MN", income_tax_rate: dec!(0.098), rnd_credit_rate: dec!(0.10) },
    StateTaxProfile { code: "NC", income_tax_rate: dec!(0.025), rnd_credit_rate: dec!(0.0) },
    StateTaxProfile { code: "NJ", income_tax_rate: dec!(0.09), rnd_credit_rate: dec!(0.10) },
    StateTaxProfile { code: "NY", income_tax_rate: dec!(0.0725), rnd_credit_rate: dec!(0.0) },
    StateTaxProfile { code: "OH", income_tax_rate: dec!(0.0), rnd_credit_rate: dec!(0.07) },
    StateTaxProfile { code: "PA", income_tax_rate: dec!(0.0899), rnd_credit_rate: dec!(0.10) },
    StateTaxProfile { code: "TX", income_tax_rate: dec!(0.0), rnd_credit_rate: dec!(0.05) },
    StateTaxProfile { code: "WI", income_tax_rate: dec!(0.079), rnd_credit_rate: dec!(0.0575) },
];

/// Look up a state by two-letter code (case-insensitive).
pub fn state_profile(code: &str) -> Option<StateTaxProfile> {
    let code = code.trim();
    STATES
        .iter()
        .find(|s| s.code.eq_ignore_ascii_case(code))
        .copied()
}

/// Codes of every state in the table.
pub fn supported_states() -> Vec<&'static str> {
    STATES.iter().map(|s| s.code).collect()
}

/// Profile used for states missing from the table: no state income tax and no
/// state credit.
pub fn unlisted_state() -> StateTaxProfile {
    StateTaxProfile {
        code: "",
        income_tax_rate: Decimal::ZERO,
        rnd_credit_rate: Decimal::ZERO,
    }
}
