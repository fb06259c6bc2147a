pub mod credits;
pub mod depreciation;
pub mod savings;
pub mod state;

pub use savings::{
    estimate_tax_savings, SavingsBreakdown, TaxAssumptions, TaxSavingsInput, TaxSavingsOutput,
};
