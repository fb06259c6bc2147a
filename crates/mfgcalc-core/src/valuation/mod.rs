pub mod business_value;
pub mod dcf;
pub mod multiple;

pub use business_value::{
    estimate_business_value, BusinessValuationInput, BusinessValuationOutput,
    ValuationAssumptions, ValueRange,
};
