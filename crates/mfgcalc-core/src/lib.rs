pub mod config;
pub mod error;
pub mod forms;
pub mod industries;
pub mod scenarios;
pub mod time_value;
pub mod types;
pub mod validation;
pub mod wizard;

#[cfg(feature = "valuation")]
pub mod valuation;

#[cfg(feature = "tax")]
pub mod tax;

#[cfg(feature = "benchmarking")]
pub mod benchmarking;

#[cfg(feature = "cash_flow")]
pub mod cash_flow;

pub use error::MfgCalcError;
pub use types::*;

/// Standard result type for all mfgcalc operations
pub type MfgCalcResult<T> = Result<T, MfgCalcError>;
