use thiserror::Error;

use crate::validation::ValidationReport;

#[derive(Debug, Error)]
pub enum MfgCalcError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Validation failed: {0}")]
    Validation(ValidationReport),

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Benchmark data unavailable for industry '{industry_id}'")]
    BenchmarkUnavailable { industry_id: String },

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("Invalid wizard transition: {event} is not allowed from {from}")]
    InvalidTransition { from: String, event: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for MfgCalcError {
    fn from(e: serde_json::Error) -> Self {
        MfgCalcError::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for MfgCalcError {
    fn from(e: std::io::Error) -> Self {
        MfgCalcError::Storage(e.to_string())
    }
}

impl From<toml::de::Error> for MfgCalcError {
    fn from(e: toml::de::Error) -> Self {
        MfgCalcError::Config(e.to_string())
    }
}

#[cfg(feature = "benchmarking")]
impl From<csv::Error> for MfgCalcError {
    fn from(e: csv::Error) -> Self {
        MfgCalcError::SerializationError(e.to_string())
    }
}
