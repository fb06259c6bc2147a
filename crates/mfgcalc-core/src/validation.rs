//! Schema-style input checks that run before any estimator.
//!
//! Validation is kept apart from the formulas: an estimator never rejects a
//! number because it looks odd, it only warns. Range and required-field
//! checks live here and are reported per field so a form can show them
//! inline.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::MfgCalcError;
use crate::MfgCalcResult;

/// A single failed check, keyed by the (dotted) form field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All failed checks for one input record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors for a single field, in the order they were raised.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |e| e.field == field)
    }

    /// Convert into a `Result`, failing with `MfgCalcError::Validation` when
    /// any check failed.
    pub fn into_result(self) -> MfgCalcResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(MfgCalcError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Implemented by every calculator input.
pub trait Validate {
    fn validate(&self) -> ValidationReport;
}

/// Builder that accumulates field errors.
#[derive(Debug, Default)]
pub struct FieldChecks {
    report: ValidationReport,
}

impl FieldChecks {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: &str, message: String) {
        self.report.errors.push(FieldError {
            field: field.to_string(),
            message,
        });
    }

    pub fn non_negative(&mut self, field: &str, value: Decimal) -> &mut Self {
        if value < Decimal::ZERO {
            self.push(field, "must be zero or greater".into());
        }
        self
    }

    pub fn positive(&mut self, field: &str, value: Decimal) -> &mut Self {
        if value <= Decimal::ZERO {
            self.push(field, "must be greater than zero".into());
        }
        self
    }

    /// Inclusive range check.
    pub fn range(&mut self, field: &str, value: Decimal, min: Decimal, max: Decimal) -> &mut Self {
        if value < min || value > max {
            self.push(field, format!("must be between {min} and {max}"));
        }
        self
    }

    pub fn count_range(&mut self, field: &str, value: u32, min: u32, max: u32) -> &mut Self {
        if value < min || value > max {
            self.push(field, format!("must be between {min} and {max}"));
        }
        self
    }

    pub fn required_text(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.push(field, "is required".into());
        }
        self
    }

    /// Record an arbitrary failed check.
    pub fn fail(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.push(field, message.into());
        self
    }

    pub fn finish(self) -> ValidationReport {
        self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_report_is_valid() {
        let report = FieldChecks::new().finish();
        assert!(report.is_valid());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_range_inclusive_bounds() {
        let mut checks = FieldChecks::new();
        checks
            .range("score", dec!(1), dec!(1), dec!(5))
            .range("score", dec!(5), dec!(1), dec!(5));
        assert!(checks.finish().is_valid());
    }

    #[test]
    fn test_errors_collected_per_field() {
        let mut checks = FieldChecks::new();
        checks
            .non_negative("ebitda", dec!(-1))
            .positive("discount_rate", Decimal::ZERO)
            .required_text("name", "  ");
        let report = checks.finish();
        assert_eq!(report.errors.len(), 3);
        assert_eq!(report.for_field("ebitda").count(), 1);
        assert_eq!(report.for_field("missing").count(), 0);
    }

    #[test]
    fn test_into_result_carries_report() {
        let mut checks = FieldChecks::new();
        checks.count_range("month", 13, 1, 12);
        match checks.finish().into_result() {
            Err(MfgCalcError::Validation(report)) => {
                assert_eq!(report.errors[0].field, "month");
                assert_eq!(report.errors[0].message, "must be between 1 and 12");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_display_joins_errors() {
        let mut checks = FieldChecks::new();
        checks.fail("a", "bad").fail("b", "worse");
        assert_eq!(checks.finish().to_string(), "a: bad; b: worse");
    }
}
