//! Raw form text to typed calculator input.
//!
//! Form fields arrive as strings keyed by dotted names
//! (`value_drivers.growth_outlook`). [`FormCollector`] coerces each one by
//! its [`FieldKind`], assembles nested JSON from the dotted names and
//! deserialises that into the calculator's input struct. Coercion never
//! fails: text that does not parse becomes zero and is reported as a note.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::MfgCalcError;
use crate::validation::{FieldChecks, ValidationReport};
use crate::MfgCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How a raw field value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Dollar amount; `$` and thousands separators allowed
    Money,
    /// Plain decimal number (scores, multiples, days)
    Number,
    /// Entered as percentage points, stored as a fraction (5 -> 0.05)
    Percent,
    /// Whole non-negative count
    Integer,
    Bool,
    Text,
}

/// One input on a wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Dotted path into the input struct
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Optional fields left blank are omitted so serde defaults apply
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }
}

/// Nested JSON built from a form, plus any coercion notes.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedForm {
    pub value: Value,
    pub notes: Vec<String>,
}

/// Raw field values for one calculator, keyed by dotted name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormCollector {
    fields: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

fn clean_numeric(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '$' | ',' | '%' | '_') && !c.is_whitespace())
        .collect()
}

/// Parse numeric form text, ignoring currency symbols, separators and
/// percent signs. `None` for empty or unparseable text.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let cleaned = clean_numeric(raw);
    if cleaned.is_empty() {
        return None;
    }
    cleaned
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(&cleaned).ok())
}

/// Numeric form text, with anything unparseable treated as zero.
pub fn coerce_decimal(raw: &str) -> Decimal {
    parse_decimal(raw).unwrap_or(Decimal::ZERO)
}

/// Checkbox-style text: `true`, `on`, `yes` and `1` are true.
pub fn coerce_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "yes" | "1"
    )
}

/// Coerce one raw value by kind. The second element is a note when the text
/// did not parse cleanly.
pub fn coerce_field(spec: &FieldSpec, raw: &str) -> (Value, Option<String>) {
    let unparsed = || {
        Some(format!(
            "{} ('{}') is not a number; using 0",
            spec.label,
            raw.trim()
        ))
    };

    match spec.kind {
        FieldKind::Text => (Value::String(raw.trim().to_string()), None),
        FieldKind::Bool => (Value::Bool(coerce_bool(raw)), None),
        FieldKind::Money | FieldKind::Number | FieldKind::Percent => {
            let (value, note) = match parse_decimal(raw) {
                Some(v) => (v, None),
                None => (Decimal::ZERO, unparsed()),
            };
            let value = if spec.kind == FieldKind::Percent {
                value / Decimal::ONE_HUNDRED
            } else {
                value
            };
            (Value::String(value.normalize().to_string()), note)
        }
        FieldKind::Integer => match parse_decimal(raw) {
            Some(v) if v >= Decimal::ZERO => {
                let whole = v.trunc().to_u64().unwrap_or(0);
                let note = (v.fract() != Decimal::ZERO)
                    .then(|| format!("{} rounded down to {whole}", spec.label));
                (Value::from(whole), note)
            }
            Some(_) => (
                Value::from(0u64),
                Some(format!("{} cannot be negative; using 0", spec.label)),
            ),
            None => (Value::from(0u64), unparsed()),
        },
    }
}

/// Set `value` at a dotted path inside `root`, creating objects as needed.
pub fn insert_dotted(root: &mut Map<String, Value>, path: &str, value: Value) {
    let mut parts = path.split('.').peekable();
    let mut current = root;
    while let Some(part) = parts.next() {
        if parts.peek().is_none() {
            current.insert(part.to_string(), value);
            return;
        }
        let entry = current
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        current = match entry {
            Value::Object(map) => map,
            _ => return,
        };
    }
}

// ---------------------------------------------------------------------------
// Collector
// ---------------------------------------------------------------------------

impl FormCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, raw: impl Into<String>) {
        self.fields.insert(name.into(), raw.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Coerce the fields named by `specs` into nested JSON. Fields not in
    /// `specs` are ignored.
    pub fn collect(&self, specs: &[FieldSpec]) -> CollectedForm {
        let mut root = Map::new();
        let mut notes = Vec::new();

        for spec in specs {
            let raw = self.get(spec.name).unwrap_or("");
            if raw.trim().is_empty() {
                if !spec.required {
                    continue;
                }
                if !matches!(spec.kind, FieldKind::Text | FieldKind::Bool) {
                    notes.push(format!("{} was left blank; using 0", spec.label));
                    let zero = if spec.kind == FieldKind::Integer {
                        Value::from(0u64)
                    } else {
                        Value::String("0".into())
                    };
                    insert_dotted(&mut root, spec.name, zero);
                    continue;
                }
            }

            let (value, note) = coerce_field(spec, raw);
            notes.extend(note);
            insert_dotted(&mut root, spec.name, value);
        }

        CollectedForm {
            value: Value::Object(root),
            notes,
        }
    }

    /// Check groups of optional fields that are filled in all together or
    /// not at all, such as an event's amount and month.
    ///
    /// A blank member of a partly filled group is reported on its own field.
    pub fn check_groups(&self, specs: &[FieldSpec], groups: &[&str]) -> ValidationReport {
        let mut checks = FieldChecks::new();
        for group in groups {
            let prefix = format!("{group}.");
            let members: Vec<&FieldSpec> = specs
                .iter()
                .filter(|s| s.name.starts_with(&prefix))
                .collect();
            let (filled, blank): (Vec<&FieldSpec>, Vec<&FieldSpec>) = members
                .into_iter()
                .partition(|s| !self.get(s.name).unwrap_or("").trim().is_empty());
            if let Some(first) = filled.first() {
                for spec in blank {
                    checks.fail(spec.name, format!("is required when {} is given", first.label));
                }
            }
        }
        checks.finish()
    }

    /// Coerce and deserialise into a typed input.
    pub fn to_input<T: DeserializeOwned>(&self, specs: &[FieldSpec]) -> MfgCalcResult<(T, Vec<String>)> {
        let collected = self.collect(specs);
        let input = serde_json::from_value(collected.value).map_err(|e| {
            MfgCalcError::InvalidInput {
                field: "form".into(),
                reason: e.to_string(),
            }
        })?;
        Ok((input, collected.notes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_coerce_decimal_strips_formatting() {
        assert_eq!(coerce_decimal("$1,500,000"), dec!(1_500_000));
        assert_eq!(coerce_decimal(" 12.5 % "), dec!(12.5));
        assert_eq!(coerce_decimal("1_000"), dec!(1000));
        assert_eq!(coerce_decimal("-3"), dec!(-3));
        assert_eq!(coerce_decimal(""), Decimal::ZERO);
        assert_eq!(coerce_decimal("abc"), Decimal::ZERO);
    }

    #[test]
    fn test_coerce_bool() {
        for t in ["true", "ON", "yes", "1"] {
            assert!(coerce_bool(t), "{t}");
        }
        for f in ["false", "off", "", "2"] {
            assert!(!coerce_bool(f), "{f}");
        }
    }

    #[test]
    fn test_percent_becomes_fraction() {
        let spec = FieldSpec::required("growth_rate", "Growth rate", FieldKind::Percent);
        let (value, note) = coerce_field(&spec, "5%");
        assert_eq!(value, json!("0.05"));
        assert!(note.is_none());
    }

    #[test]
    fn test_integer_truncates_with_note() {
        let spec = FieldSpec::required("projection_years", "Years", FieldKind::Integer);
        let (value, note) = coerce_field(&spec, "5.7");
        assert_eq!(value, json!(5));
        assert!(note.is_some());
    }

    #[test]
    fn test_dotted_names_nest() {
        let mut form = FormCollector::new();
        form.set("value_drivers.growth_outlook", "4");
        form.set("value_drivers.management_depth", "2");
        form.set("ebitda", "$100");
        let specs = [
            FieldSpec::required("ebitda", "EBITDA", FieldKind::Money),
            FieldSpec::required("value_drivers.growth_outlook", "Growth", FieldKind::Number),
            FieldSpec::required("value_drivers.management_depth", "Mgmt", FieldKind::Number),
        ];
        let collected = form.collect(&specs);
        assert_eq!(
            collected.value,
            json!({
                "ebitda": "100",
                "value_drivers": { "growth_outlook": "4", "management_depth": "2" }
            })
        );
        assert!(collected.notes.is_empty());
    }

    #[test]
    fn test_blank_fields() {
        let mut form = FormCollector::new();
        form.set("amount", "oops");
        let specs = [
            FieldSpec::required("amount", "Amount", FieldKind::Money),
            FieldSpec::required("count", "Count", FieldKind::Integer),
            FieldSpec::optional("event.amount", "Event", FieldKind::Money),
        ];
        let collected = form.collect(&specs);
        assert_eq!(collected.value, json!({ "amount": "0", "count": 0 }));
        assert_eq!(collected.notes.len(), 2);
    }

    #[test]
    fn test_partly_filled_group_reported_per_field() {
        let specs = [
            FieldSpec::optional("capex_event.amount", "Equipment purchase", FieldKind::Money),
            FieldSpec::optional("capex_event.month", "Purchase month", FieldKind::Integer),
            FieldSpec::optional("financing_event.amount", "Financing", FieldKind::Money),
            FieldSpec::optional("financing_event.month", "Financing month", FieldKind::Integer),
        ];
        let mut form = FormCollector::new();
        assert!(form.check_groups(&specs, &["capex_event", "financing_event"]).is_valid());

        form.set("capex_event.amount", "$250,000");
        form.set("financing_event.amount", "100000");
        form.set("financing_event.month", "3");
        let report = form.check_groups(&specs, &["capex_event", "financing_event"]);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].field, "capex_event.month");
        assert_eq!(
            report.errors[0].message,
            "is required when Equipment purchase is given"
        );
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Sample {
        revenue: Decimal,
        employees: u32,
        active: bool,
    }

    #[test]
    fn test_to_input_typed() {
        let mut form = FormCollector::new();
        form.set("revenue", "2,000,000");
        form.set("employees", "40");
        form.set("active", "on");
        let specs = [
            FieldSpec::required("revenue", "Revenue", FieldKind::Money),
            FieldSpec::required("employees", "Employees", FieldKind::Integer),
            FieldSpec::required("active", "Active", FieldKind::Bool),
        ];
        let (sample, notes): (Sample, _) = form.to_input(&specs).unwrap();
        assert_eq!(
            sample,
            Sample {
                revenue: dec!(2_000_000),
                employees: 40,
                active: true,
            }
        );
        assert!(notes.is_empty());
    }
}
