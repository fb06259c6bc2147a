use serde_json::Value;

use super::format_scalar;

/// Headline figure for each calculator, as JSON pointers into the result.
const HEADLINE_POINTERS: [&str; 6] = [
    "/range/midpoint",
    "/total_savings",
    "/performance/overall",
    "/summary/ending_cash",
    "/cash_conversion_cycle",
    "/version",
];

/// Print just the headline value from the output.
///
/// Falls back to the first field of the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for pointer in HEADLINE_POINTERS {
        if let Some(val) = result_obj.pointer(pointer) {
            if !val.is_null() {
                return format_scalar(val);
            }
        }
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_scalar(val));
        }
    }

    format_scalar(result_obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_headline_per_calculator() {
        let valuation = json!({ "result": { "range": { "low": "1", "midpoint": "2", "high": "3" } } });
        assert_eq!(headline(&valuation), "2");

        let cash = json!({ "result": { "months": [], "summary": { "ending_cash": "512000" } } });
        assert_eq!(headline(&cash), "512000");

        let other = json!({ "result": { "deleted": "abc" } });
        assert_eq!(headline(&other), "deleted: abc");
    }
}
