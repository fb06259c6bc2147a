use serde_json::Value;

/// Estimate envelope as indented JSON. Decimal strings pass through untouched.
pub(crate) fn render_estimate(value: &Value) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

pub fn print_estimate(value: &Value) {
    match render_estimate(value) {
        Ok(text) => println!("{text}"),
        Err(e) => tracing::error!(error = %e, "could not render estimate as JSON"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decimal_strings_kept_exact() {
        let envelope = json!({
            "result": { "range": { "midpoint": "8116666.6666666666666666666667" } },
            "warnings": [],
        });
        let text = render_estimate(&envelope).unwrap();
        assert!(text.contains("\"8116666.6666666666666666666667\""));
        assert!(text.contains("\n  \"result\""));
    }
}
