use serde_json::Value;
use std::io::{self, Read};

/// Calculator input piped on stdin. `None` when stdin is a terminal or the
/// pipe carried nothing.
pub fn read_piped_input() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped_input(&buffer)
}

/// A calculator input record is always a JSON object.
fn parse_piped_input(text: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse piped calculator input: {e}"))?;
    if !value.is_object() {
        return Err("Piped calculator input must be a JSON object of input fields".into());
    }
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_blank_pipe_is_no_input() {
        assert_eq!(parse_piped_input(" \n").unwrap(), None);
    }

    #[test]
    fn test_piped_record() {
        let value = parse_piped_input(r#"{"annual_revenue": "7300000"}"#).unwrap();
        assert_eq!(value, Some(json!({ "annual_revenue": "7300000" })));
    }

    #[test]
    fn test_piped_array_rejected() {
        let err = parse_piped_input("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("JSON object"));
        assert!(parse_piped_input("{not json").is_err());
    }
}
