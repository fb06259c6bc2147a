pub mod file;
pub mod stdin;

use serde_json::Value;

/// JSON input from `--input`, else piped stdin, else `None`.
pub fn read_input(path: Option<&str>) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(Some(file::read_json_value(p)?)),
        None => stdin::read_piped_input(),
    }
}

/// Like [`read_input`] but the input is mandatory.
pub fn require_input(path: Option<&str>, what: &str) -> Result<Value, Box<dyn std::error::Error>> {
    read_input(path)?.ok_or_else(|| format!("--input file (or piped JSON) is required for {what}").into())
}
