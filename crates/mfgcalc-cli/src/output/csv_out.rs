use serde_json::Value;
use std::io;

use super::{flatten, format_scalar, row_data};

/// Write output as CSV to stdout.
///
/// Results with row data (monthly projection, comparison, gaps) are written
/// one row per entry; anything else as a two-column field/value listing.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    if let Err(e) = write_csv(&mut wtr, value).and_then(|_| wtr.flush().map_err(csv::Error::from)) {
        tracing::error!(error = %e, "CSV output failed");
    }
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) -> Result<(), csv::Error> {
    match value {
        Value::Object(map) => {
            let body = match map.get("result") {
                Some(Value::Object(result)) => {
                    if let Some((_, rows)) = row_data(result) {
                        return write_rows(wtr, rows);
                    }
                    result
                }
                _ => map,
            };
            let mut fields = Vec::new();
            flatten("", body, &mut fields);
            wtr.write_record(["field", "value"])?;
            for (key, val) in &fields {
                wtr.write_record([key.as_str(), &format_scalar(val)])?;
            }
            Ok(())
        }
        Value::Array(arr) => write_rows(wtr, arr),
        _ => wtr.write_record([&format_scalar(value)]),
    }
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> Result<(), csv::Error> {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            wtr.write_record([&format_scalar(item)])?;
        }
        return Ok(());
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    wtr.write_record(&headers)?;
    for map in rows.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(format_scalar).unwrap_or_default())
            .collect();
        wtr.write_record(&row)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_csv(&mut wtr, value).unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_monthly_rows() {
        let out = json!({
            "result": {
                "months": [
                    { "month": 1, "ending_cash": "100" },
                    { "month": 2, "ending_cash": "90" }
                ],
                "summary": { "ending_cash": "90" }
            }
        });
        assert_eq!(render(&out), "ending_cash,month\n100,1\n90,2\n");
    }

    #[test]
    fn test_field_listing() {
        let out = json!({ "result": { "cash_conversion_cycle": "55", "daily_revenue": "20000" } });
        assert_eq!(
            render(&out),
            "field,value\ncash_conversion_cycle,55\ndaily_revenue,20000\n"
        );
    }
}
