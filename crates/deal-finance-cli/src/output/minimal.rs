use serde_json::Value;

use super::{cell_text, flatten};

/// Print just the headline figure.
///
/// Looks for well-known result fields in priority order (dotted paths into
/// nested loan results), then falls back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "remaining_ebitda",
        "sba_loan.monthly_payment",
        "monthly_payment",
        "total_paid",
        "ebitda_multiple",
        "ebitdaMultiple",
    ];

    if let Value::Object(map) = result_obj {
        let flat = flatten(map);
        for key in &priority_keys {
            if let Some((_, val)) = flat.iter().find(|(k, _)| k == key) {
                if !val.is_null() {
                    println!("{}", cell_text(val, "null"));
                    return;
                }
            }
        }

        if let Some((key, val)) = flat.first() {
            println!("{}: {}", key, cell_text(val, "null"));
            return;
        }
    }

    if let Value::Array(rows) = result_obj {
        println!("{} rows", rows.len());
        return;
    }

    println!("{}", cell_text(result_obj, "null"));
}
