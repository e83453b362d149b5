use serde_json::Value;

/// Pretty-print JSON to stdout. A bare string (e.g. an error-free message)
/// is printed unquoted.
pub fn print_json(value: &Value) {
    if let Value::String(s) = value {
        println!("{}", s);
        return;
    }
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}
