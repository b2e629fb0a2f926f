//! Readers for the few fields the client interprets in otherwise untyped payloads.

use crate::models::OrderStatus;
use serde_json::Value;

/// Read the `result` field as a flag. Missing or `null` is `false`.
///
/// Other values use loose truthiness: `0`, `""`, `"0"` and empty
/// arrays/objects are `false`, everything else is `true`.
pub fn result_flag(payload: &Value) -> bool {
    match payload.get("result") {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !(s.is_empty() || s == "0"),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
    }
}

/// Read the `status` field of an exchange status payload.
pub fn order_status(payload: &Value) -> Option<OrderStatus> {
    payload
        .get("status")
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
}
