//! Deep JSON sanitization.
//!
//! `serde_json::Value` cannot hold NaN or ±Inf, so values built through
//! serde are clean by construction. Responses assembled from raw floats
//! (statistics maps, ad-hoc payloads) go through [`sanitize_value`],
//! which walks nested maps and sequences and nulls out anything
//! non-representable.

use serde_json::Value;

/// Recursively replace unrepresentable numbers with `null`.
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, sanitize_value(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::Number(n) => {
            match n.as_f64() {
                Some(f) if !f.is_finite() => Value::Null,
                _ => Value::Number(n),
            }
        }
        other => other,
    }
}

/// Lossless-if-possible float → JSON conversion; NaN/Inf → `null`.
pub fn f64_to_json(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
