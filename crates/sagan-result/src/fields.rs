//! Lenient readers for JSON result fields.
//!
//! Probe firmware has shipped numbers as strings and strings as numbers over
//! the years. A field that cannot be read as the wanted kind is treated as
//! absent.

use serde_json::Value;

/// Reads an integer. Floats are truncated, numeric strings are parsed.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(text) => text.trim().parse().ok(),
        Value::Bool(flag) => Some(i64::from(*flag)),
        _ => None,
    }
}

/// Reads an integer that must fit `T`.
pub(crate) fn uint<T: TryFrom<i64>>(value: Option<&Value>) -> Option<T> {
    int(value).and_then(|v| T::try_from(v).ok())
}

/// Reads a float from a number or a numeric string.
pub(crate) fn float(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a string. Scalars are rendered as text; null is absent.
pub(crate) fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Looks `key` up in the nested `result` object.
pub(crate) fn nested<'a>(object: &'a Value, key: &str) -> Option<&'a Value> {
    object.get("result")?.get(key)
}

/// Looks `key` up in the nested `result` object, then in `object` itself.
pub(crate) fn nested_or_top<'a>(object: &'a Value, key: &str) -> Option<&'a Value> {
    nested(object, key).or_else(|| object.get(key))
}

/// Rounds to three decimal places.
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
