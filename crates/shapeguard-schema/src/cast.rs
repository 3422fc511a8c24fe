//! # Built-in Typecasts
//!
//! Best-effort coercions toward the JSON kinds, used when a leaf declares
//! a built-in type and no explicit `cast`. A value that already has the
//! target kind comes back unchanged.
//!
//! | target  | accepted input                                            |
//! |---------|-----------------------------------------------------------|
//! | string  | numbers, booleans                                         |
//! | number  | numeric text, booleans (1 / 0)                            |
//! | boolean | `"true"`/`"false"`/`"1"`/`"0"` (any case), numbers 1 / 0  |
//! | array   | comma-separated text, any other scalar wrapped in a list  |
//! | object  | text holding a JSON object                                |

use serde_json::{Number, Value};
use shapeguard_core::ValueKind;

use crate::capability::CastError;

/// Coerce `value` to `kind`.
///
/// # Errors
///
/// Returns a [`CastError`] if the value has no sensible reading as `kind`.
pub fn to_kind(kind: ValueKind, value: &Value) -> Result<Value, CastError> {
    if ValueKind::of(value) == kind {
        return Ok(value.clone());
    }
    match kind {
        ValueKind::String => to_string(value),
        ValueKind::Number => to_number(value),
        ValueKind::Boolean => to_boolean(value),
        ValueKind::Array => to_array(value),
        ValueKind::Object => to_object(value),
        ValueKind::Null => Err(CastError::new("null", value, "nothing casts to null")),
    }
}

fn to_string(value: &Value) -> Result<Value, CastError> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        _ => Err(CastError::new("string", value, "only scalars have a text form")),
    }
}

fn to_number(value: &Value) -> Result<Value, CastError> {
    match value {
        Value::Number(_) => Ok(value.clone()),
        Value::Bool(b) => Ok(Value::from(u8::from(*b))),
        Value::String(s) => parse_number(s.trim())
            .map(Value::Number)
            .ok_or_else(|| CastError::new("number", value, format!("'{s}' is not numeric"))),
        _ => Err(CastError::new("number", value, "not a scalar")),
    }
}

fn parse_number(text: &str) -> Option<Number> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(Number::from(n));
    }
    if let Ok(n) = text.parse::<u64>() {
        return Some(Number::from(n));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}

fn to_boolean(value: &Value) -> Result<Value, CastError> {
    match value {
        Value::Bool(_) => Ok(value.clone()),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Value::Bool(true)),
            "false" | "0" => Ok(Value::Bool(false)),
            _ => Err(CastError::new("boolean", value, format!("'{s}' is not a truth value"))),
        },
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 1.0 => Ok(Value::Bool(true)),
            Some(f) if f == 0.0 => Ok(Value::Bool(false)),
            _ => Err(CastError::new("boolean", value, "only 1 and 0 are truth values")),
        },
        _ => Err(CastError::new("boolean", value, "not a scalar")),
    }
}

fn to_array(value: &Value) -> Result<Value, CastError> {
    match value {
        Value::Array(_) => Ok(value.clone()),
        Value::String(s) if s.trim().is_empty() => Ok(Value::Array(Vec::new())),
        Value::String(s) => Ok(Value::Array(
            s.split(',')
                .map(|part| Value::String(part.trim().to_string()))
                .collect(),
        )),
        Value::Number(_) | Value::Bool(_) => Ok(Value::Array(vec![value.clone()])),
        _ => Err(CastError::new("array", value, "objects do not convert to lists")),
    }
}

fn to_object(value: &Value) -> Result<Value, CastError> {
    match value {
        Value::Object(_) => Ok(value.clone()),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(parsed @ Value::Object(_)) => Ok(parsed),
            Ok(_) => Err(CastError::new("object", value, "text is JSON but not an object")),
            Err(e) => Err(CastError::new("object", value, e.to_string())),
        },
        _ => Err(CastError::new("object", value, "only JSON text converts to an object")),
    }
}
