//! # Canonical JSON (RFC 8785)
//!
//! Byte-deterministic JSON serialization. Two logically equal values
//! produce byte-equal output regardless of insertion order, formatting, or
//! process boundaries.
//!
//! ## Encoding Rules
//!
//! | Value | Canonical form |
//! |-------|----------------|
//! | Object | Members sorted by Unicode codepoint of the key, no whitespace |
//! | String | Minimal escapes: `\"` `\\` `\b` `\t` `\n` `\f` `\r`, other controls as lowercase `\u00xx` |
//! | Integer | Plain decimal, no fraction, no exponent |
//! | Float | Shortest round-trip decimal; integral values collapse to integers |
//! | Non-finite | Rejected with [`CanonicalError::NonFiniteNumber`] |

use crate::errors::CanonicalError;
use serde::Serialize;
use serde_json::{Number, Value};

/// Largest magnitude a float may have and still be collapsed to an integer
/// without losing precision (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Serialize a JSON value to its canonical byte form.
pub fn canonical_json_bytes(value: &Value) -> Result<Vec<u8>, CanonicalError> {
    let mut out = Vec::with_capacity(128);
    write_value(&mut out, value)?;
    Ok(out)
}

/// Serialize a JSON value to its canonical form as a `String`.
pub fn canonical_json_string(value: &Value) -> Result<String, CanonicalError> {
    let bytes = canonical_json_bytes(value)?;
    // The writer only ever emits valid UTF-8.
    String::from_utf8(bytes).map_err(|e| CanonicalError::Unparseable(e.to_string()))
}

/// Convert any serializable value into a JSON tree suitable for hashing.
///
/// Unlike a bare `serde_json::to_value`, a serialization failure (such as a
/// non-string map key) surfaces as a typed error.
pub fn to_canonical_value<T: Serialize>(value: &T) -> Result<Value, CanonicalError> {
    serde_json::to_value(value).map_err(|e| CanonicalError::NotJsonCompatible(e.to_string()))
}

/// Build a JSON number from a float, rejecting NaN and infinities.
pub fn number_from_f64(value: f64) -> Result<Value, CanonicalError> {
    Number::from_f64(value)
        .map(Value::Number)
        .ok_or(CanonicalError::NonFiniteNumber)
}

/// Re-parse the canonical form of a value.
///
/// `canonicalize_value(x)` followed by another canonicalization yields the
/// same bytes (idempotence), which the test suite asserts as a property.
pub fn canonicalize_value(value: &Value) -> Result<Value, CanonicalError> {
    let bytes = canonical_json_bytes(value)?;
    serde_json::from_slice(&bytes).map_err(|e| CanonicalError::Unparseable(e.to_string()))
}

fn write_value(out: &mut Vec<u8>, value: &Value) -> Result<(), CanonicalError> {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(n) => write_number(out, n)?,
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(out, item)?;
            }
            out.push(b']');
        }
        Value::Object(map) => {
            // Codepoint order. UTF-8 byte order over &str is identical, so a
            // plain key sort is sufficient.
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push(b'{');
            for (i, (key, val)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_string(out, key);
                out.push(b':');
                write_value(out, val)?;
            }
            out.push(b'}');
        }
    }
    Ok(())
}

fn write_number(out: &mut Vec<u8>, number: &Number) -> Result<(), CanonicalError> {
    if let Some(i) = number.as_i64() {
        out.extend_from_slice(i.to_string().as_bytes());
        return Ok(());
    }
    if let Some(u) = number.as_u64() {
        out.extend_from_slice(u.to_string().as_bytes());
        return Ok(());
    }
    let f = number.as_f64().ok_or(CanonicalError::NonFiniteNumber)?;
    if !f.is_finite() {
        return Err(CanonicalError::NonFiniteNumber);
    }
    // Integral doubles inside the safe range print without a fraction, the
    // rest use Rust's shortest round-trip rendering.
    if f == f.trunc() && f.abs() <= MAX_SAFE_INTEGER {
        out.extend_from_slice((f as i64).to_string().as_bytes());
    } else {
        out.extend_from_slice(f.to_string().as_bytes());
    }
    Ok(())
}

fn write_string(out: &mut Vec<u8>, s: &str) {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    out.push(b'"');
    for ch in s.chars() {
        match ch {
            '"' => out.extend_from_slice(b"\\\""),
            '\\' => out.extend_from_slice(b"\\\\"),
            '\u{08}' => out.extend_from_slice(b"\\b"),
            '\t' => out.extend_from_slice(b"\\t"),
            '\n' => out.extend_from_slice(b"\\n"),
            '\u{0C}' => out.extend_from_slice(b"\\f"),
            '\r' => out.extend_from_slice(b"\\r"),
            c if (c as u32) < 0x20 => {
                let code = c as u32;
                out.extend_from_slice(b"\\u00");
                out.push(HEX[((code >> 4) & 0xF) as usize]);
                out.push(HEX[(code & 0xF) as usize]);
            }
            c => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    out.push(b'"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_keys_sorted() {
        let value = json!({"b": 1, "a": 2, "aa": 3});
        let canonical = canonical_json_string(&value).unwrap();
        assert_eq!(canonical, r#"{"a":2,"aa":3,"b":1}"#);
    }

    #[test]
    fn test_nested_objects_sorted() {
        let value = json!({"z": {"y": 1, "x": 2}, "a": [{"c": 1, "b": 2}]});
        let canonical = canonical_json_string(&value).unwrap();
        assert_eq!(canonical, r#"{"a":[{"b":2,"c":1}],"z":{"x":2,"y":1}}"#);
    }

    #[test]
    fn test_no_insignificant_whitespace() {
        let value: Value = serde_json::from_str(r#"{ "a" : [ 1 , 2 ] }"#).unwrap();
        assert_eq!(canonical_json_string(&value).unwrap(), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_integral_float_collapses() {
        let value = json!({"n": 1.0});
        assert_eq!(canonical_json_string(&value).unwrap(), r#"{"n":1}"#);
    }

    #[test]
    fn test_fractional_float_shortest_form() {
        let value = json!({"n": 0.1});
        assert_eq!(canonical_json_string(&value).unwrap(), r#"{"n":0.1}"#);
    }

    #[test]
    fn test_string_escapes_minimal() {
        let value = json!("line\nquote\"tab\tctl\u{01}");
        assert_eq!(
            canonical_json_string(&value).unwrap(),
            "\"line\\nquote\\\"tab\\tctl\\u0001\""
        );
    }

    #[test]
    fn test_unicode_passes_through() {
        let value = json!({"λ": "grüße"});
        let canonical = canonical_json_string(&value).unwrap();
        assert_eq!(canonical, "{\"λ\":\"grüße\"}");
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(
            number_from_f64(f64::NAN).unwrap_err(),
            CanonicalError::NonFiniteNumber
        );
        assert_eq!(
            number_from_f64(f64::INFINITY).unwrap_err(),
            CanonicalError::NonFiniteNumber
        );
    }

    #[test]
    fn test_idempotence_property() {
        let samples = vec![
            json!(null),
            json!(true),
            json!(42),
            json!(-7),
            json!(0.25),
            json!("plain"),
            json!([1, "two", {"three": 3.5}, null]),
            json!({"outer": {"inner": [{"deep": true}]}, "empty": {}}),
        ];
        for value in samples {
            let once = canonical_json_bytes(&value).unwrap();
            let reparsed = canonicalize_value(&value).unwrap();
            let twice = canonical_json_bytes(&reparsed).unwrap();
            assert_eq!(once, twice, "canonical form must be idempotent");
        }
    }

    #[test]
    fn test_equal_logical_values_equal_bytes() {
        let a: Value = serde_json::from_str(r#"{"x": 1, "y": {"b": 2, "a": 3}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"y": {"a": 3, "b": 2}, "x": 1}"#).unwrap();
        assert_eq!(
            canonical_json_bytes(&a).unwrap(),
            canonical_json_bytes(&b).unwrap()
        );
    }
}
