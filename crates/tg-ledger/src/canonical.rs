//! Canonical JSON
//!
//! Compact JSON with object keys sorted recursively, so the byte form of a
//! value never depends on field or insertion order. This is what entry
//! hashes commit to.

use crate::entry::DecisionRecord;
use crate::error::LedgerError;
use serde_json::Value;

/// Canonical serialization of an arbitrary JSON value
#[must_use]
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

/// Canonical serialization of an entry body
///
/// Covers every field except `hash`, `prevHash` and `signature`, which are
/// not part of [`DecisionRecord`].
///
/// # Errors
/// Returns [`LedgerError::Serialization`] if the record cannot be encoded.
pub fn canonicalize(record: &DecisionRecord) -> Result<String, LedgerError> {
    let value = serde_json::to_value(record)?;
    Ok(canonical_json(&value))
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_canonical(&map[key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push_str(&Value::String(s.to_owned()).to_string());
}
