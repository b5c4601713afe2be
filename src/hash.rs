//! Canonical-JSON content hashing.
//!
//! Two structurally equal JSON values must hash identically regardless of the
//! key order or formatting they arrived with, so profiles re-submitted with
//! shuffled keys are recognized as unchanged. Canonical form: object keys
//! sorted recursively, no whitespace.

use serde_json::Value;
use sha2::{Digest, Sha256};

/// SHA-256 of the canonical serialization of a JSON value, hex-encoded.
pub fn sha256_of_json(value: &Value) -> String {
    let mut canonical = String::new();
    write_canonical(value, &mut canonical);

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

/// Serialize `value` into `out` with object keys sorted and no whitespace.
///
/// Scalars are rendered through `serde_json` so string escaping and number
/// formatting stay consistent with the rest of the crate.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String((*key).clone()).to_string());
                out.push(':');
                write_canonical(&map[*key], out);
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
