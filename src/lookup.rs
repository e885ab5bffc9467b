//! Non-secret lookup hashes and credential field metadata.
//!
//! `generate_lookup_hash` produces a stable identifier for a structured
//! credential mapping: keys are sorted before serialization so insertion
//! order never changes the digest.  MD5 is fine here; the hash is an index
//! key, not a secrecy boundary.

use md5::{Digest, Md5};
use serde_json::Value;

/// Deterministic hash of a credential mapping, independent of key order.
///
/// The canonical form is the one the existing stored hashes were computed
/// over: keys sorted, `", "` between entries, `": "` after each key.
pub fn generate_lookup_hash(credentials: &Value) -> String {
    let mut canonical = String::new();
    write_canonical(credentials, &mut canonical);
    hex::encode(Md5::digest(canonical.as_bytes()))
}

/// MD5 hex digest of a single credential value.
pub fn hash_credential(credential: &str) -> String {
    hex::encode(Md5::digest(credential.as_bytes()))
}

/// Serialize with sorted keys and the original separator convention.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            // serde_json's default map is ordered, but sort explicitly so a
            // `preserve_order` build cannot change the digest.
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_canonical(&Value::String((*key).clone()), out);
                out.push_str(": ");
                write_canonical(&map[*key], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

/// The kinds of answer a credential question can take.
///
/// Discriminants are part of the stored data contract; do not renumber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AnswerType {
    Text = 0,
    Sensitive = 1,
    Choice = 2,
    Boolean = 3,
    PaymentCardId = 4,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_form_sorts_keys() {
        let mut out = String::new();
        write_canonical(&json!({"b": 1, "a": 1}), &mut out);
        assert_eq!(out, r#"{"a": 1, "b": 1}"#);
    }

    #[test]
    fn canonical_form_recurses_into_nested_values() {
        let mut out = String::new();
        write_canonical(&json!({"z": {"b": 2, "a": [1, "x"]}}), &mut out);
        assert_eq!(out, r#"{"z": {"a": [1, "x"], "b": 2}}"#);
    }

    #[test]
    fn answer_type_discriminants_are_stable() {
        assert_eq!(AnswerType::Text as u8, 0);
        assert_eq!(AnswerType::PaymentCardId as u8, 4);
    }
}
