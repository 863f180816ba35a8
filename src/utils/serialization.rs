// Every digest in the system is computed over this canonical form: compact
// JSON with object keys emitted in struct declaration order. The hashed
// structs declare their fields in lexicographic order, so two values that
// agree field-for-field always serialize to identical bytes.
use crate::error::{LedgerError, Result};
use serde::Serialize;

/// Canonical compact-JSON string of a value.
pub fn canonical_json<T: Serialize>(data: &T) -> Result<String> {
    serde_json::to_string(data)
        .map_err(|e| LedgerError::Serialization(format!("Canonical serialization failed: {e}")))
}

/// Canonical compact-JSON bytes of a value, ready for hashing or signing.
pub fn canonical_json_bytes<T: Serialize>(data: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(data)
        .map_err(|e| LedgerError::Serialization(format!("Canonical serialization failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct TestPayload {
        amount: f64,
        label: String,
        nonce: u64,
    }

    #[test]
    fn test_canonical_json_declaration_order() {
        let payload = TestPayload {
            amount: 2.5,
            label: "test".to_string(),
            nonce: 42,
        };

        let json = canonical_json(&payload).expect("Serialization should work");
        assert_eq!(json, r#"{"amount":2.5,"label":"test","nonce":42}"#);
    }

    #[test]
    fn test_canonical_json_bytes_match_string() {
        let payload = TestPayload {
            amount: 0.0,
            label: String::new(),
            nonce: 0,
        };

        let json = canonical_json(&payload).expect("Serialization should work");
        let bytes = canonical_json_bytes(&payload).expect("Serialization should work");
        assert_eq!(json.into_bytes(), bytes);
    }

    #[test]
    fn test_canonical_json_is_compact() {
        let payload = TestPayload {
            amount: 1.0,
            label: "x".to_string(),
            nonce: 7,
        };

        let json = canonical_json(&payload).expect("Serialization should work");
        assert!(!json.contains(' '));
        assert!(!json.contains('\n'));
    }
}
