use serde_json::Value;
use sha2::{Digest, Sha256};

/// Stable SHA-256 fingerprint of a JSON value.
///
/// The canonical form is the compact serialization with object keys in declared order, so two
/// values that serialize identically share a fingerprint.
pub fn fingerprint_value(value: &Value) -> String {
    let canonical = value.to_string();

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fingerprint_is_hex_sha256() {
        let fp = fingerprint_value(&json!({"a": 1}));
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn fingerprint_is_stable_and_distinguishes_values() {
        assert_eq!(
            fingerprint_value(&json!([1, "two"])),
            fingerprint_value(&json!([1, "two"]))
        );
        assert_ne!(
            fingerprint_value(&json!([1, "two"])),
            fingerprint_value(&json!(["two", 1]))
        );
    }

    #[test]
    fn empty_object_has_known_digest() {
        // sha256("{}")
        assert_eq!(
            fingerprint_value(&json!({})),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }
}
