//! Fingerprint: stable content-addressed keys for cacheable input.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of normalized input. Identity defines cache identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trims, collapses whitespace runs to a single space and lower-cases.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn digest(bytes: &[u8]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    Fingerprint(format!("{:x}", hasher.finalize()))
}

/// Computes the fingerprint of free text (names, titles) after normalization.
pub fn fingerprint(text: &str) -> Fingerprint {
    digest(normalize(text).as_bytes())
}

/// Fingerprints the exact JSON serialization of an object. No normalization:
/// values that differ in any string byte get different keys.
///
/// Struct fields serialize in declaration order, so equal values always
/// produce the same bytes and therefore the same key.
pub fn fingerprint_json<T: Serialize>(value: &T) -> Fingerprint {
    let bytes = serde_json::to_vec(value).unwrap_or_default();
    digest(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_and_case_are_ignored() {
        assert_eq!(fingerprint(" A  b "), fingerprint("a b"));
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let first = fingerprint("Senior Rust Engineer");
        let second = fingerprint("Senior Rust Engineer");
        assert_eq!(first, second);
    }

    #[test]
    fn test_collapses_internal_runs() {
        assert_eq!(
            fingerprint("React Native developer"),
            fingerprint("react  native   developer")
        );
    }

    #[test]
    fn test_distinct_text_distinct_key() {
        assert_ne!(fingerprint("React"), fingerprint("React Native"));
    }

    #[test]
    fn test_fingerprint_is_sha256_hex() {
        let fp = fingerprint("anything");
        assert_eq!(fp.as_str().len(), 64);
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_normalize_handles_tabs_and_newlines() {
        assert_eq!(normalize("\tFoo\n\nBAR  baz "), "foo bar baz");
    }

    #[test]
    fn test_fingerprint_json_equal_values() {
        let a = serde_json::json!({"company": "Acme", "level": "senior"});
        let b = serde_json::json!({"company": "Acme", "level": "senior"});
        assert_eq!(fingerprint_json(&a), fingerprint_json(&b));
        let c = serde_json::json!({"company": "Acme", "level": "junior"});
        assert_ne!(fingerprint_json(&a), fingerprint_json(&c));
    }

    #[test]
    fn test_fingerprint_json_keeps_case_and_inner_whitespace() {
        let single = serde_json::json!({"technical": ["tech 0"]});
        let double = serde_json::json!({"technical": ["tech  0"]});
        let upper = serde_json::json!({"technical": ["Tech 0"]});
        assert_ne!(fingerprint_json(&single), fingerprint_json(&double));
        assert_ne!(fingerprint_json(&single), fingerprint_json(&upper));
    }
}
