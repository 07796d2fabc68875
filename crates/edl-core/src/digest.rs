//! # Content Digests — Evidence and Audit Hashing
//!
//! SHA-256 digests over canonical bytes. Every stored hash in the ledger
//! (`content_hash` on evidence, the audit chain links, export digests) is
//! produced here, and every producer takes `&CanonicalBytes` so hashing
//! non-canonical input is unrepresentable.
//!
//! Hashes serialize as `sha256:<64 hex chars>`. The prefix makes the
//! algorithm visible in exports and keeps room for future migration
//! without re-interpreting old values.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// Hash algorithm identifier carried alongside every digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    Sha256,
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestAlgorithm::Sha256 => write!(f, "sha256"),
        }
    }
}

/// A 32-byte content digest with its algorithm tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    pub algorithm: DigestAlgorithm,
    #[serde(with = "hex_bytes")]
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Hex encoding of the digest bytes, without the algorithm prefix.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a `sha256:<hex>` string back into a digest.
    pub fn parse(s: &str) -> Option<Self> {
        let hex = s.strip_prefix("sha256:")?;
        if hex.len() != 64 {
            return None;
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk).ok()?;
            bytes[i] = u8::from_str_radix(pair, 16).ok()?;
        }
        Some(Self {
            algorithm: DigestAlgorithm::Sha256,
            bytes,
        })
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// Compute the SHA-256 digest of canonical bytes.
///
/// The `&CanonicalBytes` parameter type is the enforcement point: callers
/// must canonicalize before they can hash.
pub fn sha256_digest(canonical: &CanonicalBytes) -> ContentDigest {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let result = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&result);
    ContentDigest {
        algorithm: DigestAlgorithm::Sha256,
        bytes,
    }
}

/// Hex digest of canonical bytes, without the algorithm prefix.
///
/// The audit chain stores bare hex so that link comparison and genesis
/// sentinel handling stay string-simple.
pub fn sha256_hex(canonical: &CanonicalBytes) -> String {
    sha256_digest(canonical).to_hex()
}

/// Serde adapter storing digest bytes as lowercase hex.
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        serializer.serialize_str(&hex)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let hex = String::deserialize(deserializer)?;
        if hex.len() != 64 {
            return Err(serde::de::Error::custom("digest hex must be 64 chars"));
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in hex.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(chunk)
                .map_err(|_| serde::de::Error::custom("invalid digest hex"))?;
            bytes[i] = u8::from_str_radix(pair, 16)
                .map_err(|_| serde::de::Error::custom("invalid digest hex"))?;
        }
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_known_vector() {
        // SHA-256 of the two bytes "{}".
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        let digest = sha256_digest(&cb);
        assert_eq!(
            digest.to_hex(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn display_carries_algorithm_prefix() {
        let cb = CanonicalBytes::new(&serde_json::json!({"k": "v"})).unwrap();
        let digest = sha256_digest(&cb);
        let s = digest.to_string();
        assert!(s.starts_with("sha256:"));
        assert_eq!(s.len(), "sha256:".len() + 64);
    }

    #[test]
    fn key_order_does_not_change_digest() {
        let a = CanonicalBytes::new(&serde_json::json!({"x": 1, "y": 2})).unwrap();
        let b = CanonicalBytes::new(&serde_json::json!({"y": 2, "x": 1})).unwrap();
        assert_eq!(sha256_digest(&a), sha256_digest(&b));
    }

    #[test]
    fn distinct_payloads_distinct_digests() {
        let a = CanonicalBytes::new(&serde_json::json!({"supplier": "ACME"})).unwrap();
        let b = CanonicalBytes::new(&serde_json::json!({"supplier": "ACME Corp"})).unwrap();
        assert_ne!(sha256_digest(&a), sha256_digest(&b));
    }

    #[test]
    fn parse_round_trip() {
        let cb = CanonicalBytes::new(&serde_json::json!({"n": 42})).unwrap();
        let digest = sha256_digest(&cb);
        let parsed = ContentDigest::parse(&digest.to_string()).expect("should parse");
        assert_eq!(parsed, digest);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(ContentDigest::parse("md5:abcd").is_none());
        assert!(ContentDigest::parse("sha256:tooshort").is_none());
        assert!(ContentDigest::parse("sha256:zz36fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a").is_none());
    }

    #[test]
    fn serde_hex_round_trip() {
        let cb = CanonicalBytes::new(&serde_json::json!({"id": 7})).unwrap();
        let digest = sha256_digest(&cb);
        let json = serde_json::to_string(&digest).unwrap();
        assert!(json.contains(&digest.to_hex()));
        let back: ContentDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);
    }

    #[test]
    fn hex_is_lowercase() {
        let cb = CanonicalBytes::new(&serde_json::json!({"z": 255})).unwrap();
        let hex = sha256_hex(&cb);
        assert_eq!(hex, hex.to_lowercase());
        assert_eq!(hex.len(), 64);
    }
}
