//! # Canonical Bytes — Deterministic Serialization for Hashing
//!
//! Defines `CanonicalBytes`, the sole construction path for bytes used in
//! digest computation across the ledger. Evidence payload and metadata
//! hashes, audit-chain links, and export digests all start here.
//!
//! ## Integrity Invariant
//!
//! `CanonicalBytes` keeps its buffer private and exposes exactly one
//! constructor, `CanonicalBytes::new()`, which coerces the value tree
//! (rejecting floats) before RFC 8785 serialization. Digest functions
//! take `&CanonicalBytes`, never raw bytes, so a hash over non-canonical
//! input cannot be produced by accident.
//!
//! ## Coercion Rules
//!
//! 1. **Reject floats** — amounts and quantities must be strings or
//!    integers. Float serialization has edge cases that break
//!    byte-determinism across producers.
//! 2. **Timestamps serialize as ISO8601 strings** — the [`crate::Timestamp`]
//!    type guarantees the Z suffix and seconds precision before any value
//!    reaches this module.
//! 3. **Object keys are strings, arrays stay arrays** — nested structures
//!    are coerced recursively.
//!
//! Serialization uses `serde_jcs` for RFC 8785 (JSON Canonicalization
//! Scheme) output: sorted keys, compact separators, deterministic bytes.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization with the ledger's
/// type-coercion rules.
///
/// # Invariants
///
/// - `CanonicalBytes::new()` is the sole constructor.
/// - Numeric values are integers, never floats.
/// - Object keys are strings; sequences are JSON arrays.
/// - Serialization is RFC 8785: sorted keys, compact separators.
///
/// The inner `Vec<u8>` is private, so downstream code cannot bypass the
/// pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value.
    ///
    /// This is the ONLY way to obtain `CanonicalBytes`. Every digest in the
    /// ledger flows through this constructor.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains
    /// float numbers, or `CanonicalizationError::SerializationFailed` if
    /// JCS serialization fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let coerced = coerce_value(value)?;
        let s = serde_jcs::to_string(&coerced)?;
        Ok(Self(s.into_bytes()))
    }

    /// Borrow the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Recursively coerce a JSON value tree for canonicalization.
///
/// `null`, `bool`, `string`, and integer numbers pass through unchanged.
/// Non-integer numbers are rejected. Objects and arrays are recursed.
fn coerce_value(value: Value) -> Result<Value, CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(value),
        Value::Number(ref n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(value)
        }
        Value::Object(map) => {
            let mut coerced = serde_json::Map::new();
            for (k, v) in map {
                coerced.insert(k, coerce_value(v)?);
            }
            Ok(Value::Object(coerced))
        }
        Value::Array(arr) => {
            let coerced: Result<Vec<_>, _> = arr.into_iter().map(coerce_value).collect();
            Ok(Value::Array(coerced?))
        }
    }
}
