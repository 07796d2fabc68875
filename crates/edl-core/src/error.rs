//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared across the ledger workspace. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Canonicalization errors carry the offending value so callers can
//!   report which payload field broke determinism.
//! - Parse/validation errors include the input and the rule it violated.
//! - Nothing in this crate panics on bad input; every fallible path
//!   returns one of these types.

use thiserror::Error;

/// Top-level error type for ledger foundation operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// An identifier or timestamp failed validation on construction.
    #[error("validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    /// Monetary and quantity fields must be strings or integers.
    #[error("float values are not permitted in canonical payloads; use string or integer: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
