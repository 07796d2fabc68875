//! # Service Error Taxonomy
//!
//! One error enum for every orchestration operation. Handlers and the
//! CLI match on the variant to pick a status code or exit code; nothing
//! below this layer panics across the service boundary.
//!
//! Domain errors fold into the taxonomy by what the caller did wrong:
//! malformed input is `Validation`, a lookup miss is `NotFound`, an
//! operation against a record in the wrong lifecycle state is `State`,
//! and acting on the wrong kind of work item is `TypeMismatch`.

use thiserror::Error;

use edl_core::CanonicalizationError;
use edl_state::{DecisionError, EntityError, EvidenceError, WorkItemError};
use edl_store::StoreError;

/// Errors surfaced by [`LedgerService`](crate::LedgerService) operations.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Required input was missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// No record of the given kind and id within the tenant.
    #[error("{kind} {id} not found")]
    NotFound {
        kind: &'static str,
        id: String,
    },

    /// The work item exists but is not of the kind the operation acts on.
    #[error("expected a {expected} work item, got {actual}")]
    TypeMismatch {
        expected: String,
        actual: String,
    },

    /// The record is in a lifecycle state that forbids the operation.
    #[error("{0}")]
    State(String),

    /// A payload could not be canonicalized for hashing.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),

    /// The store failed below the domain level.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, id } => ServiceError::NotFound { kind, id },
            other => ServiceError::Store(other),
        }
    }
}

impl From<EvidenceError> for ServiceError {
    fn from(err: EvidenceError) -> Self {
        match err {
            EvidenceError::Canonicalization(e) => ServiceError::Canonicalization(e),
            other => ServiceError::State(other.to_string()),
        }
    }
}

impl From<WorkItemError> for ServiceError {
    fn from(err: WorkItemError) -> Self {
        match err {
            WorkItemError::ConflictNeedsSources { .. }
            | WorkItemError::TrustRankOutOfRange { .. } => {
                ServiceError::Validation(err.to_string())
            }
            other => ServiceError::State(other.to_string()),
        }
    }
}

impl From<DecisionError> for ServiceError {
    fn from(err: DecisionError) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl From<EntityError> for ServiceError {
    fn from(err: EntityError) -> Self {
        match err {
            EntityError::ConfidenceOutOfRange { .. } => {
                ServiceError::Validation(err.to_string())
            }
            other => ServiceError::State(other.to_string()),
        }
    }
}
