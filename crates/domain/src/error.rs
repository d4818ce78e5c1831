//! Domain error taxonomy.

use doc_store::StoreError;
use thiserror::Error;

use crate::identity::AuthError;
use crate::order::OrderError;

/// Errors surfaced by domain operations.
///
/// The variants map one-to-one onto HTTP status classes at the API layer:
/// validation 400, unauthenticated 401, forbidden 403, not-found 404,
/// transition/conflict 409, internal 500.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No principal was presented, or the credential could not be verified.
    #[error("authentication required")]
    Unauthenticated,

    /// The principal is authenticated but not allowed to perform the
    /// operation on this resource.
    #[error("access denied")]
    Forbidden,

    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    /// The target entity does not exist.
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// An order lifecycle rule was violated.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// A concurrent writer advanced the entity since it was read.
    #[error("{resource} {id} was modified concurrently, re-fetch and retry")]
    Conflict { resource: &'static str, id: String },

    /// Infrastructure failure. The detail is logged, never surfaced to
    /// untrusted callers.
    #[error("internal error")]
    Internal(String),
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VersionConflict { collection, id, .. } => DomainError::Conflict {
                resource: collection,
                id: id.to_string(),
            },
            StoreError::NotFound { collection, id } => DomainError::NotFound {
                resource: collection,
                id: id.to_string(),
            },
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for DomainError {
    fn from(_: AuthError) -> Self {
        DomainError::Unauthenticated
    }
}
