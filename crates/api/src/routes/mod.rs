//! HTTP route handlers.

pub mod audits;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod products;
pub mod users;

use axum::http::{HeaderMap, header};
use domain::{CredentialResolver, Principal};

use crate::error::ApiError;

/// Resolves the caller's principal from the `Authorization` header.
///
/// A missing header is not an error here: anonymous access is allowed for
/// public endpoints, and the authorization gate rejects it where a caller
/// is required. A header that is present but malformed or unknown is a
/// 401 regardless of the endpoint.
pub async fn resolve_principal(
    resolver: &dyn CredentialResolver,
    headers: &HeaderMap,
) -> Result<Option<Principal>, ApiError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthenticated)?;

    let principal = resolver
        .verify(token)
        .await
        .map_err(|_| ApiError::Unauthenticated)?;
    Ok(Some(principal))
}
