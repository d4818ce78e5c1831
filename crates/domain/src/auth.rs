//! Authorization gate.
//!
//! Pure predicates with no side effects and no entity access. Services apply
//! them as a strict pipeline: resolve principal, coarse role check, fetch
//! entity, fine ownership check, mutate. An unauthenticated caller is always
//! denied before anything is looked up, so existence is never leaked.

use common::UserId;

use crate::error::DomainError;
use crate::identity::{Principal, Role};

/// Rejects anonymous requests.
///
/// Returns the principal so call sites read as a pipeline stage.
pub fn authenticated(principal: Option<&Principal>) -> Result<&Principal, DomainError> {
    principal.ok_or(DomainError::Unauthenticated)
}

/// Requires the principal to hold one of the allowed roles.
pub fn require_role(principal: &Principal, allowed: &[Role]) -> Result<(), DomainError> {
    if allowed.contains(&principal.role) {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}

/// Grants access to the resource owner or to any of the allowed roles.
///
/// This is the self-or-admin scope: ownership wins regardless of role.
pub fn require_owner_or_role(
    principal: &Principal,
    owner: UserId,
    allowed: &[Role],
) -> Result<(), DomainError> {
    if principal.user_id == owner || allowed.contains(&principal.role) {
        Ok(())
    } else {
        Err(DomainError::Forbidden)
    }
}

/// Single-entry authorization predicate.
///
/// - No principal: `Unauthenticated`, unconditionally.
/// - Empty role set: any authenticated principal passes.
/// - Otherwise the principal must hold one of the required roles, or own the
///   resource when an owner id is supplied.
pub fn authorize(
    principal: Option<&Principal>,
    required: &[Role],
    owner: Option<UserId>,
) -> Result<(), DomainError> {
    let principal = authenticated(principal)?;

    if required.is_empty() || required.contains(&principal.role) {
        return Ok(());
    }

    match owner {
        Some(owner_id) if principal.user_id == owner_id => Ok(()),
        _ => Err(DomainError::Forbidden),
    }
}
