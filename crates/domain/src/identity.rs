//! Principal and role model.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use common::UserId;

/// Capability tier of a principal. Every principal holds exactly one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Places and manages their own orders.
    Customer,
    /// Maintains a catalog and drives fulfillment forward.
    Seller,
    /// Full access, including hard deletes and audit reads.
    Admin,
}

impl Role {
    /// Returns the role name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "Customer",
            Role::Seller => "Seller",
            Role::Admin => "Admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The authenticated actor behind a request.
///
/// Resolved from a bearer credential before any handler logic runs; the
/// role is authoritative for every downstream authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
}

impl Principal {
    /// Creates a principal.
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Returns true if this principal holds the Admin role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Errors from credential verification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The credential is malformed, expired, or unknown.
    #[error("invalid credential")]
    InvalidCredential,
}

/// Resolves a verified bearer credential to exactly one principal.
///
/// Token signing and verification are external concerns; the domain only
/// consumes the result through this seam.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    /// Verifies a bearer token and returns the principal it identifies.
    async fn verify(&self, token: &str) -> Result<Principal, AuthError>;
}

/// Credential resolver backed by a fixed token-to-principal map.
///
/// Stands in for the external token verifier in development and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenResolver {
    tokens: HashMap<String, Principal>,
}

impl StaticTokenResolver {
    /// Creates an empty resolver that rejects every token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token for a principal.
    pub fn with_token(mut self, token: impl Into<String>, principal: Principal) -> Self {
        self.tokens.insert(token.into(), principal);
        self
    }

    /// Registers a token on an existing resolver.
    pub fn insert(&mut self, token: impl Into<String>, principal: Principal) {
        self.tokens.insert(token.into(), principal);
    }
}

#[async_trait]
impl CredentialResolver for StaticTokenResolver {
    async fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        self.tokens
            .get(token)
            .copied()
            .ok_or(AuthError::InvalidCredential)
    }
}
