//! User profiles and the self-or-admin access scope.

use chrono::{DateTime, Utc};
use doc_store::{Document, DocumentStore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{UserId, Version};

use crate::auth;
use crate::error::DomainError;
use crate::identity::{Principal, Role};

/// A registered account.
///
/// Credentials are handled by the external identity collaborator; this
/// entity carries only the profile and the authoritative role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(skip)]
    pub version: Version,

    pub username: String,
    pub email: String,
    pub role: Role,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for User {
    fn collection() -> &'static str {
        "users"
    }

    fn document_id(&self) -> Uuid {
        self.id.as_uuid()
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}

/// Input for user creation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub role: Role,
}

/// Self-service profile edit. Role changes go through the admin-only path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Service for managing user accounts.
pub struct UserService<S> {
    store: S,
}

impl<S> UserService<S>
where
    S: DocumentStore + Clone + 'static,
{
    /// Creates a new user service.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn fetch(&self, user_id: UserId) -> Result<User, DomainError> {
        self.store
            .get::<User>(user_id.as_uuid())
            .await?
            .ok_or(DomainError::NotFound {
                resource: "user",
                id: user_id.to_string(),
            })
    }

    /// Registers an account. Admin only; self-registration lives with the
    /// external identity collaborator.
    #[tracing::instrument(skip(self, principal, new_user))]
    pub async fn create_user(
        &self,
        principal: Option<&Principal>,
        new_user: NewUser,
    ) -> Result<User, DomainError> {
        let principal = auth::authenticated(principal)?;
        auth::require_role(principal, &[Role::Admin])?;

        if new_user.username.trim().is_empty() || new_user.email.trim().is_empty() {
            return Err(DomainError::Validation(
                "username and email are required".to_string(),
            ));
        }

        let now = Utc::now();
        let mut user = User {
            id: UserId::new(),
            version: Version::default(),
            username: new_user.username,
            email: new_user.email,
            role: new_user.role,
            created_at: now,
            updated_at: now,
        };
        let version = self.store.insert(&user).await?;
        user.set_version(version);
        Ok(user)
    }

    /// Reads a profile. Self or admin; ownership is the target id itself, so
    /// the check runs before anything is fetched.
    #[tracing::instrument(skip(self, principal))]
    pub async fn get_user(
        &self,
        principal: Option<&Principal>,
        user_id: UserId,
    ) -> Result<User, DomainError> {
        let principal = auth::authenticated(principal)?;
        auth::require_owner_or_role(principal, user_id, &[Role::Admin])?;
        self.fetch(user_id).await
    }

    /// Edits a profile. Self or admin.
    #[tracing::instrument(skip(self, principal, update))]
    pub async fn update_profile(
        &self,
        principal: Option<&Principal>,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<User, DomainError> {
        let principal = auth::authenticated(principal)?;
        auth::require_owner_or_role(principal, user_id, &[Role::Admin])?;

        let mut user = self.fetch(user_id).await?;
        if let Some(username) = update.username {
            if username.trim().is_empty() {
                return Err(DomainError::Validation(
                    "username must not be empty".to_string(),
                ));
            }
            user.username = username;
        }
        if let Some(email) = update.email {
            if email.trim().is_empty() {
                return Err(DomainError::Validation(
                    "email must not be empty".to_string(),
                ));
            }
            user.email = email;
        }
        user.updated_at = Utc::now();

        let version = self.store.update(&user).await?;
        user.set_version(version);
        Ok(user)
    }

    /// Changes a user's role. Admin only; the role is immutable on every
    /// other path.
    #[tracing::instrument(skip(self, principal))]
    pub async fn update_role(
        &self,
        principal: Option<&Principal>,
        user_id: UserId,
        role: Role,
    ) -> Result<User, DomainError> {
        let principal = auth::authenticated(principal)?;
        auth::require_role(principal, &[Role::Admin])?;

        let mut user = self.fetch(user_id).await?;
        user.role = role;
        user.updated_at = Utc::now();

        let version = self.store.update(&user).await?;
        user.set_version(version);

        tracing::info!(user_id = %user.id, role = %user.role, "user role updated");
        Ok(user)
    }

    /// Removes an account. Self or admin.
    #[tracing::instrument(skip(self, principal))]
    pub async fn delete_user(
        &self,
        principal: Option<&Principal>,
        user_id: UserId,
    ) -> Result<(), DomainError> {
        let principal = auth::authenticated(principal)?;
        auth::require_owner_or_role(principal, user_id, &[Role::Admin])?;

        let user = self.fetch(user_id).await?;
        self.store
            .delete::<User>(user.id.as_uuid(), user.version())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_store::InMemoryStore;

    fn service() -> UserService<InMemoryStore> {
        UserService::new(InMemoryStore::new())
    }

    fn admin() -> Principal {
        Principal::new(UserId::new(), Role::Admin)
    }

    #[tokio::test]
    async fn create_requires_admin() {
        let service = service();
        let new_user = NewUser {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::Customer,
        };

        let customer = Principal::new(UserId::new(), Role::Customer);
        let err = service
            .create_user(Some(&customer), new_user.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden));

        let user = service.create_user(Some(&admin()), new_user).await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.version(), Version::first());
    }

    #[tokio::test]
    async fn self_scope_allows_own_profile_only() {
        let service = service();
        let user = service
            .create_user(
                Some(&admin()),
                NewUser {
                    username: "bob".to_string(),
                    email: "bob@example.com".to_string(),
                    role: Role::Customer,
                },
            )
            .await
            .unwrap();

        let own = Principal::new(user.id, Role::Customer);
        let other = Principal::new(UserId::new(), Role::Customer);

        assert!(service.get_user(Some(&own), user.id).await.is_ok());
        assert!(matches!(
            service.get_user(Some(&other), user.id).await,
            Err(DomainError::Forbidden)
        ));
        // The ownership check denies before any lookup: a foreign id that
        // does not exist is still Forbidden, not NotFound.
        assert!(matches!(
            service.get_user(Some(&other), UserId::new()).await,
            Err(DomainError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn role_update_is_admin_only() {
        let service = service();
        let user = service
            .create_user(
                Some(&admin()),
                NewUser {
                    username: "carol".to_string(),
                    email: "carol@example.com".to_string(),
                    role: Role::Customer,
                },
            )
            .await
            .unwrap();

        // Even the user themself cannot change their own role.
        let own = Principal::new(user.id, Role::Customer);
        assert!(matches!(
            service.update_role(Some(&own), user.id, Role::Admin).await,
            Err(DomainError::Forbidden)
        ));

        let updated = service
            .update_role(Some(&admin()), user.id, Role::Seller)
            .await
            .unwrap();
        assert_eq!(updated.role, Role::Seller);
    }
}
