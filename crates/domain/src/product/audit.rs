//! Append-only product audit trail.

use chrono::{DateTime, Utc};
use doc_store::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{AuditId, ProductId, UserId, Version};

use super::Product;
use crate::error::DomainError;

/// What a product mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    Update,
    Delete,
}

/// Immutable before/after snapshot of a product mutation.
///
/// Records are only ever appended; nothing in the codebase updates or deletes
/// one, and they outlive the product they describe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: AuditId,
    #[serde(skip)]
    pub version: Version,

    pub product_id: ProductId,
    pub updated_by: Option<UserId>,
    /// Full snapshot before the mutation.
    pub old_data: serde_json::Value,
    /// Full snapshot after the mutation; `None` for a delete.
    pub new_data: Option<serde_json::Value>,
    pub action: AuditAction,
    pub recorded_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Builds the record for a successful update.
    pub fn for_update(
        old: &Product,
        new: &Product,
        updated_by: Option<UserId>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id: AuditId::new(),
            version: Version::default(),
            product_id: old.id,
            updated_by,
            old_data: snapshot(old)?,
            new_data: Some(snapshot(new)?),
            action: AuditAction::Update,
            recorded_at: Utc::now(),
        })
    }

    /// Builds the record for a successful delete.
    pub fn for_delete(old: &Product, updated_by: Option<UserId>) -> Result<Self, DomainError> {
        Ok(Self {
            id: AuditId::new(),
            version: Version::default(),
            product_id: old.id,
            updated_by,
            old_data: snapshot(old)?,
            new_data: None,
            action: AuditAction::Delete,
            recorded_at: Utc::now(),
        })
    }
}

fn snapshot(product: &Product) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(product).map_err(|e| DomainError::Internal(e.to_string()))
}

impl Document for AuditRecord {
    fn collection() -> &'static str {
        "product_audits"
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

/// Audit read filter: by product, by updater, paginated.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditQuery {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub updated_by: Option<UserId>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    50
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            product_id: None,
            updated_by: None,
            page: default_page(),
            limit: default_limit(),
        }
    }
}

/// One page of audit records, newest first.
#[derive(Debug, Clone, Serialize)]
pub struct AuditPage {
    pub total: usize,
    pub page: usize,
    pub pages: usize,
    pub records: Vec<AuditRecord>,
}
