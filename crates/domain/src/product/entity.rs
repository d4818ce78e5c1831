//! Product entity and mutation payloads.

use chrono::{DateTime, Utc};
use doc_store::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{Money, ProductId, UserId, Version};

use crate::error::DomainError;

/// Catalog visibility of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    Archived,
}

/// A catalog product.
///
/// Owned by the seller or admin who created it; only the owner (or an admin)
/// may mutate it, and every mutation leaves an [`AuditRecord`] behind.
///
/// [`AuditRecord`]: crate::product::AuditRecord
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(skip)]
    pub version: Version,

    pub name: String,
    pub description: String,
    pub price: Money,
    pub stock: u32,
    pub category: Option<String>,
    pub brand: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: ProductStatus,

    /// The seller or admin who created the product. Immutable.
    pub created_by: UserId,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Product {
    fn collection() -> &'static str {
        "products"
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

/// Input for product creation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub stock: u32,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewProduct {
    pub(super) fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation(
                "product name must not be empty".to_string(),
            ));
        }
        if self.price.is_negative() {
            return Err(DomainError::Validation(
                "product price must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub(super) fn into_product(self, created_by: UserId) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(),
            version: Version::default(),
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            category: self.category,
            brand: self.brand,
            images: self.images,
            tags: self.tags,
            status: ProductStatus::default(),
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Allow-list-filtered product update.
///
/// The fields below are exactly the ones a seller may touch. Deserialization
/// silently drops every other key in the request body (permissive-ignore),
/// so `owner`, `created_by`, or any fabricated field can never reach the
/// entity.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Money>,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<ProductStatus>,
}

impl ProductUpdate {
    pub(super) fn validate(&self) -> Result<(), DomainError> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err(DomainError::Validation(
                "product name must not be empty".to_string(),
            ));
        }
        if let Some(price) = self.price
            && price.is_negative()
        {
            return Err(DomainError::Validation(
                "product price must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Applies every present field to the product.
    pub(super) fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(category) = self.category {
            product.category = Some(category);
        }
        if let Some(brand) = self.brand {
            product.brand = Some(brand);
        }
        if let Some(images) = self.images {
            product.images = images;
        }
        if let Some(tags) = self.tags {
            product.tags = tags;
        }
        if let Some(status) = self.status {
            product.status = status;
        }
        product.updated_at = Utc::now();
    }
}

/// Catalog browse query: substring search, price range, sort, pagination.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub min_price: Option<Money>,
    #[serde(default)]
    pub max_price: Option<Money>,
    #[serde(default)]
    pub sort_by: Option<ProductSort>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    10
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            search: None,
            min_price: None,
            max_price: None,
            sort_by: None,
            page: default_page(),
            limit: default_limit(),
        }
    }
}

/// Sort key for catalog listings. Default is newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    Name,
    Price,
}

/// One page of catalog results.
#[derive(Debug, Clone, Serialize)]
pub struct ProductPage {
    pub total: usize,
    pub page: usize,
    pub pages: usize,
    pub products: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        NewProduct {
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price: Money::from_cents(1000),
            stock: 5,
            category: Some("tools".to_string()),
            brand: None,
            images: vec![],
            tags: vec![],
        }
        .into_product(UserId::new())
    }

    #[test]
    fn unknown_keys_are_silently_dropped() {
        let raw = serde_json::json!({
            "name": "Gadget",
            "price": 500,
            "created_by": "attacker",
            "owner": "attacker",
            "ratings": 5
        });

        let update: ProductUpdate = serde_json::from_value(raw).unwrap();
        assert_eq!(update.name.as_deref(), Some("Gadget"));
        assert_eq!(update.price, Some(Money::from_cents(500)));

        let mut p = product();
        let owner = p.created_by;
        update.apply(&mut p);
        assert_eq!(p.name, "Gadget");
        assert_eq!(p.price.cents(), 500);
        // Ownership is untouchable through the update path.
        assert_eq!(p.created_by, owner);
    }

    #[test]
    fn apply_only_touches_present_fields() {
        let mut p = product();
        let update = ProductUpdate {
            stock: Some(42),
            ..Default::default()
        };
        update.apply(&mut p);
        assert_eq!(p.stock, 42);
        assert_eq!(p.name, "Widget");
        assert_eq!(p.price.cents(), 1000);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let bad_name = ProductUpdate {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(bad_name.validate().is_err());

        let bad_price = ProductUpdate {
            price: Some(Money::from_cents(-1)),
            ..Default::default()
        };
        assert!(bad_price.validate().is_err());

        assert!(ProductUpdate::default().validate().is_ok());
    }

    #[test]
    fn new_product_validation() {
        let mut new = NewProduct {
            name: "Widget".to_string(),
            description: String::new(),
            price: Money::from_cents(100),
            stock: 1,
            category: None,
            brand: None,
            images: vec![],
            tags: vec![],
        };
        assert!(new.validate().is_ok());

        new.price = Money::from_cents(-5);
        assert!(new.validate().is_err());
    }

    #[test]
    fn query_defaults() {
        let query: ProductQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert!(query.search.is_none());
    }
}
