//! Product catalog operations and the mutate-plus-audit write path.

use doc_store::{Document, DocumentStore};

use common::ProductId;

use super::entity::ProductSort;
use super::{
    AuditPage, AuditQuery, AuditRecord, NewProduct, Product, ProductPage, ProductQuery,
    ProductUpdate,
};
use crate::auth;
use crate::error::DomainError;
use crate::identity::{Principal, Role};

/// Service for managing the product catalog and its audit trail.
pub struct ProductService<S> {
    store: S,
}

impl<S> ProductService<S>
where
    S: DocumentStore + Clone + 'static,
{
    /// Creates a new product service.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn fetch(&self, product_id: ProductId) -> Result<Product, DomainError> {
        self.store
            .get::<Product>(product_id.as_uuid())
            .await?
            .ok_or(DomainError::NotFound {
                resource: "product",
                id: product_id.to_string(),
            })
    }

    /// Adds a product to the catalog (Seller/Admin).
    #[tracing::instrument(skip(self, principal, new_product))]
    pub async fn create_product(
        &self,
        principal: Option<&Principal>,
        new_product: NewProduct,
    ) -> Result<Product, DomainError> {
        let principal = auth::authenticated(principal)?;
        auth::require_role(principal, &[Role::Seller, Role::Admin])?;

        new_product.validate()?;
        let mut product = new_product.into_product(principal.user_id);
        let version = self.store.insert(&product).await?;
        product.set_version(version);

        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }

    /// Loads a product. Public.
    #[tracing::instrument(skip(self))]
    pub async fn get_product(&self, product_id: ProductId) -> Result<Product, DomainError> {
        self.fetch(product_id).await
    }

    /// Browses the catalog. Public.
    #[tracing::instrument(skip(self, query))]
    pub async fn list_products(&self, query: ProductQuery) -> Result<ProductPage, DomainError> {
        if query.limit == 0 {
            return Err(DomainError::Validation("limit must be at least 1".to_string()));
        }
        if query.page == 0 {
            return Err(DomainError::Validation("page numbers start at 1".to_string()));
        }

        let mut products: Vec<Product> = self
            .store
            .list::<Product>()
            .await?
            .into_iter()
            .filter(|p| {
                if let Some(search) = &query.search
                    && !p.name.to_lowercase().contains(&search.to_lowercase())
                {
                    return false;
                }
                if let Some(min) = query.min_price
                    && p.price < min
                {
                    return false;
                }
                if let Some(max) = query.max_price
                    && p.price > max
                {
                    return false;
                }
                true
            })
            .collect();

        match query.sort_by {
            Some(ProductSort::Name) => products.sort_by(|a, b| a.name.cmp(&b.name)),
            Some(ProductSort::Price) => products.sort_by_key(|p| p.price),
            None => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        }

        let total = products.len();
        let pages = total.div_ceil(query.limit);
        let products = products
            .into_iter()
            .skip((query.page - 1) * query.limit)
            .take(query.limit)
            .collect();

        Ok(ProductPage {
            total,
            page: query.page,
            pages,
            products,
        })
    }

    /// Returns the calling seller's own catalog.
    #[tracing::instrument(skip(self, principal))]
    pub async fn seller_products(
        &self,
        principal: Option<&Principal>,
    ) -> Result<Vec<Product>, DomainError> {
        let principal = auth::authenticated(principal)?;
        auth::require_role(principal, &[Role::Seller, Role::Admin])?;

        let mut products: Vec<Product> = self
            .store
            .list::<Product>()
            .await?
            .into_iter()
            .filter(|p| p.created_by == principal.user_id)
            .collect();
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(products)
    }

    /// Updates a product through the allow-list and writes one audit record.
    ///
    /// Mutation and audit are one logical unit: if the audit append fails,
    /// the product write is compensated by restoring the prior snapshot and
    /// the operation fails.
    #[tracing::instrument(skip(self, principal, update))]
    pub async fn update_product(
        &self,
        principal: Option<&Principal>,
        product_id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, DomainError> {
        let principal = auth::authenticated(principal)?;
        auth::require_role(principal, &[Role::Seller, Role::Admin])?;
        update.validate()?;

        let old = self.fetch(product_id).await?;
        if !principal.is_admin() && old.created_by != principal.user_id {
            return Err(DomainError::Forbidden);
        }

        let mut new = old.clone();
        update.apply(&mut new);

        let version = self.store.update(&new).await?;
        new.set_version(version);

        let record = AuditRecord::for_update(&old, &new, Some(principal.user_id))?;
        if let Err(audit_err) = self.store.insert(&record).await {
            self.compensate_update(&old, &new).await;
            return Err(DomainError::Internal(audit_err.to_string()));
        }

        metrics::counter!("product_audit_records_total").increment(1);
        tracing::info!(product_id = %new.id, audit_id = %record.id, "product updated");
        Ok(new)
    }

    /// Deletes a product, leaving its audit history behind.
    #[tracing::instrument(skip(self, principal))]
    pub async fn delete_product(
        &self,
        principal: Option<&Principal>,
        product_id: ProductId,
    ) -> Result<(), DomainError> {
        let principal = auth::authenticated(principal)?;
        auth::require_role(principal, &[Role::Seller, Role::Admin])?;

        let old = self.fetch(product_id).await?;
        if !principal.is_admin() && old.created_by != principal.user_id {
            return Err(DomainError::Forbidden);
        }

        self.store
            .delete::<Product>(old.id.as_uuid(), old.version())
            .await?;

        let record = AuditRecord::for_delete(&old, Some(principal.user_id))?;
        if let Err(audit_err) = self.store.insert(&record).await {
            // Compensation: put the product back so delete-without-audit
            // never sticks. Best effort; a second failure is logged.
            if let Err(restore_err) = self.store.insert(&old).await {
                tracing::error!(
                    product_id = %old.id,
                    error = %restore_err,
                    "failed to restore product after audit append failure"
                );
            }
            return Err(DomainError::Internal(audit_err.to_string()));
        }

        metrics::counter!("product_audit_records_total").increment(1);
        tracing::info!(product_id = %old.id, audit_id = %record.id, "product deleted");
        Ok(())
    }

    /// Reads the audit trail. Admin only.
    #[tracing::instrument(skip(self, principal, query))]
    pub async fn list_audits(
        &self,
        principal: Option<&Principal>,
        query: AuditQuery,
    ) -> Result<AuditPage, DomainError> {
        let principal = auth::authenticated(principal)?;
        auth::require_role(principal, &[Role::Admin])?;

        if query.limit == 0 {
            return Err(DomainError::Validation("limit must be at least 1".to_string()));
        }
        if query.page == 0 {
            return Err(DomainError::Validation("page numbers start at 1".to_string()));
        }

        let mut records: Vec<AuditRecord> = self
            .store
            .list::<AuditRecord>()
            .await?
            .into_iter()
            .filter(|r| {
                if let Some(product_id) = query.product_id
                    && r.product_id != product_id
                {
                    return false;
                }
                if let Some(updated_by) = query.updated_by
                    && r.updated_by != Some(updated_by)
                {
                    return false;
                }
                true
            })
            .collect();
        records.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));

        let total = records.len();
        let pages = total.div_ceil(query.limit);
        let records = records
            .into_iter()
            .skip((query.page - 1) * query.limit)
            .take(query.limit)
            .collect();

        Ok(AuditPage {
            total,
            page: query.page,
            pages,
            records,
        })
    }

    /// Rolls a product back to its pre-update snapshot after a failed audit
    /// append. Best effort; a lost race here means another writer has moved
    /// the product on, and their write wins.
    async fn compensate_update(&self, old: &Product, new: &Product) {
        let mut rollback = old.clone();
        rollback.set_version(new.version());
        if let Err(restore_err) = self.store.update(&rollback).await {
            tracing::error!(
                product_id = %old.id,
                error = %restore_err,
                "failed to roll back product after audit append failure"
            );
        }
    }
}
