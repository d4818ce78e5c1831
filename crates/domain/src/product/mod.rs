//! Product catalog, allow-list mutation, and the append-only audit trail.

mod audit;
mod entity;
mod service;

pub use audit::{AuditAction, AuditPage, AuditQuery, AuditRecord};
pub use entity::{
    NewProduct, Product, ProductPage, ProductQuery, ProductSort, ProductStatus, ProductUpdate,
};
pub use service::ProductService;
