//! Domain layer for the marketplace backend.
//!
//! This crate provides the core business logic:
//! - Principal and role model with a pluggable credential resolver
//! - A pure authorization gate applied before any entity lookup
//! - The order entity, its derived total, and the lifecycle state machine
//! - Product mutation with allow-list filtering and an append-only audit trail
//! - User profile operations exercising the self-or-admin scope

pub mod auth;
pub mod error;
pub mod identity;
pub mod order;
pub mod product;
pub mod user;

pub use error::DomainError;
pub use identity::{AuthError, CredentialResolver, Principal, Role, StaticTokenResolver};
pub use order::{
    CatalogPriceLookup, NewOrder, Order, OrderEdit, OrderError, OrderItem, OrderService,
    OrderStatus, OrderTracking, PaymentMethod, PaymentStatus, PriceLookup, ShippingAddress,
    StatusUpdate, compute_total,
};
pub use product::{
    AuditAction, AuditPage, AuditQuery, AuditRecord, NewProduct, Product, ProductPage,
    ProductQuery, ProductService, ProductSort, ProductStatus, ProductUpdate,
};
pub use user::{NewUser, ProfileUpdate, User, UserService};
