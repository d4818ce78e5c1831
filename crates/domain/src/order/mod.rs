//! Order entity, lifecycle state machine, and total computation.

mod entity;
mod pricing;
mod service;
mod status;

pub use entity::{
    NewOrder, Order, OrderEdit, OrderItem, OrderTracking, PaymentMethod, PaymentStatus,
    ShippingAddress, StatusUpdate,
};
pub use pricing::{CatalogPriceLookup, PriceLookup, compute_total};
pub use service::OrderService;
pub use status::OrderStatus;

use thiserror::Error;

use common::ProductId;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The requested status change is not in the transition table.
    #[error("invalid order status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// The order left its initial state and can no longer be changed this way.
    #[error("order is locked: cannot {action} once {status}")]
    Locked {
        status: OrderStatus,
        action: &'static str,
    },

    /// An order must contain at least one item.
    #[error("order must contain at least one item")]
    NoItems,

    /// Item quantities start at one.
    #[error("invalid quantity {quantity} (must be at least 1)")]
    InvalidQuantity { quantity: u32 },

    /// A referenced product could not be resolved; the whole operation aborts.
    #[error("product not found: {product_id}")]
    ProductNotFound { product_id: ProductId },
}
