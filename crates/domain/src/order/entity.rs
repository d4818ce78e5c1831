//! Order entity and its value objects.

use chrono::{DateTime, Utc};
use doc_store::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::{Money, OrderId, ProductId, UserId, Version};

use super::{OrderError, OrderStatus};
use crate::error::DomainError;

/// A line in an order: a product reference and how many of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl OrderItem {
    /// Creates a new order item.
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Structured delivery address. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingAddress {
    /// Rejects addresses with any blank field.
    pub fn validate(&self) -> Result<(), DomainError> {
        let fields = [
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("postal_code", &self.postal_code),
            ("country", &self.country),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(DomainError::Validation(format!(
                    "shipping address field '{name}' must not be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Outcome of the external payment-confirmation signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    DebitCard,
    CreditCard,
    Upi,
    NetBanking,
    #[default]
    CashOnDelivery,
}

/// The order aggregate.
///
/// `total_amount` is derived at creation from live product prices and stored;
/// a later price change on a product does not retroactively change it. The
/// `version` field makes every write a compare-and-swap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(skip)]
    pub version: Version,

    /// The customer who created the order. Immutable.
    pub owner_id: UserId,

    pub items: Vec<OrderItem>,
    pub total_amount: Money,
    pub shipping_address: ShippingAddress,

    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,

    pub order_status: OrderStatus,

    pub tracking_number: Option<String>,
    pub estimated_delivery: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new order in the initial state.
    ///
    /// Items and address are assumed validated; the total is the one computed
    /// from live prices at this moment.
    pub fn new(
        owner_id: UserId,
        items: Vec<OrderItem>,
        total_amount: Money,
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: OrderId::new(),
            version: Version::default(),
            owner_id,
            items,
            total_amount,
            shipping_address,
            payment_status: PaymentStatus::Pending,
            payment_method,
            order_status: OrderStatus::Processing,
            tracking_number: None,
            estimated_delivery: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a status transition, enforcing the transition table.
    pub fn transition_to(&mut self, to: OrderStatus) -> Result<(), OrderError> {
        if !self.order_status.can_transition_to(to) {
            return Err(OrderError::InvalidTransition {
                from: self.order_status,
                to,
            });
        }
        self.order_status = to;
        self.touch();
        Ok(())
    }

    /// Bumps the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Read-only projection exposed to the owning customer.
    pub fn tracking(&self) -> OrderTracking {
        OrderTracking {
            order_status: self.order_status,
            updated_at: self.updated_at,
        }
    }
}

impl Document for Order {
    fn collection() -> &'static str {
        "orders"
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

/// Validates an item set for creation or replacement.
pub(super) fn validate_items(items: &[OrderItem]) -> Result<(), OrderError> {
    if items.is_empty() {
        return Err(OrderError::NoItems);
    }
    for item in items {
        if item.quantity == 0 {
            return Err(OrderError::InvalidQuantity {
                quantity: item.quantity,
            });
        }
    }
    Ok(())
}

// -- Operation payloads --

/// Input for order creation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// Staff-driven status transition, optionally carrying shipment details.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub estimated_delivery: Option<DateTime<Utc>>,
}

/// Owner edit of an unshipped order. At least one field must be present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderEdit {
    #[serde(default)]
    pub items: Option<Vec<OrderItem>>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
}

/// Read-only tracking projection.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OrderTracking {
    pub order_status: OrderStatus,
    pub updated_at: DateTime<Utc>,
}
