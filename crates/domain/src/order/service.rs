//! Order operations behind the authorization gate.
//!
//! Every mutation follows the same pipeline: resolve principal, coarse role
//! check, fetch entity, fine ownership check, mutate, compare-and-swap write.
//! Nothing is read from the store before the coarse check passes.

use doc_store::{Document, DocumentStore};

use common::OrderId;

use super::entity::validate_items;
use super::{
    NewOrder, Order, OrderEdit, OrderError, OrderStatus, OrderTracking, PaymentStatus,
    PriceLookup, StatusUpdate, compute_total,
};
use crate::auth;
use crate::error::DomainError;
use crate::identity::{Principal, Role};

/// Service for managing the order lifecycle.
pub struct OrderService<S, P> {
    store: S,
    prices: P,
}

impl<S, P> OrderService<S, P>
where
    S: DocumentStore + Clone + 'static,
    P: PriceLookup,
{
    /// Creates a new order service.
    pub fn new(store: S, prices: P) -> Self {
        Self { store, prices }
    }

    async fn fetch(&self, order_id: OrderId) -> Result<Order, DomainError> {
        self.store
            .get::<Order>(order_id.as_uuid())
            .await?
            .ok_or(DomainError::NotFound {
                resource: "order",
                id: order_id.to_string(),
            })
    }

    /// Creates an order for the calling customer.
    ///
    /// The total is computed from live product prices; any unresolvable
    /// product aborts creation entirely.
    #[tracing::instrument(skip(self, principal, new_order))]
    pub async fn create_order(
        &self,
        principal: Option<&Principal>,
        new_order: NewOrder,
    ) -> Result<Order, DomainError> {
        let principal = auth::authenticated(principal)?;
        auth::require_role(principal, &[Role::Customer])?;

        validate_items(&new_order.items)?;
        new_order.shipping_address.validate()?;

        let total = compute_total(&new_order.items, &self.prices).await?;

        let mut order = Order::new(
            principal.user_id,
            new_order.items,
            total,
            new_order.shipping_address,
            new_order.payment_method,
        );
        let version = self.store.insert(&order).await?;
        order.set_version(version);

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %order.id, total = %order.total_amount, "order created");
        Ok(order)
    }

    /// Returns the calling principal's own orders, newest first.
    #[tracing::instrument(skip(self, principal))]
    pub async fn my_orders(&self, principal: Option<&Principal>) -> Result<Vec<Order>, DomainError> {
        let principal = auth::authenticated(principal)?;

        let mut orders: Vec<Order> = self
            .store
            .list::<Order>()
            .await?
            .into_iter()
            .filter(|o| o.owner_id == principal.user_id)
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Returns every order, newest first. Admin only.
    #[tracing::instrument(skip(self, principal))]
    pub async fn list_orders(
        &self,
        principal: Option<&Principal>,
    ) -> Result<Vec<Order>, DomainError> {
        let principal = auth::authenticated(principal)?;
        auth::require_role(principal, &[Role::Admin])?;

        let mut orders: Vec<Order> = self.store.list::<Order>().await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Loads a single order for its owner or an admin.
    #[tracing::instrument(skip(self, principal))]
    pub async fn get_order(
        &self,
        principal: Option<&Principal>,
        order_id: OrderId,
    ) -> Result<Order, DomainError> {
        let principal = auth::authenticated(principal)?;

        let order = self.fetch(order_id).await?;
        auth::require_owner_or_role(principal, order.owner_id, &[Role::Admin])?;
        Ok(order)
    }

    /// Read-only tracking projection for the owner or an admin.
    #[tracing::instrument(skip(self, principal))]
    pub async fn track_order(
        &self,
        principal: Option<&Principal>,
        order_id: OrderId,
    ) -> Result<OrderTracking, DomainError> {
        let order = self.get_order(principal, order_id).await?;
        Ok(order.tracking())
    }

    /// Staff-driven status transition (Admin/Seller).
    ///
    /// Applies any table-legal transition and records shipment details when
    /// provided.
    #[tracing::instrument(skip(self, principal, update))]
    pub async fn update_status(
        &self,
        principal: Option<&Principal>,
        order_id: OrderId,
        update: StatusUpdate,
    ) -> Result<Order, DomainError> {
        let principal = auth::authenticated(principal)?;
        auth::require_role(principal, &[Role::Admin, Role::Seller])?;

        let mut order = self.fetch(order_id).await?;
        let from = order.order_status;
        order.transition_to(update.status)?;

        if let Some(tracking_number) = update.tracking_number {
            order.tracking_number = Some(tracking_number);
        }
        if let Some(estimated_delivery) = update.estimated_delivery {
            order.estimated_delivery = Some(estimated_delivery);
        }

        let version = self.store.update(&order).await?;
        order.set_version(version);

        metrics::counter!("order_status_transitions_total").increment(1);
        tracing::info!(order_id = %order.id, %from, to = %update.status, "order status updated");
        Ok(order)
    }

    /// Owner edit of items and/or shipping address.
    ///
    /// Allowed only while the order has never left its initial state.
    /// Replacing items recomputes the total from current prices; a single
    /// unresolvable product aborts the whole edit.
    #[tracing::instrument(skip(self, principal, edit))]
    pub async fn update_my_order(
        &self,
        principal: Option<&Principal>,
        order_id: OrderId,
        edit: OrderEdit,
    ) -> Result<Order, DomainError> {
        let principal = auth::authenticated(principal)?;

        if edit.items.is_none() && edit.shipping_address.is_none() {
            return Err(DomainError::Validation(
                "nothing to update: provide items and/or shipping_address".to_string(),
            ));
        }

        let mut order = self.fetch(order_id).await?;
        if order.owner_id != principal.user_id {
            return Err(DomainError::Forbidden);
        }
        if !order.order_status.can_modify() {
            return Err(OrderError::Locked {
                status: order.order_status,
                action: "edit",
            }
            .into());
        }

        if let Some(items) = edit.items {
            validate_items(&items)?;
            // Recompute before mutating so a failed lookup changes nothing.
            let total = compute_total(&items, &self.prices).await?;
            order.items = items;
            order.total_amount = total;
        }

        if let Some(address) = edit.shipping_address {
            address.validate()?;
            order.shipping_address = address;
        }

        order.touch();
        let version = self.store.update(&order).await?;
        order.set_version(version);

        tracing::info!(order_id = %order.id, total = %order.total_amount, "order edited by owner");
        Ok(order)
    }

    /// Unilateral customer cancellation, time-boxed to before fulfillment.
    #[tracing::instrument(skip(self, principal))]
    pub async fn cancel_my_order(
        &self,
        principal: Option<&Principal>,
        order_id: OrderId,
    ) -> Result<Order, DomainError> {
        let principal = auth::authenticated(principal)?;

        let mut order = self.fetch(order_id).await?;
        if order.owner_id != principal.user_id {
            return Err(DomainError::Forbidden);
        }
        if !order.order_status.customer_can_cancel() {
            return Err(OrderError::Locked {
                status: order.order_status,
                action: "cancel",
            }
            .into());
        }

        order.order_status = OrderStatus::Cancelled;
        order.touch();
        let version = self.store.update(&order).await?;
        order.set_version(version);

        metrics::counter!("orders_cancelled_total").increment(1);
        tracing::info!(order_id = %order.id, "order cancelled by owner");
        Ok(order)
    }

    /// Records the outcome of the external payment-confirmation signal.
    ///
    /// The customer never drives this path; the gate admits the operations
    /// role standing in for the payment collaborator.
    #[tracing::instrument(skip(self, principal))]
    pub async fn record_payment(
        &self,
        principal: Option<&Principal>,
        order_id: OrderId,
        status: PaymentStatus,
    ) -> Result<Order, DomainError> {
        let principal = auth::authenticated(principal)?;
        auth::require_role(principal, &[Role::Admin])?;

        let mut order = self.fetch(order_id).await?;
        if order.order_status.is_terminal() {
            return Err(OrderError::Locked {
                status: order.order_status,
                action: "record payment",
            }
            .into());
        }

        order.payment_status = status;
        order.touch();
        let version = self.store.update(&order).await?;
        order.set_version(version);
        Ok(order)
    }

    /// Hard removal. Admin only; the order keeps no tombstone.
    #[tracing::instrument(skip(self, principal))]
    pub async fn delete_order(
        &self,
        principal: Option<&Principal>,
        order_id: OrderId,
    ) -> Result<(), DomainError> {
        let principal = auth::authenticated(principal)?;
        auth::require_role(principal, &[Role::Admin])?;

        let order = self.fetch(order_id).await?;
        self.store
            .delete::<Order>(order.id.as_uuid(), order.version())
            .await?;

        tracing::info!(order_id = %order.id, "order deleted");
        Ok(())
    }
}
