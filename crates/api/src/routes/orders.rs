//! Order lifecycle endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use common::OrderId;
use doc_store::DocumentStore;
use domain::{
    CatalogPriceLookup, CredentialResolver, NewOrder, Order, OrderEdit, OrderService,
    OrderTracking, PaymentStatus, ProductService, StatusUpdate, UserService,
};
use serde::{Deserialize, Serialize};

use super::resolve_principal;
use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: DocumentStore + Clone + 'static> {
    pub orders: OrderService<S, CatalogPriceLookup<S>>,
    pub products: ProductService<S>,
    pub users: UserService<S>,
    pub resolver: Arc<dyn CredentialResolver>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct PaymentRequest {
    pub payment_status: PaymentStatus,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub success: bool,
    pub order: Order,
}

#[derive(Serialize)]
pub struct OrderListResponse {
    pub success: bool,
    pub orders: Vec<Order>,
}

#[derive(Serialize)]
pub struct TrackingResponse {
    pub success: bool,
    #[serde(flatten)]
    pub tracking: OrderTracking,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

pub(super) fn parse_order_id(raw: &str) -> Result<OrderId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid order id: {raw}")))
}

// -- Handlers --

/// POST /orders — place a new order.
#[tracing::instrument(skip(state, headers, req))]
pub async fn create<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<NewOrder>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let principal = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let order = state.orders.create_order(principal.as_ref(), req).await?;
    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            success: true,
            order,
        }),
    ))
}

/// GET /orders — list every order (admin).
#[tracing::instrument(skip(state, headers))]
pub async fn list<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<OrderListResponse>, ApiError> {
    let principal = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let orders = state.orders.list_orders(principal.as_ref()).await?;
    Ok(Json(OrderListResponse {
        success: true,
        orders,
    }))
}

/// GET /orders/my-orders — the caller's own orders.
#[tracing::instrument(skip(state, headers))]
pub async fn mine<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<OrderListResponse>, ApiError> {
    let principal = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let orders = state.orders.my_orders(principal.as_ref()).await?;
    Ok(Json(OrderListResponse {
        success: true,
        orders,
    }))
}

/// GET /orders/:id — load one order (owner or admin).
#[tracing::instrument(skip(state, headers))]
pub async fn get<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let principal = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let order_id = parse_order_id(&id)?;
    let order = state.orders.get_order(principal.as_ref(), order_id).await?;
    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}

/// GET /orders/track/:id — trimmed tracking view for the owner.
#[tracing::instrument(skip(state, headers))]
pub async fn track<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<TrackingResponse>, ApiError> {
    let principal = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let order_id = parse_order_id(&id)?;
    let tracking = state
        .orders
        .track_order(principal.as_ref(), order_id)
        .await?;
    Ok(Json(TrackingResponse {
        success: true,
        tracking,
    }))
}

/// PUT /orders/:id — advance the order status (staff).
#[tracing::instrument(skip(state, headers, update))]
pub async fn update_status<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<OrderResponse>, ApiError> {
    let principal = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let order_id = parse_order_id(&id)?;
    let order = state
        .orders
        .update_status(principal.as_ref(), order_id, update)
        .await?;
    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}

/// PUT /orders/update/:id — edit items or address while still processing.
#[tracing::instrument(skip(state, headers, edit))]
pub async fn update_mine<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(edit): Json<OrderEdit>,
) -> Result<Json<OrderResponse>, ApiError> {
    let principal = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let order_id = parse_order_id(&id)?;
    let order = state
        .orders
        .update_my_order(principal.as_ref(), order_id, edit)
        .await?;
    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}

/// PUT /orders/cancel/:id — owner cancels a processing order.
#[tracing::instrument(skip(state, headers))]
pub async fn cancel<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let principal = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let order_id = parse_order_id(&id)?;
    let order = state
        .orders
        .cancel_my_order(principal.as_ref(), order_id)
        .await?;
    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}

/// PUT /orders/payment/:id — record a payment status signal (admin).
#[tracing::instrument(skip(state, headers, req))]
pub async fn payment<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<PaymentRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let principal = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let order_id = parse_order_id(&id)?;
    let order = state
        .orders
        .record_payment(principal.as_ref(), order_id, req.payment_status)
        .await?;
    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}

/// DELETE /orders/:id — hard delete (admin).
#[tracing::instrument(skip(state, headers))]
pub async fn delete<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let principal = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let order_id = parse_order_id(&id)?;
    state
        .orders
        .delete_order(principal.as_ref(), order_id)
        .await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "order deleted".to_string(),
    }))
}
