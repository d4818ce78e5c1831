//! HTTP API server with observability for the marketplace backend.
//!
//! Provides REST endpoints for orders, products, audits, and users,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use doc_store::DocumentStore;
use domain::{
    CatalogPriceLookup, CredentialResolver, OrderService, ProductService, UserService,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: DocumentStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create::<S>))
        .route("/orders", get(routes::orders::list::<S>))
        .route("/orders/my-orders", get(routes::orders::mine::<S>))
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .route("/orders/track/{id}", get(routes::orders::track::<S>))
        .route("/orders/{id}", put(routes::orders::update_status::<S>))
        .route("/orders/update/{id}", put(routes::orders::update_mine::<S>))
        .route("/orders/cancel/{id}", put(routes::orders::cancel::<S>))
        .route("/orders/payment/{id}", put(routes::orders::payment::<S>))
        .route("/orders/{id}", delete(routes::orders::delete::<S>))
        .route("/products", post(routes::products::create::<S>))
        .route("/products", get(routes::products::list::<S>))
        .route("/products/seller", get(routes::products::seller::<S>))
        .route("/products/{id}", get(routes::products::get::<S>))
        .route("/products/{id}", put(routes::products::update::<S>))
        .route("/products/{id}", delete(routes::products::delete::<S>))
        .route("/audits", get(routes::audits::list::<S>))
        .route("/users", post(routes::users::create::<S>))
        .route("/users/{id}", get(routes::users::get::<S>))
        .route("/users/{id}", put(routes::users::update::<S>))
        .route("/users/role/{id}", put(routes::users::update_role::<S>))
        .route("/users/{id}", delete(routes::users::delete::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state from a document store and credential resolver.
pub fn create_default_state<S: DocumentStore + Clone + 'static>(
    store: S,
    resolver: Arc<dyn CredentialResolver>,
) -> Arc<AppState<S>> {
    let prices = CatalogPriceLookup::new(store.clone());
    Arc::new(AppState {
        orders: OrderService::new(store.clone(), prices),
        products: ProductService::new(store.clone()),
        users: UserService::new(store),
        resolver,
    })
}
