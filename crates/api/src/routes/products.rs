//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use common::ProductId;
use doc_store::DocumentStore;
use domain::{NewProduct, Product, ProductPage, ProductQuery, ProductUpdate};
use serde::Serialize;

use super::orders::AppState;
use super::resolve_principal;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: Product,
}

#[derive(Serialize)]
pub struct ProductListResponse {
    pub success: bool,
    pub products: Vec<Product>,
}

#[derive(Serialize)]
pub struct CatalogResponse {
    pub success: bool,
    #[serde(flatten)]
    pub page: ProductPage,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid product id: {raw}")))
}

/// POST /products — list a new product (seller or admin).
#[tracing::instrument(skip(state, headers, req))]
pub async fn create<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<NewProduct>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let principal = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let product = state
        .products
        .create_product(principal.as_ref(), req)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            success: true,
            product,
        }),
    ))
}

/// GET /products — browse the catalog with search, price filters, and paging.
///
/// Anonymous access is fine, but a credential that is present and bogus is
/// still rejected.
#[tracing::instrument(skip(state, headers, query))]
pub async fn list<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Query(query): Query<ProductQuery>,
) -> Result<Json<CatalogResponse>, ApiError> {
    let _ = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let page = state.products.list_products(query).await?;
    Ok(Json(CatalogResponse {
        success: true,
        page,
    }))
}

/// GET /products/seller — the caller's own listings.
#[tracing::instrument(skip(state, headers))]
pub async fn seller<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<ProductListResponse>, ApiError> {
    let principal = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let products = state.products.seller_products(principal.as_ref()).await?;
    Ok(Json(ProductListResponse {
        success: true,
        products,
    }))
}

/// GET /products/:id — load one product. Public.
#[tracing::instrument(skip(state, headers))]
pub async fn get<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError> {
    let _ = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let product_id = parse_product_id(&id)?;
    let product = state.products.get_product(product_id).await?;
    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}

/// PUT /products/:id — apply an allow-listed update and record an audit entry.
#[tracing::instrument(skip(state, headers, update))]
pub async fn update<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<ProductUpdate>,
) -> Result<Json<ProductResponse>, ApiError> {
    let principal = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let product_id = parse_product_id(&id)?;
    let product = state
        .products
        .update_product(principal.as_ref(), product_id, update)
        .await?;
    Ok(Json(ProductResponse {
        success: true,
        product,
    }))
}

/// DELETE /products/:id — remove a listing, keeping its audit trail.
#[tracing::instrument(skip(state, headers))]
pub async fn delete<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let principal = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let product_id = parse_product_id(&id)?;
    state
        .products
        .delete_product(principal.as_ref(), product_id)
        .await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "product deleted".to_string(),
    }))
}
