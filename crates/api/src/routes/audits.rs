//! Product audit trail endpoints (admin only).

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use doc_store::DocumentStore;
use domain::{AuditPage, AuditQuery};
use serde::Serialize;

use super::orders::AppState;
use super::resolve_principal;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct AuditListResponse {
    pub success: bool,
    #[serde(flatten)]
    pub page: AuditPage,
}

/// GET /audits — read the audit trail, filterable by product or actor.
#[tracing::instrument(skip(state, headers, query))]
pub async fn list<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Query(query): Query<AuditQuery>,
) -> Result<Json<AuditListResponse>, ApiError> {
    let principal = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let page = state.products.list_audits(principal.as_ref(), query).await?;
    Ok(Json(AuditListResponse {
        success: true,
        page,
    }))
}
