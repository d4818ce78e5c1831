//! User account endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use common::UserId;
use doc_store::DocumentStore;
use domain::{NewUser, ProfileUpdate, Role, User};
use serde::{Deserialize, Serialize};

use super::orders::AppState;
use super::resolve_principal;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct RoleRequest {
    pub role: Role,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: User,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid user id: {raw}")))
}

/// POST /users — provision an account (admin).
#[tracing::instrument(skip(state, headers, req))]
pub async fn create<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<NewUser>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let principal = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let user = state.users.create_user(principal.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(UserResponse { success: true, user })))
}

/// GET /users/:id — load an account (self or admin).
#[tracing::instrument(skip(state, headers))]
pub async fn get<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let principal = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let user_id = parse_user_id(&id)?;
    let user = state.users.get_user(principal.as_ref(), user_id).await?;
    Ok(Json(UserResponse { success: true, user }))
}

/// PUT /users/:id — update profile fields (self or admin).
#[tracing::instrument(skip(state, headers, update))]
pub async fn update<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    let principal = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let user_id = parse_user_id(&id)?;
    let user = state
        .users
        .update_profile(principal.as_ref(), user_id, update)
        .await?;
    Ok(Json(UserResponse { success: true, user }))
}

/// PUT /users/role/:id — change an account's role (admin).
#[tracing::instrument(skip(state, headers, req))]
pub async fn update_role<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<RoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let principal = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let user_id = parse_user_id(&id)?;
    let user = state
        .users
        .update_role(principal.as_ref(), user_id, req.role)
        .await?;
    Ok(Json(UserResponse { success: true, user }))
}

/// DELETE /users/:id — remove an account (self or admin).
#[tracing::instrument(skip(state, headers))]
pub async fn delete<S: DocumentStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let principal = resolve_principal(state.resolver.as_ref(), &headers).await?;
    let user_id = parse_user_id(&id)?;
    state.users.delete_user(principal.as_ref(), user_id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "user deleted".to_string(),
    }))
}
