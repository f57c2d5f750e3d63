use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::{ApiJson, ApiPath};
use crate::domain::DomainError;
use crate::infrastructure::auth::AuthUser;
use crate::infrastructure::AppState;
use crate::services::boat_service::{self, BoatInput};

pub async fn list_boats(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(boat_service::list(state.db(), &principal).await?))
}

pub async fn get_boat(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(boat_service::get(state.db(), &principal, id).await?))
}

pub async fn create_boat(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiJson(input): ApiJson<BoatInput>,
) -> Result<impl IntoResponse, DomainError> {
    let created = boat_service::create(state.db(), &principal, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_boat(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<BoatInput>,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(boat_service::update(state.db(), &principal, id, input).await?))
}

pub async fn delete_boat(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, DomainError> {
    boat_service::delete(state.db(), &principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
