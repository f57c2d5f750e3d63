use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use super::{ApiJson, ApiPath};
use crate::domain::DomainError;
use crate::infrastructure::auth::AuthUser;
use crate::infrastructure::AppState;
use crate::services::farm_service::{self, FarmInput, FarmUpdate, StaffInput};

pub async fn list_farms(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(farm_service::list_farms(state.db(), &principal).await?))
}

pub async fn get_farm(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(farm_service::get_farm(state.db(), &principal, id).await?))
}

pub async fn create_farm(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiJson(input): ApiJson<FarmInput>,
) -> Result<impl IntoResponse, DomainError> {
    let farm = farm_service::create_farm(state.db(), &principal, input).await?;
    Ok((StatusCode::CREATED, Json(farm)))
}

pub async fn update_farm(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<FarmUpdate>,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(
        farm_service::update_farm(state.db(), &principal, id, input).await?,
    ))
}

pub async fn delete_farm(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, DomainError> {
    farm_service::delete_farm(state.db(), &principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_staff(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<StaffInput>,
) -> Result<impl IntoResponse, DomainError> {
    let staff = farm_service::add_staff(state.db(), &principal, id, input.user_id).await?;
    Ok(Json(json!({ "message": "Staff added", "staff": staff })))
}

pub async fn remove_staff(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<StaffInput>,
) -> Result<impl IntoResponse, DomainError> {
    farm_service::remove_staff(state.db(), &principal, id, input.user_id).await?;
    Ok(Json(json!({ "message": "Staff removed" })))
}
