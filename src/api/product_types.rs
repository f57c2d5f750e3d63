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
use crate::services::product_type_service::{self, ProductTypeInput};

pub async fn list_product_types(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(product_type_service::list(state.db(), &principal).await?))
}

pub async fn get_product_type(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(product_type_service::get(state.db(), &principal, id).await?))
}

pub async fn create_product_type(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiJson(input): ApiJson<ProductTypeInput>,
) -> Result<impl IntoResponse, DomainError> {
    let created = product_type_service::create(state.db(), &principal, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_product_type(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<ProductTypeInput>,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(product_type_service::update(state.db(), &principal, id, input).await?))
}

pub async fn delete_product_type(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, DomainError> {
    product_type_service::delete(state.db(), &principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
