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
use crate::services::customer_service::{self, CustomerInput};

pub async fn list_customers(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(customer_service::list(state.db(), &principal).await?))
}

pub async fn get_customer(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(customer_service::get(state.db(), &principal, id).await?))
}

pub async fn create_customer(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiJson(input): ApiJson<CustomerInput>,
) -> Result<impl IntoResponse, DomainError> {
    let created = customer_service::create(state.db(), &principal, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_customer(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<CustomerInput>,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(customer_service::update(state.db(), &principal, id, input).await?))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, DomainError> {
    customer_service::delete(state.db(), &principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
