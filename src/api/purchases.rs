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
use crate::services::purchase_service::{self, PurchaseInput, PurchaseUpdate};

pub async fn list_purchases(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(purchase_service::list(state.db(), &principal).await?))
}

/// Boats and product types to pick from when recording a purchase
pub async fn purchase_options(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(purchase_service::options(state.db(), &principal).await?))
}

pub async fn get_purchase(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(purchase_service::get(state.db(), &principal, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/purchases",
    responses(
        (status = 201, description = "Purchase recorded, total computed from weight and unit price"),
        (status = 403, description = "Caller has no farm"),
        (status = 422, description = "Invalid amounts or references")
    )
)]
pub async fn create_purchase(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiJson(input): ApiJson<PurchaseInput>,
) -> Result<impl IntoResponse, DomainError> {
    let purchase = purchase_service::create(state.db(), &principal, input).await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

pub async fn update_purchase(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<PurchaseUpdate>,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(
        purchase_service::update(state.db(), &principal, id, input).await?,
    ))
}

pub async fn delete_purchase(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, DomainError> {
    purchase_service::delete(state.db(), &principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
