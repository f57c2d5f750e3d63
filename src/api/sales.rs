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
use crate::services::sale_service::{self, PaymentStatusInput, SaleInput, SaleUpdate};

pub async fn list_sales(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(sale_service::list(state.db(), &principal).await?))
}

pub async fn get_sale(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(sale_service::get(state.db(), &principal, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/sales",
    responses(
        (status = 201, description = "Sale recorded, total computed from weight and unit price"),
        (status = 403, description = "Caller has no farm"),
        (status = 422, description = "Invalid amounts, status or references")
    )
)]
pub async fn create_sale(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiJson(input): ApiJson<SaleInput>,
) -> Result<impl IntoResponse, DomainError> {
    let sale = sale_service::create(state.db(), &principal, input).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn update_sale(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<SaleUpdate>,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(sale_service::update(state.db(), &principal, id, input).await?))
}

pub async fn update_payment_status(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<PaymentStatusInput>,
) -> Result<impl IntoResponse, DomainError> {
    let sale =
        sale_service::update_payment_status(state.db(), &principal, id, input.payment_status)
            .await?;
    Ok(Json(sale))
}

pub async fn delete_sale(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, DomainError> {
    sale_service::delete(state.db(), &principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
