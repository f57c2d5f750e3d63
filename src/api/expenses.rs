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
use crate::services::expense_service::{self, ExpenseInput};

pub async fn list_expenses(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(expense_service::list(state.db(), &principal).await?))
}

pub async fn get_expense(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(expense_service::get(state.db(), &principal, id).await?))
}

pub async fn create_expense(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiJson(input): ApiJson<ExpenseInput>,
) -> Result<impl IntoResponse, DomainError> {
    let created = expense_service::create(state.db(), &principal, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_expense(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<ExpenseInput>,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(expense_service::update(state.db(), &principal, id, input).await?))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, DomainError> {
    expense_service::delete(state.db(), &principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_expense_types(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(
        expense_service::list_expense_types(state.db(), &principal).await?,
    ))
}
