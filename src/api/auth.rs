use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use super::ApiJson;
use crate::domain::DomainError;
use crate::infrastructure::auth::AuthUser;
use crate::infrastructure::seed::DefaultData;
use crate::infrastructure::AppState;
use crate::services::tenant_service::{self, LoginInput, RegisterAdminInput};

/// Register an admin together with its farm
#[utoipa::path(
    post,
    path = "/api/auth/register",
    responses(
        (status = 201, description = "Admin and farm created"),
        (status = 422, description = "Invalid or duplicate fields")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RegisterAdminInput>,
) -> Result<impl IntoResponse, DomainError> {
    let registered =
        tenant_service::register_admin(state.db(), input, &DefaultData::standard()).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Account and farm created",
            "user": registered.user,
            "farm": registered.farm,
        })),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    responses(
        (status = 200, description = "Bearer token issued"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LoginInput>,
) -> Result<impl IntoResponse, DomainError> {
    let logged_in = tenant_service::login(state.db(), &state.tokens, input).await?;
    Ok(Json(logged_in))
}

pub async fn me(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, DomainError> {
    let user = tenant_service::current_user(state.db(), &principal).await?;
    Ok(Json(user))
}
