use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use super::ApiQuery;
use crate::domain::reports::DateRange;
use crate::domain::DomainError;
use crate::infrastructure::auth::AuthUser;
use crate::infrastructure::AppState;
use crate::services::report_service;

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl RangeQuery {
    /// Missing bounds default to the current month
    fn resolve(&self) -> Result<DateRange, DomainError> {
        DateRange::resolve(self.start_date, self.end_date, today())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[utoipa::path(
    get,
    path = "/api/reports/dashboard",
    responses(
        (status = 200, description = "Today and this month at a glance"),
        (status = 403, description = "Caller has no farm")
    )
)]
pub async fn dashboard(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(
        report_service::dashboard(state.ledger.as_ref(), &principal, today()).await?,
    ))
}

pub async fn revenue(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiQuery(query): ApiQuery<RangeQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let range = query.resolve()?;
    Ok(Json(
        report_service::revenue(state.ledger.as_ref(), &principal, range).await?,
    ))
}

pub async fn expenses(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiQuery(query): ApiQuery<RangeQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let range = query.resolve()?;
    Ok(Json(
        report_service::expenses(state.ledger.as_ref(), &principal, range).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/reports/profit",
    params(
        ("start_date" = Option<String>, Query, description = "First day, YYYY-MM-DD"),
        ("end_date" = Option<String>, Query, description = "Last day, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Period totals and one row per day"),
        (status = 422, description = "end_date before start_date")
    )
)]
pub async fn profit(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    ApiQuery(query): ApiQuery<RangeQuery>,
) -> Result<impl IntoResponse, DomainError> {
    let range = query.resolve()?;
    Ok(Json(
        report_service::profit(state.ledger.as_ref(), &principal, range).await?,
    ))
}

pub async fn debts(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<impl IntoResponse, DomainError> {
    Ok(Json(
        report_service::debts(state.ledger.as_ref(), &principal).await?,
    ))
}
