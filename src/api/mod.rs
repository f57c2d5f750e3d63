pub mod auth;
pub mod boats;
pub mod customers;
pub mod error;
pub mod expenses;
pub mod farms;
pub mod health;
pub mod product_types;
pub mod purchases;
pub mod reports;
pub mod sales;

use axum::{
    extract::{FromRequest, FromRequestParts},
    routing::{get, patch, post},
    Router,
};

use crate::domain::DomainError;
use crate::infrastructure::AppState;

/// `axum::Json` whose rejection is a field-keyed validation error
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(DomainError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor with the same 422 rejection as `ApiJson`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(DomainError))]
pub struct ApiQuery<T>(pub T);

/// Path extractor; a non-numeric id is a validation error, not a plain 400
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(DomainError))]
pub struct ApiPath<T>(pub T);

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Farms
        .route("/farms", get(farms::list_farms).post(farms::create_farm))
        .route(
            "/farms/:id",
            get(farms::get_farm)
                .put(farms::update_farm)
                .delete(farms::delete_farm),
        )
        .route("/farms/:id/add-staff", post(farms::add_staff))
        .route("/farms/:id/remove-staff", post(farms::remove_staff))
        // Boats
        .route("/boats", get(boats::list_boats).post(boats::create_boat))
        .route(
            "/boats/:id",
            get(boats::get_boat)
                .put(boats::update_boat)
                .delete(boats::delete_boat),
        )
        // Customers
        .route(
            "/customers",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/customers/:id",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        // Product types
        .route(
            "/product-types",
            get(product_types::list_product_types).post(product_types::create_product_type),
        )
        .route(
            "/product-types/:id",
            get(product_types::get_product_type)
                .put(product_types::update_product_type)
                .delete(product_types::delete_product_type),
        )
        // Purchases
        .route(
            "/purchases",
            get(purchases::list_purchases).post(purchases::create_purchase),
        )
        .route("/purchases/options", get(purchases::purchase_options))
        .route(
            "/purchases/:id",
            get(purchases::get_purchase)
                .put(purchases::update_purchase)
                .delete(purchases::delete_purchase),
        )
        // Sales
        .route("/sales", get(sales::list_sales).post(sales::create_sale))
        .route(
            "/sales/:id",
            get(sales::get_sale)
                .put(sales::update_sale)
                .delete(sales::delete_sale),
        )
        .route(
            "/sales/:id/payment-status",
            patch(sales::update_payment_status),
        )
        // Expenses
        .route(
            "/expenses",
            get(expenses::list_expenses).post(expenses::create_expense),
        )
        .route(
            "/expenses/:id",
            get(expenses::get_expense)
                .put(expenses::update_expense)
                .delete(expenses::delete_expense),
        )
        .route("/expense-types", get(expenses::list_expense_types))
        // Reports
        .route("/reports/dashboard", get(reports::dashboard))
        .route("/reports/revenue", get(reports::revenue))
        .route("/reports/expenses", get(reports::expenses))
        .route("/reports/profit", get(reports::profit))
        .route("/reports/debts", get(reports::debts))
        .with_state(state)
}
