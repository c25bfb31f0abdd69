//! Application router configuration and endpoint path definitions.

mod categories;
mod transactions;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::{AppState, auth, logging::logging_middleware, response::ApiResponse};

/// The route paths served by the application.
pub mod endpoints {
    /// Health check, open to unauthenticated callers.
    pub const HEALTH: &str = "/api/health";
    /// Account registration.
    pub const REGISTER: &str = "/api/auth/register";
    /// Sign in and receive a bearer token.
    pub const LOG_IN: &str = "/api/auth/login";
    /// The authenticated user's profile.
    pub const ME: &str = "/api/auth/me";
    /// Update the authenticated user's profile.
    pub const PROFILE: &str = "/api/auth/profile";
    /// List and create categories.
    pub const CATEGORIES: &str = "/api/categories";
    /// Update and delete a single category.
    pub const CATEGORY: &str = "/api/categories/{id}";
    /// Batch reorder of categories.
    pub const CATEGORY_ORDER: &str = "/api/categories/order";
    /// List and create transactions.
    pub const TRANSACTIONS: &str = "/api/transactions";
    /// Fetch, update and delete a single transaction.
    pub const TRANSACTION: &str = "/api/transactions/{id}";
    /// Aggregate statistics over the authenticated user's transactions.
    pub const TRANSACTION_STATISTICS: &str = "/api/transactions/statistics";
}

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::REGISTER, post(auth::register))
        .route(endpoints::LOG_IN, post(auth::login))
        .route(endpoints::ME, get(auth::get_current_user))
        .route(endpoints::PROFILE, put(auth::update_profile))
        .route(
            endpoints::CATEGORIES,
            get(categories::list_categories).post(categories::create_category),
        )
        .route(endpoints::CATEGORY_ORDER, post(categories::reorder_categories))
        .route(
            endpoints::CATEGORY,
            put(categories::update_category).delete(categories::delete_category),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(transactions::list_transactions).post(transactions::create_transaction),
        )
        .route(
            endpoints::TRANSACTION_STATISTICS,
            get(transactions::get_statistics),
        )
        .route(
            endpoints::TRANSACTION,
            get(transactions::get_transaction)
                .put(transactions::update_transaction)
                .delete(transactions::delete_transaction),
        )
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// Confirm the API is up without touching the database.
async fn get_health() -> ApiResponse<()> {
    ApiResponse::message("API is running")
}
