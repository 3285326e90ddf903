//! Route definitions for customer, service and letterhead master data.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{customers, provider, services};
use crate::state::AppState;

/// Mounted at `/customers`.
pub fn customer_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/{id}",
            put(customers::update_customer).delete(customers::delete_customer),
        )
}

/// Mounted at `/services`. Price changes answer 202.
pub fn service_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(services::list_services).post(services::create_service),
        )
        .route(
            "/{id}",
            put(services::update_service).delete(services::delete_service),
        )
}

/// Mounted at `/provider`. Saving requires `manage_users`.
pub fn provider_router() -> Router<AppState> {
    Router::new().route("/", get(provider::get_provider).put(provider::update_provider))
}
