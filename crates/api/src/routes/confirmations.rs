//! Mounted at `/confirmations` by `api_routes()`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::confirmations;
use crate::state::AppState;

/// ```text
/// GET    /                 -> list_pending
/// POST   /{id}/confirm     -> confirm
/// POST   /{id}/decline     -> decline
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(confirmations::list_pending))
        .route("/{id}/confirm", post(confirmations::confirm))
        .route("/{id}/decline", post(confirmations::decline))
}
