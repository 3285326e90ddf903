//! Route definitions for materials, stock movements and the dashboard.
//!
//! Mounted at `/inventory` by `api_routes()`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{dashboard, inventory};
use crate::state::AppState;

/// ```text
/// GET    /materials                 -> list_materials
/// POST   /materials                 -> create_material
/// PUT    /materials/{id}            -> update_material
/// DELETE /materials/{id}            -> delete_material (202)
/// POST   /materials/{id}/movements  -> post_movement (201 or 202)
/// GET    /logs                      -> list_logs
/// GET    /logs/export               -> export_logs (CSV)
/// GET    /dashboard                 -> dashboard
/// GET    /dashboard/report          -> printable_report (HTML)
/// GET    /report                    -> stock_report (HTML)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/materials",
            get(inventory::list_materials).post(inventory::create_material),
        )
        .route(
            "/materials/{id}",
            put(inventory::update_material).delete(inventory::delete_material),
        )
        .route("/materials/{id}/movements", post(inventory::post_movement))
        .route("/logs", get(inventory::list_logs))
        .route("/logs/export", get(inventory::export_logs))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/dashboard/report", get(dashboard::printable_report))
        .route("/report", get(dashboard::stock_report))
}
