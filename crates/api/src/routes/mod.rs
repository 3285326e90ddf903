pub mod catalog;
pub mod confirmations;
pub mod health;
pub mod inventory;
pub mod jobs;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /inventory/materials                 list, create
/// /inventory/materials/{id}            update, delete (confirmed)
/// /inventory/materials/{id}/movements  receive / issue stock
/// /inventory/logs                      paged movement log
/// /inventory/logs/export               CSV download
/// /inventory/dashboard                 aggregates for a period
/// /inventory/dashboard/report          printable HTML
/// /inventory/report                    stock by category, printable HTML
///
/// /confirmations                       pending actions
/// /confirmations/{id}/confirm          run
/// /confirmations/{id}/decline          discard
///
/// /customers, /customers/{id}          customer master data
/// /services, /services/{id}            priced services
/// /jobs, /jobs/{job_id}                job orders
/// /jobs/{job_id}/status                status change (confirmed)
/// /jobs/{job_id}/print                 job sheet, printable HTML
/// /provider                            job sheet letterhead
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/inventory", inventory::router())
        .nest("/confirmations", confirmations::router())
        .nest("/customers", catalog::customer_router())
        .nest("/services", catalog::service_router())
        .nest("/jobs", jobs::router())
        .nest("/provider", catalog::provider_router())
}
