//! Route definitions for job orders.
//!
//! Mounted at `/jobs` by `api_routes()`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// ```text
/// GET    /                  -> list_jobs
/// POST   /                  -> create_job
/// GET    /{job_id}          -> get_job
/// GET    /{job_id}/print    -> print_job (HTML)
/// PUT    /{job_id}/status   -> change_status (202)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(jobs::list_jobs).post(jobs::create_job))
        .route("/{job_id}", get(jobs::get_job))
        .route("/{job_id}/print", get(jobs::print_job))
        .route("/{job_id}/status", put(jobs::change_status))
}
