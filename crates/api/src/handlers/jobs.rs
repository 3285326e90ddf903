//! Handlers for job orders and the job history list.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::{Deserialize, Serialize};

use printshop_core::error::CoreError;
use printshop_core::job_sheet::render_job_sheet;
use printshop_core::order::{
    filter_jobs, job_id_prefix, next_job_id, prepare_order, JobOrder, JobOrderInput, JobStatus,
};
use printshop_core::pagination::{page_numbers, paginate, Page, PageButton, PAGE_SIZE};
use printshop_core::types::today;

use crate::error::AppResult;
use crate::middleware::actor::Actor;
use crate::handlers::provider::current_provider;
use crate::middleware::rbac::RequireStatusChanger;
use crate::pending::{check_job_transition, PendingAction};
use crate::query::JobQuery;
use crate::response::DataResponse;
use crate::state::AppState;

const JOB_ORDER: &str = "job_order";
const CUSTOMER: &str = "customer";

#[derive(Debug, Serialize)]
pub struct JobPage {
    #[serde(flatten)]
    pub page: Page<JobOrder>,
    pub pages: Vec<PageButton>,
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: JobStatus,
}

/// GET /jobs -- newest first, filtered and paged.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobQuery>,
) -> AppResult<impl IntoResponse> {
    let jobs = state.catalog.list_job_orders().await.map_err(CoreError::from)?;
    let matching: Vec<JobOrder> = filter_jobs(&jobs, &query.filter())
        .into_iter()
        .cloned()
        .collect();
    let page = paginate(&matching, query.page.unwrap_or(1), PAGE_SIZE);
    let pages = page_numbers(page.page, page.total_pages);
    Ok(Json(DataResponse {
        data: JobPage { page, pages },
    }))
}

/// POST /jobs -- price the order and assign the next job id for today.
///
/// With `customer_id`, the name and branch are filled from that customer.
pub async fn create_job(
    actor: Actor,
    State(state): State<AppState>,
    Json(mut input): Json<JobOrderInput>,
) -> AppResult<impl IntoResponse> {
    if let Some(id) = input.customer_id {
        let customers = state.catalog.list_customers().await.map_err(CoreError::from)?;
        let customer = customers
            .iter()
            .find(|c| c.id == id)
            .ok_or(CoreError::NotFound {
                entity: CUSTOMER,
                id,
            })?;
        input.fill_from_customer(customer);
    }

    let prefix = job_id_prefix(today());
    let latest = state
        .catalog
        .latest_job_id(&prefix)
        .await
        .map_err(CoreError::from)?;
    let job_id = next_job_id(&prefix, latest.as_deref());

    let order = prepare_order(&input, job_id, &actor.name)?;
    let job = state
        .catalog
        .create_job_order(&order)
        .await
        .map_err(CoreError::from)?;

    tracing::info!(
        job_id = %job.job_id,
        items = job.items.len(),
        total = job.total_price,
        actor = %actor.name,
        "Job order created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: job })))
}

async fn load_job(state: &AppState, job_id: String) -> Result<JobOrder, CoreError> {
    state
        .catalog
        .find_job_order(&job_id)
        .await?
        .ok_or(CoreError::NotFoundByKey {
            entity: JOB_ORDER,
            key: job_id,
        })
}

/// GET /jobs/{job_id}
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let job = load_job(&state, job_id).await?;
    Ok(Json(DataResponse { data: job }))
}

/// GET /jobs/{job_id}/print -- job sheet under the saved letterhead.
pub async fn print_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let job = load_job(&state, job_id).await?;
    let provider = current_provider(&state).await?;
    tracing::info!(job_id = %job.job_id, "Job sheet printed");
    Ok(Html(render_job_sheet(&job, &provider)))
}

/// PUT /jobs/{job_id}/status -- always parked for confirmation.
pub async fn change_status(
    RequireStatusChanger(actor): RequireStatusChanger,
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(change): Json<StatusChange>,
) -> AppResult<impl IntoResponse> {
    let job = check_job_transition(&state, &job_id, change.status).await?;
    let message = format!(
        "เปลี่ยนสถานะงาน {} จาก \"{}\" เป็น \"{}\" ?",
        job.job_id,
        job.status.label(),
        change.status.label()
    );
    let pending = state
        .confirmations
        .request(
            message,
            &actor.name,
            PendingAction::ChangeJobStatus {
                job_id,
                status: change.status,
                actor: actor.name.clone(),
            },
        )
        .await;
    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: pending })))
}
