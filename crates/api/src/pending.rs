//! Actions that wait in the confirmation gate.
//!
//! A handler that needs confirmation builds a [`PendingAction`], parks it,
//! and answers `202 Accepted` with the confirmation id. Confirming runs
//! [`PendingAction::execute`]; the checks that produced the prompt are
//! repeated because state may have moved on in between. Whoever confirms
//! needs the same permission the original request needed.

use printshop_core::catalog::{Service, ServiceInput};
use printshop_core::error::CoreError;
use printshop_core::ledger::{MovementInput, MovementKind};
use printshop_core::material::MaterialLog;
use printshop_core::order::{JobOrder, JobStatus};
use printshop_core::roles::Permission;
use printshop_core::types::DbId;
use serde::Serialize;

use crate::state::AppState;

const SERVICE: &str = "service";
const JOB_ORDER: &str = "job_order";

/// A deferred write, captured with everything needed to run it later.
#[derive(Debug, Clone)]
pub enum PendingAction {
    DeleteMaterial {
        id: DbId,
        actor: String,
    },
    PostMovement {
        id: DbId,
        kind: MovementKind,
        input: MovementInput,
        actor: String,
    },
    ChangeJobStatus {
        job_id: String,
        status: JobStatus,
        actor: String,
    },
    UpdateService {
        id: DbId,
        input: ServiceInput,
    },
}

/// What a confirmed action produced.
#[derive(Debug, Serialize)]
#[serde(tag = "action", content = "result", rename_all = "snake_case")]
pub enum ActionOutcome {
    MaterialDeleted(MaterialLog),
    StockMoved(MaterialLog),
    JobStatusChanged(JobOrder),
    ServiceUpdated(Service),
}

impl PendingAction {
    /// Permission needed to confirm this action.
    pub fn required_permission(&self) -> Permission {
        match self {
            PendingAction::DeleteMaterial { .. } | PendingAction::PostMovement { .. } => {
                Permission::ManageStock
            }
            PendingAction::ChangeJobStatus { .. } => Permission::ChangeStatus,
            PendingAction::UpdateService { .. } => Permission::ManagePrices,
        }
    }

    pub async fn execute(self, state: &AppState) -> Result<ActionOutcome, CoreError> {
        match self {
            PendingAction::DeleteMaterial { id, actor } => state
                .ledger
                .soft_delete_material(id, &actor)
                .await
                .map(ActionOutcome::MaterialDeleted),
            PendingAction::PostMovement {
                id,
                kind,
                input,
                actor,
            } => state
                .ledger
                .post_stock_movement(id, kind, input, &actor)
                .await
                .map(ActionOutcome::StockMoved),
            PendingAction::ChangeJobStatus {
                job_id,
                status,
                actor,
            } => change_job_status(state, &job_id, status, &actor)
                .await
                .map(ActionOutcome::JobStatusChanged),
            PendingAction::UpdateService { id, input } => update_service(state, id, &input)
                .await
                .map(ActionOutcome::ServiceUpdated),
        }
    }
}

/// Load a job order and check that it may move to `status`.
pub async fn check_job_transition(
    state: &AppState,
    job_id: &str,
    status: JobStatus,
) -> Result<JobOrder, CoreError> {
    let job = state
        .catalog
        .find_job_order(job_id)
        .await?
        .ok_or_else(|| CoreError::NotFoundByKey {
            entity: JOB_ORDER,
            key: job_id.to_string(),
        })?;
    job.status.check_transition(status)?;
    Ok(job)
}

pub async fn change_job_status(
    state: &AppState,
    job_id: &str,
    status: JobStatus,
    actor: &str,
) -> Result<JobOrder, CoreError> {
    let current = check_job_transition(state, job_id, status).await?;
    let updated = state
        .catalog
        .update_job_status(job_id, status)
        .await?
        .ok_or_else(|| CoreError::NotFoundByKey {
            entity: JOB_ORDER,
            key: job_id.to_string(),
        })?;
    tracing::info!(
        job_id,
        from = current.status.as_str(),
        to = status.as_str(),
        actor,
        "Job status changed"
    );
    Ok(updated)
}

pub async fn update_service(
    state: &AppState,
    id: DbId,
    input: &ServiceInput,
) -> Result<Service, CoreError> {
    let service = state
        .catalog
        .update_service(id, input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: SERVICE,
            id,
        })?;
    tracing::info!(
        service_id = id,
        price = service.unit_price,
        "Service updated"
    );
    Ok(service)
}
