//! Handlers for the confirmation gate.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use printshop_core::error::CoreError;

use crate::error::AppResult;
use crate::middleware::actor::Actor;
use crate::response::DataResponse;
use crate::state::AppState;

const CONFIRMATION: &str = "confirmation";

fn unknown(id: Uuid) -> CoreError {
    CoreError::NotFoundByKey {
        entity: CONFIRMATION,
        key: id.to_string(),
    }
}

/// GET /confirmations -- everything still waiting, oldest first.
pub async fn list_pending(
    _actor: Actor,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let pending = state.confirmations.list().await;
    Ok(Json(DataResponse { data: pending }))
}

/// POST /confirmations/{id}/confirm -- run the parked action.
///
/// The caller needs the permission of the action itself; a refusal leaves it
/// parked. A busy ledger or a failed gateway call parks it again under the
/// same id so the confirmation can be retried.
pub async fn confirm(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let (info, permission) = state
        .confirmations
        .peek(id, |info, action| (info.clone(), action.required_permission()))
        .await
        .ok_or_else(|| unknown(id))?;
    actor.require(permission)?;

    let action = state.confirmations.confirm(id).await.ok_or_else(|| unknown(id))?;
    tracing::info!(confirmation_id = %id, actor = %actor.name, ?action, "Confirmed");

    match action.clone().execute(&state).await {
        Ok(outcome) => Ok(Json(DataResponse { data: outcome })),
        Err(err) if err.is_transient() => {
            tracing::warn!(confirmation_id = %id, error = %err, "Confirmed action failed, kept for retry");
            state.confirmations.restore(info, action).await;
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

/// POST /confirmations/{id}/decline -- discard the parked action.
pub async fn decline(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    if !state.confirmations.decline(id).await {
        return Err(unknown(id).into());
    }
    tracing::info!(confirmation_id = %id, actor = %actor.name, "Declined");
    Ok(StatusCode::NO_CONTENT)
}
