//! Handlers for the priced service list.
//!
//! All writes require `manage_prices`. A change to an existing price waits
//! in the confirmation gate; a rename with the same price applies at once.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use printshop_core::catalog::{validate_input, ServiceInput};
use printshop_core::error::CoreError;
use printshop_core::report::format_baht;
use printshop_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::rbac::RequirePriceManager;
use crate::pending::{self, PendingAction};
use crate::response::DataResponse;
use crate::state::AppState;

const SERVICE: &str = "service";

/// GET /services -- ordered by name.
pub async fn list_services(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let services = state.catalog.list_services().await.map_err(CoreError::from)?;
    Ok(Json(DataResponse { data: services }))
}

/// POST /services
pub async fn create_service(
    RequirePriceManager(actor): RequirePriceManager,
    State(state): State<AppState>,
    Json(input): Json<ServiceInput>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    let service = state
        .catalog
        .create_service(&input)
        .await
        .map_err(CoreError::from)?;
    tracing::info!(service_id = service.id, actor = %actor.name, "Service created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: service })))
}

/// PUT /services/{id}
pub async fn update_service(
    RequirePriceManager(actor): RequirePriceManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ServiceInput>,
) -> AppResult<Response> {
    validate_input(&input)?;
    let current = state
        .catalog
        .find_service(id)
        .await
        .map_err(CoreError::from)?
        .ok_or(CoreError::NotFound {
            entity: SERVICE,
            id,
        })?;

    if current.unit_price != input.unit_price {
        let message = format!(
            "ยืนยันการเปลี่ยนราคา \"{}\" จาก {} เป็น {} ?",
            current.service_name,
            format_baht(current.unit_price),
            format_baht(input.unit_price)
        );
        let parked = state
            .confirmations
            .request(message, &actor.name, PendingAction::UpdateService { id, input })
            .await;
        return Ok((StatusCode::ACCEPTED, Json(DataResponse { data: parked })).into_response());
    }

    let service = pending::update_service(&state, id, &input).await?;
    Ok(Json(DataResponse { data: service }).into_response())
}

/// DELETE /services/{id}
pub async fn delete_service(
    RequirePriceManager(actor): RequirePriceManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !state
        .catalog
        .delete_service(id)
        .await
        .map_err(CoreError::from)?
    {
        return Err(CoreError::NotFound {
            entity: SERVICE,
            id,
        }
        .into());
    }
    tracing::info!(service_id = id, actor = %actor.name, "Service deleted");
    Ok(StatusCode::NO_CONTENT)
}
