//! Handlers for customer master data.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use printshop_core::catalog::{validate_input, CustomerInput};
use printshop_core::error::CoreError;
use printshop_core::roles::Permission;
use printshop_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::actor::Actor;
use crate::response::DataResponse;
use crate::state::AppState;

const CUSTOMER: &str = "customer";

/// GET /customers -- ordered by name.
pub async fn list_customers(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let customers = state.catalog.list_customers().await.map_err(CoreError::from)?;
    Ok(Json(DataResponse { data: customers }))
}

/// POST /customers
pub async fn create_customer(
    actor: Actor,
    State(state): State<AppState>,
    Json(input): Json<CustomerInput>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    let customer = state
        .catalog
        .create_customer(&input)
        .await
        .map_err(CoreError::from)?;
    tracing::info!(customer_id = customer.id, actor = %actor.name, "Customer created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: customer })))
}

/// PUT /customers/{id}
pub async fn update_customer(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CustomerInput>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;
    let customer = state
        .catalog
        .update_customer(id, &input)
        .await
        .map_err(CoreError::from)?
        .ok_or(CoreError::NotFound {
            entity: CUSTOMER,
            id,
        })?;
    tracing::info!(customer_id = id, actor = %actor.name, "Customer updated");
    Ok(Json(DataResponse { data: customer }))
}

/// DELETE /customers/{id} -- requires `delete_data`.
pub async fn delete_customer(
    actor: Actor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    actor.require(Permission::DeleteData)?;
    if !state
        .catalog
        .delete_customer(id)
        .await
        .map_err(CoreError::from)?
    {
        return Err(CoreError::NotFound {
            entity: CUSTOMER,
            id,
        }
        .into());
    }
    tracing::info!(customer_id = id, actor = %actor.name, "Customer deleted");
    Ok(StatusCode::NO_CONTENT)
}
