//! Handlers for the job sheet letterhead.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use printshop_core::catalog::{validate_input, ProviderInfo, ProviderInput};
use printshop_core::error::CoreError;
use printshop_core::roles::Permission;

use crate::error::AppResult;
use crate::middleware::actor::Actor;
use crate::response::DataResponse;
use crate::state::AppState;

/// The saved letterhead, or one built from the configured shop name.
pub async fn current_provider(state: &AppState) -> Result<ProviderInfo, CoreError> {
    Ok(state
        .catalog
        .provider_info()
        .await?
        .unwrap_or_else(|| ProviderInfo::fallback(&state.config.org_name)))
}

/// GET /provider
pub async fn get_provider(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let provider = current_provider(&state).await?;
    Ok(Json(DataResponse { data: provider }))
}

/// PUT /provider -- requires `manage_users`.
pub async fn update_provider(
    actor: Actor,
    State(state): State<AppState>,
    Json(input): Json<ProviderInput>,
) -> AppResult<impl IntoResponse> {
    actor.require(Permission::ManageUsers)?;
    validate_input(&input)?;
    let provider = state
        .catalog
        .save_provider_info(&input.into_info())
        .await
        .map_err(CoreError::from)?;
    tracing::info!(org_name = %provider.org_name, actor = %actor.name, "Letterhead updated");
    Ok(Json(DataResponse { data: provider }))
}
