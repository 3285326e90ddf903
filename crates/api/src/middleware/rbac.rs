//! Permission extractors.
//!
//! Each extractor wraps [`Actor`] and rejects callers whose role lacks the
//! permission, so handlers enforce authorization at the type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use printshop_core::roles::Permission;

use super::actor::Actor;
use crate::error::AppError;
use crate::state::AppState;

async fn actor_with(
    parts: &mut Parts,
    state: &AppState,
    permission: Permission,
) -> Result<Actor, AppError> {
    let actor = <Actor as FromRequestParts<AppState>>::from_request_parts(parts, state).await?;
    actor.require(permission)?;
    Ok(actor)
}

/// Requires `manage_stock` (admin, manager, user).
pub struct RequireStockManager(pub Actor);

impl FromRequestParts<AppState> for RequireStockManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        actor_with(parts, state, Permission::ManageStock)
            .await
            .map(RequireStockManager)
    }
}

/// Requires `change_status` (admin, manager, user).
pub struct RequireStatusChanger(pub Actor);

impl FromRequestParts<AppState> for RequireStatusChanger {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        actor_with(parts, state, Permission::ChangeStatus)
            .await
            .map(RequireStatusChanger)
    }
}

/// Requires `manage_prices` (admin only).
pub struct RequirePriceManager(pub Actor);

impl FromRequestParts<AppState> for RequirePriceManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        actor_with(parts, state, Permission::ManagePrices)
            .await
            .map(RequirePriceManager)
    }
}
