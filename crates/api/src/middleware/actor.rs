//! Caller identity extracted from proxy-supplied headers.
//!
//! Authentication happens upstream; the proxy forwards the display name in
//! `x-actor-name` and the role in `x-actor-role`.

use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use printshop_core::roles::{require_permission, Permission, ROLE_VIEWER};

use crate::error::AppError;
use crate::state::AppState;

pub const ACTOR_NAME_HEADER: &str = "x-actor-name";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// The person making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Display name recorded in `action_by` and `created_by`.
    pub name: String,
    /// Role name; a missing role header means `viewer`.
    pub role: String,
}

impl Actor {
    pub fn require(&self, permission: Permission) -> Result<(), AppError> {
        require_permission(&self.role, permission).map_err(|e| {
            tracing::warn!(actor = %self.name, role = %self.role, ?permission, "Permission denied");
            AppError::Core(e)
        })
    }

    fn from_headers(headers: &HeaderMap) -> Option<Self> {
        // Display names may be Thai, so accept any UTF-8 rather than ASCII only.
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let name = read(ACTOR_NAME_HEADER)?;
        let role = read(ACTOR_ROLE_HEADER)
            .map(|r| r.to_lowercase())
            .unwrap_or_else(|| ROLE_VIEWER.to_string());
        Some(Actor { name, role })
    }
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Actor::from_headers(&parts.headers).ok_or_else(|| {
            AppError::Unauthorized(format!("Missing {ACTOR_NAME_HEADER} header"))
        })
    }
}

impl OptionalFromRequestParts<AppState> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(Actor::from_headers(&parts.headers))
    }
}
