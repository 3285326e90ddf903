use crate::gateway::GatewayError;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Entity not found: {entity} '{key}'")]
    NotFoundByKey { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// An OUT movement would drive the balance negative.
    #[error("Insufficient stock: requested {requested}, remaining {remaining}")]
    InsufficientStock { requested: f64, remaining: f64 },

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Another mutating ledger operation is still in flight.
    #[error("Another stock operation is in progress")]
    Busy,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Persistence error: {0}")]
    Gateway(#[from] GatewayError),
}

impl CoreError {
    /// Failures that may succeed when the same call is repeated unchanged.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Busy | Self::Gateway(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_and_gateway_failures_are_transient() {
        assert!(CoreError::Busy.is_transient());
        assert!(CoreError::Gateway(GatewayError::new("connection reset")).is_transient());
        assert!(!CoreError::Conflict("already deleted".into()).is_transient());
        assert!(!CoreError::Validation("specify length".into()).is_transient());
    }
}
