use std::sync::Arc;

use printshop_core::confirm::ConfirmationGate;
use printshop_core::gateway::memory::MemoryGateway;
use printshop_core::gateway::CatalogGateway;
use printshop_core::ledger::Ledger;
use printshop_db::{DbPool, PgGateway};

use crate::config::ServerConfig;
use crate::pending::PendingAction;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind an `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Stock ledger (materials, movement log, busy flag).
    pub ledger: Arc<Ledger>,
    /// Customers, services and job orders.
    pub catalog: Arc<dyn CatalogGateway>,
    /// Actions parked until someone confirms or declines them.
    pub confirmations: Arc<ConfirmationGate<PendingAction>>,
    pub config: Arc<ServerConfig>,
    /// Present only when running against PostgreSQL.
    pub pool: Option<DbPool>,
}

impl AppState {
    /// State backed by a PostgreSQL pool.
    pub fn postgres(pool: DbPool, config: ServerConfig) -> Self {
        let gateway = Arc::new(PgGateway::new(pool.clone()));
        Self {
            ledger: Arc::new(Ledger::new(gateway.clone())),
            catalog: gateway,
            confirmations: Arc::new(ConfirmationGate::new()),
            config: Arc::new(config),
            pool: Some(pool),
        }
    }

    /// State backed by the in-process gateway. Data is lost on exit.
    pub fn in_memory(config: ServerConfig) -> Self {
        let gateway = Arc::new(MemoryGateway::new());
        Self {
            ledger: Arc::new(Ledger::new(gateway.clone())),
            catalog: gateway,
            confirmations: Arc::new(ConfirmationGate::new()),
            config: Arc::new(config),
            pool: None,
        }
    }

    pub fn storage(&self) -> &'static str {
        if self.pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }
}
