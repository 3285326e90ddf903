//! Persistence gateway contract.
//!
//! The ledger never talks to storage directly. It consumes the narrow
//! request/response contract below; `printshop-db` implements it over
//! PostgreSQL and [`memory::MemoryGateway`] implements it in process.
//!
//! Compound writes (`create_material`, `apply_movement`,
//! `soft_delete_material`) carry the paired log row so an implementation can
//! commit the material change and its audit entry together.

pub mod memory;

use async_trait::async_trait;
use serde::Serialize;

use crate::catalog::{Customer, CustomerInput, ProviderInfo, Service, ServiceInput};
use crate::material::{LogAction, Material, MaterialInput, MaterialLog};
use crate::order::{JobOrder, JobStatus, NewJobOrder};
use crate::types::{BusinessDate, DbId};

/// A persistence call failed. The message is passed through verbatim.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct GatewayError {
    pub message: String,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// New quantity fields for a material after a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StockUpdate {
    pub remaining_qty: f64,
    pub total_in: f64,
    pub total_out: f64,
}

/// A log row to append. The material id is supplied by the write it pairs with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMaterialLog {
    pub action_type: LogAction,
    pub qty_change: f64,
    pub width_used: Option<f64>,
    pub length_used: Option<f64>,
    pub current_qty_snapshot: f64,
    pub note: String,
    pub action_by: String,
    pub action_date: BusinessDate,
}

/// Storage for the `materials` and `material_logs` relations.
#[async_trait]
pub trait InventoryGateway: Send + Sync {
    /// Every material row, soft-deleted ones included.
    async fn list_materials(&self) -> Result<Vec<Material>, GatewayError>;

    /// One material row, soft-deleted or not.
    async fn find_material(&self, id: DbId) -> Result<Option<Material>, GatewayError>;

    /// Insert a material with its opening balance plus the CREATE log.
    async fn create_material(
        &self,
        input: &MaterialInput,
        opening: &NewMaterialLog,
    ) -> Result<(Material, MaterialLog), GatewayError>;

    /// Replace the descriptive fields of an active material.
    ///
    /// Returns `None` when no active material has this id.
    async fn update_material(
        &self,
        id: DbId,
        input: &MaterialInput,
    ) -> Result<Option<Material>, GatewayError>;

    /// Write new quantity fields for an active material and append its log.
    ///
    /// Returns `None` when no active material has this id.
    async fn apply_movement(
        &self,
        id: DbId,
        stock: &StockUpdate,
        log: &NewMaterialLog,
    ) -> Result<Option<MaterialLog>, GatewayError>;

    /// Flag an active material as deleted and append the DELETE log.
    ///
    /// Returns `None` when no active material has this id.
    async fn soft_delete_material(
        &self,
        id: DbId,
        log: &NewMaterialLog,
    ) -> Result<Option<MaterialLog>, GatewayError>;

    /// The most recent `limit` logs, newest business date first.
    async fn recent_logs(&self, limit: i64) -> Result<Vec<MaterialLog>, GatewayError>;
}

/// Storage for customers, services, job orders and the letterhead.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    async fn list_customers(&self) -> Result<Vec<Customer>, GatewayError>;
    async fn create_customer(&self, input: &CustomerInput) -> Result<Customer, GatewayError>;
    async fn update_customer(
        &self,
        id: DbId,
        input: &CustomerInput,
    ) -> Result<Option<Customer>, GatewayError>;
    async fn delete_customer(&self, id: DbId) -> Result<bool, GatewayError>;

    async fn list_services(&self) -> Result<Vec<Service>, GatewayError>;
    async fn find_service(&self, id: DbId) -> Result<Option<Service>, GatewayError>;
    async fn create_service(&self, input: &ServiceInput) -> Result<Service, GatewayError>;
    async fn update_service(
        &self,
        id: DbId,
        input: &ServiceInput,
    ) -> Result<Option<Service>, GatewayError>;
    async fn delete_service(&self, id: DbId) -> Result<bool, GatewayError>;

    /// All job orders, newest first.
    async fn list_job_orders(&self) -> Result<Vec<JobOrder>, GatewayError>;
    async fn find_job_order(&self, job_id: &str) -> Result<Option<JobOrder>, GatewayError>;
    /// Highest job id starting with `prefix`.
    async fn latest_job_id(&self, prefix: &str) -> Result<Option<String>, GatewayError>;
    async fn create_job_order(&self, order: &NewJobOrder) -> Result<JobOrder, GatewayError>;
    async fn update_job_status(
        &self,
        job_id: &str,
        status: JobStatus,
    ) -> Result<Option<JobOrder>, GatewayError>;

    /// The single letterhead row, if one was ever saved.
    async fn provider_info(&self) -> Result<Option<ProviderInfo>, GatewayError>;
    /// Insert or replace the letterhead row.
    async fn save_provider_info(&self, info: &ProviderInfo) -> Result<ProviderInfo, GatewayError>;
}
