//! In-process gateway.
//!
//! Used by tests and by the API when no `DATABASE_URL` is configured. State
//! lives for the lifetime of the process. Each compound write runs under a
//! single write lock, so a material change and its log row land together.

use std::cmp::Reverse;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CatalogGateway, GatewayError, InventoryGateway, NewMaterialLog, StockUpdate};
use crate::catalog::{Customer, CustomerInput, ProviderInfo, Service, ServiceInput};
use crate::material::{Material, MaterialInput, MaterialLog};
use crate::order::{JobOrder, JobStatus, NewJobOrder};
use crate::types::DbId;

#[derive(Default)]
struct MemoryState {
    next_id: DbId,
    materials: Vec<Material>,
    logs: Vec<MaterialLog>,
    customers: Vec<Customer>,
    services: Vec<Service>,
    jobs: Vec<JobOrder>,
    provider: Option<ProviderInfo>,
}

impl MemoryState {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn append_log(&mut self, material_id: DbId, log: &NewMaterialLog) -> MaterialLog {
        let row = MaterialLog {
            id: self.allocate_id(),
            material_id,
            action_type: log.action_type,
            qty_change: log.qty_change,
            width_used: log.width_used,
            length_used: log.length_used,
            current_qty_snapshot: log.current_qty_snapshot,
            note: log.note.clone(),
            action_by: log.action_by.clone(),
            action_date: log.action_date,
            created_at: chrono::Utc::now(),
        };
        self.logs.push(row.clone());
        row
    }

    fn active_material_mut(&mut self, id: DbId) -> Option<&mut Material> {
        self.materials
            .iter_mut()
            .find(|m| m.id == id && !m.is_deleted)
    }
}

/// Gateway backed by plain vectors behind an async `RwLock`.
#[derive(Default)]
pub struct MemoryGateway {
    state: RwLock<MemoryState>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply_input(material: &mut Material, input: &MaterialInput) {
    material.name = input.name.clone();
    material.category = input.category.clone();
    material.material_type = input.material_type;
    material.brand = input.brand.clone();
    material.supplier = input.supplier.clone();
    material.details = input.details.clone();
    material.width = input.width;
    material.min_alert = input.min_alert;
    material.unit = input.unit.clone();
    material.cost_per_unit = input.cost_per_unit;
    material.image_url = input.image_url.clone();
}

#[async_trait]
impl InventoryGateway for MemoryGateway {
    async fn list_materials(&self) -> Result<Vec<Material>, GatewayError> {
        Ok(self.state.read().await.materials.clone())
    }

    async fn find_material(&self, id: DbId) -> Result<Option<Material>, GatewayError> {
        let state = self.state.read().await;
        Ok(state.materials.iter().find(|m| m.id == id).cloned())
    }

    async fn create_material(
        &self,
        input: &MaterialInput,
        opening: &NewMaterialLog,
    ) -> Result<(Material, MaterialLog), GatewayError> {
        let mut state = self.state.write().await;
        let mut material = Material {
            id: state.allocate_id(),
            name: String::new(),
            category: String::new(),
            material_type: input.material_type,
            brand: String::new(),
            supplier: String::new(),
            details: String::new(),
            width: 0.0,
            remaining_qty: input.remaining_qty,
            total_in: 0.0,
            total_out: 0.0,
            min_alert: 0.0,
            unit: String::new(),
            cost_per_unit: 0.0,
            image_url: String::new(),
            is_deleted: false,
            created_at: chrono::Utc::now(),
        };
        apply_input(&mut material, input);
        state.materials.push(material.clone());
        let log = state.append_log(material.id, opening);
        Ok((material, log))
    }

    async fn update_material(
        &self,
        id: DbId,
        input: &MaterialInput,
    ) -> Result<Option<Material>, GatewayError> {
        let mut state = self.state.write().await;
        Ok(state.active_material_mut(id).map(|material| {
            apply_input(material, input);
            material.clone()
        }))
    }

    async fn apply_movement(
        &self,
        id: DbId,
        stock: &StockUpdate,
        log: &NewMaterialLog,
    ) -> Result<Option<MaterialLog>, GatewayError> {
        let mut state = self.state.write().await;
        let Some(material) = state.active_material_mut(id) else {
            return Ok(None);
        };
        material.remaining_qty = stock.remaining_qty;
        material.total_in = stock.total_in;
        material.total_out = stock.total_out;
        Ok(Some(state.append_log(id, log)))
    }

    async fn soft_delete_material(
        &self,
        id: DbId,
        log: &NewMaterialLog,
    ) -> Result<Option<MaterialLog>, GatewayError> {
        let mut state = self.state.write().await;
        let Some(material) = state.active_material_mut(id) else {
            return Ok(None);
        };
        material.is_deleted = true;
        Ok(Some(state.append_log(id, log)))
    }

    async fn recent_logs(&self, limit: i64) -> Result<Vec<MaterialLog>, GatewayError> {
        let state = self.state.read().await;
        let mut logs = state.logs.clone();
        logs.sort_by_key(|log| Reverse((log.action_date, log.id)));
        logs.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        Ok(logs)
    }
}

#[async_trait]
impl CatalogGateway for MemoryGateway {
    async fn list_customers(&self) -> Result<Vec<Customer>, GatewayError> {
        let mut customers = self.state.read().await.customers.clone();
        customers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(customers)
    }

    async fn create_customer(&self, input: &CustomerInput) -> Result<Customer, GatewayError> {
        let mut state = self.state.write().await;
        let customer = Customer {
            id: state.allocate_id(),
            name: input.name.clone(),
            phone: input.phone.clone(),
            address: input.address.clone(),
            tax_id: input.tax_id.clone(),
            created_at: chrono::Utc::now(),
        };
        state.customers.push(customer.clone());
        Ok(customer)
    }

    async fn update_customer(
        &self,
        id: DbId,
        input: &CustomerInput,
    ) -> Result<Option<Customer>, GatewayError> {
        let mut state = self.state.write().await;
        Ok(state.customers.iter_mut().find(|c| c.id == id).map(|c| {
            c.name = input.name.clone();
            c.phone = input.phone.clone();
            c.address = input.address.clone();
            c.tax_id = input.tax_id.clone();
            c.clone()
        }))
    }

    async fn delete_customer(&self, id: DbId) -> Result<bool, GatewayError> {
        let mut state = self.state.write().await;
        let before = state.customers.len();
        state.customers.retain(|c| c.id != id);
        Ok(state.customers.len() < before)
    }

    async fn list_services(&self) -> Result<Vec<Service>, GatewayError> {
        let mut services = self.state.read().await.services.clone();
        services.sort_by(|a, b| a.service_name.cmp(&b.service_name));
        Ok(services)
    }

    async fn find_service(&self, id: DbId) -> Result<Option<Service>, GatewayError> {
        let state = self.state.read().await;
        Ok(state.services.iter().find(|s| s.id == id).cloned())
    }

    async fn create_service(&self, input: &ServiceInput) -> Result<Service, GatewayError> {
        let mut state = self.state.write().await;
        let service = Service {
            id: state.allocate_id(),
            service_name: input.service_name.clone(),
            unit_price: input.unit_price,
            created_at: chrono::Utc::now(),
        };
        state.services.push(service.clone());
        Ok(service)
    }

    async fn update_service(
        &self,
        id: DbId,
        input: &ServiceInput,
    ) -> Result<Option<Service>, GatewayError> {
        let mut state = self.state.write().await;
        Ok(state.services.iter_mut().find(|s| s.id == id).map(|s| {
            s.service_name = input.service_name.clone();
            s.unit_price = input.unit_price;
            s.clone()
        }))
    }

    async fn delete_service(&self, id: DbId) -> Result<bool, GatewayError> {
        let mut state = self.state.write().await;
        let before = state.services.len();
        state.services.retain(|s| s.id != id);
        Ok(state.services.len() < before)
    }

    async fn list_job_orders(&self) -> Result<Vec<JobOrder>, GatewayError> {
        let mut jobs = self.state.read().await.jobs.clone();
        jobs.sort_by_key(|job| Reverse((job.created_at, job.id)));
        Ok(jobs)
    }

    async fn find_job_order(&self, job_id: &str) -> Result<Option<JobOrder>, GatewayError> {
        let state = self.state.read().await;
        Ok(state.jobs.iter().find(|j| j.job_id == job_id).cloned())
    }

    async fn latest_job_id(&self, prefix: &str) -> Result<Option<String>, GatewayError> {
        let state = self.state.read().await;
        Ok(state
            .jobs
            .iter()
            .map(|j| j.job_id.as_str())
            .filter(|id| id.starts_with(prefix))
            .max()
            .map(str::to_string))
    }

    async fn create_job_order(&self, order: &NewJobOrder) -> Result<JobOrder, GatewayError> {
        let mut state = self.state.write().await;
        if state.jobs.iter().any(|j| j.job_id == order.job_id) {
            return Err(GatewayError::new(format!(
                "duplicate job id {}",
                order.job_id
            )));
        }
        let now = chrono::Utc::now();
        let job = JobOrder {
            id: state.allocate_id(),
            job_id: order.job_id.clone(),
            customer_name: order.customer_name.clone(),
            branch: order.branch.clone(),
            event_name: order.event_name.clone(),
            event_date: order.event_date,
            items: order.items.clone(),
            total_price: order.total_price,
            created_by: order.created_by.clone(),
            status: order.status,
            created_at: now,
            updated_at: now,
        };
        state.jobs.push(job.clone());
        Ok(job)
    }

    async fn update_job_status(
        &self,
        job_id: &str,
        status: JobStatus,
    ) -> Result<Option<JobOrder>, GatewayError> {
        let mut state = self.state.write().await;
        Ok(state.jobs.iter_mut().find(|j| j.job_id == job_id).map(|j| {
            j.status = status;
            j.updated_at = chrono::Utc::now();
            j.clone()
        }))
    }

    async fn provider_info(&self) -> Result<Option<ProviderInfo>, GatewayError> {
        Ok(self.state.read().await.provider.clone())
    }

    async fn save_provider_info(&self, info: &ProviderInfo) -> Result<ProviderInfo, GatewayError> {
        self.state.write().await.provider = Some(info.clone());
        Ok(info.clone())
    }
}
