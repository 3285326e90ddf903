//! PostgreSQL implementation of the core gateway traits.
//!
//! Each compound write (material row change plus its log row) runs in one
//! transaction, so a failed log insert rolls the row change back.

use async_trait::async_trait;
use printshop_core::catalog::{Customer, CustomerInput, ProviderInfo, Service, ServiceInput};
use printshop_core::gateway::{
    CatalogGateway, GatewayError, InventoryGateway, NewMaterialLog, StockUpdate,
};
use printshop_core::material::{Material, MaterialInput, MaterialLog};
use printshop_core::order::{JobOrder, JobStatus, NewJobOrder};
use printshop_core::types::DbId;

use crate::models::UnknownValue;
use crate::repositories::{
    CustomerRepo, JobOrderRepo, MaterialLogRepo, MaterialRepo, ProviderRepo, ServiceRepo,
};
use crate::DbPool;

/// Gateway over a PostgreSQL pool. Cheap to clone.
#[derive(Clone)]
pub struct PgGateway {
    pool: DbPool,
}

impl PgGateway {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn db_err(err: sqlx::Error) -> GatewayError {
    tracing::error!(error = %err, "Database call failed");
    GatewayError::new(err.to_string())
}

fn decode_err(err: UnknownValue) -> GatewayError {
    tracing::error!(error = %err, "Stored row could not be decoded");
    GatewayError::new(err.to_string())
}

fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, GatewayError>
where
    T: TryFrom<R, Error = UnknownValue>,
{
    rows.into_iter()
        .map(|row| T::try_from(row).map_err(decode_err))
        .collect()
}

#[async_trait]
impl InventoryGateway for PgGateway {
    async fn list_materials(&self) -> Result<Vec<Material>, GatewayError> {
        let rows = MaterialRepo::list_all(&self.pool).await.map_err(db_err)?;
        convert_all(rows)
    }

    async fn find_material(&self, id: DbId) -> Result<Option<Material>, GatewayError> {
        MaterialRepo::find_by_id(&self.pool, id)
            .await
            .map_err(db_err)?
            .map(Material::try_from)
            .transpose()
            .map_err(decode_err)
    }

    async fn create_material(
        &self,
        input: &MaterialInput,
        opening: &NewMaterialLog,
    ) -> Result<(Material, MaterialLog), GatewayError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let row = MaterialRepo::insert(&mut tx, input).await.map_err(db_err)?;
        let log = MaterialLogRepo::insert(&mut tx, row.id, opening)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;

        let material = Material::try_from(row).map_err(decode_err)?;
        let log = MaterialLog::try_from(log).map_err(decode_err)?;
        Ok((material, log))
    }

    async fn update_material(
        &self,
        id: DbId,
        input: &MaterialInput,
    ) -> Result<Option<Material>, GatewayError> {
        MaterialRepo::update_details(&self.pool, id, input)
            .await
            .map_err(db_err)?
            .map(Material::try_from)
            .transpose()
            .map_err(decode_err)
    }

    async fn apply_movement(
        &self,
        id: DbId,
        stock: &StockUpdate,
        log: &NewMaterialLog,
    ) -> Result<Option<MaterialLog>, GatewayError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        if !MaterialRepo::update_stock(&mut tx, id, stock)
            .await
            .map_err(db_err)?
        {
            // Dropping the transaction rolls it back.
            return Ok(None);
        }
        let row = MaterialLogRepo::insert(&mut tx, id, log)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        MaterialLog::try_from(row).map(Some).map_err(decode_err)
    }

    async fn soft_delete_material(
        &self,
        id: DbId,
        log: &NewMaterialLog,
    ) -> Result<Option<MaterialLog>, GatewayError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        if !MaterialRepo::mark_deleted(&mut tx, id).await.map_err(db_err)? {
            return Ok(None);
        }
        let row = MaterialLogRepo::insert(&mut tx, id, log)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        MaterialLog::try_from(row).map(Some).map_err(decode_err)
    }

    async fn recent_logs(&self, limit: i64) -> Result<Vec<MaterialLog>, GatewayError> {
        let rows = MaterialLogRepo::list_recent(&self.pool, limit)
            .await
            .map_err(db_err)?;
        convert_all(rows)
    }
}

#[async_trait]
impl CatalogGateway for PgGateway {
    async fn list_customers(&self) -> Result<Vec<Customer>, GatewayError> {
        let rows = CustomerRepo::list(&self.pool).await.map_err(db_err)?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn create_customer(&self, input: &CustomerInput) -> Result<Customer, GatewayError> {
        CustomerRepo::create(&self.pool, input)
            .await
            .map(Customer::from)
            .map_err(db_err)
    }

    async fn update_customer(
        &self,
        id: DbId,
        input: &CustomerInput,
    ) -> Result<Option<Customer>, GatewayError> {
        CustomerRepo::update(&self.pool, id, input)
            .await
            .map(|row| row.map(Customer::from))
            .map_err(db_err)
    }

    async fn delete_customer(&self, id: DbId) -> Result<bool, GatewayError> {
        CustomerRepo::delete(&self.pool, id).await.map_err(db_err)
    }

    async fn list_services(&self) -> Result<Vec<Service>, GatewayError> {
        let rows = ServiceRepo::list(&self.pool).await.map_err(db_err)?;
        Ok(rows.into_iter().map(Service::from).collect())
    }

    async fn find_service(&self, id: DbId) -> Result<Option<Service>, GatewayError> {
        ServiceRepo::find_by_id(&self.pool, id)
            .await
            .map(|row| row.map(Service::from))
            .map_err(db_err)
    }

    async fn create_service(&self, input: &ServiceInput) -> Result<Service, GatewayError> {
        ServiceRepo::create(&self.pool, input)
            .await
            .map(Service::from)
            .map_err(db_err)
    }

    async fn update_service(
        &self,
        id: DbId,
        input: &ServiceInput,
    ) -> Result<Option<Service>, GatewayError> {
        ServiceRepo::update(&self.pool, id, input)
            .await
            .map(|row| row.map(Service::from))
            .map_err(db_err)
    }

    async fn delete_service(&self, id: DbId) -> Result<bool, GatewayError> {
        ServiceRepo::delete(&self.pool, id).await.map_err(db_err)
    }

    async fn provider_info(&self) -> Result<Option<ProviderInfo>, GatewayError> {
        ProviderRepo::get(&self.pool)
            .await
            .map(|row| row.map(ProviderInfo::from))
            .map_err(db_err)
    }

    async fn save_provider_info(&self, info: &ProviderInfo) -> Result<ProviderInfo, GatewayError> {
        ProviderRepo::upsert(&self.pool, info)
            .await
            .map(ProviderInfo::from)
            .map_err(db_err)
    }

    async fn list_job_orders(&self) -> Result<Vec<JobOrder>, GatewayError> {
        let rows = JobOrderRepo::list(&self.pool).await.map_err(db_err)?;
        convert_all(rows)
    }

    async fn find_job_order(&self, job_id: &str) -> Result<Option<JobOrder>, GatewayError> {
        JobOrderRepo::find_by_job_id(&self.pool, job_id)
            .await
            .map_err(db_err)?
            .map(JobOrder::try_from)
            .transpose()
            .map_err(decode_err)
    }

    async fn latest_job_id(&self, prefix: &str) -> Result<Option<String>, GatewayError> {
        JobOrderRepo::latest_with_prefix(&self.pool, prefix)
            .await
            .map_err(db_err)
    }

    async fn create_job_order(&self, order: &NewJobOrder) -> Result<JobOrder, GatewayError> {
        let row = JobOrderRepo::create(&self.pool, order)
            .await
            .map_err(db_err)?;
        JobOrder::try_from(row).map_err(decode_err)
    }

    async fn update_job_status(
        &self,
        job_id: &str,
        status: JobStatus,
    ) -> Result<Option<JobOrder>, GatewayError> {
        JobOrderRepo::update_status(&self.pool, job_id, status)
            .await
            .map_err(db_err)?
            .map(JobOrder::try_from)
            .transpose()
            .map_err(decode_err)
    }
}
