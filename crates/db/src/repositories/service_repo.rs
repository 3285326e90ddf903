//! Repository for the `services` table.

use printshop_core::catalog::ServiceInput;
use printshop_core::types::DbId;
use sqlx::PgPool;

use crate::models::catalog::ServiceRow;

const COLUMNS: &str = "id, service_name, unit_price, created_at";

pub struct ServiceRepo;

impl ServiceRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<ServiceRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services ORDER BY service_name");
        sqlx::query_as::<_, ServiceRow>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ServiceRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM services WHERE id = $1");
        sqlx::query_as::<_, ServiceRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &ServiceInput) -> Result<ServiceRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO services (service_name, unit_price) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ServiceRow>(&query)
            .bind(&input.service_name)
            .bind(input.unit_price)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ServiceInput,
    ) -> Result<Option<ServiceRow>, sqlx::Error> {
        let query = format!(
            "UPDATE services SET service_name = $2, unit_price = $3 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ServiceRow>(&query)
            .bind(id)
            .bind(&input.service_name)
            .bind(input.unit_price)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a service. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
