//! Repository for the `customers` table.

use printshop_core::catalog::CustomerInput;
use printshop_core::types::DbId;
use sqlx::PgPool;

use crate::models::catalog::CustomerRow;

const COLUMNS: &str = "id, name, phone, address, tax_id, created_at";

pub struct CustomerRepo;

impl CustomerRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<CustomerRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customers ORDER BY name");
        sqlx::query_as::<_, CustomerRow>(&query).fetch_all(pool).await
    }

    pub async fn create(pool: &PgPool, input: &CustomerInput) -> Result<CustomerRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO customers (name, phone, address, tax_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomerRow>(&query)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.tax_id)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &CustomerInput,
    ) -> Result<Option<CustomerRow>, sqlx::Error> {
        let query = format!(
            "UPDATE customers SET name = $2, phone = $3, address = $4, tax_id = $5 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomerRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(&input.address)
            .bind(&input.tax_id)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a customer. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
