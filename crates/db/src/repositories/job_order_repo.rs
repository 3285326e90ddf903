//! Repository for the `job_orders` table.

use printshop_core::order::{JobStatus, NewJobOrder};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::job_order::JobOrderRow;

const COLUMNS: &str = "\
    id, job_id, customer_name, branch, event_name, event_date, items, \
    total_price, created_by, status, created_at, updated_at";

pub struct JobOrderRepo;

impl JobOrderRepo {
    /// All job orders, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<JobOrderRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM job_orders ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, JobOrderRow>(&query).fetch_all(pool).await
    }

    pub async fn find_by_job_id(pool: &PgPool, job_id: &str) -> Result<Option<JobOrderRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM job_orders WHERE job_id = $1");
        sqlx::query_as::<_, JobOrderRow>(&query)
            .bind(job_id)
            .fetch_optional(pool)
            .await
    }

    /// Highest job id with the given prefix.
    pub async fn latest_with_prefix(pool: &PgPool, prefix: &str) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT job_id FROM job_orders WHERE job_id LIKE $1 || '%' ORDER BY job_id DESC LIMIT 1",
        )
        .bind(prefix)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(job_id,)| job_id))
    }

    pub async fn create(pool: &PgPool, order: &NewJobOrder) -> Result<JobOrderRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO job_orders \
                (job_id, customer_name, branch, event_name, event_date, items, \
                 total_price, created_by, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobOrderRow>(&query)
            .bind(&order.job_id)
            .bind(&order.customer_name)
            .bind(&order.branch)
            .bind(&order.event_name)
            .bind(order.event_date)
            .bind(Json(&order.items))
            .bind(order.total_price)
            .bind(&order.created_by)
            .bind(order.status.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn update_status(
        pool: &PgPool,
        job_id: &str,
        status: JobStatus,
    ) -> Result<Option<JobOrderRow>, sqlx::Error> {
        let query = format!(
            "UPDATE job_orders SET status = $2, updated_at = now() \
             WHERE job_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobOrderRow>(&query)
            .bind(job_id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }
}
