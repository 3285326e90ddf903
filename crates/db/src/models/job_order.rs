//! `job_orders` rows. Line items are stored as a JSONB array.

use printshop_core::order::{JobOrder, JobStatus, OrderItem};
use printshop_core::types::{BusinessDate, DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

use super::UnknownValue;

/// A row from the `job_orders` table.
#[derive(Debug, Clone, FromRow)]
pub struct JobOrderRow {
    pub id: DbId,
    pub job_id: String,
    pub customer_name: String,
    pub branch: Option<String>,
    pub event_name: Option<String>,
    pub event_date: Option<BusinessDate>,
    pub items: Json<Vec<OrderItem>>,
    pub total_price: f64,
    pub created_by: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<JobOrderRow> for JobOrder {
    type Error = UnknownValue;

    fn try_from(row: JobOrderRow) -> Result<Self, Self::Error> {
        let status = JobStatus::parse(&row.status).ok_or(UnknownValue {
            column: "job_orders.status",
            value: row.status.clone(),
        })?;
        Ok(JobOrder {
            id: row.id,
            job_id: row.job_id,
            customer_name: row.customer_name,
            branch: row.branch,
            event_name: row.event_name,
            event_date: row.event_date,
            items: row.items.0,
            total_price: row.total_price,
            created_by: row.created_by,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
