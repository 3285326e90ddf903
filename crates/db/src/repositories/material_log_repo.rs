//! Repository for the append-only `material_logs` table.

use printshop_core::gateway::NewMaterialLog;
use printshop_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::material::MaterialLogRow;

/// Column list for `material_logs` queries.
const COLUMNS: &str = "\
    id, material_id, action_type, qty_change, width_used, length_used, \
    current_qty_snapshot, note, action_by, action_date, created_at";

pub struct MaterialLogRepo;

impl MaterialLogRepo {
    /// Append a log row. There is no update or delete.
    pub async fn insert(
        conn: &mut PgConnection,
        material_id: DbId,
        log: &NewMaterialLog,
    ) -> Result<MaterialLogRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO material_logs \
                (material_id, action_type, qty_change, width_used, length_used, \
                 current_qty_snapshot, note, action_by, action_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MaterialLogRow>(&query)
            .bind(material_id)
            .bind(log.action_type.as_str())
            .bind(log.qty_change)
            .bind(log.width_used)
            .bind(log.length_used)
            .bind(log.current_qty_snapshot)
            .bind(&log.note)
            .bind(&log.action_by)
            .bind(log.action_date)
            .fetch_one(&mut *conn)
            .await
    }

    /// The most recent `limit` rows, newest business date first.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<MaterialLogRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM material_logs \
             ORDER BY action_date DESC, created_at DESC, id DESC \
             LIMIT $1"
        );
        sqlx::query_as::<_, MaterialLogRow>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
