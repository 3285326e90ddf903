//! Repository for the `materials` table.
//!
//! Writes that pair with a log row take a `PgConnection` so the caller can
//! run them inside a transaction.

use printshop_core::gateway::StockUpdate;
use printshop_core::material::MaterialInput;
use printshop_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::material::MaterialRow;

/// Column list for `materials` queries.
const COLUMNS: &str = "\
    id, name, category, type, brand, supplier, details, width, \
    remaining_qty, total_in, total_out, min_alert, unit, cost_per_unit, \
    image_url, is_deleted, created_at";

pub struct MaterialRepo;

impl MaterialRepo {
    /// Every material, soft-deleted rows included.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<MaterialRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM materials ORDER BY id");
        sqlx::query_as::<_, MaterialRow>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MaterialRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM materials WHERE id = $1");
        sqlx::query_as::<_, MaterialRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a material with its opening balance.
    pub async fn insert(
        conn: &mut PgConnection,
        input: &MaterialInput,
    ) -> Result<MaterialRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO materials \
                (name, category, type, brand, supplier, details, width, \
                 remaining_qty, min_alert, unit, cost_per_unit, image_url, is_deleted) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, false) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MaterialRow>(&query)
            .bind(&input.name)
            .bind(&input.category)
            .bind(input.material_type.as_str())
            .bind(&input.brand)
            .bind(&input.supplier)
            .bind(&input.details)
            .bind(input.width)
            .bind(input.remaining_qty)
            .bind(input.min_alert)
            .bind(&input.unit)
            .bind(input.cost_per_unit)
            .bind(&input.image_url)
            .fetch_one(&mut *conn)
            .await
    }

    /// Replace descriptive fields of an active material. Quantities are untouched.
    pub async fn update_details(
        pool: &PgPool,
        id: DbId,
        input: &MaterialInput,
    ) -> Result<Option<MaterialRow>, sqlx::Error> {
        let query = format!(
            "UPDATE materials SET \
                name = $2, category = $3, type = $4, brand = $5, supplier = $6, \
                details = $7, width = $8, min_alert = $9, unit = $10, \
                cost_per_unit = $11, image_url = $12 \
             WHERE id = $1 AND NOT is_deleted \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MaterialRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.category)
            .bind(input.material_type.as_str())
            .bind(&input.brand)
            .bind(&input.supplier)
            .bind(&input.details)
            .bind(input.width)
            .bind(input.min_alert)
            .bind(&input.unit)
            .bind(input.cost_per_unit)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    /// Write new quantity fields. Returns `false` if no active row matched.
    pub async fn update_stock(
        conn: &mut PgConnection,
        id: DbId,
        stock: &StockUpdate,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE materials SET remaining_qty = $2, total_in = $3, total_out = $4 \
             WHERE id = $1 AND NOT is_deleted",
        )
        .bind(id)
        .bind(stock.remaining_qty)
        .bind(stock.total_in)
        .bind(stock.total_out)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete an active material. Returns `false` if already deleted or missing.
    pub async fn mark_deleted(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE materials SET is_deleted = true WHERE id = $1 AND NOT is_deleted")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
