//! `materials` and `material_logs` rows.

use printshop_core::material::{LogAction, Material, MaterialLog, MaterialType};
use printshop_core::types::{BusinessDate, DbId, Timestamp};
use sqlx::FromRow;

use super::UnknownValue;

/// A row from the `materials` table.
#[derive(Debug, Clone, FromRow)]
pub struct MaterialRow {
    pub id: DbId,
    pub name: String,
    pub category: String,
    #[sqlx(rename = "type")]
    pub material_type: String,
    pub brand: String,
    pub supplier: String,
    pub details: String,
    pub width: f64,
    pub remaining_qty: f64,
    pub total_in: f64,
    pub total_out: f64,
    pub min_alert: f64,
    pub unit: String,
    pub cost_per_unit: f64,
    pub image_url: String,
    pub is_deleted: bool,
    pub created_at: Timestamp,
}

impl TryFrom<MaterialRow> for Material {
    type Error = UnknownValue;

    fn try_from(row: MaterialRow) -> Result<Self, Self::Error> {
        let material_type = MaterialType::parse(&row.material_type).ok_or(UnknownValue {
            column: "materials.type",
            value: row.material_type.clone(),
        })?;
        Ok(Material {
            id: row.id,
            name: row.name,
            category: row.category,
            material_type,
            brand: row.brand,
            supplier: row.supplier,
            details: row.details,
            width: row.width,
            remaining_qty: row.remaining_qty,
            total_in: row.total_in,
            total_out: row.total_out,
            min_alert: row.min_alert,
            unit: row.unit,
            cost_per_unit: row.cost_per_unit,
            image_url: row.image_url,
            is_deleted: row.is_deleted,
            created_at: row.created_at,
        })
    }
}

/// A row from the `material_logs` table.
#[derive(Debug, Clone, FromRow)]
pub struct MaterialLogRow {
    pub id: DbId,
    pub material_id: DbId,
    pub action_type: String,
    pub qty_change: f64,
    pub width_used: Option<f64>,
    pub length_used: Option<f64>,
    pub current_qty_snapshot: f64,
    pub note: String,
    pub action_by: String,
    pub action_date: BusinessDate,
    pub created_at: Timestamp,
}

impl TryFrom<MaterialLogRow> for MaterialLog {
    type Error = UnknownValue;

    fn try_from(row: MaterialLogRow) -> Result<Self, Self::Error> {
        let action_type = LogAction::parse(&row.action_type).ok_or(UnknownValue {
            column: "material_logs.action_type",
            value: row.action_type.clone(),
        })?;
        Ok(MaterialLog {
            id: row.id,
            material_id: row.material_id,
            action_type,
            qty_change: row.qty_change,
            width_used: row.width_used,
            length_used: row.length_used,
            current_qty_snapshot: row.current_qty_snapshot,
            note: row.note,
            action_by: row.action_by,
            action_date: row.action_date,
            created_at: row.created_at,
        })
    }
}
