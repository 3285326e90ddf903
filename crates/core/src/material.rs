//! Material master data and movement-log records.
//!
//! A [`Material`] is a stocked item; a [`MaterialLog`] is an immutable
//! movement record. The log is the durable audit trail and the running
//! totals on the material (`remaining_qty`, `total_in`, `total_out`) must
//! always be derivable from it.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{BusinessDate, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// The fixed set of material categories, in display order.
pub const MATERIAL_CATEGORIES: &[&str] = &[
    "ไวนิล",
    "สติกเกอร์",
    "หมึกพิมพ์",
    "อุปกรณ์ประกอบ",
    "อื่นๆ",
];

/// Unit forced onto roll materials (square meters).
pub const ROLL_UNIT: &str = "ตร.ม.";

/// Unit used for non-roll materials when none is given.
pub const DEFAULT_UNIT: &str = "ชิ้น";

/// Default reorder threshold for new materials.
pub const DEFAULT_MIN_ALERT: f64 = 5.0;

// ---------------------------------------------------------------------------
// Material type
// ---------------------------------------------------------------------------

/// How a material is measured and issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialType {
    /// Roll stock, consumed by area (width x length).
    #[default]
    Roll,
    /// Cut and used piece by piece.
    Piece,
    /// Issued as whole units or packs.
    Pack,
}

impl MaterialType {
    /// Database / wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Roll => "roll",
            Self::Piece => "piece",
            Self::Pack => "pack",
        }
    }

    /// Parse the database representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "roll" => Some(Self::Roll),
            "piece" => Some(Self::Piece),
            "pack" => Some(Self::Pack),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Log action
// ---------------------------------------------------------------------------

/// Kind of event recorded in the movement log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogAction {
    Create,
    In,
    Out,
    Delete,
}

impl LogAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::In => "IN",
            Self::Out => "OUT",
            Self::Delete => "DELETE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "CREATE" => Some(Self::Create),
            "IN" => Some(Self::In),
            "OUT" => Some(Self::Out),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    /// Signed effect of a log entry on the balance.
    ///
    /// CREATE and IN add, OUT subtracts, DELETE never moves stock.
    pub fn signed_delta(self, qty_change: f64) -> f64 {
        match self {
            Self::Create | Self::In => qty_change,
            Self::Out => -qty_change.abs(),
            Self::Delete => 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A stocked item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: DbId,
    pub name: String,
    pub category: String,
    #[serde(rename = "type")]
    pub material_type: MaterialType,
    pub brand: String,
    pub supplier: String,
    pub details: String,
    /// Roll width in meters. Only meaningful for [`MaterialType::Roll`].
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

impl Material {
    pub fn is_roll(&self) -> bool {
        self.material_type == MaterialType::Roll
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.remaining_qty == 0.0
    }

    /// At or below the reorder threshold (includes out of stock).
    pub fn is_low_stock(&self) -> bool {
        self.remaining_qty <= self.min_alert
    }

    pub fn stock_value(&self) -> f64 {
        self.remaining_qty * self.cost_per_unit
    }
}

/// An immutable movement record. Never updated or deleted once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLog {
    pub id: DbId,
    /// Weak reference: the material may since have been soft-deleted.
    pub material_id: DbId,
    pub action_type: LogAction,
    pub qty_change: f64,
    pub width_used: Option<f64>,
    pub length_used: Option<f64>,
    /// Balance immediately after this transaction.
    pub current_qty_snapshot: f64,
    pub note: String,
    pub action_by: String,
    pub action_date: BusinessDate,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

fn default_category() -> String {
    MATERIAL_CATEGORIES[0].to_string()
}

fn default_min_alert() -> f64 {
    DEFAULT_MIN_ALERT
}

/// User-editable material fields, shared by create and edit.
///
/// `remaining_qty` is the opening balance on create and is ignored on edit:
/// quantities only change through stock movements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialInput {
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(rename = "type", default)]
    pub material_type: MaterialType,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub remaining_qty: f64,
    #[serde(default = "default_min_alert")]
    pub min_alert: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub cost_per_unit: f64,
    #[serde(default)]
    pub image_url: String,
}

impl MaterialInput {
    /// Validate the input and normalize its unit.
    ///
    /// Roll materials always use [`ROLL_UNIT`]; other types fall back to
    /// [`DEFAULT_UNIT`] when the unit is blank.
    pub fn normalized(mut self) -> Result<Self, CoreError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(CoreError::Validation("material name is required".into()));
        }
        if !MATERIAL_CATEGORIES.contains(&self.category.as_str()) {
            return Err(CoreError::Validation(format!(
                "unknown category '{}'. Allowed: {}",
                self.category,
                MATERIAL_CATEGORIES.join(", ")
            )));
        }

        for (field, value) in [
            ("width", self.width),
            ("remaining_qty", self.remaining_qty),
            ("min_alert", self.min_alert),
            ("cost_per_unit", self.cost_per_unit),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::Validation(format!(
                    "{field} must be a non-negative number"
                )));
            }
        }

        if self.material_type == MaterialType::Roll {
            self.unit = ROLL_UNIT.to_string();
        } else if self.unit.trim().is_empty() {
            self.unit = DEFAULT_UNIT.to_string();
        } else {
            self.unit = self.unit.trim().to_string();
        }

        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
