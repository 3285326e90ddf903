//! Ledger mutation engine.
//!
//! Owns the in-memory projection of the material and movement-log
//! repositories and performs every quantity-affecting write. Each write pairs
//! a `materials` change with an appended log row, and runs behind the shared
//! [`BusyFlag`] so at most one mutation is in flight.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::busy::BusyFlag;
use crate::error::CoreError;
use crate::gateway::{InventoryGateway, NewMaterialLog, StockUpdate};
use crate::material::{LogAction, Material, MaterialInput, MaterialLog};
use crate::types::{today, BusinessDate, DbId};

/// Note written on the opening CREATE log.
pub const CREATE_NOTE: &str = "เพิ่มใหม่";

/// Note written on the DELETE log.
pub const DELETE_NOTE: &str = "ลบรายการ";

const MATERIAL: &str = "material";

// ---------------------------------------------------------------------------
// Log window
// ---------------------------------------------------------------------------

/// How many recent log rows the projection keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogWindow {
    /// The movement log screen.
    #[default]
    Ledger,
    /// Dashboard aggregates look further back.
    Dashboard,
}

impl LogWindow {
    pub fn limit(self) -> i64 {
        match self {
            Self::Ledger => 1000,
            Self::Dashboard => 5000,
        }
    }
}

// ---------------------------------------------------------------------------
// Movement planning
// ---------------------------------------------------------------------------

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementKind {
    In,
    Out,
}

impl MovementKind {
    pub fn action(self) -> LogAction {
        match self {
            Self::In => LogAction::In,
            Self::Out => LogAction::Out,
        }
    }

    /// Verb used in the roll note and confirmation prompts.
    pub fn verb(self) -> &'static str {
        match self {
            Self::In => "รับ",
            Self::Out => "เบิก",
        }
    }
}

/// Stock movement form. Roll materials use `length`, others use `qty`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementInput {
    #[serde(default)]
    pub qty: f64,
    #[serde(default)]
    pub length: f64,
    /// Business date of the movement. Defaults to today.
    #[serde(default)]
    pub date: Option<BusinessDate>,
    /// Who physically moved the stock. Defaults to the caller.
    #[serde(default)]
    pub action_by: Option<String>,
    #[serde(default)]
    pub note: String,
}

/// A validated movement: the quantities to write and the log to append.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementPlan {
    pub kind: MovementKind,
    pub final_qty: f64,
    pub width_used: Option<f64>,
    pub length_used: Option<f64>,
    pub stock: StockUpdate,
    pub note: String,
}

/// Validate a movement against the material's current balance.
///
/// Rejects before anything is written; the caller only persists a plan.
pub fn plan_movement(
    material: &Material,
    kind: MovementKind,
    input: &MovementInput,
) -> Result<MovementPlan, CoreError> {
    let (final_qty, width_used, length_used, note) = if material.is_roll() {
        if !input.length.is_finite() || input.length <= 0.0 {
            return Err(CoreError::Validation("specify length".into()));
        }
        if material.width <= 0.0 {
            return Err(CoreError::Validation(format!(
                "roll material '{}' has no width",
                material.name
            )));
        }
        let suffix = format!(
            "({} {}ม. x {}ม.)",
            kind.verb(),
            input.length,
            material.width
        );
        let note = if input.note.trim().is_empty() {
            suffix
        } else {
            format!("{} {suffix}", input.note.trim_end())
        };
        (
            material.width * input.length,
            Some(material.width),
            Some(input.length),
            note,
        )
    } else {
        if !input.qty.is_finite() || input.qty <= 0.0 {
            return Err(CoreError::Validation("specify quantity".into()));
        }
        (input.qty, None, None, input.note.clone())
    };

    let stock = match kind {
        MovementKind::In => StockUpdate {
            remaining_qty: material.remaining_qty + final_qty,
            total_in: material.total_in + final_qty,
            total_out: material.total_out,
        },
        MovementKind::Out => {
            if final_qty > material.remaining_qty {
                return Err(CoreError::InsufficientStock {
                    requested: final_qty,
                    remaining: material.remaining_qty,
                });
            }
            StockUpdate {
                remaining_qty: material.remaining_qty - final_qty,
                total_in: material.total_in,
                total_out: material.total_out + final_qty,
            }
        }
    };

    Ok(MovementPlan {
        kind,
        final_qty,
        width_used,
        length_used,
        stock,
        note,
    })
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// Point-in-time view of the repositories. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    pub materials: Arc<Vec<Material>>,
    pub logs: Arc<Vec<MaterialLog>>,
}

#[derive(Default)]
struct Projection {
    materials: Arc<Vec<Material>>,
    logs: Arc<Vec<MaterialLog>>,
    window: LogWindow,
}

/// Stock ledger over an [`InventoryGateway`].
pub struct Ledger {
    gateway: Arc<dyn InventoryGateway>,
    busy: BusyFlag,
    projection: RwLock<Projection>,
}

impl Ledger {
    pub fn new(gateway: Arc<dyn InventoryGateway>) -> Self {
        Self {
            gateway,
            busy: BusyFlag::new(),
            projection: RwLock::new(Projection::default()),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub async fn snapshot(&self) -> LedgerSnapshot {
        let projection = self.projection.read().await;
        LedgerSnapshot {
            materials: Arc::clone(&projection.materials),
            logs: Arc::clone(&projection.logs),
        }
    }

    /// Replace the material projection with every row from storage.
    ///
    /// On failure the previous projection is left as it was.
    pub async fn fetch_materials(&self) -> Result<Arc<Vec<Material>>, CoreError> {
        let materials = self.gateway.list_materials().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch materials");
            CoreError::from(e)
        })?;
        let materials = Arc::new(materials);
        self.projection.write().await.materials = Arc::clone(&materials);
        tracing::debug!(count = materials.len(), "Material projection refreshed");
        Ok(materials)
    }

    /// Replace the log projection with the most recent `window` rows.
    pub async fn fetch_logs(&self, window: LogWindow) -> Result<Arc<Vec<MaterialLog>>, CoreError> {
        let logs = self.gateway.recent_logs(window.limit()).await.map_err(|e| {
            tracing::error!(error = %e, ?window, "Failed to fetch material logs");
            CoreError::from(e)
        })?;
        let logs = Arc::new(logs);
        let mut projection = self.projection.write().await;
        projection.logs = Arc::clone(&logs);
        projection.window = window;
        tracing::debug!(count = logs.len(), ?window, "Log projection refreshed");
        Ok(logs)
    }

    /// Create a material with its opening balance and CREATE log.
    pub async fn create_material(
        &self,
        input: MaterialInput,
        actor: &str,
    ) -> Result<Material, CoreError> {
        let _guard = self.busy.try_acquire().ok_or(CoreError::Busy)?;
        let input = input.normalized()?;

        let opening = NewMaterialLog {
            action_type: LogAction::Create,
            qty_change: input.remaining_qty,
            width_used: None,
            length_used: None,
            current_qty_snapshot: input.remaining_qty,
            note: CREATE_NOTE.to_string(),
            action_by: actor.to_string(),
            action_date: today(),
        };
        let (material, log) = self.gateway.create_material(&input, &opening).await?;

        tracing::info!(
            material_id = material.id,
            name = %material.name,
            opening = material.remaining_qty,
            actor,
            "Material created"
        );
        self.after_write(log).await;
        Ok(material)
    }

    /// Replace the descriptive fields of an active material.
    ///
    /// Quantity fields are owned by stock movements and are left untouched,
    /// so no log is written.
    pub async fn update_material(&self, id: DbId, input: MaterialInput) -> Result<Material, CoreError> {
        let _guard = self.busy.try_acquire().ok_or(CoreError::Busy)?;
        let input = input.normalized()?;

        let material = self
            .gateway
            .update_material(id, &input)
            .await?
            .ok_or(CoreError::NotFound { entity: MATERIAL, id })?;

        tracing::info!(material_id = id, name = %material.name, "Material updated");
        self.refresh_materials().await;
        Ok(material)
    }

    /// Flag a material as deleted and append its DELETE log.
    ///
    /// The log snapshot carries the material's last balance. Deleting twice
    /// is a conflict and writes nothing.
    pub async fn soft_delete_material(&self, id: DbId, actor: &str) -> Result<MaterialLog, CoreError> {
        let _guard = self.busy.try_acquire().ok_or(CoreError::Busy)?;

        let material = self.load_material(id).await?;
        if material.is_deleted {
            return Err(CoreError::Conflict(format!(
                "material '{}' is already deleted",
                material.name
            )));
        }

        let entry = NewMaterialLog {
            action_type: LogAction::Delete,
            qty_change: 0.0,
            width_used: None,
            length_used: None,
            current_qty_snapshot: material.remaining_qty,
            note: DELETE_NOTE.to_string(),
            action_by: actor.to_string(),
            action_date: today(),
        };
        let log = self
            .gateway
            .soft_delete_material(id, &entry)
            .await?
            .ok_or_else(|| CoreError::Conflict(format!("material {id} is no longer active")))?;

        tracing::info!(material_id = id, balance = material.remaining_qty, actor, "Material deleted");
        self.after_write(log.clone()).await;
        Ok(log)
    }

    /// Validate a movement against the stored balance without writing.
    pub async fn preview_movement(
        &self,
        id: DbId,
        kind: MovementKind,
        input: &MovementInput,
    ) -> Result<MovementPlan, CoreError> {
        let material = self.load_active_material(id).await?;
        plan_movement(&material, kind, input)
    }

    /// Receive or issue stock.
    pub async fn post_stock_movement(
        &self,
        id: DbId,
        kind: MovementKind,
        input: MovementInput,
        actor: &str,
    ) -> Result<MaterialLog, CoreError> {
        let _guard = self.busy.try_acquire().ok_or(CoreError::Busy)?;

        let material = self.load_active_material(id).await?;
        let plan = plan_movement(&material, kind, &input).map_err(|e| {
            tracing::warn!(material_id = id, ?kind, error = %e, "Stock movement rejected");
            e
        })?;

        let entry = NewMaterialLog {
            action_type: kind.action(),
            qty_change: plan.final_qty,
            width_used: plan.width_used,
            length_used: plan.length_used,
            current_qty_snapshot: plan.stock.remaining_qty,
            note: plan.note,
            action_by: input
                .action_by
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| actor.to_string()),
            action_date: input.date.unwrap_or_else(today),
        };
        let log = self
            .gateway
            .apply_movement(id, &plan.stock, &entry)
            .await?
            .ok_or(CoreError::NotFound { entity: MATERIAL, id })?;

        tracing::info!(
            material_id = id,
            ?kind,
            qty = plan.final_qty,
            balance = plan.stock.remaining_qty,
            "Stock movement posted"
        );
        self.after_write(log.clone()).await;
        Ok(log)
    }

    async fn load_material(&self, id: DbId) -> Result<Material, CoreError> {
        self.gateway
            .find_material(id)
            .await?
            .ok_or(CoreError::NotFound { entity: MATERIAL, id })
    }

    async fn load_active_material(&self, id: DbId) -> Result<Material, CoreError> {
        let material = self.load_material(id).await?;
        if material.is_deleted {
            return Err(CoreError::NotFound { entity: MATERIAL, id });
        }
        Ok(material)
    }

    /// Re-fetch materials and splice the new log into the log window.
    async fn after_write(&self, log: MaterialLog) {
        self.refresh_materials().await;

        let mut projection = self.projection.write().await;
        let limit = usize::try_from(projection.window.limit()).unwrap_or(usize::MAX);
        let mut logs = projection.logs.as_ref().clone();
        logs.push(log);
        logs.sort_by(|a, b| {
            b.action_date
                .cmp(&a.action_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| b.id.cmp(&a.id))
        });
        logs.truncate(limit);
        projection.logs = Arc::new(logs);
    }

    async fn refresh_materials(&self) {
        // The write already landed; a stale projection is corrected by the next fetch.
        if let Err(e) = self.fetch_materials().await {
            tracing::warn!(error = %e, "Projection refresh after write failed");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
