//! Handlers for materials, stock movements and the movement log.

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use printshop_core::error::CoreError;
use printshop_core::export::{export_logs_csv, LOG_EXPORT_FILENAME};
use printshop_core::ledger::{LogWindow, MovementInput, MovementKind};
use printshop_core::material::{Material, MaterialInput};
use printshop_core::pagination::{page_numbers, Page, PageButton};
use printshop_core::types::{BusinessDate, DbId};
use printshop_core::view::{
    filtered_logs, sorted_materials, stock_totals, LogBrowser, LogEntryView, MaterialFilter,
    MaterialIndex, StockTotals,
};

use crate::error::AppResult;
use crate::middleware::rbac::RequireStockManager;
use crate::pending::PendingAction;
use crate::query::LogQuery;
use crate::response::DataResponse;
use crate::state::AppState;

const MATERIAL: &str = "material";

#[derive(Debug, Serialize)]
pub struct MaterialList {
    pub items: Vec<Material>,
    /// Totals over `items` only.
    pub totals: StockTotals,
}

/// Stock movement request body.
#[derive(Debug, Deserialize)]
pub struct MovementRequest {
    pub kind: MovementKind,
    #[serde(default)]
    pub qty: f64,
    #[serde(default)]
    pub length: f64,
    pub date: Option<BusinessDate>,
    pub action_by: Option<String>,
    #[serde(default)]
    pub note: String,
}

impl MovementRequest {
    fn into_parts(self) -> (MovementKind, MovementInput) {
        let input = MovementInput {
            qty: self.qty,
            length: self.length,
            date: self.date,
            action_by: self.action_by,
            note: self.note,
        };
        (self.kind, input)
    }
}

#[derive(Debug, Serialize)]
pub struct LogPage {
    #[serde(flatten)]
    pub page: Page<LogEntryView>,
    pub pages: Vec<PageButton>,
}

// ---------------------------------------------------------------------------
// GET /inventory/materials
// ---------------------------------------------------------------------------

/// Active materials, out of stock first, with value totals.
pub async fn list_materials(
    State(state): State<AppState>,
    Query(filter): Query<MaterialFilter>,
) -> AppResult<impl IntoResponse> {
    let materials = state.ledger.fetch_materials().await?;
    let sorted = sorted_materials(&materials, &filter);
    let totals = stock_totals(&sorted);

    Ok(Json(DataResponse {
        data: MaterialList {
            items: sorted.into_iter().cloned().collect(),
            totals,
        },
    }))
}

// ---------------------------------------------------------------------------
// POST /inventory/materials
// ---------------------------------------------------------------------------

pub async fn create_material(
    RequireStockManager(actor): RequireStockManager,
    State(state): State<AppState>,
    Json(input): Json<MaterialInput>,
) -> AppResult<impl IntoResponse> {
    let material = state.ledger.create_material(input, &actor.name).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: material })))
}

// ---------------------------------------------------------------------------
// PUT /inventory/materials/{id}
// ---------------------------------------------------------------------------

/// Replace descriptive fields. Quantities are ignored.
pub async fn update_material(
    RequireStockManager(actor): RequireStockManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<MaterialInput>,
) -> AppResult<impl IntoResponse> {
    let material = state.ledger.update_material(id, input).await?;
    tracing::debug!(material_id = id, actor = %actor.name, "Material edited");
    Ok(Json(DataResponse { data: material }))
}

// ---------------------------------------------------------------------------
// DELETE /inventory/materials/{id}
// ---------------------------------------------------------------------------

/// Park a soft delete until it is confirmed.
pub async fn delete_material(
    RequireStockManager(actor): RequireStockManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let materials = state.ledger.fetch_materials().await?;
    let material = materials
        .iter()
        .find(|m| m.id == id)
        .ok_or(CoreError::NotFound {
            entity: MATERIAL,
            id,
        })?;
    if material.is_deleted {
        return Err(CoreError::Conflict(format!(
            "material '{}' is already deleted",
            material.name
        ))
        .into());
    }

    let pending = state
        .confirmations
        .request(
            format!("ยืนยันการลบ \"{}\" ?", material.name),
            &actor.name,
            PendingAction::DeleteMaterial {
                id,
                actor: actor.name.clone(),
            },
        )
        .await;
    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: pending })))
}

// ---------------------------------------------------------------------------
// POST /inventory/materials/{id}/movements
// ---------------------------------------------------------------------------

/// Receive or issue stock.
///
/// The movement is validated first. Quantities above the configured
/// threshold are parked for confirmation (202); smaller ones post at once
/// (201).
pub async fn post_movement(
    RequireStockManager(actor): RequireStockManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(request): Json<MovementRequest>,
) -> AppResult<Response> {
    let (kind, input) = request.into_parts();
    let plan = state.ledger.preview_movement(id, kind, &input).await?;

    if plan.final_qty > state.config.movement_confirm_threshold {
        let pending = state
            .confirmations
            .request(
                format!(
                    "ยืนยันการ{} {} หน่วย (วัสดุ #{id}) ?",
                    kind.verb(),
                    plan.final_qty
                ),
                &actor.name,
                PendingAction::PostMovement {
                    id,
                    kind,
                    input,
                    actor: actor.name.clone(),
                },
            )
            .await;
        return Ok((StatusCode::ACCEPTED, Json(DataResponse { data: pending })).into_response());
    }

    let log = state
        .ledger
        .post_stock_movement(id, kind, input, &actor.name)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: log })).into_response())
}

// ---------------------------------------------------------------------------
// GET /inventory/logs
// ---------------------------------------------------------------------------

/// One page of the filtered movement log, joined with material names.
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> AppResult<impl IntoResponse> {
    let materials = state.ledger.fetch_materials().await?;
    let logs = state.ledger.fetch_logs(LogWindow::Ledger).await?;
    let index = MaterialIndex::new(&materials);

    let mut browser = LogBrowser::new();
    browser.set_filter(query.filter());
    browser.change_page(query.page.unwrap_or(1), &logs, &index);
    let page = browser.current_page(&logs, &index);
    let pages = page_numbers(page.page, page.total_pages);

    Ok(Json(DataResponse {
        data: LogPage { page, pages },
    }))
}

// ---------------------------------------------------------------------------
// GET /inventory/logs/export
// ---------------------------------------------------------------------------

/// Download every log matching the filter as CSV. Paging is ignored.
pub async fn export_logs(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> AppResult<impl IntoResponse> {
    let materials = state.ledger.fetch_materials().await?;
    let logs = state.ledger.fetch_logs(LogWindow::Ledger).await?;
    let index = MaterialIndex::new(&materials);

    let selected = filtered_logs(&logs, &index, &query.filter());
    let document = export_logs_csv(&selected, &index)?;
    tracing::info!(rows = selected.len(), "Movement log exported");

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{LOG_EXPORT_FILENAME}\""),
            ),
        ],
        document,
    ))
}
