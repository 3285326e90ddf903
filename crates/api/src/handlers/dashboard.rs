//! Handlers for the inventory dashboard and the printable reports.

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse};
use axum::Json;

use printshop_core::dashboard::{DashboardReport, DateWindow};
use printshop_core::ledger::LogWindow;
use printshop_core::report::{render_report, render_stock_report, stock_groups, ReportMeta};
use printshop_core::types::today;

use crate::error::AppResult;
use crate::middleware::actor::Actor;
use crate::query::DashboardQuery;
use crate::response::DataResponse;
use crate::state::AppState;

async fn build_report(state: &AppState, query: &DashboardQuery) -> AppResult<DashboardReport> {
    let window = DateWindow::resolve(query.period, query.start, query.end, today())?;
    let materials = state.ledger.fetch_materials().await?;
    let logs = state.ledger.fetch_logs(LogWindow::Dashboard).await?;
    Ok(DashboardReport::build(&materials, &logs, window))
}

/// GET /inventory/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<impl IntoResponse> {
    let report = build_report(&state, &query).await?;
    Ok(Json(DataResponse { data: report }))
}

fn report_meta(state: &AppState, actor: Option<Actor>) -> ReportMeta {
    ReportMeta {
        org_name: state.config.org_name.clone(),
        issued_by: actor.map_or_else(|| "-".to_string(), |a| a.name),
        generated_at: chrono::Utc::now(),
    }
}

/// GET /inventory/dashboard/report -- self-contained printable HTML.
pub async fn printable_report(
    actor: Option<Actor>,
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> AppResult<impl IntoResponse> {
    let report = build_report(&state, &query).await?;
    let meta = report_meta(&state, actor);
    tracing::info!(
        start = %report.window.start,
        end = %report.window.end,
        issued_by = %meta.issued_by,
        "Printable report generated"
    );
    Ok(Html(render_report(&report, &meta)))
}

/// GET /inventory/report -- current balances grouped by category.
pub async fn stock_report(
    actor: Option<Actor>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let materials = state.ledger.fetch_materials().await?;
    let groups = stock_groups(&materials);
    let meta = report_meta(&state, actor);
    tracing::info!(categories = groups.len(), issued_by = %meta.issued_by, "Stock report generated");
    Ok(Html(render_stock_report(&groups, &meta)))
}
