//! Dashboard aggregates over a date window of the movement log.

use std::collections::HashMap;

use chrono::{Days, Months};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::material::{LogAction, Material, MaterialLog, MATERIAL_CATEGORIES};
use crate::types::{BusinessDate, DbId};
use crate::view::MaterialIndex;

const TOP_MOVERS: usize = 10;
const LOW_STOCK_ITEMS: usize = 10;
const TIMELINE_ENTRIES: usize = 20;

/// Name shown when a log's material is missing from the repository.
pub const UNKNOWN_MATERIAL: &str = "Unknown";

// ---------------------------------------------------------------------------
// Date window
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Week,
    Month,
    Custom,
}

/// Inclusive range of business dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: BusinessDate,
    pub end: BusinessDate,
}

impl DateWindow {
    /// Resolve a period relative to `today`.
    ///
    /// Custom ranges default to the trailing week when a bound is missing.
    pub fn resolve(
        period: Period,
        start: Option<BusinessDate>,
        end: Option<BusinessDate>,
        today: BusinessDate,
    ) -> Result<Self, CoreError> {
        let week_ago = today.checked_sub_days(Days::new(7)).unwrap_or(today);
        let window = match period {
            Period::Week => Self {
                start: week_ago,
                end: today,
            },
            Period::Month => Self {
                start: today
                    .checked_sub_months(Months::new(1))
                    .unwrap_or(week_ago),
                end: today,
            },
            Period::Custom => Self {
                start: start.unwrap_or(week_ago),
                end: end.unwrap_or(today),
            },
        };
        if window.start > window.end {
            return Err(CoreError::Validation(format!(
                "start date {} is after end date {}",
                window.start, window.end
            )));
        }
        Ok(window)
    }

    pub fn contains(&self, date: BusinessDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Logs whose business date falls inside the window, in input order.
    pub fn select<'a>(&self, logs: &'a [MaterialLog]) -> Vec<&'a MaterialLog> {
        logs.iter().filter(|log| self.contains(log.action_date)).collect()
    }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_materials: usize,
    pub total_remaining: f64,
    pub total_in: f64,
    pub total_out: f64,
    pub total_value: f64,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub total_items: usize,
    pub total_remaining: f64,
    pub total_in: f64,
    pub total_out: f64,
    pub total_value: f64,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopMover {
    pub material_id: DbId,
    pub material_name: String,
    pub category: String,
    pub unit: String,
    pub in_qty: f64,
    pub out_qty: f64,
    pub total_movement: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockItem {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub remaining_qty: f64,
    pub min_alert: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEntry {
    #[serde(flatten)]
    pub log: MaterialLog,
    pub material_name: String,
    pub material_unit: String,
}

fn active(materials: &[Material]) -> impl Iterator<Item = &Material> {
    materials.iter().filter(|m| !m.is_deleted)
}

fn in_out(logs: &[&MaterialLog]) -> (f64, f64) {
    logs.iter().fold((0.0, 0.0), |(i, o), log| match log.action_type {
        LogAction::In => (i + log.qty_change, o),
        LogAction::Out => (i, o + log.qty_change.abs()),
        _ => (i, o),
    })
}

fn is_low_but_not_out(m: &Material) -> bool {
    m.remaining_qty > 0.0 && m.remaining_qty <= m.min_alert
}

/// Headline numbers. Stock figures cover active materials; movement totals
/// cover the windowed logs.
pub fn summary(materials: &[Material], window_logs: &[&MaterialLog]) -> DashboardSummary {
    let (total_in, total_out) = in_out(window_logs);
    let mut summary = DashboardSummary {
        total_in,
        total_out,
        ..Default::default()
    };
    for m in active(materials) {
        summary.total_materials += 1;
        summary.total_remaining += m.remaining_qty;
        summary.total_value += m.stock_value();
        summary.low_stock_count += usize::from(is_low_but_not_out(m));
        summary.out_of_stock_count += usize::from(m.is_out_of_stock());
    }
    summary
}

/// One row per fixed category that has at least one active material.
pub fn category_breakdown(materials: &[Material], window_logs: &[&MaterialLog]) -> Vec<CategorySummary> {
    MATERIAL_CATEGORIES
        .iter()
        .filter_map(|&category| {
            let members: Vec<&Material> = active(materials).filter(|m| m.category == category).collect();
            if members.is_empty() {
                return None;
            }
            let logs: Vec<&MaterialLog> = window_logs
                .iter()
                .copied()
                .filter(|log| members.iter().any(|m| m.id == log.material_id))
                .collect();
            let (total_in, total_out) = in_out(&logs);
            Some(CategorySummary {
                category: category.to_string(),
                total_items: members.len(),
                total_remaining: members.iter().map(|m| m.remaining_qty).sum(),
                total_in,
                total_out,
                total_value: members.iter().map(|m| m.stock_value()).sum(),
                low_stock_count: members.iter().filter(|m| is_low_but_not_out(m)).count(),
                out_of_stock_count: members.iter().filter(|m| m.is_out_of_stock()).count(),
            })
        })
        .collect()
}

/// Materials with the most IN + OUT volume in the window, top ten.
///
/// Ties keep the order in which materials first appear in the logs. Only IN
/// and OUT rows count as movement.
pub fn top_movers(window_logs: &[&MaterialLog], index: &MaterialIndex<'_>) -> Vec<TopMover> {
    let mut order: Vec<DbId> = Vec::new();
    let mut totals: HashMap<DbId, (f64, f64)> = HashMap::new();

    for log in window_logs {
        let delta = match log.action_type {
            LogAction::In => (log.qty_change, 0.0),
            LogAction::Out => (0.0, log.qty_change.abs()),
            LogAction::Create | LogAction::Delete => continue,
        };
        let entry = totals.entry(log.material_id).or_insert_with(|| {
            order.push(log.material_id);
            (0.0, 0.0)
        });
        entry.0 += delta.0;
        entry.1 += delta.1;
    }

    let mut movers: Vec<TopMover> = order
        .into_iter()
        .map(|id| {
            let (in_qty, out_qty) = totals.get(&id).copied().unwrap_or_default();
            let material = index.get(id);
            TopMover {
                material_id: id,
                material_name: material.map_or(UNKNOWN_MATERIAL, |m| m.name.as_str()).to_string(),
                category: material.map(|m| m.category.clone()).unwrap_or_default(),
                unit: material.map(|m| m.unit.clone()).unwrap_or_default(),
                in_qty,
                out_qty,
                total_movement: in_qty + out_qty,
            }
        })
        .collect();

    movers.sort_by(|a, b| b.total_movement.total_cmp(&a.total_movement));
    movers.truncate(TOP_MOVERS);
    movers
}

/// Active materials at or below their alert level, emptiest first, top ten.
pub fn low_stock_items(materials: &[Material]) -> Vec<LowStockItem> {
    let mut items: Vec<&Material> = active(materials).filter(|m| m.is_low_stock()).collect();
    items.sort_by(|a, b| a.remaining_qty.total_cmp(&b.remaining_qty));
    items
        .into_iter()
        .take(LOW_STOCK_ITEMS)
        .map(|m| LowStockItem {
            id: m.id,
            name: m.name.clone(),
            category: m.category.clone(),
            remaining_qty: m.remaining_qty,
            min_alert: m.min_alert,
            unit: m.unit.clone(),
        })
        .collect()
}

/// The first twenty windowed logs, joined with material name and unit.
pub fn activity_timeline(window_logs: &[&MaterialLog], index: &MaterialIndex<'_>) -> Vec<ActivityEntry> {
    window_logs
        .iter()
        .take(TIMELINE_ENTRIES)
        .map(|&log| {
            let material = index.get(log.material_id);
            ActivityEntry {
                log: log.clone(),
                material_name: material.map_or(UNKNOWN_MATERIAL, |m| m.name.as_str()).to_string(),
                material_unit: material.map(|m| m.unit.clone()).unwrap_or_default(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Report bundle
// ---------------------------------------------------------------------------

/// Everything the dashboard and the printable report show for one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub window: DateWindow,
    pub summary: DashboardSummary,
    pub categories: Vec<CategorySummary>,
    pub low_stock: Vec<LowStockItem>,
    pub top_movers: Vec<TopMover>,
    pub timeline: Vec<ActivityEntry>,
}

impl DashboardReport {
    pub fn build(materials: &[Material], logs: &[MaterialLog], window: DateWindow) -> Self {
        let index = MaterialIndex::new(materials);
        let window_logs = window.select(logs);
        Self {
            window,
            summary: summary(materials, &window_logs),
            categories: category_breakdown(materials, &window_logs),
            low_stock: low_stock_items(materials),
            top_movers: top_movers(&window_logs, &index),
            timeline: activity_timeline(&window_logs, &index),
        }
    }
}
