//! Derived views over the material and movement-log repositories.
//!
//! Everything here is a pure function of repository contents plus filter
//! input. Missing joins never fail; they substitute display text.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::material::{LogAction, Material, MaterialLog};
use crate::pagination::{self, Page, PAGE_SIZE};
use crate::types::{BusinessDate, DbId};

/// Name shown for a log whose material is gone and whose note mentions a deletion.
pub const DELETED_NAME: &str = "รายการถูกลบ";

/// Name shown for a log whose material cannot be found at all.
pub const UNKNOWN_NAME: &str = "Unknown/Deleted";

// ---------------------------------------------------------------------------
// Material index
// ---------------------------------------------------------------------------

/// Materials keyed by id, rebuilt whenever the material set is refreshed.
#[derive(Debug, Default)]
pub struct MaterialIndex<'a> {
    by_id: HashMap<DbId, &'a Material>,
}

impl<'a> MaterialIndex<'a> {
    pub fn new(materials: &'a [Material]) -> Self {
        Self {
            by_id: materials.iter().map(|m| (m.id, m)).collect(),
        }
    }

    pub fn get(&self, id: DbId) -> Option<&'a Material> {
        self.by_id.get(&id).copied()
    }

    /// Display name for a log's material, with the deleted/unknown fallbacks.
    pub fn display_name(&self, log: &MaterialLog) -> &'a str {
        match self.get(log.material_id) {
            Some(material) => material.name.as_str(),
            None if log.note.contains("Deleted") => DELETED_NAME,
            None => UNKNOWN_NAME,
        }
    }
}

// ---------------------------------------------------------------------------
// Material list
// ---------------------------------------------------------------------------

/// Which tab of the material list is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialTab {
    /// No tab selected: both roll stock and consumables. API callers that
    /// omit `tab` get the whole active list.
    #[default]
    All,
    /// Roll stock that goes through the printers.
    Printing,
    /// Everything that is not roll stock.
    Consumable,
}

impl MaterialTab {
    fn includes(self, material: &Material) -> bool {
        match self {
            Self::All => true,
            Self::Printing => material.is_roll(),
            Self::Consumable => !material.is_roll(),
        }
    }
}

/// Filters for the material list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaterialFilter {
    #[serde(default)]
    pub tab: MaterialTab,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: Option<String>,
}

fn stock_rank(material: &Material) -> u8 {
    if material.is_out_of_stock() {
        0
    } else if material.is_low_stock() {
        1
    } else {
        2
    }
}

fn compare_category(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Active materials matching `filter`, out of stock first, then low stock,
/// then by category. The sort is stable.
pub fn sorted_materials<'a>(materials: &'a [Material], filter: &MaterialFilter) -> Vec<&'a Material> {
    let query = filter.search.trim().to_lowercase();
    let category = filter.category.as_deref().filter(|c| !c.is_empty());

    let mut items: Vec<&Material> = materials
        .iter()
        .filter(|m| !m.is_deleted)
        .filter(|m| filter.tab.includes(m))
        .filter(|m| category.map_or(true, |c| m.category == c))
        .filter(|m| {
            query.is_empty()
                || m.name.to_lowercase().contains(&query)
                || m.brand.to_lowercase().contains(&query)
                || m.category.to_lowercase().contains(&query)
        })
        .collect();

    items.sort_by(|a, b| {
        stock_rank(a)
            .cmp(&stock_rank(b))
            .then_with(|| compare_category(&a.category, &b.category))
    });
    items
}

/// Monetary totals over a (filtered) material list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StockTotals {
    pub stock_value: f64,
    pub in_value: f64,
    pub out_value: f64,
}

pub fn stock_totals(materials: &[&Material]) -> StockTotals {
    materials.iter().fold(StockTotals::default(), |acc, m| StockTotals {
        stock_value: acc.stock_value + m.remaining_qty * m.cost_per_unit,
        in_value: acc.in_value + m.total_in * m.cost_per_unit,
        out_value: acc.out_value + m.total_out * m.cost_per_unit,
    })
}

// ---------------------------------------------------------------------------
// Movement log
// ---------------------------------------------------------------------------

/// Filters for the movement log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LogFilter {
    /// Matched against the joined material name and the log note.
    #[serde(default)]
    pub search: String,
    /// Exact category of the joined material.
    #[serde(default)]
    pub category: String,
    /// `YYYY-MM` prefix of the business date.
    #[serde(default)]
    pub month: String,
}

/// Logs matching `filter`, in input order.
pub fn filtered_logs<'a>(
    logs: &'a [MaterialLog],
    index: &MaterialIndex<'_>,
    filter: &LogFilter,
) -> Vec<&'a MaterialLog> {
    let query = filter.search.trim().to_lowercase();
    let month = filter.month.trim();

    logs.iter()
        .filter(|log| {
            if query.is_empty() {
                return true;
            }
            index.display_name(log).to_lowercase().contains(&query)
                || log.note.to_lowercase().contains(&query)
        })
        .filter(|log| {
            filter.category.is_empty()
                || index
                    .get(log.material_id)
                    .is_some_and(|m| m.category == filter.category)
        })
        .filter(|log| month.is_empty() || log.action_date.to_string().starts_with(month))
        .collect()
}

/// A log row joined with its material for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntryView {
    pub id: DbId,
    pub material_id: DbId,
    pub material_name: String,
    pub category: String,
    pub unit: String,
    pub action_type: LogAction,
    pub qty_change: f64,
    pub width_used: Option<f64>,
    pub length_used: Option<f64>,
    pub current_qty_snapshot: f64,
    pub note: String,
    pub action_by: String,
    pub action_date: BusinessDate,
}

impl LogEntryView {
    pub fn join(log: &MaterialLog, index: &MaterialIndex<'_>) -> Self {
        let material = index.get(log.material_id);
        Self {
            id: log.id,
            material_id: log.material_id,
            material_name: index.display_name(log).to_string(),
            category: material.map(|m| m.category.clone()).unwrap_or_default(),
            unit: material.map(|m| m.unit.clone()).unwrap_or_default(),
            action_type: log.action_type,
            qty_change: log.qty_change,
            width_used: log.width_used,
            length_used: log.length_used,
            current_qty_snapshot: log.current_qty_snapshot,
            note: log.note.clone(),
            action_by: log.action_by.clone(),
            action_date: log.action_date,
        }
    }
}

/// Filter state plus current page for the movement log screen.
///
/// Changing any filter input sends the browser back to page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogBrowser {
    filter: LogFilter,
    page: usize,
}

impl Default for LogBrowser {
    fn default() -> Self {
        Self {
            filter: LogFilter::default(),
            page: 1,
        }
    }
}

impl LogBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> &LogFilter {
        &self.filter
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if search != self.filter.search {
            self.filter.search = search;
            self.page = 1;
        }
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        if category != self.filter.category {
            self.filter.category = category;
            self.page = 1;
        }
    }

    pub fn set_month(&mut self, month: impl Into<String>) {
        let month = month.into();
        if month != self.filter.month {
            self.filter.month = month;
            self.page = 1;
        }
    }

    /// Replace the whole filter, resetting the page only if something changed.
    pub fn set_filter(&mut self, filter: LogFilter) {
        if filter != self.filter {
            self.filter = filter;
            self.page = 1;
        }
    }

    /// Move to `page`, clamped against the current result count.
    pub fn change_page(&mut self, page: usize, logs: &[MaterialLog], index: &MaterialIndex<'_>) {
        let count = filtered_logs(logs, index, &self.filter).len();
        self.page = pagination::clamp_page(page, pagination::total_pages(count, PAGE_SIZE));
    }

    /// The current page of joined log rows.
    pub fn current_page(&self, logs: &[MaterialLog], index: &MaterialIndex<'_>) -> Page<LogEntryView> {
        let rows: Vec<LogEntryView> = filtered_logs(logs, index, &self.filter)
            .into_iter()
            .map(|log| LogEntryView::join(log, index))
            .collect();
        pagination::paginate(&rows, self.page, PAGE_SIZE)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::material::MaterialType;
    use chrono::NaiveDate;

    pub(crate) fn material(id: DbId, name: &str, category: &str, remaining: f64, min_alert: f64) -> Material {
        Material {
            id,
            name: name.to_string(),
            category: category.to_string(),
            material_type: MaterialType::Piece,
            brand: String::new(),
            supplier: String::new(),
            details: String::new(),
            width: 0.0,
            remaining_qty: remaining,
            total_in: 0.0,
            total_out: 0.0,
            min_alert,
            unit: "ชิ้น".to_string(),
            cost_per_unit: 10.0,
            image_url: String::new(),
            is_deleted: false,
            created_at: chrono::Utc::now(),
        }
    }

    pub(crate) fn log(id: DbId, material_id: DbId, action: LogAction, qty: f64, date: &str, note: &str) -> MaterialLog {
        MaterialLog {
            id,
            material_id,
            action_type: action,
            qty_change: qty,
            width_used: None,
            length_used: None,
            current_qty_snapshot: qty,
            note: note.to_string(),
            action_by: "Nok".to_string(),
            action_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn vinyl_category_sorted_by_stock_state() {
        let materials = vec![
            material(1, "Vinyl A", "ไวนิล", 50.0, 5.0),
            material(2, "Sticker", "สติกเกอร์", 0.0, 5.0),
            material(3, "Vinyl B", "ไวนิล", 3.0, 5.0),
            material(4, "Ink", "หมึกพิมพ์", 1.0, 5.0),
            material(5, "Vinyl C", "ไวนิล", 0.0, 5.0),
        ];
        let filter = MaterialFilter {
            category: Some("ไวนิล".into()),
            ..Default::default()
        };

        let ids: Vec<DbId> = sorted_materials(&materials, &filter).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![5, 3, 1]);
    }

    #[test]
    fn deleted_materials_never_listed() {
        let mut gone = material(1, "Old vinyl", "ไวนิล", 0.0, 5.0);
        gone.is_deleted = true;
        let materials = vec![gone, material(2, "New vinyl", "ไวนิล", 9.0, 5.0)];

        let listed = sorted_materials(&materials, &MaterialFilter::default());
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, 2);
    }

    #[test]
    fn ties_keep_input_order() {
        let materials = vec![
            material(1, "B", "ไวนิล", 20.0, 5.0),
            material(2, "A", "ไวนิล", 30.0, 5.0),
            material(3, "C", "ไวนิล", 10.0, 5.0),
        ];
        let ids: Vec<DbId> = sorted_materials(&materials, &MaterialFilter::default())
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn search_matches_name_brand_and_category_case_insensitively() {
        let mut branded = material(1, "Glossy", "สติกเกอร์", 10.0, 1.0);
        branded.brand = "3M".into();
        let materials = vec![branded, material(2, "Eyelet", "อุปกรณ์ประกอบ", 10.0, 1.0)];

        let by_brand = MaterialFilter {
            search: "3m".into(),
            ..Default::default()
        };
        assert_eq!(sorted_materials(&materials, &by_brand).len(), 1);

        let by_name = MaterialFilter {
            search: "EYE".into(),
            ..Default::default()
        };
        assert_eq!(sorted_materials(&materials, &by_name)[0].id, 2);
    }

    #[test]
    fn tabs_split_roll_from_consumables() {
        let mut roll = material(1, "Vinyl", "ไวนิล", 10.0, 1.0);
        roll.material_type = MaterialType::Roll;
        let materials = vec![roll, material(2, "Ink", "หมึกพิมพ์", 10.0, 1.0)];

        let printing = MaterialFilter {
            tab: MaterialTab::Printing,
            ..Default::default()
        };
        let consumable = MaterialFilter {
            tab: MaterialTab::Consumable,
            ..Default::default()
        };
        assert_eq!(sorted_materials(&materials, &printing)[0].id, 1);
        assert_eq!(sorted_materials(&materials, &consumable)[0].id, 2);
        assert_eq!(sorted_materials(&materials, &printing).len(), 1);
        assert_eq!(sorted_materials(&materials, &consumable).len(), 1);
    }

    #[test]
    fn omitted_tab_lists_both_kinds() {
        let mut roll = material(1, "Vinyl", "ไวนิล", 10.0, 1.0);
        roll.material_type = MaterialType::Roll;
        let materials = vec![roll, material(2, "Ink", "หมึกพิมพ์", 10.0, 1.0)];

        let filter: MaterialFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter.tab, MaterialTab::All);
        assert_eq!(sorted_materials(&materials, &filter).len(), 2);
    }

    #[test]
    fn totals_are_scoped_to_the_filtered_list() {
        let mut a = material(1, "A", "ไวนิล", 10.0, 1.0);
        a.total_in = 12.0;
        a.total_out = 2.0;
        let b = material(2, "B", "หมึกพิมพ์", 5.0, 1.0);
        let materials = vec![a, b];

        let vinyl_only = MaterialFilter {
            category: Some("ไวนิล".into()),
            ..Default::default()
        };
        let totals = stock_totals(&sorted_materials(&materials, &vinyl_only));
        assert_eq!(totals.stock_value, 100.0);
        assert_eq!(totals.in_value, 120.0);
        assert_eq!(totals.out_value, 20.0);

        assert_eq!(stock_totals(&[]), StockTotals::default());
    }

    #[test]
    fn missing_material_uses_fallback_names() {
        let materials = vec![material(1, "Vinyl", "ไวนิล", 1.0, 1.0)];
        let index = MaterialIndex::new(&materials);

        assert_eq!(index.display_name(&log(1, 1, LogAction::In, 1.0, "2026-03-01", "")), "Vinyl");
        assert_eq!(
            index.display_name(&log(2, 9, LogAction::Delete, 0.0, "2026-03-01", "Deleted by admin")),
            DELETED_NAME
        );
        assert_eq!(index.display_name(&log(3, 9, LogAction::In, 1.0, "2026-03-01", "")), UNKNOWN_NAME);
    }

    #[test]
    fn log_filters_combine() {
        let materials = vec![
            material(1, "Vinyl 440g", "ไวนิล", 1.0, 1.0),
            material(2, "Ink cyan", "หมึกพิมพ์", 1.0, 1.0),
        ];
        let index = MaterialIndex::new(&materials);
        let logs = vec![
            log(1, 1, LogAction::In, 5.0, "2026-03-02", "restock"),
            log(2, 2, LogAction::Out, 1.0, "2026-03-05", "job 0503256901"),
            log(3, 1, LogAction::Out, 2.0, "2026-02-27", "banner"),
            log(4, 7, LogAction::In, 1.0, "2026-03-06", ""),
        ];

        let by_name = LogFilter {
            search: "VINYL".into(),
            ..Default::default()
        };
        assert_eq!(filtered_logs(&logs, &index, &by_name).len(), 2);

        let by_note = LogFilter {
            search: "0503".into(),
            ..Default::default()
        };
        assert_eq!(filtered_logs(&logs, &index, &by_note)[0].id, 2);

        let vinyl_march = LogFilter {
            category: "ไวนิล".into(),
            month: "2026-03".into(),
            ..Default::default()
        };
        let ids: Vec<DbId> = filtered_logs(&logs, &index, &vinyl_march).iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1]);

        let unknown = LogFilter {
            search: "unknown".into(),
            ..Default::default()
        };
        assert_eq!(filtered_logs(&logs, &index, &unknown)[0].id, 4);
    }

    #[test]
    fn empty_repositories_degrade_to_empty_views() {
        let index = MaterialIndex::new(&[]);
        assert!(filtered_logs(&[], &index, &LogFilter::default()).is_empty());
        assert!(sorted_materials(&[], &MaterialFilter::default()).is_empty());
        let page = LogBrowser::new().current_page(&[], &index);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn browser_resets_page_on_filter_change() {
        let materials = vec![material(1, "Vinyl", "ไวนิล", 1.0, 1.0)];
        let index = MaterialIndex::new(&materials);
        let logs: Vec<MaterialLog> = (1..=120)
            .map(|i| log(i, 1, LogAction::In, 1.0, "2026-03-01", "restock"))
            .collect();

        let mut browser = LogBrowser::new();
        browser.change_page(3, &logs, &index);
        assert_eq!(browser.page(), 3);

        browser.set_search("restock");
        assert_eq!(browser.page(), 1);

        browser.change_page(2, &logs, &index);
        browser.set_search("restock");
        assert_eq!(browser.page(), 2, "same value is not a change");

        browser.set_month("2026-03");
        assert_eq!(browser.page(), 1);

        browser.change_page(99, &logs, &index);
        assert_eq!(browser.page(), 3);
        assert_eq!(browser.current_page(&logs, &index).items.len(), 20);
    }

    #[test]
    fn page_lengths_sum_to_filtered_count() {
        let materials = vec![material(1, "Vinyl", "ไวนิล", 1.0, 1.0)];
        let index = MaterialIndex::new(&materials);
        let logs: Vec<MaterialLog> = (1..=173)
            .map(|i| {
                let note = if i % 3 == 0 { "keep" } else { "skip" };
                log(i, 1, LogAction::In, 1.0, "2026-03-01", note)
            })
            .collect();
        let filter = LogFilter {
            search: "keep".into(),
            ..Default::default()
        };
        let filtered = filtered_logs(&logs, &index, &filter);
        let pages = pagination::total_pages(filtered.len(), PAGE_SIZE);
        let total: usize = (1..=pages)
            .map(|p| pagination::paginate(&filtered, p, PAGE_SIZE).items.len())
            .sum();
        assert_eq!(total, filtered.len());
        assert_eq!(pages, 2);
    }
}
