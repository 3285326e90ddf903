//! CSV export of the movement log.

use crate::error::CoreError;
use crate::material::{LogAction, MaterialLog};
use crate::view::MaterialIndex;

/// Download name offered to the browser.
pub const LOG_EXPORT_FILENAME: &str = "stock_logs.csv";

/// Byte-order mark so spreadsheet tools pick up UTF-8.
pub const UTF8_BOM: &str = "\u{feff}";

pub const LOG_EXPORT_HEADER: &str = "วันที่,รายการ,หมวดหมู่,ประเภท,จำนวน,ทุน,รวม,คงเหลือ,รายละเอียด,ผู้ทำ";

/// Thai label for the "type" column.
pub fn action_label(action: LogAction) -> &'static str {
    match action {
        LogAction::In => "รับเข้า",
        LogAction::Out => "เบิกออก",
        LogAction::Create => "เพิ่มใหม่",
        LogAction::Delete => "ลบรายการ",
    }
}

/// Always quote, doubling embedded quotes.
fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Quote only when the value would otherwise break the row.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        quoted(value)
    } else {
        value.to_string()
    }
}

/// Render the given logs as a CSV document (BOM, header, one row per log).
///
/// The value column uses the material's current cost, not the cost at the
/// time of the movement. An empty selection is rejected.
pub fn export_logs_csv(logs: &[&MaterialLog], index: &MaterialIndex<'_>) -> Result<String, CoreError> {
    if logs.is_empty() {
        return Err(CoreError::Validation("no data".into()));
    }

    let mut out = String::with_capacity(128 * (logs.len() + 1));
    out.push_str(UTF8_BOM);
    out.push_str(LOG_EXPORT_HEADER);
    out.push('\n');

    for log in logs {
        let material = index.get(log.material_id);
        let cost = material.map_or(0.0, |m| m.cost_per_unit);
        let category = material
            .map(|m| m.category.as_str())
            .filter(|c| !c.is_empty())
            .unwrap_or("-");

        let row = [
            log.action_date.to_string(),
            quoted(index.display_name(log)),
            csv_escape(category),
            action_label(log.action_type).to_string(),
            log.qty_change.to_string(),
            cost.to_string(),
            (log.qty_change * cost).to_string(),
            log.current_qty_snapshot.to_string(),
            quoted(&log.note),
            csv_escape(&log.action_by),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    Ok(out)
}
