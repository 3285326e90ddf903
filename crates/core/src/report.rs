//! Printable inventory reports.
//!
//! [`render_report`] renders a [`DashboardReport`] and [`render_stock_report`]
//! the current balance of every active material grouped by category. Both are
//! self-contained HTML pages sized for A4. The output depends only on the
//! inputs and the timestamp, so the same inputs always print the same document.

use std::fmt::Write;

use chrono::Datelike;

use crate::dashboard::DashboardReport;
use crate::material::{Material, MATERIAL_CATEGORIES};
use crate::types::{BusinessDate, Timestamp};

const THAI_MONTHS: [&str; 12] = [
    "มกราคม",
    "กุมภาพันธ์",
    "มีนาคม",
    "เมษายน",
    "พฤษภาคม",
    "มิถุนายน",
    "กรกฎาคม",
    "สิงหาคม",
    "กันยายน",
    "ตุลาคม",
    "พฤศจิกายน",
    "ธันวาคม",
];

const STYLE: &str = r#"
@media print {
  @page { margin: 15mm; size: A4; }
  body { -webkit-print-color-adjust: exact !important; print-color-adjust: exact !important; }
}
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: 'Tahoma', 'Segoe UI', sans-serif; font-size: 11px; line-height: 1.4; color: #333; padding: 20px; }
.header { text-align: center; margin-bottom: 20px; padding-bottom: 15px; border-bottom: 2px solid #2563eb; }
.header h1 { font-size: 20px; color: #1e40af; margin-bottom: 5px; }
.header .org-name { font-size: 14px; color: #666; }
.header .period { font-size: 12px; color: #888; margin-top: 8px; }
.summary-grid { display: grid; grid-template-columns: repeat(4, 1fr); gap: 10px; margin-bottom: 20px; }
.summary-grid.two { grid-template-columns: repeat(2, 1fr); }
.summary-card { background: #f8fafc; border: 1px solid #e2e8f0; border-radius: 8px; padding: 12px; text-align: center; }
.summary-card .label { font-size: 10px; color: #64748b; }
.summary-card .value { font-size: 18px; font-weight: bold; color: #1e293b; }
.summary-card.warning { background: #fef3c7; border-color: #fcd34d; }
.summary-card.danger { background: #fee2e2; border-color: #fca5a5; }
.section { margin-bottom: 20px; }
.section-title { font-size: 14px; font-weight: bold; color: #1e40af; margin-bottom: 10px; padding-bottom: 5px; border-bottom: 1px solid #e2e8f0; }
table { width: 100%; border-collapse: collapse; font-size: 10px; }
th { background: #f1f5f9; padding: 8px 6px; text-align: left; font-weight: bold; border-bottom: 2px solid #cbd5e1; }
td { padding: 6px; border-bottom: 1px solid #e2e8f0; }
.text-right { text-align: right; }
.text-center { text-align: center; }
.text-green { color: #16a34a; }
.text-red { color: #dc2626; }
.text-yellow { color: #ca8a04; }
.low-stock-row { background: #fef3c7; }
.out-of-stock-row { background: #fee2e2; }
.category-title { font-size: 16px; font-weight: bold; color: #374151; margin: 18px 0 8px; padding-bottom: 4px; border-bottom: 2px solid #d1d5db; }
.status-out { color: #dc2626; font-weight: bold; }
.status-low { color: #ea580c; font-weight: bold; }
.status-normal { color: #374151; font-weight: bold; }
.footer { margin-top: 30px; padding-top: 15px; border-top: 1px solid #e2e8f0; display: flex; justify-content: space-between; font-size: 10px; color: #64748b; }
"#;

/// Who the report is for and who printed it.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    pub org_name: String,
    pub issued_by: String,
    pub generated_at: Timestamp,
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `9 มีนาคม 2569`: day, Thai month name, Buddhist-era year.
pub fn thai_long_date(date: BusinessDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        THAI_MONTHS[date.month0() as usize],
        date.year() + 543
    )
}

fn group_thousands(amount: f64) -> (String, String) {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    (grouped, frac.to_string())
}

/// Amount with thousands separators and two decimals, no currency sign.
pub fn format_amount(amount: f64) -> String {
    let (grouped, frac) = group_thousands(amount);
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac}")
}

/// Baht amount with thousands separators and two decimals.
pub fn format_baht(amount: f64) -> String {
    let (grouped, frac) = group_thousands(amount);
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}฿{grouped}.{frac}")
}

/// Render the printable report.
pub fn render_report(report: &DashboardReport, meta: &ReportMeta) -> String {
    let period = format!(
        "{} - {}",
        thai_long_date(report.window.start),
        thai_long_date(report.window.end)
    );
    let s = &report.summary;
    let mut html = String::with_capacity(16 * 1024);

    // Writing into a String cannot fail.
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>รายงานสรุปคลังวัสดุ - {period}</title>
<style>{STYLE}</style>
</head>
<body>
<div class="header">
  <h1>รายงานสรุปคลังวัสดุ</h1>
  <div class="org-name">{org}</div>
  <div class="period">ช่วงเวลา: {period}</div>
</div>
<div class="summary-grid">
  <div class="summary-card"><div class="label">วัสดุทั้งหมด</div><div class="value">{total}</div><div class="label">รายการ</div></div>
  <div class="summary-card"><div class="label">มูลค่าคงเหลือ</div><div class="value">{value}</div></div>
  <div class="summary-card{low_class}"><div class="label">ใกล้หมด</div><div class="value text-yellow">{low}</div><div class="label">รายการ</div></div>
  <div class="summary-card{out_class}"><div class="label">หมดแล้ว</div><div class="value text-red">{out}</div><div class="label">รายการ</div></div>
</div>
<div class="summary-grid two">
  <div class="summary-card"><div class="label">รับเข้าในช่วงนี้</div><div class="value text-green">+{total_in:.2}</div><div class="label">หน่วย</div></div>
  <div class="summary-card"><div class="label">เบิกออกในช่วงนี้</div><div class="value text-red">-{total_out:.2}</div><div class="label">หน่วย</div></div>
</div>
"#,
        period = escape_html(&period),
        org = escape_html(&meta.org_name),
        total = s.total_materials,
        value = format_baht(s.total_value),
        low = s.low_stock_count,
        low_class = if s.low_stock_count > 0 { " warning" } else { "" },
        out = s.out_of_stock_count,
        out_class = if s.out_of_stock_count > 0 { " danger" } else { "" },
        total_in = s.total_in,
        total_out = s.total_out,
    );

    html.push_str(
        r#"<div class="section">
<div class="section-title">สรุปตามหมวดหมู่</div>
<table>
<thead><tr><th>หมวดหมู่</th><th class="text-center">จำนวนรายการ</th><th class="text-right">คงเหลือ</th><th class="text-right">รับเข้า</th><th class="text-right">เบิกออก</th><th class="text-right">มูลค่า</th><th class="text-center">ใกล้หมด</th><th class="text-center">หมด</th></tr></thead>
<tbody>
"#,
    );
    for cat in &report.categories {
        let _ = writeln!(
            html,
            r#"<tr><td><strong>{}</strong></td><td class="text-center">{}</td><td class="text-right">{:.2}</td><td class="text-right text-green">+{:.2}</td><td class="text-right text-red">-{:.2}</td><td class="text-right">{}</td><td class="text-center">{}</td><td class="text-center">{}</td></tr>"#,
            escape_html(&cat.category),
            cat.total_items,
            cat.total_remaining,
            cat.total_in,
            cat.total_out,
            format_baht(cat.total_value),
            cat.low_stock_count,
            cat.out_of_stock_count,
        );
    }
    html.push_str("</tbody>\n</table>\n</div>\n");

    if !report.low_stock.is_empty() {
        html.push_str(
            r#"<div class="section">
<div class="section-title">รายการที่ต้องสั่งซื้อ (ใกล้หมด/หมดแล้ว)</div>
<table>
<thead><tr><th>ชื่อวัสดุ</th><th>หมวดหมู่</th><th class="text-right">คงเหลือ</th><th class="text-right">เตือนที่</th><th>สถานะ</th></tr></thead>
<tbody>
"#,
        );
        for item in &report.low_stock {
            let (row_class, status) = if item.remaining_qty == 0.0 {
                ("out-of-stock-row", "หมดแล้ว")
            } else {
                ("low-stock-row", "ใกล้หมด")
            };
            let unit = escape_html(&item.unit);
            let _ = writeln!(
                html,
                r#"<tr class="{row_class}"><td><strong>{}</strong></td><td>{}</td><td class="text-right">{:.2} {unit}</td><td class="text-right">{} {unit}</td><td>{status}</td></tr>"#,
                escape_html(&item.name),
                escape_html(&item.category),
                item.remaining_qty,
                item.min_alert,
            );
        }
        html.push_str("</tbody>\n</table>\n</div>\n");
    }

    html.push_str(
        r#"<div class="section">
<div class="section-title">Top 10 วัสดุที่เคลื่อนไหวมากที่สุด</div>
<table>
<thead><tr><th>ชื่อวัสดุ</th><th>หมวดหมู่</th><th class="text-right">รับเข้า</th><th class="text-right">เบิกออก</th><th class="text-right">รวมเคลื่อนไหว</th></tr></thead>
<tbody>
"#,
    );
    for mover in &report.top_movers {
        let _ = writeln!(
            html,
            r#"<tr><td><strong>{}</strong></td><td>{}</td><td class="text-right text-green">+{:.2}</td><td class="text-right text-red">-{:.2}</td><td class="text-right"><strong>{:.2}</strong> {}</td></tr>"#,
            escape_html(&mover.material_name),
            escape_html(&mover.category),
            mover.in_qty,
            mover.out_qty,
            mover.total_movement,
            escape_html(&mover.unit),
        );
    }
    html.push_str("</tbody>\n</table>\n</div>\n");

    let generated = meta.generated_at.with_timezone(&chrono::Local);
    let _ = write!(
        html,
        r#"<div class="footer">
  <div>ออกรายงานโดย: {issuer}</div>
  <div>วันที่ออกรายงาน: {date} {time}</div>
</div>
</body>
</html>
"#,
        issuer = escape_html(if meta.issued_by.is_empty() { "-" } else { &meta.issued_by }),
        date = thai_long_date(generated.date_naive()),
        time = generated.format("%H:%M"),
    );

    html
}

// ---------------------------------------------------------------------------
// Current stock by category
// ---------------------------------------------------------------------------

/// Stock state shown in the status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    Normal,
    Low,
    Out,
}

impl StockStatus {
    pub fn of(material: &Material) -> Self {
        if material.is_out_of_stock() {
            Self::Out
        } else if material.is_low_stock() {
            Self::Low
        } else {
            Self::Normal
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "ปกติ",
            Self::Low => "ใกล้หมด",
            Self::Out => "หมดแล้ว",
        }
    }

    fn css_class(self) -> &'static str {
        match self {
            Self::Normal => "status-normal",
            Self::Low => "status-low",
            Self::Out => "status-out",
        }
    }
}

/// Active materials of one category, in repository order.
#[derive(Debug, Clone, PartialEq)]
pub struct StockGroup<'a> {
    pub category: &'a str,
    pub materials: Vec<&'a Material>,
}

/// Group active materials by category.
///
/// Fixed categories come first in their usual order; any other category
/// follows in the order it is first seen. Empty categories are left out.
pub fn stock_groups(materials: &[Material]) -> Vec<StockGroup<'_>> {
    let mut groups: Vec<StockGroup<'_>> = Vec::new();
    for material in materials.iter().filter(|m| !m.is_deleted) {
        match groups.iter_mut().find(|g| g.category == material.category) {
            Some(group) => group.materials.push(material),
            None => groups.push(StockGroup {
                category: &material.category,
                materials: vec![material],
            }),
        }
    }
    let rank = |category: &str| {
        MATERIAL_CATEGORIES
            .iter()
            .position(|c| *c == category)
            .unwrap_or(MATERIAL_CATEGORIES.len())
    };
    groups.sort_by_key(|g| rank(g.category));
    groups
}

/// Render the category-grouped stock report.
pub fn render_stock_report(groups: &[StockGroup<'_>], meta: &ReportMeta) -> String {
    let mut html = String::with_capacity(8 * 1024);
    let generated = meta.generated_at.with_timezone(&chrono::Local);
    let today = thai_long_date(generated.date_naive());

    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>รายงานวัสดุ - {today}</title>
<style>{STYLE}</style>
</head>
<body>
<div class="header">
  <h1>รายงานวัสดุ</h1>
  <div class="org-name">{org}</div>
  <div class="period">ยอดคงเหลือ ณ วันที่ {today}</div>
</div>
"#,
        org = escape_html(&meta.org_name),
    );

    if groups.is_empty() {
        html.push_str("<p class=\"text-center\">ยังไม่มีวัสดุในคลัง</p>\n");
    }

    for group in groups {
        let _ = write!(
            html,
            r#"<div class="section">
<div class="category-title">{}</div>
<table>
<thead><tr><th>ชื่อวัสดุ</th><th class="text-center">รับเข้า</th><th class="text-center">เบิกออก</th><th class="text-center">คงเหลือ</th><th class="text-center">สถานะ</th></tr></thead>
<tbody>
"#,
            escape_html(group.category)
        );
        for material in &group.materials {
            let status = StockStatus::of(material);
            let unit = escape_html(&material.unit);
            let _ = writeln!(
                html,
                r#"<tr><td>{}</td><td class="text-center">{:.2} {unit}</td><td class="text-center">{:.2} {unit}</td><td class="text-center"><strong>{:.2} {unit}</strong></td><td class="text-center {}">{}</td></tr>"#,
                escape_html(&material.name),
                material.total_in,
                material.total_out,
                material.remaining_qty,
                status.css_class(),
                status.label(),
            );
        }
        html.push_str("</tbody>\n</table>\n</div>\n");
    }

    let _ = write!(
        html,
        r#"<div class="footer">
  <div>ออกรายงานโดย: {issuer}</div>
  <div>วันที่ออกรายงาน: {today} {time}</div>
</div>
</body>
</html>
"#,
        issuer = escape_html(if meta.issued_by.is_empty() { "-" } else { &meta.issued_by }),
        time = generated.format("%H:%M"),
    );

    html
}
