//! Printable job sheet (work order and delivery note in one page).
//!
//! The letterhead comes from [`ProviderInfo`]; everything else is read off
//! the [`JobOrder`]. Text is HTML-escaped before it is written.

use std::fmt::Write as _;

use crate::catalog::ProviderInfo;
use crate::order::JobOrder;
use crate::report::{escape_html, format_amount, thai_long_date};

const STYLE: &str = r#"
@page { size: A4; margin: 12mm; }
body { font-family: 'Sarabun', 'Tahoma', sans-serif; font-size: 13px; color: #000; margin: 0; padding: 16px; }
.letterhead { display: flex; align-items: center; gap: 16px; border-bottom: 2px solid #000; padding-bottom: 10px; }
.letterhead img { max-height: 64px; max-width: 140px; object-fit: contain; }
.provider-name { font-size: 18px; font-weight: bold; }
.provider-line { font-size: 12px; color: #333; }
.title { text-align: center; font-size: 18px; font-weight: bold; margin: 14px 0; }
.job-meta { display: grid; grid-template-columns: 1fr 1fr; gap: 4px 24px; margin-bottom: 12px; }
table { width: 100%; border-collapse: collapse; }
th, td { border: 1px solid #000; padding: 6px; }
th { background: #f2f2f2; }
.text-right { text-align: right; }
.text-center { text-align: center; }
.total-row td { font-weight: bold; }
.signatures { display: flex; justify-content: space-around; margin-top: 48px; }
.signature { text-align: center; width: 40%; }
.signature-line { border-top: 1px dotted #000; margin-bottom: 6px; height: 36px; }
"#;

fn or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => escape_html(text),
        _ => "-".to_string(),
    }
}

/// Render one job order as a printable sheet.
pub fn render_job_sheet(job: &JobOrder, provider: &ProviderInfo) -> String {
    let mut html = String::with_capacity(6 * 1024);
    let job_id = escape_html(&job.job_id);
    let created = job.created_at.with_timezone(&chrono::Local).date_naive();

    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>ใบสั่งงาน {job_id}</title>
<style>{STYLE}</style>
</head>
<body>
<div class="letterhead">
"#
    );
    if let Some(logo) = provider.logo_url.as_deref().filter(|url| !url.trim().is_empty()) {
        let _ = writeln!(html, r#"  <img src="{}" alt="logo">"#, escape_html(logo));
    }
    let _ = write!(
        html,
        r#"  <div>
    <div class="provider-name">{name}</div>
    <div class="provider-line">{address}</div>
    <div class="provider-line">โทร: {phone} | เลขภาษี: {tax_id}</div>
  </div>
</div>
<div class="title">ใบสั่งงาน / ใบส่งของ</div>
<div class="job-meta">
  <div><strong>ลูกค้า:</strong> {customer}</div>
  <div><strong>เลขที่งาน:</strong> {job_id}</div>
  <div><strong>สาขา:</strong> {branch}</div>
  <div><strong>วันที่:</strong> {date}</div>
  <div><strong>งาน:</strong> {event}</div>
  <div><strong>ผู้รับออเดอร์:</strong> {created_by}</div>
</div>
<table>
<thead><tr><th class="text-center">#</th><th>รายการ</th><th class="text-center">ขนาด</th><th class="text-center">จำนวน</th><th class="text-right">ราคา/หน่วย</th><th class="text-right">รวม</th></tr></thead>
<tbody>
"#,
        name = escape_html(&provider.org_name),
        address = escape_html(&provider.address),
        phone = escape_html(&provider.phone),
        tax_id = escape_html(&provider.tax_id),
        customer = escape_html(&job.customer_name),
        branch = or_dash(job.branch.as_deref()),
        date = thai_long_date(created),
        event = or_dash(job.event_name.as_deref()),
        created_by = or_dash(Some(job.created_by.as_str())),
    );

    for (index, item) in job.items.iter().enumerate() {
        let mut name = escape_html(item.display_name());
        if let Some(note) = item.note.as_deref().filter(|n| !n.trim().is_empty()) {
            let _ = write!(name, "<br><small>{}</small>", escape_html(note));
        }
        let _ = writeln!(
            html,
            r#"<tr><td class="text-center">{}</td><td>{name}</td><td class="text-center">{}</td><td class="text-center">{}</td><td class="text-right">{}</td><td class="text-right">{}</td></tr>"#,
            index + 1,
            escape_html(&item.size_label()),
            item.qty,
            format_amount(item.price),
            format_amount(item.total),
        );
    }

    let _ = write!(
        html,
        r#"<tr class="total-row"><td colspan="5" class="text-right">รวมสุทธิ</td><td class="text-right">{} บาท</td></tr>
</tbody>
</table>
<div class="signatures">
  <div class="signature"><div class="signature-line"></div>ผู้รับสินค้า</div>
  <div class="signature"><div class="signature-line"></div>ผู้ส่งสินค้า</div>
</div>
</body>
</html>
"#,
        format_amount(job.total_price),
    );

    html
}
