//! Order intake: line-item pricing, job ids, and the job status machine.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::catalog::Customer;
use crate::error::CoreError;
use crate::types::{BusinessDate, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum number of line items on one order.
pub const MAX_ORDER_ITEMS: usize = 30;

/// Service name for free-form work priced by hand.
pub const CUSTOM_SERVICE_NAME: &str = "อื่นๆ";

/// Offset from the Gregorian to the Buddhist-era year used in job ids.
const BUDDHIST_ERA_OFFSET: i32 = 543;

// ---------------------------------------------------------------------------
// Line items
// ---------------------------------------------------------------------------

/// Unit the customer measured the artwork in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    #[default]
    Cm,
    M,
}

impl SizeUnit {
    fn to_meters(self, value: f64) -> f64 {
        match self {
            Self::Cm => value / 100.0,
            Self::M => value,
        }
    }
}

fn default_qty() -> u32 {
    1
}

/// A line item as submitted by the order form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub service_name: String,
    #[serde(default)]
    pub custom_name: Option<String>,
    #[serde(default)]
    pub w: f64,
    #[serde(default)]
    pub h: f64,
    #[serde(default)]
    pub unit: SizeUnit,
    #[serde(default = "default_qty")]
    pub qty: u32,
    /// Price per square meter (or per unit when no size is given).
    #[serde(default)]
    pub unit_price: f64,
    /// Hand-entered price, only used for custom work.
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub note: Option<String>,
}

/// A priced line item as stored on a job order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub service_name: String,
    pub custom_name: Option<String>,
    pub w: f64,
    pub h: f64,
    pub unit: SizeUnit,
    pub qty: u32,
    pub base_price: f64,
    pub price: f64,
    pub total: f64,
    pub note: Option<String>,
}

/// Price one line item.
///
/// With a size: `ceil(area_m2 * base_price)`. Without a size: the base price.
/// Custom work (base price 0) keeps the hand-entered price.
pub fn price_item(input: &OrderItemInput) -> Result<OrderItem, CoreError> {
    if input.qty == 0 {
        return Err(CoreError::Validation("quantity must be at least 1".into()));
    }
    for (field, value) in [
        ("w", input.w),
        ("h", input.h),
        ("unit_price", input.unit_price),
        ("price", input.price),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::Validation(format!(
                "{field} must be a non-negative number"
            )));
        }
    }

    let base_price = if input.service_name == CUSTOM_SERVICE_NAME {
        0.0
    } else {
        input.unit_price
    };

    let area = input.unit.to_meters(input.w) * input.unit.to_meters(input.h);

    let price = if base_price <= 0.0 {
        input.price
    } else if area > 0.0 {
        (area * base_price).ceil()
    } else {
        base_price.ceil()
    };

    Ok(OrderItem {
        service_name: input.service_name.clone(),
        custom_name: input.custom_name.clone(),
        w: input.w,
        h: input.h,
        unit: input.unit,
        qty: input.qty,
        base_price,
        price,
        total: price * f64::from(input.qty),
        note: input.note.clone(),
    })
}

impl OrderItem {
    /// Name printed on the job sheet. Custom work shows its own name.
    pub fn display_name(&self) -> &str {
        self.custom_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.service_name)
    }

    /// `100 x 200 cm`, or `-` for items sold without a size.
    pub fn size_label(&self) -> String {
        if self.w > 0.0 || self.h > 0.0 {
            let unit = match self.unit {
                SizeUnit::Cm => "cm",
                SizeUnit::M => "m",
            };
            format!("{} x {} {unit}", self.w, self.h)
        } else {
            "-".to_string()
        }
    }
}

/// Sum of line totals.
pub fn order_total(items: &[OrderItem]) -> f64 {
    items.iter().map(|item| item.total).sum()
}

// ---------------------------------------------------------------------------
// Job status
// ---------------------------------------------------------------------------

/// Production status of a job order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    WaitingApproval,
    Received,
    Queueing,
    Printing,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub const ALL: [JobStatus; 6] = [
        Self::WaitingApproval,
        Self::Received,
        Self::Queueing,
        Self::Printing,
        Self::Completed,
        Self::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::WaitingApproval => "waiting_approval",
            Self::Received => "received",
            Self::Queueing => "queueing",
            Self::Printing => "printing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// Thai label shown on status badges and confirmation prompts.
    pub fn label(self) -> &'static str {
        match self {
            Self::WaitingApproval => "รออนุมัติ",
            Self::Received => "เข้าสู่ระบบแล้ว",
            Self::Queueing => "รอคิวปริ้น",
            Self::Printing => "กำลังปริ้น",
            Self::Completed => "เสร็จแล้ว",
            Self::Cancelled => "ยกเลิก",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Check a status change. Terminal jobs are frozen; any other job may move
    /// to any different status.
    pub fn check_transition(self, next: JobStatus) -> Result<(), CoreError> {
        if self == next {
            return Err(CoreError::Validation(format!(
                "job is already '{}'",
                self.as_str()
            )));
        }
        if self.is_terminal() {
            return Err(CoreError::Conflict(format!(
                "job is '{}' and can no longer change status",
                self.as_str()
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Job orders
// ---------------------------------------------------------------------------

/// A submitted job order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOrder {
    pub id: DbId,
    pub job_id: String,
    pub customer_name: String,
    pub branch: Option<String>,
    pub event_name: Option<String>,
    pub event_date: Option<BusinessDate>,
    pub items: Vec<OrderItem>,
    pub total_price: f64,
    pub created_by: String,
    pub status: JobStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order form payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOrderInput {
    /// Saved customer to fill the name and branch from.
    #[serde(default)]
    pub customer_id: Option<DbId>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub event_name: Option<String>,
    pub event_date: Option<BusinessDate>,
    pub items: Vec<OrderItemInput>,
}

impl JobOrderInput {
    /// Take the customer's name, and its address line when no branch was typed.
    pub fn fill_from_customer(&mut self, customer: &Customer) {
        self.customer_name = customer.name.clone();
        let typed = self.branch.as_deref().is_some_and(|b| !b.trim().is_empty());
        if !typed {
            let line = customer.branch_line();
            self.branch = (!line.trim().is_empty()).then_some(line);
        }
    }
}

/// A fully priced order ready to be inserted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewJobOrder {
    pub job_id: String,
    pub customer_name: String,
    pub branch: Option<String>,
    pub event_name: Option<String>,
    pub event_date: Option<BusinessDate>,
    pub items: Vec<OrderItem>,
    pub total_price: f64,
    pub created_by: String,
    pub status: JobStatus,
}

/// Validate and price an order form. New orders start in `waiting_approval`.
pub fn prepare_order(
    input: &JobOrderInput,
    job_id: String,
    created_by: &str,
) -> Result<NewJobOrder, CoreError> {
    let customer_name = input.customer_name.trim();
    if customer_name.is_empty() {
        return Err(CoreError::Validation("customer name is required".into()));
    }
    if input.event_date.is_none() {
        return Err(CoreError::Validation("event date is required".into()));
    }
    if input.items.is_empty() {
        return Err(CoreError::Validation("order has no items".into()));
    }
    if input.items.len() > MAX_ORDER_ITEMS {
        return Err(CoreError::Validation(format!(
            "an order may have at most {MAX_ORDER_ITEMS} items"
        )));
    }

    let items = input
        .items
        .iter()
        .map(price_item)
        .collect::<Result<Vec<_>, _>>()?;
    let total_price = order_total(&items);

    Ok(NewJobOrder {
        job_id,
        customer_name: customer_name.to_string(),
        branch: input.branch.clone(),
        event_name: input.event_name.clone(),
        event_date: input.event_date,
        items,
        total_price,
        created_by: created_by.to_string(),
        status: JobStatus::WaitingApproval,
    })
}

/// Job id prefix for a date: `DDMM` followed by the Buddhist-era year.
pub fn job_id_prefix(date: BusinessDate) -> String {
    format!(
        "{:02}{:02}{}",
        date.day(),
        date.month(),
        date.year() + BUDDHIST_ERA_OFFSET
    )
}

/// Next job id after `latest` (the highest existing id with this prefix).
///
/// The sequence is the last two digits of the id; the first job of the day
/// gets `00`.
pub fn next_job_id(prefix: &str, latest: Option<&str>) -> String {
    let next = latest
        .filter(|id| id.starts_with(prefix) && id.len() >= prefix.len() + 2)
        .and_then(|id| id[id.len() - 2..].parse::<u32>().ok())
        .map_or(0, |n| n + 1);
    format!("{prefix}{next:02}")
}

// ---------------------------------------------------------------------------
// Job history view
// ---------------------------------------------------------------------------

/// Filters for the job history list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobHistoryFilter {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: Option<JobStatus>,
}

/// Case-insensitive match on job id or customer name, plus exact status.
pub fn filter_jobs<'a>(jobs: &'a [JobOrder], filter: &JobHistoryFilter) -> Vec<&'a JobOrder> {
    let query = filter.search.trim().to_lowercase();
    jobs.iter()
        .filter(|job| {
            query.is_empty()
                || job.job_id.to_lowercase().contains(&query)
                || job.customer_name.to_lowercase().contains(&query)
        })
        .filter(|job| filter.status.map_or(true, |s| job.status == s))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
