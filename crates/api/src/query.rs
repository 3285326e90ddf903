//! Shared query parameter types for API handlers.
//!
//! Query strings arrive as flat key/value pairs, so these structs avoid
//! `#[serde(flatten)]` and convert into the core filter types instead.

use printshop_core::dashboard::Period;
use printshop_core::order::{JobHistoryFilter, JobStatus};
use printshop_core::types::BusinessDate;
use printshop_core::view::LogFilter;
use serde::Deserialize;

/// `?search=&category=&month=&page=` for the movement log.
#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub month: String,
    /// 1-based. Out-of-range pages are clamped.
    pub page: Option<usize>,
}

impl LogQuery {
    pub fn filter(&self) -> LogFilter {
        LogFilter {
            search: self.search.clone(),
            category: self.category.clone(),
            month: self.month.clone(),
        }
    }
}

/// `?period=&start=&end=` for the dashboard and printable report.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub period: Period,
    pub start: Option<BusinessDate>,
    pub end: Option<BusinessDate>,
}

/// `?search=&status=&page=` for the job history list.
#[derive(Debug, Default, Deserialize)]
pub struct JobQuery {
    #[serde(default)]
    pub search: String,
    pub status: Option<JobStatus>,
    pub page: Option<usize>,
}

impl JobQuery {
    pub fn filter(&self) -> JobHistoryFilter {
        JobHistoryFilter {
            search: self.search.clone(),
            status: self.status,
        }
    }
}
