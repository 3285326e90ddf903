//! Customer and service master data, plus the shop's own letterhead.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// A customer that orders can be filled in from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: DbId,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_id: Option<String>,
    pub created_at: Timestamp,
}

impl Customer {
    /// Branch line printed on an order: address plus tax id when present.
    pub fn branch_line(&self) -> String {
        let address = self.address.as_deref().unwrap_or("");
        match self.tax_id.as_deref().filter(|t| !t.is_empty()) {
            Some(tax_id) => format!("{address} (Tax: {tax_id})"),
            None => address.to_string(),
        }
    }
}

/// A priced print service (per square meter, or per unit when no size).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: DbId,
    pub service_name: String,
    pub unit_price: f64,
    pub created_at: Timestamp,
}

/// DTO for creating or replacing a customer.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CustomerInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    pub address: Option<String>,
    #[validate(length(max = 20))]
    pub tax_id: Option<String>,
}

/// DTO for creating or replacing a service.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ServiceInput {
    #[validate(length(min = 1, max = 200))]
    pub service_name: String,
    #[validate(range(min = 0.0))]
    pub unit_price: f64,
}

/// Letterhead printed on job sheets: who is providing the work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub org_name: String,
    pub address: String,
    pub phone: String,
    pub tax_id: String,
    pub logo_url: Option<String>,
}

impl ProviderInfo {
    /// Letterhead used until one is saved: the configured name, dashes elsewhere.
    pub fn fallback(org_name: &str) -> Self {
        Self {
            org_name: org_name.to_string(),
            address: "-".into(),
            phone: "-".into(),
            tax_id: "-".into(),
            logo_url: None,
        }
    }
}

/// DTO for replacing the letterhead.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ProviderInput {
    #[validate(length(min = 1, max = 200))]
    pub org_name: String,
    #[serde(default)]
    pub address: String,
    #[validate(length(max = 50))]
    #[serde(default)]
    pub phone: String,
    #[validate(length(max = 20))]
    #[serde(default)]
    pub tax_id: String,
    #[validate(url)]
    pub logo_url: Option<String>,
}

impl ProviderInput {
    /// Blank fields print as `-`.
    pub fn into_info(self) -> ProviderInfo {
        let dash = |value: String| {
            if value.trim().is_empty() {
                "-".to_string()
            } else {
                value.trim().to_string()
            }
        };
        ProviderInfo {
            org_name: self.org_name.trim().to_string(),
            address: dash(self.address),
            phone: dash(self.phone),
            tax_id: dash(self.tax_id),
            logo_url: self.logo_url.filter(|url| !url.trim().is_empty()),
        }
    }
}

/// Run `validator` rules and fold failures into a [`CoreError::Validation`].
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(errors.to_string()))
}
