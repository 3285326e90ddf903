//! `customers`, `services` and `provider_info` rows.

use printshop_core::catalog::{Customer, ProviderInfo, Service};
use printshop_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `customers` table.
#[derive(Debug, Clone, FromRow)]
pub struct CustomerRow {
    pub id: DbId,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub tax_id: Option<String>,
    pub created_at: Timestamp,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            phone: row.phone,
            address: row.address,
            tax_id: row.tax_id,
            created_at: row.created_at,
        }
    }
}

/// A row from the `services` table.
#[derive(Debug, Clone, FromRow)]
pub struct ServiceRow {
    pub id: DbId,
    pub service_name: String,
    pub unit_price: f64,
    pub created_at: Timestamp,
}

impl From<ServiceRow> for Service {
    fn from(row: ServiceRow) -> Self {
        Service {
            id: row.id,
            service_name: row.service_name,
            unit_price: row.unit_price,
            created_at: row.created_at,
        }
    }
}

/// The single `provider_info` row.
#[derive(Debug, Clone, FromRow)]
pub struct ProviderRow {
    pub org_name: String,
    pub address: String,
    pub phone: String,
    pub tax_id: String,
    pub logo_url: Option<String>,
    pub updated_at: Timestamp,
}

impl From<ProviderRow> for ProviderInfo {
    fn from(row: ProviderRow) -> Self {
        ProviderInfo {
            org_name: row.org_name,
            address: row.address,
            phone: row.phone,
            tax_id: row.tax_id,
            logo_url: row.logo_url,
        }
    }
}
