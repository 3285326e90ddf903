//! Repository for the single-row `provider_info` table.

use printshop_core::catalog::ProviderInfo;
use sqlx::PgPool;

use crate::models::catalog::ProviderRow;

const COLUMNS: &str = "org_name, address, phone, tax_id, logo_url, updated_at";

pub struct ProviderRepo;

impl ProviderRepo {
    pub async fn get(pool: &PgPool) -> Result<Option<ProviderRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM provider_info WHERE id = 1");
        sqlx::query_as::<_, ProviderRow>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Insert the row on first save, replace it afterwards.
    pub async fn upsert(pool: &PgPool, info: &ProviderInfo) -> Result<ProviderRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO provider_info (id, org_name, address, phone, tax_id, logo_url) \
             VALUES (1, $1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE SET \
                 org_name = EXCLUDED.org_name, address = EXCLUDED.address, \
                 phone = EXCLUDED.phone, tax_id = EXCLUDED.tax_id, \
                 logo_url = EXCLUDED.logo_url, updated_at = now() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProviderRow>(&query)
            .bind(&info.org_name)
            .bind(&info.address)
            .bind(&info.phone)
            .bind(&info.tax_id)
            .bind(&info.logo_url)
            .fetch_one(pool)
            .await
    }
}
