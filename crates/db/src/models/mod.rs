//! Row structs for each table and their conversions into core domain types.

pub mod catalog;
pub mod job_order;
pub mod material;

/// A stored value that the domain does not recognise.
#[derive(Debug, thiserror::Error)]
#[error("unexpected value '{value}' in column {column}")]
pub struct UnknownValue {
    pub column: &'static str,
    pub value: String,
}

impl From<UnknownValue> for sqlx::Error {
    fn from(err: UnknownValue) -> Self {
        sqlx::Error::Decode(Box::new(err))
    }
}
