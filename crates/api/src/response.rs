//! JSON envelope shared by every handler.
//!
//! Success bodies are `{ "data": ... }`; errors use `{ "error", "code" }`
//! from [`crate::error::AppError`]. CSV and HTML downloads are unwrapped.

use serde::Serialize;

/// `{ "data": T }`. Pending confirmations and action outcomes use it too.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
