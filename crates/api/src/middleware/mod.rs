//! Identity and authorization extractors.
//!
//! - [`actor::Actor`] -- the caller named by the upstream proxy headers.
//! - [`rbac::RequireStockManager`] -- requires `manage_stock`.
//! - [`rbac::RequireStatusChanger`] -- requires `change_status`.
//! - [`rbac::RequirePriceManager`] -- requires `manage_prices`.

pub mod actor;
pub mod rbac;
