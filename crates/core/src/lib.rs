//! Domain logic for the print-shop back office: the stock ledger and its
//! derived views, order pricing, and master data. No database dependency;
//! storage is reached through the traits in [`gateway`].

pub mod busy;
pub mod catalog;
pub mod confirm;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod gateway;
pub mod job_sheet;
pub mod ledger;
pub mod material;
pub mod order;
pub mod pagination;
pub mod report;
pub mod roles;
pub mod types;
pub mod view;
