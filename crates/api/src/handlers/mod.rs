pub mod confirmations;
pub mod customers;
pub mod dashboard;
pub mod inventory;
pub mod jobs;
pub mod provider;
pub mod services;
