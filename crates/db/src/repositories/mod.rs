pub mod customer_repo;
pub mod job_order_repo;
pub mod material_log_repo;
pub mod material_repo;
pub mod provider_repo;
pub mod service_repo;

pub use customer_repo::CustomerRepo;
pub use job_order_repo::JobOrderRepo;
pub use material_log_repo::MaterialLogRepo;
pub use material_repo::MaterialRepo;
pub use provider_repo::ProviderRepo;
pub use service_repo::ServiceRepo;
