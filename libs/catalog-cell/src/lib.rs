pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{CatalogError, CreateServiceRequest, Service, UpdateServiceRequest};
pub use services::catalog::CatalogService;
