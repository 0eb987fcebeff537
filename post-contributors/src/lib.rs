pub mod application_service;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application_service::server::ContributorsServer;
pub use config::ContributorsConfig;
