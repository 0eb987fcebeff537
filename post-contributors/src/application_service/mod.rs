pub mod contributor_service;
pub mod server;
