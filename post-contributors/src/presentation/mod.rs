use std::sync::Arc;

use axum::{routing::get, Router};

use crate::application_service::contributor_service::ContributorService;
use crate::infrastructure::{
    HmacTokenIssuer, InMemoryIdentityDirectory, MetadataBackend, RoleBasedAuthorization,
};

pub mod contributors;
pub mod template;

/// Service wired with the adapters the server runs on.
pub type AppContributorService = ContributorService<
    InMemoryIdentityDirectory,
    MetadataBackend,
    RoleBasedAuthorization,
    HmacTokenIssuer,
>;

pub struct AppState {
    pub service: AppContributorService,
    /// Heading printed above rendered contributor lists.
    pub heading: String,
}

async fn health() -> &'static str {
    "ok"
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(contributors::routes())
        .with_state(state)
}
