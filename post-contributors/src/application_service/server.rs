//! Wires configuration, adapters and the HTTP surface together.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;

use crate::application_service::contributor_service::{
    ContributorService, ContributorServiceSettings,
};
use crate::config::ContributorsConfig;
use crate::domain::ContributorId;
use crate::infrastructure::{
    HmacTokenIssuer, InMemoryIdentityDirectory, InMemoryMetadataStore, MetadataBackend,
    RoleBasedAuthorization, SledMetadataStore, UserRecord,
};
use crate::presentation::{create_router, AppState};

/// A configured contributors server, ready to serve HTTP.
pub struct ContributorsServer {
    config: ContributorsConfig,
    state: Arc<AppState>,
}

impl ContributorsServer {
    pub fn new(config: ContributorsConfig) -> Result<Self> {
        // Identity directory seeded from the configured users
        let directory = InMemoryIdentityDirectory::new(config.display.site_url.clone());
        for user in &config.users {
            let id = ContributorId::new(user.id)
                .with_context(|| format!("User {:?} has id 0", user.display_name))?;
            let record = user.capabilities.iter().fold(
                UserRecord::new(id, user.display_name.clone(), user.email.clone()),
                |record, capability| record.with_capability(capability.clone()),
            );
            directory.insert(record);
        }
        tracing::info!("Loaded {} users", config.users.len());

        let metadata_store = if config.storage.in_memory {
            tracing::info!("Using in-memory metadata store");
            MetadataBackend::InMemory(InMemoryMetadataStore::default())
        } else {
            std::fs::create_dir_all(&config.storage.data_dir)
                .context("Failed to create data directory")?;
            let path = config.storage.data_dir.join("metadata");
            tracing::info!("Using sled metadata store at {:?}", path);
            MetadataBackend::Sled(
                SledMetadataStore::open(&path).context("Failed to open metadata store")?,
            )
        };

        let token_issuer = match &config.token.secret {
            Some(secret) => HmacTokenIssuer::new(secret.as_bytes(), config.token.lifetime_secs),
            None => {
                tracing::warn!("No token secret configured, tokens will not survive a restart");
                HmacTokenIssuer::with_random_key(config.token.lifetime_secs)
            }
        };

        // Owners share the metadata backend so they persist with the associations
        let authorization =
            RoleBasedAuthorization::new(directory.clone(), config.association.editor())
                .with_owner_store(metadata_store.clone());

        let service = ContributorService::new(
            directory,
            metadata_store,
            authorization,
            token_issuer,
            ContributorServiceSettings::from(&config.association),
        );

        let state = Arc::new(AppState {
            service,
            heading: config.display.heading.clone(),
        });

        Ok(Self { config, state })
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// Serves on an already bound listener until the server stops.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        axum::serve(listener, self.router())
            .await
            .context("HTTP server error")
    }

    /// Binds the configured address and serves.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.server.listen)
            .await
            .context("Failed to bind HTTP listener")?;

        tracing::info!("Contributors server listening on {}", self.config.server.listen);
        self.serve(listener).await
    }
}
