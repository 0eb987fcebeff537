mod command;
mod port;
mod service;

pub use command::{SetAssociationCommand, SetAssociationResult, WriteOutcome};
pub use port::{
    AuthorizationPolicy, ContributorServiceError, DenialReason, IdentityDirectory,
    IdentityDirectoryError, MetadataStore, MetadataStoreError, TokenIssuer,
};
pub use service::{ContributorService, ContributorServiceSettings};
