pub mod authorization;
pub mod identity_directory;
pub mod metadata_store;
pub mod token_issuer;

pub use authorization::RoleBasedAuthorization;
pub use identity_directory::{InMemoryIdentityDirectory, UserRecord};
pub use metadata_store::{InMemoryMetadataStore, MetadataBackend, SledMetadataStore};
pub use token_issuer::HmacTokenIssuer;
