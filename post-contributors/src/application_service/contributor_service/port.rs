//! Contract the contributor service requires from its host.

use crate::domain::{
    Action, AntiForgeryToken, Capability, ContentItemId, ContributorId, Identity,
    ResolvedIdentity, TokenScope,
};

/// Read access to the host's user store.
pub trait IdentityDirectory {
    /// Users holding `capability`, in the host's natural order.
    fn eligible_identities(
        &self,
        capability: &Capability,
    ) -> Result<Vec<Identity>, IdentityDirectoryError>;

    /// Full display data of one user, or `None` when the user no longer exists.
    fn resolve_identity(
        &self,
        id: ContributorId,
    ) -> Result<Option<ResolvedIdentity>, IdentityDirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityDirectoryError {
    #[error("lookup error: {0}")]
    Lookup(String),
}

/// Key-value metadata attached to content items.
///
/// Single-key reads and writes are assumed atomic; concurrent writers to
/// the same key race and the last one wins.
pub trait MetadataStore {
    fn get_metadata(
        &self,
        content_item_id: &ContentItemId,
        key: &str,
    ) -> Result<Option<String>, MetadataStoreError>;

    fn set_metadata(
        &self,
        content_item_id: &ContentItemId,
        key: &str,
        value: &str,
    ) -> Result<(), MetadataStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MetadataStoreError {
    #[error("storage error: {0}")]
    Storage(String),
}

/// Host permission check.
pub trait AuthorizationPolicy {
    fn is_authorized(
        &self,
        identity: &Identity,
        action: Action,
        content_item_id: &ContentItemId,
    ) -> bool;
}

/// Issues and verifies anti-forgery tokens bound to the acting identity.
pub trait TokenIssuer {
    fn issue_token(&self, scope: &TokenScope, session: &Identity) -> AntiForgeryToken;

    fn verify_token(
        &self,
        token: &AntiForgeryToken,
        scope: &TokenScope,
        session: &Identity,
    ) -> bool;
}

/// Why a write was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DenialReason {
    #[error("anti-forgery token missing")]
    MissingToken,

    #[error("anti-forgery token invalid or expired")]
    InvalidToken,

    #[error("identity may not edit this content item")]
    NotAuthorized,
}

#[derive(Debug, thiserror::Error)]
pub enum ContributorServiceError {
    #[error("authorization denied: {0}")]
    Denied(DenialReason),

    #[error("identity directory error: {0}")]
    IdentityDirectory(IdentityDirectoryError),

    #[error("metadata store error: {0}")]
    MetadataStore(MetadataStoreError),
}
