use crate::application_service::contributor_service::{
    AuthorizationPolicy, MetadataStore, MetadataStoreError,
};
use crate::domain::{Action, Capability, ContentItemId, ContributorId, Identity};
use crate::infrastructure::identity_directory::InMemoryIdentityDirectory;
use crate::infrastructure::metadata_store::{InMemoryMetadataStore, MetadataBackend};

/// Metadata key holding the owner of a content item.
pub const OWNER_META_KEY: &str = "post_owner";

/// Authorization backed by the in-memory directory.
///
/// A user may edit a content item when they hold the editor capability or
/// when they own the item. Owners are kept as content item metadata, so
/// they persist wherever the metadata backend does.
#[derive(Clone)]
pub struct RoleBasedAuthorization {
    directory: InMemoryIdentityDirectory,
    editor_capability: Capability,
    owners: MetadataBackend,
}

impl RoleBasedAuthorization {
    pub fn new(directory: InMemoryIdentityDirectory, editor_capability: Capability) -> Self {
        Self {
            directory,
            editor_capability,
            owners: MetadataBackend::InMemory(InMemoryMetadataStore::default()),
        }
    }

    /// Keeps owners in the given store instead of process memory.
    pub fn with_owner_store(mut self, owners: MetadataBackend) -> Self {
        self.owners = owners;
        self
    }

    /// Whether the identity exists and holds the editor capability.
    pub fn is_editor(&self, identity: &Identity) -> bool {
        self.directory
            .find(identity.id)
            .is_some_and(|user| user.has_capability(&self.editor_capability))
    }

    pub fn set_owner(
        &self,
        content_item_id: &ContentItemId,
        owner: ContributorId,
    ) -> Result<(), MetadataStoreError> {
        self.owners
            .set_metadata(content_item_id, OWNER_META_KEY, &owner.to_string())
    }

    /// Registered owner of a content item. Unreadable entries count as none.
    pub fn owner_of(&self, content_item_id: &ContentItemId) -> Option<ContributorId> {
        match self.owners.get_metadata(content_item_id, OWNER_META_KEY) {
            Ok(value) => value.and_then(|v| ContributorId::sanitize(&v).ok()),
            Err(e) => {
                tracing::warn!("Owner lookup of {} failed, denying: {}", content_item_id, e);
                None
            }
        }
    }
}

impl AuthorizationPolicy for RoleBasedAuthorization {
    fn is_authorized(
        &self,
        identity: &Identity,
        action: Action,
        content_item_id: &ContentItemId,
    ) -> bool {
        // Unknown users are never authorized, even if they claim an owned id.
        let Some(user) = self.directory.find(identity.id) else {
            return false;
        };

        match action {
            Action::EditContentItem => {
                user.has_capability(&self.editor_capability)
                    || self.owner_of(content_item_id) == Some(identity.id)
            }
        }
    }
}
