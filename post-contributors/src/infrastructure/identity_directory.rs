use std::sync::{Arc, Mutex};

use sha2::{Digest, Sha256};

use crate::application_service::contributor_service::{IdentityDirectory, IdentityDirectoryError};
use crate::domain::{Capability, ContributorId, Identity, ResolvedIdentity};

/// A user known to the in-memory directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: ContributorId,
    pub display_name: String,
    pub email: String,
    pub capabilities: Vec<Capability>,
}

impl UserRecord {
    pub fn new(
        id: ContributorId,
        display_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            email: email.into(),
            capabilities: Vec::new(),
        }
    }

    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(Capability::new(capability));
        self
    }

    pub fn has_capability(&self, capability: &Capability) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn identity(&self) -> Identity {
        Identity::new(self.id, self.display_name.clone())
    }
}

/// Gravatar URL for an email address (SHA-256 of the trimmed, lowercased address).
pub fn avatar_url(email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    let hash = hex::encode(Sha256::digest(normalized.as_bytes()));
    format!("https://www.gravatar.com/avatar/{hash}")
}

/// Identity directory kept in process memory.
///
/// Users are returned in registration order, which stands in for the
/// host's natural ordering.
#[derive(Clone)]
pub struct InMemoryIdentityDirectory {
    inner: Arc<Mutex<Vec<UserRecord>>>,
    site_url: String,
}

impl InMemoryIdentityDirectory {
    pub fn new(site_url: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Vec::new())),
            site_url: site_url.into(),
        }
    }

    /// Adds a user, replacing any existing record with the same id in place.
    pub fn insert(&self, user: UserRecord) {
        if let Ok(mut guard) = self.inner.lock() {
            match guard.iter_mut().find(|u| u.id == user.id) {
                Some(existing) => *existing = user,
                None => guard.push(user),
            }
        }
    }

    pub fn remove(&self, id: ContributorId) -> Option<UserRecord> {
        let mut guard = self.inner.lock().ok()?;
        let index = guard.iter().position(|u| u.id == id)?;
        Some(guard.remove(index))
    }

    pub fn find(&self, id: ContributorId) -> Option<UserRecord> {
        let guard = self.inner.lock().ok()?;
        guard.iter().find(|u| u.id == id).cloned()
    }

    pub fn profile_url(&self, id: ContributorId) -> String {
        format!("{}/author/{}", self.site_url.trim_end_matches('/'), id)
    }
}

impl Default for InMemoryIdentityDirectory {
    fn default() -> Self {
        Self::new("http://localhost")
    }
}

impl IdentityDirectory for InMemoryIdentityDirectory {
    fn eligible_identities(
        &self,
        capability: &Capability,
    ) -> Result<Vec<Identity>, IdentityDirectoryError> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| IdentityDirectoryError::Lookup(e.to_string()))?;

        Ok(guard
            .iter()
            .filter(|u| u.has_capability(capability))
            .map(UserRecord::identity)
            .collect())
    }

    fn resolve_identity(
        &self,
        id: ContributorId,
    ) -> Result<Option<ResolvedIdentity>, IdentityDirectoryError> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| IdentityDirectoryError::Lookup(e.to_string()))?;

        Ok(guard.iter().find(|u| u.id == id).map(|user| ResolvedIdentity {
            id: user.id,
            display_name: user.display_name.clone(),
            profile_url: self.profile_url(user.id),
            avatar_url: avatar_url(&user.email),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid(v: u64) -> ContributorId {
        ContributorId::new(v).expect("non-zero id")
    }

    fn directory() -> InMemoryIdentityDirectory {
        let directory = InMemoryIdentityDirectory::new("https://blog.example.com/");
        directory.insert(
            UserRecord::new(cid(7), "Grace", "grace@example.com").with_capability("author"),
        );
        directory.insert(
            UserRecord::new(cid(1), "Root", "root@example.com").with_capability("editor"),
        );
        directory.insert(
            UserRecord::new(cid(3), "Ada", "Ada@Example.com ").with_capability("author"),
        );
        directory
    }

    #[test]
    fn eligible_identities_keep_registration_order() {
        let eligible = directory()
            .eligible_identities(&Capability::new("author"))
            .unwrap();

        let ids: Vec<u64> = eligible.iter().map(|i| i.id.value()).collect();
        assert_eq!(ids, vec![7, 3]);
        assert_eq!(eligible[0].display_name, "Grace");
    }

    #[test]
    fn eligible_identities_may_be_empty() {
        let eligible = directory()
            .eligible_identities(&Capability::new("subscriber"))
            .unwrap();
        assert!(eligible.is_empty());
    }

    #[test]
    fn resolve_identity_builds_profile_and_avatar_per_user() {
        let directory = directory();
        let ada = directory.resolve_identity(cid(3)).unwrap().expect("ada exists");
        let grace = directory.resolve_identity(cid(7)).unwrap().expect("grace exists");

        assert_eq!(ada.profile_url, "https://blog.example.com/author/3");
        assert_eq!(ada.avatar_url, avatar_url("ada@example.com"));
        assert_ne!(ada.avatar_url, grace.avatar_url);
        assert!(directory.resolve_identity(cid(99)).unwrap().is_none());
    }

    #[test]
    fn avatar_url_normalizes_email() {
        assert_eq!(avatar_url(" Ada@Example.COM "), avatar_url("ada@example.com"));
        assert!(avatar_url("ada@example.com").starts_with("https://www.gravatar.com/avatar/"));
        // sha256 hex digest
        assert_eq!(
            avatar_url("ada@example.com").rsplit('/').next().map(str::len),
            Some(64)
        );
    }

    #[test]
    fn insert_replaces_and_remove_deletes() {
        let directory = directory();
        directory.insert(UserRecord::new(cid(7), "Grace H.", "grace@example.com"));

        let grace = directory.find(cid(7)).expect("grace exists");
        assert_eq!(grace.display_name, "Grace H.");
        assert!(grace.capabilities.is_empty());

        let removed = directory.remove(cid(3)).expect("ada removed");
        assert_eq!(removed.display_name, "Ada");
        assert!(directory.resolve_identity(cid(3)).unwrap().is_none());
        assert!(directory.remove(cid(3)).is_none());
    }
}
