use crate::domain::contributor_id::ContributorId;

/// A user as listed by the host identity store.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Identity {
    pub id: ContributorId,
    pub display_name: String,
}

impl Identity {
    pub fn new(id: ContributorId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

/// A user resolved with everything needed to display it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ResolvedIdentity {
    pub id: ContributorId,
    pub display_name: String,
    pub profile_url: String,
    pub avatar_url: String,
}

/// Capability (role) a user must hold to be offered as a contributor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Capability(String);

impl Capability {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Actions checked against the host authorization policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    EditContentItem,
}
