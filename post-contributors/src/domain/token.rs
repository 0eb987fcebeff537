/// Scope an anti-forgery token is issued for.
///
/// Issuance and verification must use the same scope string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenScope(String);

impl TokenScope {
    /// Scope of the contributor edit form.
    pub const CONTRIBUTOR_EDIT: &'static str = "contributor_checkbox";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn contributor_edit() -> Self {
        Self::new(Self::CONTRIBUTOR_EDIT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Request-scoped anti-forgery token (a "nonce") as submitted by a form.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AntiForgeryToken(String);

impl AntiForgeryToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
