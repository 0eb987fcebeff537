//! Read models handed to the presentation layer.

use crate::domain::content_item_id::ContentItemId;
use crate::domain::contributor_id::ContributorId;
use crate::domain::identity::{Identity, ResolvedIdentity};
use crate::domain::token::AntiForgeryToken;

/// One rendered contributor.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContributorView {
    pub contributor_id: ContributorId,
    pub display_name: String,
    pub profile_url: String,
    pub avatar_url: String,
}

impl From<ResolvedIdentity> for ContributorView {
    fn from(identity: ResolvedIdentity) -> Self {
        Self {
            contributor_id: identity.id,
            display_name: identity.display_name,
            profile_url: identity.profile_url,
            avatar_url: identity.avatar_url,
        }
    }
}

/// One checkbox of the edit form.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContributorOption {
    pub contributor_id: ContributorId,
    pub display_name: String,
    pub checked: bool,
}

impl ContributorOption {
    pub fn new(identity: Identity, checked: bool) -> Self {
        Self {
            contributor_id: identity.id,
            display_name: identity.display_name,
            checked,
        }
    }
}

/// Everything an admin surface needs to draw the contributor picker.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EditForm {
    pub content_item_id: ContentItemId,
    pub token: AntiForgeryToken,
    /// Name of the repeated form field carrying the selected ids.
    pub field_name: String,
    pub options: Vec<ContributorOption>,
}

impl EditForm {
    pub const FIELD_NAME: &'static str = "author";
    pub const TOKEN_FIELD_NAME: &'static str = "contributor_checkbox_nonce";

    pub fn checked_ids(&self) -> Vec<ContributorId> {
        self.options
            .iter()
            .filter(|o| o.checked)
            .map(|o| o.contributor_id)
            .collect()
    }
}
