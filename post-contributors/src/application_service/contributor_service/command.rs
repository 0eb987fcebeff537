use crate::domain::{AntiForgeryToken, ContentItemId, ContributorAssociation, Identity};

use super::DenialReason;

/// Input of `set_association`, built by the host from one form submission.
///
/// Everything the write depends on travels in here; nothing is read from
/// ambient request state.
#[derive(Debug, Clone)]
pub struct SetAssociationCommand {
    pub content_item_id: ContentItemId,
    /// Raw, unsanitized values of the repeated form field.
    ///
    /// `None` means the field was not submitted at all (no change requested),
    /// which is different from `Some(vec![])` (clear the association).
    pub submitted: Option<Vec<String>>,
    pub acting_identity: Identity,
    pub token: Option<AntiForgeryToken>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The sanitized submission was persisted.
    Stored,
    /// No submission was present; nothing was written.
    NoSubmission,
    /// The gate refused the write and the policy is silent.
    Denied(DenialReason),
}

#[derive(Debug, Clone)]
pub struct SetAssociationResult {
    /// Association as persisted after the call (possibly unchanged).
    pub association: ContributorAssociation,
    pub outcome: WriteOutcome,
}
