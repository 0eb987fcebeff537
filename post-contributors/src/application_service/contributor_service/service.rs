use crate::config::{AssociationConfig, DeniedPolicy};
use crate::domain::{
    Action, AssociationChange, Capability, ContentItemId, ContributorAssociation, ContributorId,
    ContributorOption, ContributorView, EditForm, Identity, ResolvedIdentity, TokenScope,
};

use super::{
    AuthorizationPolicy, ContributorServiceError, DenialReason, IdentityDirectory, MetadataStore,
    SetAssociationCommand, SetAssociationResult, TokenIssuer, WriteOutcome,
};

/// Values the service is constructed with instead of hard-coding host roles.
#[derive(Debug, Clone)]
pub struct ContributorServiceSettings {
    pub eligible_capability: Capability,
    pub meta_key: String,
    pub on_denied: DeniedPolicy,
}

impl From<&AssociationConfig> for ContributorServiceSettings {
    fn from(config: &AssociationConfig) -> Self {
        Self {
            eligible_capability: config.capability(),
            meta_key: config.meta_key.clone(),
            on_denied: config.on_denied,
        }
    }
}

impl Default for ContributorServiceSettings {
    fn default() -> Self {
        Self::from(&AssociationConfig::default())
    }
}

/// Application service owning the content item → contributors mapping.
///
/// - Reads never fail: host errors are logged and degrade to empty output.
/// - Writes are gated by an anti-forgery token and the host authorization
///   policy; what a refused write reports depends on `on_denied`.
pub struct ContributorService<ID, MS, AP, TK> {
    pub identity_directory: ID,
    pub metadata_store: MS,
    pub authorization: AP,
    pub token_issuer: TK,
    pub settings: ContributorServiceSettings,
}

impl<ID, MS, AP, TK> ContributorService<ID, MS, AP, TK>
where
    ID: IdentityDirectory,
    MS: MetadataStore,
    AP: AuthorizationPolicy,
    TK: TokenIssuer,
{
    pub fn new(
        identity_directory: ID,
        metadata_store: MS,
        authorization: AP,
        token_issuer: TK,
        settings: ContributorServiceSettings,
    ) -> Self {
        Self {
            identity_directory,
            metadata_store,
            authorization,
            token_issuer,
            settings,
        }
    }

    /// Users holding the eligible capability, in the directory's order.
    pub fn list_eligible_contributors(&self) -> Vec<Identity> {
        match self
            .identity_directory
            .eligible_identities(&self.settings.eligible_capability)
        {
            Ok(identities) => identities,
            Err(e) => {
                tracing::warn!(
                    "Failed to list identities with capability {}: {}",
                    self.settings.eligible_capability.as_str(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Current association of a content item.
    ///
    /// Stored ids that no longer resolve to a user are left out.
    pub fn get_association(&self, content_item_id: &ContentItemId) -> ContributorAssociation {
        let mut association = self.load_stored(content_item_id);
        association.retain(|id| self.resolves(*id));
        association
    }

    /// Replaces the association of a content item with a form submission.
    pub fn set_association(
        &self,
        cmd: SetAssociationCommand,
    ) -> Result<SetAssociationResult, ContributorServiceError> {
        // 1. Anti-forgery token and permission gate
        if let Err(reason) = self.check_write_gate(&cmd) {
            return self.deny(&cmd, reason);
        }

        // 2. An absent field means no change was requested
        let Some(submitted) = cmd.submitted else {
            tracing::debug!(
                "No contributor submission for {}, leaving association untouched",
                cmd.content_item_id
            );
            return Ok(SetAssociationResult {
                association: self.get_association(&cmd.content_item_id),
                outcome: WriteOutcome::NoSubmission,
            });
        };

        // 3. Sanitize and keep only currently eligible users
        let eligible: Vec<ContributorId> = self
            .identity_directory
            .eligible_identities(&self.settings.eligible_capability)
            .map_err(ContributorServiceError::IdentityDirectory)?
            .into_iter()
            .map(|identity| identity.id)
            .collect();

        let accepted = submitted.iter().filter_map(|raw| {
            match ContributorId::sanitize(raw) {
                Ok(id) if eligible.contains(&id) => Some(id),
                Ok(id) => {
                    tracing::debug!("Dropping contributor {} without eligible capability", id);
                    None
                }
                Err(e) => {
                    tracing::debug!("Dropping submitted value {:?}: {}", raw, e);
                    None
                }
            }
        });

        // 4. Wholesale overwrite
        let previous = self.load_stored(&cmd.content_item_id);
        let (next, change) = previous.replace_with(accepted);

        self.metadata_store
            .set_metadata(
                &cmd.content_item_id,
                &self.settings.meta_key,
                &next.to_meta_value(),
            )
            .map_err(ContributorServiceError::MetadataStore)?;

        match &change {
            AssociationChange::Unchanged => {
                tracing::debug!("Contributors of {} unchanged", cmd.content_item_id)
            }
            AssociationChange::Cleared => tracing::info!(
                "Contributors of {} cleared by {}",
                cmd.content_item_id,
                cmd.acting_identity.id
            ),
            AssociationChange::Replaced { added, removed } => tracing::info!(
                "Contributors of {} updated by {}: {} added, {} removed",
                cmd.content_item_id,
                cmd.acting_identity.id,
                added.len(),
                removed.len()
            ),
        }

        Ok(SetAssociationResult {
            association: next,
            outcome: WriteOutcome::Stored,
        })
    }

    /// Resolved contributors of a content item, ready for display.
    pub fn render_contributor_list(&self, content_item_id: &ContentItemId) -> Vec<ContributorView> {
        self.load_stored(content_item_id)
            .into_contributor_ids()
            .into_iter()
            .filter_map(|id| self.resolve(id))
            .map(ContributorView::from)
            .collect()
    }

    /// Read model of the contributor picker, with a fresh anti-forgery token.
    pub fn edit_form(
        &self,
        content_item_id: &ContentItemId,
        acting_identity: &Identity,
    ) -> Result<EditForm, ContributorServiceError> {
        if !self
            .authorization
            .is_authorized(acting_identity, Action::EditContentItem, content_item_id)
        {
            tracing::info!(
                "Identity {} may not open the contributor form of {}",
                acting_identity.id,
                content_item_id
            );
            return Err(ContributorServiceError::Denied(DenialReason::NotAuthorized));
        }

        let current = self.get_association(content_item_id);
        let options = self
            .list_eligible_contributors()
            .into_iter()
            .map(|identity| {
                let checked = current.contains(identity.id);
                ContributorOption::new(identity, checked)
            })
            .collect();

        Ok(EditForm {
            content_item_id: content_item_id.clone(),
            token: self
                .token_issuer
                .issue_token(&TokenScope::contributor_edit(), acting_identity),
            field_name: EditForm::FIELD_NAME.to_string(),
            options,
        })
    }

    fn check_write_gate(&self, cmd: &SetAssociationCommand) -> Result<(), DenialReason> {
        let token = cmd.token.as_ref().ok_or(DenialReason::MissingToken)?;

        if !self.token_issuer.verify_token(
            token,
            &TokenScope::contributor_edit(),
            &cmd.acting_identity,
        ) {
            return Err(DenialReason::InvalidToken);
        }

        if !self.authorization.is_authorized(
            &cmd.acting_identity,
            Action::EditContentItem,
            &cmd.content_item_id,
        ) {
            return Err(DenialReason::NotAuthorized);
        }

        Ok(())
    }

    fn deny(
        &self,
        cmd: &SetAssociationCommand,
        reason: DenialReason,
    ) -> Result<SetAssociationResult, ContributorServiceError> {
        tracing::info!(
            "Refused contributor write on {} by {}: {}",
            cmd.content_item_id,
            cmd.acting_identity.id,
            reason
        );

        match self.settings.on_denied {
            DeniedPolicy::Silent => Ok(SetAssociationResult {
                association: self.get_association(&cmd.content_item_id),
                outcome: WriteOutcome::Denied(reason),
            }),
            DeniedPolicy::ExplicitError => Err(ContributorServiceError::Denied(reason)),
        }
    }

    /// Stored association without existence filtering.
    fn load_stored(&self, content_item_id: &ContentItemId) -> ContributorAssociation {
        let value = match self
            .metadata_store
            .get_metadata(content_item_id, &self.settings.meta_key)
        {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read contributors of {}: {}", content_item_id, e);
                None
            }
        };

        ContributorAssociation::from_meta_value(content_item_id.clone(), value.as_deref())
    }

    fn resolve(&self, id: ContributorId) -> Option<ResolvedIdentity> {
        match self.identity_directory.resolve_identity(id) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!("Failed to resolve contributor {}: {}", id, e);
                None
            }
        }
    }

    fn resolves(&self, id: ContributorId) -> bool {
        self.resolve(id).is_some()
    }
}
