pub mod association;
pub mod content_item_id;
pub mod contributor_id;
pub mod identity;
pub mod token;
pub mod view;

pub use association::{AssociationChange, ContributorAssociation, META_VALUE_DELIMITER};
pub use content_item_id::ContentItemId;
pub use contributor_id::{ContributorId, ContributorIdError};
pub use identity::{Action, Capability, Identity, ResolvedIdentity};
pub use token::{AntiForgeryToken, TokenScope};
pub use view::{ContributorOption, ContributorView, EditForm};
