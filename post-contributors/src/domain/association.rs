use std::collections::HashSet;

use crate::domain::content_item_id::ContentItemId;
use crate::domain::contributor_id::ContributorId;

/// Delimiter of the persisted metadata value, e.g. `"3, 7, 12"`.
pub const META_VALUE_DELIMITER: &str = ", ";

/// Difference between two associations of the same content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssociationChange {
    Unchanged,
    Cleared,
    Replaced {
        added: Vec<ContributorId>,
        removed: Vec<ContributorId>,
    },
}

/// The ordered set of contributors attached to one content item.
///
/// - Duplicates are removed on construction, keeping the first occurrence.
/// - An empty association is the same thing as "no association"; both are
///   persisted as an empty value and read back as an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributorAssociation {
    content_item_id: ContentItemId,
    contributor_ids: Vec<ContributorId>,
}

impl ContributorAssociation {
    pub fn new(
        content_item_id: ContentItemId,
        contributor_ids: impl IntoIterator<Item = ContributorId>,
    ) -> Self {
        let mut seen = HashSet::new();
        let contributor_ids = contributor_ids
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect();

        Self {
            content_item_id,
            contributor_ids,
        }
    }

    pub fn empty(content_item_id: ContentItemId) -> Self {
        Self {
            content_item_id,
            contributor_ids: Vec::new(),
        }
    }

    /// Rebuilds an association from the stored metadata value.
    ///
    /// Absent and empty values both yield an empty association. Pieces that
    /// fail the id sanitizer are skipped, so a corrupted value degrades to
    /// the ids that are still readable.
    pub fn from_meta_value(content_item_id: ContentItemId, value: Option<&str>) -> Self {
        let ids = value
            .unwrap_or_default()
            .split(',')
            .filter_map(|piece| ContributorId::sanitize(piece).ok());

        Self::new(content_item_id, ids)
    }

    /// Serializes the ids into the delimited metadata value.
    pub fn to_meta_value(&self) -> String {
        self.contributor_ids
            .iter()
            .map(ContributorId::to_string)
            .collect::<Vec<_>>()
            .join(META_VALUE_DELIMITER)
    }

    /// Wholesale replacement; there is no incremental append.
    pub fn replace_with(
        &self,
        contributor_ids: impl IntoIterator<Item = ContributorId>,
    ) -> (Self, AssociationChange) {
        let next = Self::new(self.content_item_id.clone(), contributor_ids);

        let change = if next.contributor_ids == self.contributor_ids {
            AssociationChange::Unchanged
        } else if next.is_empty() {
            AssociationChange::Cleared
        } else {
            let added = next
                .contributor_ids
                .iter()
                .filter(|id| !self.contains(**id))
                .copied()
                .collect();
            let removed = self
                .contributor_ids
                .iter()
                .filter(|id| !next.contains(**id))
                .copied()
                .collect();
            AssociationChange::Replaced { added, removed }
        };

        (next, change)
    }

    /// Keeps only the ids accepted by `keep`, preserving order.
    pub fn retain(&mut self, keep: impl FnMut(&ContributorId) -> bool) {
        self.contributor_ids.retain(keep);
    }

    pub fn content_item_id(&self) -> &ContentItemId {
        &self.content_item_id
    }

    pub fn contributor_ids(&self) -> &[ContributorId] {
        &self.contributor_ids
    }

    pub fn into_contributor_ids(self) -> Vec<ContributorId> {
        self.contributor_ids
    }

    pub fn contains(&self, id: ContributorId) -> bool {
        self.contributor_ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.contributor_ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.contributor_ids.len()
    }
}
