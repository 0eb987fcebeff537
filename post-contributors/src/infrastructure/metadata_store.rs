use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::application_service::contributor_service::{MetadataStore, MetadataStoreError};
use crate::domain::ContentItemId;

const META_TREE_NAME: &str = "post_meta";

/// In-process metadata store.
///
/// - key: `(content_item_id, meta key)`
/// - value: the raw metadata string
#[derive(Clone, Default)]
pub struct InMemoryMetadataStore {
    inner: Arc<Mutex<HashMap<(String, String), String>>>,
}

impl MetadataStore for InMemoryMetadataStore {
    fn get_metadata(
        &self,
        content_item_id: &ContentItemId,
        key: &str,
    ) -> Result<Option<String>, MetadataStoreError> {
        let guard = self
            .inner
            .lock()
            .map_err(|e| MetadataStoreError::Storage(e.to_string()))?;

        Ok(guard
            .get(&(content_item_id.as_str().to_string(), key.to_string()))
            .cloned())
    }

    fn set_metadata(
        &self,
        content_item_id: &ContentItemId,
        key: &str,
        value: &str,
    ) -> Result<(), MetadataStoreError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|e| MetadataStoreError::Storage(e.to_string()))?;

        guard.insert(
            (content_item_id.as_str().to_string(), key.to_string()),
            value.to_string(),
        );
        Ok(())
    }
}

/// sled-backed metadata store.
///
/// Entries live in the `post_meta` tree under `"{content_item_id}\0{key}"`.
#[derive(Clone)]
pub struct SledMetadataStore {
    db: sled::Db,
}

impl SledMetadataStore {
    /// Open or create a sled database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MetadataStoreError> {
        let db = sled::open(path).map_err(|e| MetadataStoreError::Storage(e.to_string()))?;
        Ok(Self { db })
    }

    /// Open with an existing sled database instance.
    pub fn with_db(db: sled::Db) -> Self {
        Self { db }
    }

    fn meta_tree(&self) -> Result<sled::Tree, MetadataStoreError> {
        self.db
            .open_tree(META_TREE_NAME)
            .map_err(|e| MetadataStoreError::Storage(e.to_string()))
    }

    fn sled_key(content_item_id: &ContentItemId, key: &str) -> String {
        format!("{}\0{}", content_item_id.as_str(), key)
    }
}

impl MetadataStore for SledMetadataStore {
    fn get_metadata(
        &self,
        content_item_id: &ContentItemId,
        key: &str,
    ) -> Result<Option<String>, MetadataStoreError> {
        let tree = self.meta_tree()?;
        let Some(ivec) = tree
            .get(Self::sled_key(content_item_id, key))
            .map_err(|e| MetadataStoreError::Storage(e.to_string()))?
        else {
            return Ok(None);
        };

        String::from_utf8(ivec.to_vec())
            .map(Some)
            .map_err(|e| MetadataStoreError::Storage(format!("value is not UTF-8: {e}")))
    }

    fn set_metadata(
        &self,
        content_item_id: &ContentItemId,
        key: &str,
        value: &str,
    ) -> Result<(), MetadataStoreError> {
        let tree = self.meta_tree()?;
        tree.insert(Self::sled_key(content_item_id, key), value.as_bytes())
            .map_err(|e| MetadataStoreError::Storage(e.to_string()))?;
        tree.flush()
            .map_err(|e| MetadataStoreError::Storage(e.to_string()))?;
        Ok(())
    }
}

/// Metadata store selected at startup.
#[derive(Clone)]
pub enum MetadataBackend {
    InMemory(InMemoryMetadataStore),
    Sled(SledMetadataStore),
}

impl MetadataStore for MetadataBackend {
    fn get_metadata(
        &self,
        content_item_id: &ContentItemId,
        key: &str,
    ) -> Result<Option<String>, MetadataStoreError> {
        match self {
            MetadataBackend::InMemory(store) => store.get_metadata(content_item_id, key),
            MetadataBackend::Sled(store) => store.get_metadata(content_item_id, key),
        }
    }

    fn set_metadata(
        &self,
        content_item_id: &ContentItemId,
        key: &str,
        value: &str,
    ) -> Result<(), MetadataStoreError> {
        match self {
            MetadataBackend::InMemory(store) => store.set_metadata(content_item_id, key, value),
            MetadataBackend::Sled(store) => store.set_metadata(content_item_id, key, value),
        }
    }
}
