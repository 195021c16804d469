//! Entry point to on-disk storage: one directory, many named collections.

use crate::embedding::{Embedder, FastEmbedder};
use crate::error::{Result, SnipError};
use crate::persistence::collection::{Collection, CollectionConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Subdirectory of the root where downloaded model files are cached. The
/// leading dot keeps it out of the collection namespace.
pub const MODEL_CACHE_DIR: &str = ".models";

/// Opens collections stored under a root directory.
pub struct PersistentClient {
    root: PathBuf,
    embedder: Arc<dyn Embedder>,
    config: CollectionConfig,
}

impl PersistentClient {
    /// Create a client rooted at `root` that embeds with all-MiniLM-L6-v2.
    ///
    /// The model is downloaded into `root/.models` the first time it is used.
    pub fn new(root: impl AsRef<Path>, config: CollectionConfig) -> Result<Self> {
        let embedder = FastEmbedder::new(root.as_ref().join(MODEL_CACHE_DIR))?;
        Self::with_embedder(root, Arc::new(embedder), config)
    }

    pub fn with_embedder(
        root: impl AsRef<Path>,
        embedder: Arc<dyn Embedder>,
        config: CollectionConfig,
    ) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            embedder,
            config,
        })
    }

    /// Open the collection called `name`, creating it if it does not exist.
    pub fn get_or_create_collection(&self, name: &str) -> Result<Collection> {
        validate_collection_name(name)?;
        Collection::open(
            name,
            self.root.join(name),
            Arc::clone(&self.embedder),
            self.config,
        )
    }

    /// Names of the collections present under the root, sorted.
    pub fn list_collections(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() || !entry.path().join("manifest.json").exists() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Collection names double as directory names, so they are kept to a safe subset.
pub fn validate_collection_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(SnipError::InvalidCollectionName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if !(3..=63).contains(&name.len()) {
        return invalid("must be between 3 and 63 characters long");
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return invalid("may only contain ASCII letters, digits, '.', '_' and '-'");
    }
    let first = name.chars().next();
    let last = name.chars().last();
    if !first.is_some_and(|c| c.is_ascii_alphanumeric())
        || !last.is_some_and(|c| c.is_ascii_alphanumeric())
    {
        return invalid("must start and end with a letter or digit");
    }
    if name.contains("..") {
        return invalid("must not contain two consecutive periods");
    }
    Ok(())
}
