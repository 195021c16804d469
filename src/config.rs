//! Runtime configuration.

use crate::distance::DistanceMetric;
use crate::embedding::EmbedderKind;
use crate::persistence::client::MODEL_CACHE_DIR;
use crate::persistence::CollectionConfig;
use crate::snippets::DEFAULT_RESULTS;
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "./chromadb";
pub const DEFAULT_COLLECTION: &str = "input_storage";

/// Settings the binary resolves from its (optional) flags.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding every collection.
    pub data_dir: PathBuf,
    /// Collection the command loop reads and writes.
    pub collection: String,
    /// Matches printed per query.
    pub results: usize,
    pub metric: DistanceMetric,
    pub checkpoint_interval: usize,
    pub embedder: EmbedderKind,
}

impl Config {
    pub fn collection_config(&self) -> CollectionConfig {
        CollectionConfig {
            checkpoint_interval: self.checkpoint_interval,
            metric: self.metric,
        }
    }

    /// Where downloaded embedding models are kept.
    pub fn model_cache_dir(&self) -> PathBuf {
        self.data_dir.join(MODEL_CACHE_DIR)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            collection: DEFAULT_COLLECTION.to_string(),
            results: DEFAULT_RESULTS,
            metric: DistanceMetric::default(),
            checkpoint_interval: CollectionConfig::default().checkpoint_interval,
            embedder: EmbedderKind::default(),
        }
    }
}
