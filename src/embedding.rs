//! Text embedding: turns documents and queries into fixed-size vectors.
//!
//! [`FastEmbedder`] runs the all-MiniLM-L6-v2 sentence model locally and is the
//! default. [`HashingEmbedder`] needs no model files and suits offline use.

use crate::error::{Result, SnipError};
use crate::vector::Vector;
use clap::ValueEnum;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Default dimension of [`HashingEmbedder`] vectors, matching MiniLM.
pub const DEFAULT_DIMENSION: usize = 384;

const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;

/// Something that maps text to a vector.
pub trait Embedder {
    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vector>;

    /// Embed several texts, preserving order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Length of every vector this embedder produces.
    fn dimension(&self) -> usize;

    /// Stable name recorded in a collection's manifest.
    fn model_name(&self) -> &str;
}

/// Which embedder a client uses for new and reopened collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EmbedderKind {
    /// all-MiniLM-L6-v2 via fastembed (downloads the model on first use)
    #[default]
    Minilm,
    /// Offline feature hashing
    Hashing,
}

impl EmbedderKind {
    /// Build the embedder; model files are cached under `cache_dir`.
    pub fn build(self, cache_dir: impl Into<PathBuf>) -> Result<Arc<dyn Embedder>> {
        Ok(match self {
            EmbedderKind::Minilm => Arc::new(FastEmbedder::new(cache_dir)?),
            EmbedderKind::Hashing => Arc::new(HashingEmbedder::default()),
        })
    }
}

/// Sentence embeddings from sentence-transformers/all-MiniLM-L6-v2.
pub struct FastEmbedder {
    // fastembed needs exclusive access to its session while embedding
    model: Mutex<TextEmbedding>,
    model_name: String,
}

impl FastEmbedder {
    pub const DIMENSION: usize = 384;

    /// Load the model, downloading it into `cache_dir` if it is not there yet.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir)?;
        let model = EmbeddingModel::AllMiniLML6V2;
        let model_name = model.to_string();
        info!(model = %model_name, cache = %cache_dir.display(), "loading embedding model");

        let init = InitOptions::new(model)
            .with_cache_dir(cache_dir)
            .with_show_download_progress(false);
        let embedding = TextEmbedding::try_new(init)
            .map_err(|e| SnipError::Embedding(format!("failed to load {model_name}: {e}")))?;

        Ok(Self {
            model: Mutex::new(embedding),
            model_name,
        })
    }
}

impl Embedder for FastEmbedder {
    fn embed(&self, text: &str) -> Result<Vector> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| SnipError::Embedding("model returned no embedding".to_string()))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vector>> {
        if texts.iter().any(|t| t.trim().is_empty()) {
            return Err(SnipError::Embedding("cannot embed blank text".to_string()));
        }

        let mut model = self
            .model
            .lock()
            .map_err(|_| SnipError::Embedding("embedding model lock poisoned".to_string()))?;
        let embeddings = model
            .embed(texts, None)
            .map_err(|e| SnipError::Embedding(e.to_string()))?;

        embeddings
            .into_iter()
            .map(|data| Vector::new(data).normalized())
            .collect()
    }

    fn dimension(&self) -> usize {
        Self::DIMENSION
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Deterministic feature-hashing embedder.
///
/// Each lowercased word adds weight to one bucket and each character trigram
/// of `<word>` adds a smaller weight to another, so texts sharing words or
/// word fragments land close together. Output vectors are unit length.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub const MODEL_NAME: &'static str = "hashing-v1";

    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn bucket(&self, feature: &[u8]) -> usize {
        crc32fast::hash(feature) as usize % self.dimension
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Result<Vector> {
        let lowered = text.to_lowercase();
        let mut data = vec![0.0f32; self.dimension];
        let mut features = 0usize;

        for word in lowered.split_whitespace() {
            data[self.bucket(word.as_bytes())] += WORD_WEIGHT;
            features += 1;

            let padded: Vec<char> = std::iter::once('<')
                .chain(word.chars())
                .chain(std::iter::once('>'))
                .collect();
            for gram in padded.windows(3) {
                let gram: String = gram.iter().collect();
                // prefix keeps trigram buckets independent of whole-word ones
                let key = format!("#{gram}");
                data[self.bucket(key.as_bytes())] += TRIGRAM_WEIGHT;
            }
        }

        if features == 0 {
            return Err(SnipError::Embedding("cannot embed blank text".to_string()));
        }

        let mut vector = Vector::new(data);
        vector.normalize()?;
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        Self::MODEL_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMetric;
    use approx::assert_relative_eq;

    #[test]
    fn test_embedding_is_unit_length() {
        let embedder = HashingEmbedder::default();
        let v = embedder.embed("the quick brown fox").unwrap();
        assert_eq!(v.dimension(), DEFAULT_DIMENSION);
        assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_embedding_is_deterministic() {
        let embedder = HashingEmbedder::default();
        assert_eq!(embedder.embed("dog").unwrap(), embedder.embed("dog").unwrap());
    }

    #[test]
    fn test_embedding_ignores_case() {
        let embedder = HashingEmbedder::default();
        assert_eq!(embedder.embed("Dog").unwrap(), embedder.embed("dog").unwrap());
    }

    #[test]
    fn test_blank_text_rejected() {
        let embedder = HashingEmbedder::default();
        assert!(matches!(embedder.embed("   "), Err(SnipError::Embedding(_))));
        assert!(embedder.embed("").is_err());
    }

    #[test]
    fn test_punctuation_only_text_embeds() {
        let embedder = HashingEmbedder::default();
        assert!(embedder.embed("?!").is_ok());
    }

    #[test]
    fn test_shared_words_are_closer() {
        let embedder = HashingEmbedder::default();
        let query = embedder.embed("my pet dog").unwrap();
        let near = embedder.embed("a dog is a pet").unwrap();
        let far = embedder.embed("quarterly revenue spreadsheet").unwrap();

        let metric = DistanceMetric::L2;
        assert!(metric.distance(&query, &near).unwrap() < metric.distance(&query, &far).unwrap());
    }

    #[test]
    #[ignore = "downloads the all-MiniLM-L6-v2 model"]
    fn test_minilm_ranks_related_words_closer() {
        let cache = tempfile::TempDir::new().unwrap();
        let embedder = FastEmbedder::new(cache.path()).unwrap();
        let puppy = embedder.embed("puppy").unwrap();
        let dog = embedder.embed("dog").unwrap();
        let market = embedder.embed("the stock market fell").unwrap();

        assert_eq!(puppy.dimension(), FastEmbedder::DIMENSION);
        let metric = DistanceMetric::L2;
        assert!(metric.distance(&puppy, &dog).unwrap() < metric.distance(&puppy, &market).unwrap());
    }

    #[test]
    fn test_hashing_kind_builds_offline() {
        let embedder = EmbedderKind::Hashing.build("unused").unwrap();
        assert_eq!(embedder.model_name(), HashingEmbedder::MODEL_NAME);
        assert_eq!(embedder.dimension(), DEFAULT_DIMENSION);
    }

    #[test]
    fn test_embed_batch_preserves_order() {
        let embedder = HashingEmbedder::new(64);
        let batch = embedder.embed_batch(&["cat", "dog"]).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], embedder.embed("cat").unwrap());
        assert_eq!(batch[1], embedder.embed("dog").unwrap());
    }
}
