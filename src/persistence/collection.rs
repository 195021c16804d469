//! Collection: a named, durable set of documents (WAL + snapshots).

use crate::distance::DistanceMetric;
use crate::embedding::Embedder;
use crate::error::{Result, SnipError};
use crate::persistence::serialization::{CollectionSnapshot, Manifest, SerializedRecord};
use crate::persistence::snapshot::SnapshotManager;
use crate::persistence::wal::{Replay, WalEntry, WriteAheadLog};
use crate::storage::{DocumentStore, SearchHit};
use crate::vector::Vector;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Configuration shared by every collection a client opens.
#[derive(Debug, Clone, Copy)]
pub struct CollectionConfig {
    /// Checkpoint after this many WAL entries.
    pub checkpoint_interval: usize,
    /// Distance metric for new collections; existing ones must match.
    pub metric: DistanceMetric,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            checkpoint_interval: 1000,
            metric: DistanceMetric::L2,
        }
    }
}

/// A persistent collection of documents with their embeddings.
pub struct Collection {
    name: String,
    dir: PathBuf,
    store: DocumentStore,
    embedder: Arc<dyn Embedder>,
    wal: WriteAheadLog,
    snapshot_mgr: SnapshotManager,
    wal_count: usize,
    config: CollectionConfig,
}

impl Collection {
    /// Open or create the collection stored in `dir`.
    pub fn open(
        name: impl Into<String>,
        dir: impl AsRef<Path>,
        embedder: Arc<dyn Embedder>,
        config: CollectionConfig,
    ) -> Result<Self> {
        let name = name.into();
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;

        let snapshot_mgr = SnapshotManager::new(&dir)?;
        match snapshot_mgr.load_manifest()? {
            Some(manifest) => check_manifest(&manifest, embedder.as_ref(), config.metric)?,
            None => snapshot_mgr.save_manifest(&Manifest {
                name: name.clone(),
                metric: config.metric,
                embedding_model: embedder.model_name().to_string(),
                dimension: embedder.dimension(),
                record_count: 0,
            })?,
        }

        let mut wal = WriteAheadLog::open(dir.join("wal.log"))?;
        let mut store = DocumentStore::with_flat_index(config.metric);

        if let Some(snapshot) = snapshot_mgr.load()? {
            for record in snapshot.records {
                store.upsert(record.id, record.document, Vector::new(record.embedding))?;
            }
        }

        let Replay {
            entries,
            valid_len,
        } = wal.replay()?;
        // Appends go after the last intact frame.
        wal.truncate_to(valid_len)?;
        for entry in &entries {
            if let WalEntry::Upsert {
                id,
                document,
                embedding,
            } = entry
            {
                store.upsert(id.as_str(), document.as_str(), Vector::new(embedding.clone()))?;
            }
        }
        debug!(collection = %name, replayed = entries.len(), "replayed WAL");
        info!(collection = %name, documents = store.len(), dir = %dir.display(), "opened collection");

        Ok(Self {
            name,
            dir,
            store,
            embedder,
            wal,
            snapshot_mgr,
            wal_count: entries.len(),
            config,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory holding this collection's files.
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Embed `document` and store it under `id`, replacing any previous record.
    pub fn upsert(&mut self, id: impl Into<String>, document: impl Into<String>) -> Result<()> {
        let id = id.into();
        let document = document.into();
        let embedding = self.embedder.embed(&document)?;

        // WAL first
        self.wal.append(&WalEntry::Upsert {
            id: id.clone(),
            document: document.clone(),
            embedding: embedding.as_slice().to_vec(),
        })?;

        self.store.upsert(id.as_str(), document, embedding)?;
        debug!(collection = %self.name, %id, "upserted document");
        self.wal_count += 1;
        self.maybe_checkpoint()?;

        Ok(())
    }

    /// Find the `n_results` stored documents nearest to `text`.
    pub fn query_texts(&self, text: &str, n_results: usize) -> Result<Vec<SearchHit>> {
        if self.store.is_empty() {
            return Ok(Vec::new());
        }
        let query = self.embedder.embed(text)?;
        let hits = self.store.search(&query, n_results)?;
        debug!(collection = %self.name, n_results, hits = hits.len(), "queried collection");
        Ok(hits)
    }

    /// Look up the document stored under `id`.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.store.get(id)
    }

    /// Number of stored documents.
    pub fn count(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Force a checkpoint: snapshot + truncate WAL.
    pub fn checkpoint(&mut self) -> Result<()> {
        let snapshot = CollectionSnapshot {
            records: self
                .store
                .records()
                .map(|r| SerializedRecord {
                    id: r.id.to_string(),
                    document: r.document.to_string(),
                    embedding: r.embedding.as_slice().to_vec(),
                })
                .collect(),
            dimension: self.store.dimension(),
        };
        self.snapshot_mgr.save(&snapshot, &self.manifest())?;

        self.wal.append(&WalEntry::Checkpoint)?;
        self.wal.truncate()?;
        self.wal_count = 0;
        debug!(collection = %self.name, documents = snapshot.records.len(), "checkpointed");

        Ok(())
    }

    fn maybe_checkpoint(&mut self) -> Result<()> {
        if self.wal_count >= self.config.checkpoint_interval {
            self.checkpoint()?;
        }
        Ok(())
    }

    fn manifest(&self) -> Manifest {
        Manifest {
            name: self.name.clone(),
            metric: self.config.metric,
            embedding_model: self.embedder.model_name().to_string(),
            dimension: self.embedder.dimension(),
            record_count: self.store.len(),
        }
    }
}

fn check_manifest(manifest: &Manifest, embedder: &dyn Embedder, metric: DistanceMetric) -> Result<()> {
    if manifest.metric != metric {
        return Err(SnipError::CollectionMismatch {
            reason: format!(
                "collection {:?} uses metric {}, not {}",
                manifest.name, manifest.metric, metric
            ),
        });
    }
    if manifest.embedding_model != embedder.model_name() || manifest.dimension != embedder.dimension() {
        return Err(SnipError::CollectionMismatch {
            reason: format!(
                "collection {:?} was embedded with {} ({} dims), not {} ({} dims)",
                manifest.name,
                manifest.embedding_model,
                manifest.dimension,
                embedder.model_name(),
                embedder.dimension()
            ),
        });
    }
    Ok(())
}
