//! In-memory document table searched through a flat index

use crate::distance::DistanceMetric;
use crate::error::{Result, SnipError};
use crate::flat_index::FlatIndex;
use crate::vector::Vector;
use std::collections::HashMap;

/// A nearest-neighbor hit with the stored document it points at.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub document: String,
    pub distance: f32,
}

/// A stored record, borrowed from the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record<'a> {
    pub id: &'a str,
    pub document: &'a str,
    pub embedding: &'a Vector,
}

/// Documents keyed by identifier, with their embeddings held in a flat index.
#[derive(Debug)]
pub struct DocumentStore {
    index: FlatIndex,
    /// String ID -> usize internal ID
    id_to_internal: HashMap<String, usize>,
    /// usize internal ID -> (String ID, document text)
    entries: HashMap<usize, (String, String)>,
    next_id: usize,
    dimension: Option<usize>,
}

impl DocumentStore {
    /// Create an empty store searched by brute force.
    pub fn with_flat_index(metric: DistanceMetric) -> Self {
        Self {
            index: FlatIndex::new(metric),
            id_to_internal: HashMap::new(),
            entries: HashMap::new(),
            next_id: 0,
            dimension: None,
        }
    }

    /// Iterate over records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.index.iter().filter_map(|(internal_id, embedding)| {
            self.entries.get(internal_id).map(|(id, document)| Record {
                id,
                document,
                embedding,
            })
        })
    }

    /// Insert a document, replacing any record with the same identifier.
    pub fn upsert(
        &mut self,
        id: impl Into<String>,
        document: impl Into<String>,
        embedding: Vector,
    ) -> Result<()> {
        let id = id.into();
        let dim = embedding.dimension();

        if let Some(expected) = self.dimension {
            if dim != expected {
                return Err(SnipError::DimensionMismatch {
                    expected,
                    actual: dim,
                });
            }
        } else {
            self.dimension = Some(dim);
        }

        if let Some(old_internal) = self.id_to_internal.remove(&id) {
            self.index.remove(old_internal);
            self.entries.remove(&old_internal);
        }

        let internal_id = self.next_id;
        self.next_id += 1;

        self.index.add(internal_id, embedding);
        self.id_to_internal.insert(id.clone(), internal_id);
        self.entries.insert(internal_id, (id, document.into()));

        Ok(())
    }

    /// Look up the document stored under `id`.
    pub fn get(&self, id: &str) -> Option<&str> {
        let internal_id = self.id_to_internal.get(id)?;
        self.entries
            .get(internal_id)
            .map(|(_, document)| document.as_str())
    }

    /// Get the number of documents in the store
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Search for the k nearest documents to `query`.
    pub fn search(&self, query: &Vector, k: usize) -> Result<Vec<SearchHit>> {
        if self.is_empty() {
            return Ok(vec![]);
        }

        if let Some(expected) = self.dimension {
            if query.dimension() != expected {
                return Err(SnipError::DimensionMismatch {
                    expected,
                    actual: query.dimension(),
                });
            }
        }

        let hits = self
            .index
            .search(query, k)?
            .into_iter()
            .filter_map(|(internal_id, distance)| {
                self.entries
                    .get(&internal_id)
                    .map(|(id, document)| SearchHit {
                        id: id.clone(),
                        document: document.clone(),
                        distance,
                    })
            })
            .collect();

        Ok(hits)
    }

    /// Get the dimension of embeddings in this store (if any)
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }
}
