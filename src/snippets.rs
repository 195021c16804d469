//! Snippet storage: add text under a fresh identifier, find similar text.

use crate::error::Result;
use crate::persistence::Collection;
use std::fmt;
use uuid::Uuid;

/// Number of matches a query returns.
pub const DEFAULT_RESULTS: usize = 2;

/// Handle for one stored snippet, generated when it is added.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// A new random (v4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One ranked match.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryMatch {
    pub document: String,
    pub id: String,
    pub distance: f32,
}

/// Matches for a query, closest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub matches: Vec<QueryMatch>,
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueryMatch> {
        self.matches.iter()
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a QueryMatch;
    type IntoIter = std::slice::Iter<'a, QueryMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

/// Stores snippets in a single collection.
pub struct SnippetStore {
    collection: Collection,
}

impl SnippetStore {
    pub fn new(collection: Collection) -> Self {
        Self { collection }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Store `text` under a newly generated identifier and return it.
    ///
    /// Callers reject blank text before getting here.
    pub fn add(&mut self, text: &str) -> Result<Identifier> {
        let id = Identifier::generate();
        self.collection.upsert(id.as_str(), text)?;
        Ok(id)
    }

    /// Up to `k` stored snippets nearest to `text`.
    pub fn query(&self, text: &str, k: usize) -> Result<QueryResult> {
        let matches = self
            .collection
            .query_texts(text, k)?
            .into_iter()
            .map(|hit| QueryMatch {
                document: hit.document,
                id: hit.id,
                distance: hit.distance,
            })
            .collect();
        Ok(QueryResult { matches })
    }
}
