//! # snipstore
//!
//! Store short text snippets and look up the ones most similar to a query.
//!
//! This library provides:
//! - Text embedding with all-MiniLM-L6-v2, or offline feature hashing
//! - Distance metrics (squared L2, cosine, inner product)
//! - Brute-force nearest-neighbor search over stored documents
//! - Durable named collections (write-ahead log + snapshots)
//! - An interactive `add` / `query` / `quit` command loop
//!
//! ## Example
//!
//! ```no_run
//! use snipstore::persistence::{CollectionConfig, PersistentClient};
//! use snipstore::snippets::SnippetStore;
//!
//! let client = PersistentClient::new("./chromadb", CollectionConfig::default())?;
//! let mut store = SnippetStore::new(client.get_or_create_collection("input_storage")?);
//!
//! let id = store.add("dogs are loyal pets")?;
//! let result = store.query("pet", 2)?;
//! assert_eq!(result.matches[0].id, id.as_str());
//! # Ok::<(), snipstore::SnipError>(())
//! ```

pub mod config;
pub mod distance;
pub mod embedding;
pub mod error;
pub mod flat_index;
pub mod persistence;
pub mod repl;
pub mod snippets;
pub mod storage;
pub mod vector;

pub use config::Config;
pub use distance::DistanceMetric;
pub use embedding::{Embedder, EmbedderKind, FastEmbedder, HashingEmbedder};
pub use error::{Result, SnipError};
pub use flat_index::FlatIndex;
pub use repl::{Command, CommandLoop};
pub use snippets::{Identifier, QueryMatch, QueryResult, SnippetStore};
pub use storage::DocumentStore;
pub use vector::Vector;
