//! Persistence layer: WAL, snapshots, and on-disk collections.

pub mod serialization;
pub mod wal;
pub mod snapshot;
pub mod collection;
pub mod client;

pub use client::PersistentClient;
pub use collection::{Collection, CollectionConfig};
