//! Serialization utilities: bincode for records, JSON for the manifest.

use crate::distance::DistanceMetric;
use crate::error::{Result, SnipError};
use serde::{Deserialize, Serialize};

/// Serializable form of one stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedRecord {
    pub id: String,
    pub document: String,
    pub embedding: Vec<f32>,
}

/// Full state of a collection, as written to `snapshot.bin`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    pub records: Vec<SerializedRecord>,
    pub dimension: Option<usize>,
}

/// Human-readable description of a collection, kept in `manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub metric: DistanceMetric,
    pub embedding_model: String,
    pub dimension: usize,
    pub record_count: usize,
}

/// Encode data to bincode bytes.
pub fn to_bincode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| SnipError::Serialization(e.to_string()))
}

/// Decode data from bincode bytes.
pub fn from_bincode<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| SnipError::Serialization(e.to_string()))
}

/// Encode data to pretty-printed JSON bytes.
pub fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(value).map_err(|e| SnipError::Serialization(e.to_string()))
}

/// Decode data from JSON bytes.
pub fn from_json<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| SnipError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_json_uses_lowercase_metric() {
        let manifest = Manifest {
            name: "input_storage".to_string(),
            metric: DistanceMetric::Cosine,
            embedding_model: "hashing-v1".to_string(),
            dimension: 384,
            record_count: 0,
        };
        let text = String::from_utf8(to_json(&manifest).unwrap()).unwrap();
        assert!(text.contains("\"metric\": \"cosine\""));

        let decoded: Manifest = from_json(text.as_bytes()).unwrap();
        assert_eq!(decoded, manifest);
    }

    #[test]
    fn test_snapshot_preserves_unicode_documents() {
        let snapshot = CollectionSnapshot {
            records: vec![SerializedRecord {
                id: "id-1".to_string(),
                document: "café ☕ crème brûlée".to_string(),
                embedding: vec![0.5, 0.5],
            }],
            dimension: Some(2),
        };
        let bytes = to_bincode(&snapshot).unwrap();
        let decoded: CollectionSnapshot = from_bincode(&bytes).unwrap();
        assert_eq!(decoded.records, snapshot.records);
        assert_eq!(decoded.dimension, Some(2));
    }

    #[test]
    fn test_from_bincode_rejects_garbage() {
        let result: Result<CollectionSnapshot> = from_bincode(&[0xFF, 0xFF, 0xFF]);
        assert!(matches!(result, Err(SnipError::Serialization(_))));
    }
}
