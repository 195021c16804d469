//! Distance metrics for vector similarity

use crate::error::{Result, SnipError};
use crate::vector::Vector;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Distance metrics for measuring vector similarity. Lower is always closer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Squared Euclidean distance
    #[default]
    L2,
    /// Cosine distance (1 - cosine similarity)
    Cosine,
    /// Inner-product distance (1 - dot product)
    Ip,
}

impl DistanceMetric {
    /// Compute the distance between two vectors using this metric
    pub fn distance(&self, v1: &Vector, v2: &Vector) -> Result<f32> {
        if !v1.has_same_dimension(v2) {
            return Err(SnipError::DimensionMismatch {
                expected: v1.dimension(),
                actual: v2.dimension(),
            });
        }

        match self {
            DistanceMetric::L2 => Ok(squared_euclidean_distance(v1, v2)),
            DistanceMetric::Cosine => cosine_distance(v1, v2),
            DistanceMetric::Ip => Ok(1.0 - dot_product(v1, v2)),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DistanceMetric::L2 => "l2",
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::Ip => "ip",
        };
        f.write_str(name)
    }
}

/// Compute squared Euclidean (L2) distance between two vectors
pub fn squared_euclidean_distance(v1: &Vector, v2: &Vector) -> f32 {
    v1.as_slice()
        .iter()
        .zip(v2.as_slice().iter())
        .map(|(a, b)| (a - b).powi(2))
        .sum::<f32>()
}

/// Compute cosine distance between two vectors (1 - cosine similarity)
pub fn cosine_distance(v1: &Vector, v2: &Vector) -> Result<f32> {
    let norm1 = v1.norm();
    let norm2 = v2.norm();

    if norm1 == 0.0 || norm2 == 0.0 {
        return Err(SnipError::InvalidVector {
            reason: "Cannot compute cosine distance with zero vector".to_string(),
        });
    }

    let similarity = (dot_product(v1, v2) / (norm1 * norm2)).clamp(-1.0, 1.0);

    Ok(1.0 - similarity)
}

/// Compute dot product of two vectors
pub fn dot_product(v1: &Vector, v2: &Vector) -> f32 {
    v1.as_slice()
        .iter()
        .zip(v2.as_slice().iter())
        .map(|(a, b)| a * b)
        .sum()
}
