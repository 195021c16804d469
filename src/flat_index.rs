//! Brute-force flat index — O(n) k-NN search

use std::collections::BTreeMap;

use crate::distance::DistanceMetric;
use crate::error::Result;
use crate::vector::Vector;

/// A flat (brute-force) index that computes distance to every stored vector.
#[derive(Debug)]
pub struct FlatIndex {
    vectors: BTreeMap<usize, Vector>,
    metric: DistanceMetric,
}

impl FlatIndex {
    /// Create a new empty flat index with the given distance metric.
    pub fn new(metric: DistanceMetric) -> Self {
        Self {
            vectors: BTreeMap::new(),
            metric,
        }
    }

    /// Iterate over all (id, vector) pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (&usize, &Vector)> {
        self.vectors.iter()
    }

    /// Add a vector under the given internal ID.
    pub fn add(&mut self, id: usize, vector: Vector) {
        self.vectors.insert(id, vector);
    }

    /// Remove the vector with the given internal ID, if present.
    pub fn remove(&mut self, id: usize) {
        self.vectors.remove(&id);
    }

    /// Search for the `k` nearest neighbors of `query`, as `(id, distance)`
    /// pairs sorted by distance ascending.
    pub fn search(&self, query: &Vector, k: usize) -> Result<Vec<(usize, f32)>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut results: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .map(|(&id, vec)| {
                let distance = self.metric.distance(query, vec)?;
                Ok((id, distance))
            })
            .collect::<Result<Vec<_>>>()?;

        // Stable sort: equal distances keep ascending id (insertion) order.
        results.sort_by(|a, b| a.1.total_cmp(&b.1));
        results.truncate(k);
        Ok(results)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_index_basic() {
        let mut index = FlatIndex::new(DistanceMetric::L2);
        index.add(0, Vector::new(vec![1.0, 0.0, 0.0]));
        index.add(1, Vector::new(vec![0.0, 1.0, 0.0]));
        index.add(2, Vector::new(vec![1.0, 1.0, 0.0]));

        let query = Vector::new(vec![1.0, 0.0, 0.0]);
        let results = index.search(&query, 2).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, 0); // exact match
        assert!(results[0].1 < 1e-6);
    }

    #[test]
    fn test_flat_index_ties_keep_insertion_order() {
        let mut index = FlatIndex::new(DistanceMetric::L2);
        for id in [3, 1, 2] {
            index.add(id, Vector::new(vec![1.0, 0.0]));
        }

        let results = index.search(&Vector::new(vec![1.0, 0.0]), 3).unwrap();
        let ids: Vec<usize> = results.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_flat_index_zero_k() {
        let mut index = FlatIndex::new(DistanceMetric::L2);
        index.add(0, Vector::new(vec![1.0]));
        assert!(index.search(&Vector::new(vec![1.0]), 0).unwrap().is_empty());
    }

    #[test]
    fn test_flat_index_dimension_mismatch() {
        let mut index = FlatIndex::new(DistanceMetric::L2);
        index.add(0, Vector::new(vec![1.0, 2.0, 3.0]));
        assert!(index.search(&Vector::new(vec![1.0]), 1).is_err());
    }

    #[test]
    fn test_flat_index_remove() {
        let mut index = FlatIndex::new(DistanceMetric::L2);
        index.add(0, Vector::new(vec![1.0, 0.0]));
        index.add(1, Vector::new(vec![0.0, 1.0]));
        assert_eq!(index.len(), 2);

        index.remove(0);
        assert_eq!(index.len(), 1);
    }
}
