//! HNSW Vector Index for nearest-exemplar search
//!
//! An in-memory index over exemplar embeddings, rebuilt from SQLite when a
//! store is opened. Ids are the exemplar ids stored alongside.
//!
//! # HNSW Parameters
//!
//! - **M**: Number of bi-directional links per node (default: 16)
//! - **efConstruction**: Candidate list size while building (default: 200)
//! - **efSearch**: Candidate list size while querying (passed per search)

use hnsw_rs::prelude::*;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

const DEFAULT_M: usize = 16;
const DEFAULT_EF_CONSTRUCTION: usize = 200;
const DEFAULT_MAX_ELEMENTS: usize = 100_000;

/// Errors that can occur during vector index operations
#[derive(Error, Debug)]
pub enum VectorIndexError {
    /// Invalid embedding dimension
    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension provided
        actual: usize,
    },

    /// Internal HNSW error
    #[error("HNSW error: {0}")]
    Internal(String),
}

struct Inner {
    hnsw: Hnsw<'static, f32, DistCosine>,
    /// Internal HNSW ids to exemplar ids
    ids: HashMap<usize, String>,
    next_id: usize,
}

fn new_hnsw() -> Hnsw<'static, f32, DistCosine> {
    let nb_layer = 16.min((DEFAULT_MAX_ELEMENTS as f32).ln().trunc() as usize);
    Hnsw::<'static, f32, DistCosine>::new(
        DEFAULT_M,
        DEFAULT_MAX_ELEMENTS,
        nb_layer,
        DEFAULT_EF_CONSTRUCTION,
        DistCosine {},
    )
}

/// A wrapper around HNSW for cosine similarity search
///
/// # Examples
///
/// ```
/// use tabviz_store::vector_index::VectorIndex;
///
/// let index = VectorIndex::new(3);
/// index.add("ex_0", &[1.0, 0.0, 0.0]).unwrap();
///
/// let results = index.search(&[1.0, 0.0, 0.0], 1, 64).unwrap();
/// assert_eq!(results[0].0, "ex_0");
/// ```
pub struct VectorIndex {
    dimension: usize,
    inner: Mutex<Inner>,
}

impl VectorIndex {
    /// Create a new vector index with the specified dimension
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            inner: Mutex::new(Inner {
                hnsw: new_hnsw(),
                ids: HashMap::new(),
                next_id: 0,
            }),
        }
    }

    /// Expected embedding dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), VectorIndexError> {
        if vector.len() != self.dimension {
            return Err(VectorIndexError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, VectorIndexError> {
        self.inner
            .lock()
            .map_err(|_| VectorIndexError::Internal("index lock poisoned".to_string()))
    }

    /// Add an embedding under `id`
    pub fn add(&self, id: impl Into<String>, embedding: &[f32]) -> Result<(), VectorIndexError> {
        self.check_dimension(embedding)?;

        let mut inner = self.lock()?;
        let internal_id = inner.next_id;
        inner.next_id += 1;

        let embedding_vec = embedding.to_vec();
        inner.hnsw.insert((&embedding_vec, internal_id));
        inner.ids.insert(internal_id, id.into());

        Ok(())
    }

    /// Search for the `k` nearest neighbors of `query`
    ///
    /// Returns `(id, similarity)` pairs, most similar first. An empty index
    /// yields no results.
    pub fn search(
        &self,
        query: &[f32],
        k: usize,
        ef_search: usize,
    ) -> Result<Vec<(String, f32)>, VectorIndexError> {
        self.check_dimension(query)?;

        let inner = self.lock()?;
        if inner.ids.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let mut results: Vec<(String, f32)> = inner
            .hnsw
            .search(query, k, ef_search.max(k))
            .into_iter()
            .filter_map(|neighbour| {
                inner
                    .ids
                    .get(&neighbour.d_id)
                    // Cosine distance to cosine similarity
                    .map(|id| (id.clone(), 1.0 - neighbour.distance))
            })
            .collect();

        results.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(results)
    }

    /// Number of vectors in the index
    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.ids.len()).unwrap_or(0)
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_index_creation() {
        let index = VectorIndex::new(384);
        assert_eq!(index.dimension(), 384);
        assert!(index.is_empty());
    }

    #[test]
    fn test_search_empty_index() {
        let index = VectorIndex::new(3);
        let results = index.search(&[1.0, 0.0, 0.0], 1, 64).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_add_and_search() {
        let index = VectorIndex::new(384);

        let embedding1: Vec<f32> = (0..384).map(|i| (i as f32) / 384.0).collect();
        index.add("ex_0", &embedding1).unwrap();

        let mut embedding2 = embedding1.clone();
        embedding2[0] = 0.5;
        index.add("ex_1", &embedding2).unwrap();

        assert_eq!(index.len(), 2);

        let results = index.search(&embedding1, 2, 64).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, "ex_0");
        assert!(results[0].1 > 0.99);
    }

    #[test]
    fn test_dimension_mismatch() {
        let index = VectorIndex::new(384);

        let result = index.add("ex_0", &[0.1; 128]);
        assert!(matches!(result, Err(VectorIndexError::DimensionMismatch { .. })));

        let result = index.search(&[0.1; 3], 1, 64);
        assert!(matches!(
            result,
            Err(VectorIndexError::DimensionMismatch { expected: 384, actual: 3 })
        ));
    }

    #[test]
    fn test_similarity_ordering() {
        let index = VectorIndex::new(3);
        index.add("x", &[1.0, 0.0, 0.0]).unwrap();
        index.add("y", &[0.0, 1.0, 0.0]).unwrap();
        index.add("xy", &[0.7071, 0.7071, 0.0]).unwrap();

        let results = index.search(&[1.0, 0.0, 0.0], 3, 64).unwrap();

        assert_eq!(results[0].0, "x");
        assert!(results[0].1 > 0.99);
        assert_eq!(results[1].0, "xy");
        assert!(results[1].1 > 0.5);
        assert_eq!(results[2].0, "y");
        assert!(results[2].1 < 0.1);
    }
}
