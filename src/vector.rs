//! Vector math primitives.
//!
//! Pure functions over fixed-length `f32` slices: similarity and distance
//! metrics, normalization, centroids, and top-k ranking. Nothing here holds
//! state or performs I/O.
//!
//! # Degenerate inputs
//!
//! | Input | Behavior |
//! |-------|----------|
//! | Zero vector in [`cosine_similarity`] | returns `0.0` |
//! | Zero vector in [`normalize`] | returns an unmodified copy |
//! | Empty collection in [`centroid`] | returns an empty vector |
//! | `k` larger than the candidate count in [`top_k`] | returns every candidate |
//!
//! Mismatched lengths are always an error, never truncated.
//!
//! ```rust
//! use concept_cluster::vector::{cosine_similarity, euclidean_distance, normalize};
//!
//! let a = [1.0_f32, 0.0];
//! let b = [0.0_f32, 1.0];
//! assert_eq!(cosine_similarity(&a, &b).unwrap(), 0.0);
//! assert!((euclidean_distance(&a, &b).unwrap() - 2f32.sqrt()).abs() < 1e-6);
//! assert_eq!(normalize(&[0.0, 0.0]), vec![0.0, 0.0]);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[inline]
fn check_lengths(a: &[f32], b: &[f32]) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

/// Inner product of two vectors.
pub fn dot(a: &[f32], b: &[f32]) -> Result<f32> {
    check_lengths(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// L2 norm.
pub fn magnitude(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity in `[-1, 1]`.
///
/// Returns `0.0` when either vector has zero magnitude: a zero vector has no
/// direction, so it is treated as unrelated to everything instead of
/// producing NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    let d = dot(a, b)?;
    let na = magnitude(a);
    let nb = magnitude(b);
    if na == 0.0 || nb == 0.0 {
        return Ok(0.0);
    }
    Ok((d / (na * nb)).clamp(-1.0, 1.0))
}

/// Euclidean (L2) distance.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> Result<f32> {
    check_lengths(a, b)?;
    Ok(squared_euclidean(a, b).sqrt())
}

/// Manhattan (L1) distance.
pub fn manhattan_distance(a: &[f32], b: &[f32]) -> Result<f32> {
    check_lengths(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum())
}

/// Squared Euclidean distance without a length check.
///
/// Callers validate dimensionality once up front.
#[inline]
pub(crate) fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Scale `v` to unit length.
///
/// A zero vector is returned unchanged.
pub fn normalize(v: &[f32]) -> Vec<f32> {
    let norm = magnitude(v);
    if norm == 0.0 {
        return v.to_vec();
    }
    v.iter().map(|x| x / norm).collect()
}

/// Component-wise arithmetic mean.
///
/// Returns an empty vector for an empty collection (no centroid computable).
pub fn centroid<V: AsRef<[f32]>>(vectors: &[V]) -> Result<Vec<f32>> {
    let Some(first) = vectors.first() else {
        return Ok(Vec::new());
    };
    let dim = first.as_ref().len();
    let mut sum = vec![0.0f32; dim];
    for (index, v) in vectors.iter().enumerate() {
        let v = v.as_ref();
        if v.len() != dim {
            return Err(Error::DimensionMismatch {
                index,
                expected: dim,
                found: v.len(),
            });
        }
        for (s, x) in sum.iter_mut().zip(v) {
            *s += x;
        }
    }
    let n = vectors.len() as f32;
    for s in &mut sum {
        *s /= n;
    }
    Ok(sum)
}

/// Scoring function used by [`top_k`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Cosine similarity.
    #[default]
    Cosine,
    /// Raw inner product.
    DotProduct,
    /// Negated Euclidean distance.
    Euclidean,
    /// Negated Manhattan distance.
    Manhattan,
}

impl Metric {
    /// Score `b` against `a`. Higher is always closer: distance metrics are
    /// negated so every metric ranks the same way.
    pub fn score(self, a: &[f32], b: &[f32]) -> Result<f32> {
        match self {
            Metric::Cosine => cosine_similarity(a, b),
            Metric::DotProduct => dot(a, b),
            Metric::Euclidean => euclidean_distance(a, b).map(|d| -d),
            Metric::Manhattan => manhattan_distance(a, b).map(|d| -d),
        }
    }
}

/// A vector to rank, with its identifier and optional caller metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<M = ()> {
    /// Identifier carried through to the result.
    pub id: String,
    /// Vector scored against the query.
    pub vector: Vec<f32>,
    /// Opaque metadata carried through to the result.
    pub metadata: Option<M>,
}

impl<M> Candidate<M> {
    /// Candidate without metadata.
    pub fn new(id: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            vector,
            metadata: None,
        }
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: M) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// One ranked result from [`top_k`].
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor<M = ()> {
    /// Identifier of the candidate.
    pub id: String,
    /// Score under the chosen metric (higher is closer).
    pub score: f32,
    /// Metadata copied from the candidate.
    pub metadata: Option<M>,
}

/// Rank `candidates` against `query` and keep the best `k`.
///
/// Sorting is stable: equal scores keep their input order.
pub fn top_k<M: Clone>(
    query: &[f32],
    candidates: &[Candidate<M>],
    k: usize,
    metric: Metric,
) -> Result<Vec<Neighbor<M>>> {
    top_k_by(query, candidates, k, |q, v| metric.score(q, v))
}

/// [`top_k`] with a caller-supplied scoring function (higher is closer).
pub fn top_k_by<M, F>(
    query: &[f32],
    candidates: &[Candidate<M>],
    k: usize,
    mut score: F,
) -> Result<Vec<Neighbor<M>>>
where
    M: Clone,
    F: FnMut(&[f32], &[f32]) -> Result<f32>,
{
    if k == 0 {
        return Ok(Vec::new());
    }

    let mut ranked = Vec::with_capacity(candidates.len());
    for c in candidates {
        ranked.push(Neighbor {
            id: c.id.clone(),
            score: score(query, &c.vector)?,
            metadata: c.metadata.clone(),
        });
    }

    // `sort_by` is stable.
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(k);
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn cosine_basic() {
        let a = [1.0, 0.0, 0.0];
        let b = [0.707, 0.707, 0.0];
        let c = cosine_similarity(&a, &b).unwrap();
        assert!((c - 0.707).abs() < 0.01);
    }

    #[test]
    fn cosine_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 1.0], &[0.0, 0.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn cosine_self_is_one() {
        let a = [0.3, -1.2, 4.5];
        assert!((cosine_similarity(&a, &a).unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn cosine_opposite_is_minus_one() {
        let c = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap();
        assert!((c + 1.0).abs() < EPS);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let err = cosine_similarity(&[1.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, Error::LengthMismatch { left: 1, right: 2 });
        assert!(euclidean_distance(&[1.0], &[1.0, 2.0]).is_err());
        assert!(manhattan_distance(&[1.0, 2.0, 3.0], &[1.0]).is_err());
        assert!(dot(&[], &[1.0]).is_err());
    }

    #[test]
    fn euclidean_and_manhattan() {
        let a = [0.0, 0.0];
        let b = [3.0, 4.0];
        assert!((euclidean_distance(&a, &b).unwrap() - 5.0).abs() < EPS);
        assert!((manhattan_distance(&a, &b).unwrap() - 7.0).abs() < EPS);
        assert_eq!(euclidean_distance(&b, &b).unwrap(), 0.0);
        assert_eq!(manhattan_distance(&b, &b).unwrap(), 0.0);
    }

    #[test]
    fn normalize_unit_length() {
        let n = normalize(&[3.0, 4.0]);
        assert!((n[0] - 0.6).abs() < EPS);
        assert!((n[1] - 0.8).abs() < EPS);
        assert!((magnitude(&n) - 1.0).abs() < EPS);
    }

    #[test]
    fn normalize_zero_is_identity() {
        assert_eq!(normalize(&[0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn centroid_mean() {
        let c = centroid(&[vec![0.0, 2.0], vec![2.0, 4.0], vec![4.0, 0.0]]).unwrap();
        assert!((c[0] - 2.0).abs() < EPS);
        assert!((c[1] - 2.0).abs() < EPS);
    }

    #[test]
    fn centroid_empty_is_empty() {
        let empty: Vec<Vec<f32>> = Vec::new();
        assert!(centroid(&empty).unwrap().is_empty());
    }

    #[test]
    fn centroid_reports_offending_index() {
        let err = centroid(&[vec![1.0, 2.0], vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            Error::DimensionMismatch {
                index: 2,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn top_k_ranks_descending_and_truncates() {
        let candidates = vec![
            Candidate::new("far", vec![0.0, 1.0]).with_metadata("f"),
            Candidate::new("near", vec![1.0, 0.1]).with_metadata("n"),
            Candidate::new("exact", vec![2.0, 0.0]).with_metadata("e"),
        ];
        let hits = top_k(&[1.0, 0.0], &candidates, 2, Metric::Cosine).unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "exact");
        assert_eq!(hits[0].metadata, Some("e"));
        assert_eq!(hits[1].id, "near");
    }

    #[test]
    fn top_k_ties_keep_input_order() {
        let candidates: Vec<Candidate> = vec![
            Candidate::new("b", vec![1.0, 0.0]),
            Candidate::new("a", vec![2.0, 0.0]),
            Candidate::new("c", vec![0.5, 0.0]),
        ];
        let hits = top_k(&[1.0, 0.0], &candidates, 10, Metric::Cosine).unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn top_k_distance_metric_prefers_closest() {
        let candidates: Vec<Candidate> = vec![
            Candidate::new("far", vec![10.0, 10.0]),
            Candidate::new("close", vec![0.1, 0.0]),
        ];
        let hits = top_k(&[0.0, 0.0], &candidates, 1, Metric::Euclidean).unwrap();
        assert_eq!(hits[0].id, "close");
        assert!((hits[0].score + 0.1).abs() < EPS);
    }

    #[test]
    fn top_k_custom_scorer() {
        let candidates: Vec<Candidate> = vec![
            Candidate::new("x", vec![5.0]),
            Candidate::new("y", vec![1.0]),
        ];
        let hits = top_k_by(&[0.0], &candidates, 5, |_, v| Ok(-v[0])).unwrap();
        assert_eq!(hits[0].id, "y");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn top_k_propagates_length_errors() {
        let candidates: Vec<Candidate> = vec![Candidate::new("bad", vec![1.0])];
        assert!(top_k(&[1.0, 0.0], &candidates, 1, Metric::Cosine).is_err());
    }
}
