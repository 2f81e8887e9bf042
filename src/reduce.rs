//! Cheap dimensionality reduction.
//!
//! [`reduce_dimensions`] is a deliberately simplified projection: it centers
//! every vector on the shared mean and keeps the first `target_dim`
//! components. It is **not** PCA: no covariance matrix, no eigenvectors, so
//! the kept axes are not the directions of largest variance. Its purpose is
//! to shrink vectors before pairwise-distance work, and callers depend only on
//! the output shape (`n` vectors of length `target_dim`). A true PCA could
//! replace it without changing that contract.

use crate::cluster::check_dimensions;
use crate::error::{Error, Result};
use crate::vector::centroid;

/// Center on the mean, then truncate to `target_dim` components.
///
/// If `target_dim` is at least the input dimension, unmodified copies are
/// returned (no centering).
///
/// ```rust
/// use concept_cluster::reduce_dimensions;
///
/// let out = reduce_dimensions(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]], 2).unwrap();
/// assert_eq!(out, vec![vec![-1.5, -1.5], vec![1.5, 1.5]]);
/// ```
pub fn reduce_dimensions(vectors: &[Vec<f32>], target_dim: usize) -> Result<Vec<Vec<f32>>> {
    if target_dim == 0 {
        return Err(Error::InvalidParameter {
            name: "target_dim",
            message: "must be at least 1",
        });
    }

    let dim = check_dimensions(vectors)?;
    if vectors.is_empty() || target_dim >= dim {
        return Ok(vectors.to_vec());
    }

    let mean = centroid(vectors)?;
    Ok(vectors
        .iter()
        .map(|v| {
            v.iter()
                .zip(&mean)
                .take(target_dim)
                .map(|(x, m)| x - m)
                .collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_then_truncates() {
        let out = reduce_dimensions(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]], 2).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|v| v.len() == 2));
        assert_eq!(out, vec![vec![-1.5, -1.5], vec![1.5, 1.5]]);
    }

    #[test]
    fn target_at_or_above_dimension_copies() {
        let data = vec![vec![1.0, 2.0], vec![3.0, 5.0]];
        assert_eq!(reduce_dimensions(&data, 2).unwrap(), data);
        assert_eq!(reduce_dimensions(&data, 10).unwrap(), data);
    }

    #[test]
    fn centered_columns_sum_to_zero() {
        let data = vec![
            vec![1.0, 10.0, 0.0, 3.0],
            vec![2.0, 20.0, 1.0, 3.0],
            vec![6.0, 30.0, 2.0, 3.0],
        ];
        let out = reduce_dimensions(&data, 3).unwrap();
        for j in 0..3 {
            let s: f32 = out.iter().map(|v| v[j]).sum();
            assert!(s.abs() < 1e-4);
        }
    }

    #[test]
    fn zero_target_is_rejected() {
        assert!(reduce_dimensions(&[vec![1.0]], 0).is_err());
    }

    #[test]
    fn mixed_dimensions_are_rejected() {
        let err = reduce_dimensions(&[vec![1.0, 2.0], vec![1.0]], 1).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { index: 1, .. }));
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(reduce_dimensions(&[], 3).unwrap().is_empty());
    }
}
