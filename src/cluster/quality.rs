//! Cluster quality scores.
//!
//! - [`silhouette_score`]: cohesion vs. separation per point, averaged. Higher
//!   is better, range `[-1, 1]`.
//! - [`davies_bouldin_index`]: worst scatter-to-separation ratio per cluster,
//!   averaged. Lower is better, range `[0, ∞)`.
//! - [`coherence`]: how tightly one group surrounds its centroid, `[0, 1]`.
//!
//! Both partition scores need at least two clusters; with fewer there is no
//! separation to measure and they return `0.0` instead of an error.
//!
//! Distances are Euclidean throughout.

use std::collections::BTreeMap;

use super::util::{check_dimensions, mean_of};
use crate::error::{Error, Result};
use crate::vector::squared_euclidean;

/// Map a mean member-to-centroid distance onto `(0, 1]`.
///
/// `1 / (1 + d)`: zero spread (a singleton, or identical points) gives `1.0`
/// and the score falls monotonically as the spread grows.
#[inline]
pub fn coherence(mean_distance: f32) -> f32 {
    1.0 / (1.0 + mean_distance.max(0.0))
}

/// Coherence of the points at `members` around `centroid`.
///
/// An empty member list has no spread and scores `1.0`.
pub fn group_coherence(data: &[Vec<f32>], members: &[usize], centroid: &[f32]) -> f32 {
    if members.is_empty() {
        return 1.0;
    }
    let total: f32 = members
        .iter()
        .map(|&i| squared_euclidean(&data[i], centroid).sqrt())
        .sum();
    coherence(total / members.len() as f32)
}

/// Dense cluster indices for arbitrary labels, in ascending label order.
fn index_labels(labels: &[usize]) -> (Vec<usize>, Vec<usize>) {
    let mut ids: BTreeMap<usize, usize> = BTreeMap::new();
    for &l in labels {
        let next = ids.len();
        ids.entry(l).or_insert(next);
    }
    // Re-number in ascending label order for a stable iteration order.
    for (dense, slot) in ids.values_mut().enumerate() {
        *slot = dense;
    }

    let mut sizes = vec![0usize; ids.len()];
    let idx: Vec<usize> = labels
        .iter()
        .map(|l| {
            let c = ids[l];
            sizes[c] += 1;
            c
        })
        .collect();
    (idx, sizes)
}

fn check_labels(data: &[Vec<f32>], labels: &[usize]) -> Result<()> {
    if data.len() != labels.len() {
        return Err(Error::InvalidParameter {
            name: "labels",
            message: "must contain exactly one label per point",
        });
    }
    check_dimensions(data)?;
    Ok(())
}

/// Mean silhouette coefficient over all points.
///
/// For point `i`: `a` is the mean distance to the other members of its own
/// cluster (0 when it is alone), `b` the smallest mean distance to the members
/// of any other cluster, and `s = (b - a) / max(a, b)` (0 when both are 0).
///
/// Returns `0.0` for empty input or fewer than two distinct labels.
pub fn silhouette_score(data: &[Vec<f32>], labels: &[usize]) -> Result<f32> {
    check_labels(data, labels)?;

    let (idx, sizes) = index_labels(labels);
    let k = sizes.len();
    if k < 2 {
        return Ok(0.0);
    }

    let n = data.len();
    let mut total = 0.0f32;
    let mut sums = vec![0.0f32; k];

    for i in 0..n {
        sums.iter_mut().for_each(|s| *s = 0.0);
        for j in 0..n {
            if i != j {
                sums[idx[j]] += squared_euclidean(&data[i], &data[j]).sqrt();
            }
        }

        let own = idx[i];
        let a = if sizes[own] > 1 {
            sums[own] / (sizes[own] - 1) as f32
        } else {
            0.0
        };
        let b = (0..k)
            .filter(|&c| c != own)
            .map(|c| sums[c] / sizes[c] as f32)
            .fold(f32::INFINITY, f32::min);

        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }

    Ok(total / n as f32)
}

/// Davies–Bouldin index.
///
/// For each cluster, the worst `(S_i + S_j) / d(c_i, c_j)` over the other
/// clusters, where `S` is the mean member-to-centroid distance; averaged over
/// clusters. Coincident centroids of spread-out clusters score infinity.
///
/// Returns `0.0` for empty input or fewer than two distinct labels.
pub fn davies_bouldin_index(data: &[Vec<f32>], labels: &[usize]) -> Result<f32> {
    check_labels(data, labels)?;

    let (idx, sizes) = index_labels(labels);
    let k = sizes.len();
    if k < 2 {
        return Ok(0.0);
    }

    let dim = data[0].len();
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); k];
    for (i, &c) in idx.iter().enumerate() {
        members[c].push(i);
    }

    let centroids: Vec<Vec<f32>> = members.iter().map(|m| mean_of(data, m, dim)).collect();
    let scatter: Vec<f32> = members
        .iter()
        .zip(&centroids)
        .map(|(m, c)| {
            m.iter()
                .map(|&i| squared_euclidean(&data[i], c).sqrt())
                .sum::<f32>()
                / m.len() as f32
        })
        .collect();

    let mut total = 0.0f32;
    for i in 0..k {
        let mut worst = 0.0f32;
        for j in 0..k {
            if i == j {
                continue;
            }
            let spread = scatter[i] + scatter[j];
            let sep = squared_euclidean(&centroids[i], &centroids[j]).sqrt();
            let ratio = if sep > 0.0 {
                spread / sep
            } else if spread > 0.0 {
                f32::INFINITY
            } else {
                0.0
            };
            worst = worst.max(ratio);
        }
        total += worst;
    }

    Ok(total / k as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(xs: &[f32]) -> Vec<Vec<f32>> {
        xs.iter().map(|&x| vec![x]).collect()
    }

    #[test]
    fn coherence_is_one_for_no_spread_and_decreasing() {
        assert_eq!(coherence(0.0), 1.0);
        assert!(coherence(0.5) > coherence(1.0));
        assert!(coherence(100.0) > 0.0);
    }

    #[test]
    fn group_coherence_singleton_is_one() {
        let data = line(&[3.0, 7.0]);
        assert_eq!(group_coherence(&data, &[1], &[7.0]), 1.0);
        assert!((group_coherence(&data, &[0, 1], &[5.0]) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn silhouette_single_cluster_is_zero() {
        let data = line(&[0.0, 1.0, 2.0]);
        assert_eq!(silhouette_score(&data, &[4, 4, 4]).unwrap(), 0.0);
    }

    #[test]
    fn silhouette_empty_is_zero() {
        assert_eq!(silhouette_score(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn silhouette_literal_value() {
        let data = line(&[0.0, 1.0, 10.0, 11.0]);
        let s = silhouette_score(&data, &[0, 0, 1, 1]).unwrap();
        let expected = (9.5 / 10.5 + 8.5 / 9.5) / 2.0;
        assert!((s - expected).abs() < 1e-5, "got {s}");
    }

    #[test]
    fn silhouette_labels_need_not_be_contiguous() {
        let data = line(&[0.0, 1.0, 10.0, 11.0]);
        let a = silhouette_score(&data, &[0, 0, 1, 1]).unwrap();
        let b = silhouette_score(&data, &[9, 9, 2, 2]).unwrap();
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn silhouette_bad_partition_scores_lower() {
        let data = line(&[0.0, 1.0, 10.0, 11.0]);
        let good = silhouette_score(&data, &[0, 0, 1, 1]).unwrap();
        let bad = silhouette_score(&data, &[0, 1, 0, 1]).unwrap();
        assert!(bad < 0.0);
        assert!(good > bad);
    }

    #[test]
    fn silhouette_coincident_points_is_zero() {
        // Every a and b is 0: no cohesion or separation to score.
        let data = vec![vec![0.0, 0.0], vec![0.0, 0.0]];
        assert_eq!(silhouette_score(&data, &[0, 1]).unwrap(), 0.0);

        let data = vec![vec![1.0], vec![1.0], vec![1.0], vec![1.0]];
        assert_eq!(silhouette_score(&data, &[0, 0, 1, 1]).unwrap(), 0.0);
    }

    #[test]
    fn silhouette_label_count_mismatch() {
        let data = line(&[0.0, 1.0]);
        assert!(silhouette_score(&data, &[0]).is_err());
    }

    #[test]
    fn davies_bouldin_prefers_separated_clusters() {
        let data = line(&[0.0, 1.0, 10.0, 11.0]);
        let good = davies_bouldin_index(&data, &[0, 0, 1, 1]).unwrap();
        let bad = davies_bouldin_index(&data, &[0, 1, 0, 1]).unwrap();
        // Scatter 0.5 each, separation 10.
        assert!((good - 0.1).abs() < 1e-6);
        assert!(bad > good);
    }

    #[test]
    fn davies_bouldin_single_cluster_is_zero() {
        let data = line(&[0.0, 1.0]);
        assert_eq!(davies_bouldin_index(&data, &[0, 0]).unwrap(), 0.0);
    }
}
