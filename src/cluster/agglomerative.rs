//! Agglomerative (bottom-up) clustering on centroids.
//!
//! Every point starts as its own cluster. The two clusters whose centroids are
//! closest (Euclidean) are merged, the merged centroid is recomputed as the
//! mean of all its members, and the process repeats until `max_clusters`
//! clusters remain.
//!
//! ## Determinism
//!
//! Clusters keep a fixed index order. On equal distances the pair seen first
//! in `(i, j)` order wins, the merged cluster takes the lower index, and the
//! order of the remaining clusters is unchanged.
//!
//! ## Complexity
//!
//! A centroid distance matrix is cached and only the merged cluster's row is
//! recomputed after each merge, so the pair search dominates: O(n²) per merge,
//! O(n² · (n − max_clusters)) overall, O(n²) memory. Fine for the few
//! thousand points this crate targets.
//!
//! The cache stores exactly what a full recomputation would produce (same
//! distance function on the same centroids), so merge order and output match
//! the naive algorithm.

use super::traits::{Clustering, Partition};
use super::util::{self, check_dimensions};
use crate::cancel::{self, CancelToken};
use crate::error::{Error, Result};
use crate::vector::squared_euclidean;

/// Agglomerative clustering down to a fixed number of clusters.
#[derive(Debug, Clone)]
pub struct Agglomerative {
    max_clusters: usize,
    cancel: Option<CancelToken>,
}

impl Agglomerative {
    /// Merge until at most `max_clusters` clusters remain.
    pub fn new(max_clusters: usize) -> Self {
        Self {
            max_clusters,
            cancel: None,
        }
    }

    /// Check `token` before every merge.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

#[inline]
fn distance(a: &[f32], b: &[f32]) -> f32 {
    squared_euclidean(a, b).sqrt()
}

impl Clustering for Agglomerative {
    fn fit(&self, data: &[Vec<f32>]) -> Result<Partition> {
        if self.max_clusters == 0 {
            return Err(Error::InvalidParameter {
                name: "max_clusters",
                message: "must be at least 1",
            });
        }

        let n = data.len();
        if n == 0 {
            return Ok(Partition::empty());
        }

        let d = check_dimensions(data)?;
        if d == 0 {
            return Err(Error::InvalidParameter {
                name: "dimension",
                message: "must be at least 1",
            });
        }

        // Nothing to merge: one singleton per point.
        if n <= self.max_clusters {
            let labels: Vec<usize> = (0..n).collect();
            return Ok(util::partition_from_labels(data, d, &labels, n, 0, true));
        }

        let mut active = vec![true; n];
        let mut members: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
        let mut centroids: Vec<Vec<f32>> = data.to_vec();

        let mut dist = vec![vec![0.0f32; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let dij = distance(&data[i], &data[j]);
                dist[i][j] = dij;
                dist[j][i] = dij;
            }
        }

        let mut remaining = n;
        let mut merges = 0;

        while remaining > self.max_clusters {
            cancel::check(self.cancel.as_ref())?;

            // Find minimum distance pair
            let mut min_dist = f32::INFINITY;
            let mut best: Option<(usize, usize)> = None;
            for i in 0..n {
                if !active[i] {
                    continue;
                }
                for j in (i + 1)..n {
                    if active[j] && (best.is_none() || dist[i][j] < min_dist) {
                        min_dist = dist[i][j];
                        best = Some((i, j));
                    }
                }
            }
            let Some((bi, bj)) = best else {
                break;
            };

            // Merge j into i; i keeps its position.
            let moved = std::mem::take(&mut members[bj]);
            members[bi].extend(moved);
            members[bi].sort_unstable();
            active[bj] = false;
            centroids[bi] = util::mean_of(data, &members[bi], d);

            for k in 0..n {
                if active[k] && k != bi {
                    let dk = distance(&centroids[bi], &centroids[k]);
                    dist[bi][k] = dk;
                    dist[k][bi] = dk;
                }
            }

            remaining -= 1;
            merges += 1;
        }

        let mut labels = vec![0usize; n];
        let mut slots = 0;
        for (slot_members, &is_active) in members.iter().zip(&active) {
            if !is_active {
                continue;
            }
            for &i in slot_members {
                labels[i] = slots;
            }
            slots += 1;
        }

        tracing::debug!(
            n,
            max_clusters = self.max_clusters,
            merges,
            "agglomerative clustering finished"
        );

        Ok(util::partition_from_labels(data, d, &labels, slots, merges, true))
    }

    fn n_clusters(&self) -> usize {
        self.max_clusters
    }
}
