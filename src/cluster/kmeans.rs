//! K-means clustering.
//!
//! Partitions data into at most `k` groups by minimizing the
//! **within-cluster sum of squares** (WCSS):
//!
//! ```text
//! WCSS = Σₖ Σᵢ∈Cₖ ||xᵢ - μₖ||²
//! ```
//!
//! # Lloyd's Algorithm
//!
//! 1. Seed k centroids (see [`Seeding`])
//! 2. **Assign**: each point → nearest centroid (Euclidean, ties → lowest index)
//! 3. **Update**: each centroid → mean of its points; a centroid with no points
//!    keeps its previous position
//! 4. Repeat until the summed centroid movement is at or below `tol`, or
//!    `max_iter` iterations have run
//!
//! Hitting `max_iter` is not an error. The partition found so far is returned
//! with [`Partition::converged`] set to `false` so callers can retry with a
//! larger budget.
//!
//! # Degenerate k
//!
//! Groups that end up empty are dropped, so `k > n` (or many duplicate points)
//! simply yields fewer groups. Every returned group has at least one member.
//!
//! # Reproducibility
//!
//! Seeding is the only random step. Fix it with [`Kmeans::with_seed`] or pass
//! your own generator to [`Kmeans::fit_with_rng`].

use rand::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::traits::{Clustering, Partition};
use super::util::{self, check_dimensions};
use crate::cancel::{self, CancelToken};
use crate::error::{Error, Result};
use crate::vector::squared_euclidean;

/// Centroid initialization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seeding {
    /// k-means++: the first centroid is a uniformly chosen point, each later
    /// centroid is a point drawn with probability proportional to its squared
    /// distance from the nearest centroid chosen so far. Once every point
    /// coincides with a centroid, remaining centroids are uniform picks.
    #[default]
    KmeansPlusPlus,
    /// Every centroid component drawn uniformly from that dimension's
    /// `[min, max]` range over the input.
    UniformBox,
}

/// K-means clustering algorithm.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of centroids.
    k: usize,
    /// Maximum Lloyd iterations.
    max_iter: usize,
    /// Convergence tolerance on summed centroid movement.
    tol: f32,
    /// Random seed.
    seed: Option<u64>,
    seeding: Seeding,
    cancel: Option<CancelToken>,
}

impl Kmeans {
    /// Create a new K-means clusterer.
    ///
    /// Defaults: `max_iter = 100`, `tol = 1e-4`, k-means++ seeding, unseeded.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: 100,
            tol: 1e-4,
            seed: None,
            seeding: Seeding::default(),
            cancel: None,
        }
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance.
    pub fn with_tol(mut self, tol: f32) -> Self {
        self.tol = tol;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the seed when `Some`, leave the clusterer unseeded otherwise.
    pub fn with_optional_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Set the centroid initialization strategy.
    pub fn with_seeding(mut self, seeding: Seeding) -> Self {
        self.seeding = seeding;
        self
    }

    /// Check `token` before every iteration.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Fit using the supplied random source instead of the configured seed.
    pub fn fit_with_rng<R: Rng>(&self, data: &[Vec<f32>], rng: &mut R) -> Result<Partition> {
        self.validate()?;

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

        let mut centroids = match self.seeding {
            Seeding::KmeansPlusPlus => self.init_plus_plus(data, rng),
            Seeding::UniformBox => self.init_uniform_box(data, d, rng),
        };
        let mut labels = vec![0usize; n];
        let mut iterations = 0;
        let mut converged = false;

        for _iter in 0..self.max_iter {
            cancel::check(self.cancel.as_ref())?;

            assign(data, &centroids, &mut labels);
            iterations += 1;

            // Update step
            let mut sums = vec![vec![0.0f32; d]; self.k];
            let mut counts = vec![0usize; self.k];
            for (point, &label) in data.iter().zip(&labels) {
                for (s, x) in sums[label].iter_mut().zip(point) {
                    *s += x;
                }
                counts[label] += 1;
            }

            let mut shift = 0.0f32;
            for ((centroid, mut sum), count) in centroids.iter_mut().zip(sums).zip(counts) {
                // Empty cluster: keep the previous centroid.
                if count == 0 {
                    continue;
                }
                for s in &mut sum {
                    *s /= count as f32;
                }
                shift += squared_euclidean(centroid, &sum).sqrt();
                *centroid = sum;
            }

            if shift <= self.tol {
                converged = true;
                break;
            }
        }

        // Final assignment against the last centroids.
        assign(data, &centroids, &mut labels);
        let partition =
            util::partition_from_labels(data, d, &labels, self.k, iterations, converged);

        if converged {
            tracing::debug!(
                k = self.k,
                n,
                iterations,
                groups = partition.n_groups(),
                inertia = partition.inertia,
                "k-means converged"
            );
        } else {
            tracing::warn!(
                k = self.k,
                n,
                max_iter = self.max_iter,
                tol = self.tol,
                "k-means stopped before converging"
            );
        }

        Ok(partition)
    }

    fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "must be at least 1",
            });
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iter",
                message: "must be at least 1",
            });
        }
        if self.tol.is_nan() || self.tol < 0.0 {
            return Err(Error::InvalidParameter {
                name: "tol",
                message: "must be a non-negative number",
            });
        }
        Ok(())
    }

    /// Initialize centroids using the k-means++ algorithm.
    fn init_plus_plus<R: Rng>(&self, data: &[Vec<f32>], rng: &mut R) -> Vec<Vec<f32>> {
        let n = data.len();
        let mut centroids: Vec<Vec<f32>> = Vec::with_capacity(self.k);

        // First centroid: random point
        let first = rng.random_range(0..n);
        centroids.push(data[first].clone());

        let mut min_dist: Vec<f32> = data
            .iter()
            .map(|p| squared_euclidean(p, &centroids[0]))
            .collect();

        while centroids.len() < self.k {
            let total: f32 = min_dist.iter().sum();

            let selected = if total <= 0.0 {
                rng.random_range(0..n)
            } else {
                // Sample proportional to squared distance, never a covered point.
                let threshold = rng.random::<f32>() * total;
                let mut selected = min_dist.iter().rposition(|&d| d > 0.0).unwrap_or(0);
                let mut cumsum = 0.0;
                for (j, &d) in min_dist.iter().enumerate() {
                    cumsum += d;
                    if d > 0.0 && cumsum >= threshold {
                        selected = j;
                        break;
                    }
                }
                selected
            };

            let chosen = data[selected].clone();
            for (md, p) in min_dist.iter_mut().zip(data) {
                *md = md.min(squared_euclidean(p, &chosen));
            }
            centroids.push(chosen);
        }

        centroids
    }

    fn init_uniform_box<R: Rng>(&self, data: &[Vec<f32>], d: usize, rng: &mut R) -> Vec<Vec<f32>> {
        let mut lo = vec![f32::INFINITY; d];
        let mut hi = vec![f32::NEG_INFINITY; d];
        for p in data {
            for (j, &x) in p.iter().enumerate() {
                lo[j] = lo[j].min(x);
                hi[j] = hi[j].max(x);
            }
        }

        (0..self.k)
            .map(|_| {
                lo.iter()
                    .zip(&hi)
                    .map(|(&l, &h)| l + rng.random::<f32>() * (h - l))
                    .collect()
            })
            .collect()
    }
}

fn assign(data: &[Vec<f32>], centroids: &[Vec<f32>], labels: &mut [usize]) {
    #[cfg(feature = "parallel")]
    {
        labels
            .par_iter_mut()
            .zip(data.par_iter())
            .for_each(|(label, point)| *label = util::nearest(point, centroids));
    }

    #[cfg(not(feature = "parallel"))]
    {
        for (label, point) in labels.iter_mut().zip(data) {
            *label = util::nearest(point, centroids);
        }
    }
}

impl Clustering for Kmeans {
    fn fit(&self, data: &[Vec<f32>]) -> Result<Partition> {
        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        self.fit_with_rng(data, &mut rng)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}
