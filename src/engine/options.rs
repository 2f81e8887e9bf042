use serde::{Deserialize, Serialize};

use crate::cluster::{davies_bouldin_index, silhouette_score, Seeding};
use crate::error::{Error, Result};

/// Which algorithm [`ClusterEngine`](super::ClusterEngine) runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// K-means with `k = max_clusters`.
    #[default]
    Kmeans,
    /// Agglomerative clustering down to `max_clusters`.
    Hierarchical,
    /// Search `auto_min_k..=auto_max_k` for the best-scoring k, then k-means.
    /// `max_clusters` still caps the search.
    Auto,
}

/// How auto mode compares candidate cluster counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRule {
    /// Mean silhouette coefficient, higher is better.
    #[default]
    Silhouette,
    /// Davies–Bouldin index, lower is better.
    DaviesBouldin,
}

impl ScoringRule {
    /// Score a labeling of `data`.
    pub fn score(self, data: &[Vec<f32>], labels: &[usize]) -> Result<f32> {
        match self {
            ScoringRule::Silhouette => silhouette_score(data, labels),
            ScoringRule::DaviesBouldin => davies_bouldin_index(data, labels),
        }
    }

    /// Whether `candidate` strictly beats `best`. Equal scores never win, so
    /// scanning k upward keeps the smaller k on ties.
    pub fn is_better(self, candidate: f32, best: f32) -> bool {
        match self {
            ScoringRule::Silhouette => candidate > best,
            ScoringRule::DaviesBouldin => candidate < best,
        }
    }

    pub(crate) fn describe(self) -> &'static str {
        match self {
            ScoringRule::Silhouette => "silhouette score (higher is better)",
            ScoringRule::DaviesBouldin => "Davies-Bouldin index (lower is better)",
        }
    }
}

/// Options for one clustering call.
///
/// Every field has a default, so partial JSON/TOML records deserialize;
/// unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClusterOptions {
    /// Algorithm to run.
    pub method: Method,
    /// k for k-means, target count for hierarchical, upper bound for auto.
    /// Must be at least 1.
    pub max_clusters: usize,
    /// Clusters with fewer members are dropped (their documents are reported
    /// as unclustered).
    pub min_cluster_size: usize,
    /// When set, clusters with lower coherence are dropped. In `[0, 1]`.
    pub coherence_threshold: Option<f32>,
    /// Split large clusters into sub-clusters.
    pub include_sub_clusters: bool,
    /// Minimum members before a cluster is split.
    pub sub_cluster_min_size: usize,
    /// Maximum sub-clusters per split (k of the nested k-means).
    pub sub_cluster_count: usize,
    /// Levels of nesting below the top-level clusters.
    pub max_depth: usize,
    /// K-means iteration cap.
    pub max_iterations: usize,
    /// K-means convergence tolerance on summed centroid movement.
    pub tolerance: f32,
    /// Seed for every k-means run of the call.
    pub seed: Option<u64>,
    /// K-means centroid initialization.
    pub seeding: Seeding,
    /// Auto-mode comparison rule.
    pub scoring: ScoringRule,
    /// Smallest k tried by auto mode (at least 2).
    pub auto_min_k: usize,
    /// Largest k tried by auto mode (further bounded by document count).
    pub auto_max_k: usize,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            method: Method::default(),
            max_clusters: 8,
            min_cluster_size: 1,
            coherence_threshold: None,
            include_sub_clusters: false,
            sub_cluster_min_size: 6,
            sub_cluster_count: 3,
            max_depth: 1,
            max_iterations: 100,
            tolerance: 1e-4,
            seed: None,
            seeding: Seeding::default(),
            scoring: ScoringRule::default(),
            auto_min_k: 2,
            auto_max_k: 20,
        }
    }
}

impl ClusterOptions {
    /// Options for `method` with every other field defaulted.
    pub fn with_method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Reject values no run could honor.
    pub fn validate(&self) -> Result<()> {
        if self.max_clusters == 0 {
            return Err(Error::InvalidParameter {
                name: "max_clusters",
                message: "must be at least 1",
            });
        }
        if let Some(t) = self.coherence_threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(Error::InvalidParameter {
                    name: "coherence_threshold",
                    message: "must be within [0, 1]",
                });
            }
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidParameter {
                name: "max_iterations",
                message: "must be at least 1",
            });
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(Error::InvalidParameter {
                name: "tolerance",
                message: "must be a non-negative number",
            });
        }
        if self.auto_min_k < 2 {
            return Err(Error::InvalidParameter {
                name: "auto_min_k",
                message: "must be at least 2",
            });
        }
        if self.auto_max_k < self.auto_min_k {
            return Err(Error::InvalidParameter {
                name: "auto_max_k",
                message: "must not be smaller than auto_min_k",
            });
        }
        if self.include_sub_clusters {
            if self.sub_cluster_count < 2 {
                return Err(Error::InvalidParameter {
                    name: "sub_cluster_count",
                    message: "must be at least 2",
                });
            }
            if self.max_depth == 0 {
                return Err(Error::InvalidParameter {
                    name: "max_depth",
                    message: "must be at least 1",
                });
            }
        }
        Ok(())
    }
}
