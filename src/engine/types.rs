use serde::{Deserialize, Serialize};

use super::options::{ClusterOptions, Method, ScoringRule};

/// A document id paired with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledVector {
    /// Opaque document identifier.
    pub id: String,
    /// The document's embedding.
    pub vector: Vec<f32>,
}

impl LabeledVector {
    /// Pair `id` with `vector`.
    pub fn new(id: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            vector,
        }
    }
}

/// A concept cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// `cluster-<i>` for top-level clusters, `<parent>.<j>` below.
    pub id: String,
    /// Mean of the member vectors.
    pub centroid: Vec<f32>,
    /// Member documents, in input order. Never empty.
    pub members: Vec<LabeledVector>,
    /// Tightness around the centroid, `[0, 1]`.
    pub coherence: f32,
    /// Descriptive labels attached by an external labeling step.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Nested split of `members`, when requested.
    #[serde(default)]
    pub sub_clusters: Vec<Cluster>,
}

impl Cluster {
    /// Number of members.
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Member document ids, in order.
    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.id.as_str())
    }
}

/// Summary statistics over a set of clusters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClusterAnalytics {
    /// Number of top-level clusters.
    pub total_clusters: usize,
    /// Mean member count per cluster.
    pub mean_cluster_size: f32,
    /// Mean of the per-cluster coherence values.
    pub mean_coherence: f32,
    /// Silhouette over all members; 0 with fewer than two clusters.
    pub silhouette: f32,
}

/// Score of one candidate k tried by auto mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KScore {
    /// Requested cluster count.
    pub k: usize,
    /// Value of the configured [`ScoringRule`] for this k.
    pub score: f32,
    /// Non-empty groups k-means actually produced for this k.
    pub groups: usize,
    /// Whether the k-means run for this k converged.
    pub converged: bool,
}

/// Outcome of an optimal cluster count search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalK {
    /// Recommended cluster count; 0 when there are no documents.
    pub optimal_k: usize,
    /// Rule the candidates were compared with.
    pub scoring: ScoringRule,
    /// Every candidate tried, ascending k.
    pub scores: Vec<KScore>,
    /// Short human-readable rationale.
    pub recommendation: String,
}

/// Output of [`ClusterEngine::cluster_documents`](super::ClusterEngine::cluster_documents).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringResult {
    /// Surviving top-level clusters, `cluster-0` onward.
    pub clusters: Vec<Cluster>,
    /// Options the call ran with.
    pub options: ClusterOptions,
    /// Method that produced `clusters`.
    pub method: Method,
    /// `false` when any k-means run behind `clusters`, sub-cluster splits
    /// included, hit its iteration cap before settling.
    pub converged: bool,
    /// Statistics over `clusters`.
    pub analytics: ClusterAnalytics,
    /// Documents removed by `min_cluster_size` or `coherence_threshold`.
    pub unclustered: Vec<String>,
    /// Search metadata when `method` is [`Method::Auto`].
    pub recommendation: Option<OptimalK>,
}

impl ClusteringResult {
    pub(crate) fn empty(options: &ClusterOptions) -> Self {
        Self {
            clusters: Vec::new(),
            options: options.clone(),
            method: options.method,
            converged: true,
            analytics: ClusterAnalytics::default(),
            unclustered: Vec::new(),
            recommendation: None,
        }
    }
}

/// Output of [`ClusterEngine::auto_cluster`](super::ClusterEngine::auto_cluster).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoClusterResult {
    /// Clustering at the chosen k.
    pub result: ClusteringResult,
    /// Cluster count the search settled on.
    pub chosen_k: usize,
    /// Every candidate tried, ascending k. Empty when no search ran.
    pub scores: Vec<KScore>,
    /// Short human-readable rationale for `chosen_k`.
    pub recommendation: String,
}

/// A finished computation or a cancelled one. Cancellation is not a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Outcome<T> {
    /// The call ran to completion.
    Completed(T),
    /// The [`CancelToken`](crate::CancelToken) fired first; nothing was
    /// produced.
    Cancelled,
}

impl<T> Outcome<T> {
    /// Whether the call was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    /// The value, or `None` if cancelled.
    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(v) => Some(v),
            Outcome::Cancelled => None,
        }
    }

    /// Transform a completed value; cancellation passes through.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Completed(v) => Outcome::Completed(f(v)),
            Outcome::Cancelled => Outcome::Cancelled,
        }
    }
}
