//! Vector similarity and document clustering.
//!
//! `concept-cluster` groups document embeddings into concept clusters. It is
//! organized in three layers:
//!
//! - [`vector`]: similarity/distance metrics, normalization, centroids, top-k
//! - [`cluster`]: k-means, agglomerative clustering, quality scores;
//!   [`reduce`] adds a cheap dimensionality reduction
//! - [`engine`]: [`ClusterEngine`], which resolves document ids to embeddings
//!   through an [`EmbeddingSource`], runs an algorithm (or searches for a
//!   good cluster count), filters the result and computes analytics
//!
//! Every call is a self-contained batch computation; nothing is cached
//! between calls.

#![forbid(unsafe_code)]

pub mod cancel;
pub mod cluster;
pub mod engine;
pub mod error;
pub mod reduce;
pub mod vector;

pub use cancel::CancelToken;
pub use cluster::{
    davies_bouldin_index, silhouette_score, Agglomerative, Clustering, Group, Kmeans, Partition,
    Seeding,
};
pub use engine::{
    AutoClusterResult, Cluster, ClusterAnalytics, ClusterEngine, ClusterOptions,
    ClusteringResult, EmbeddingSource, InMemoryEmbeddings, KScore, LabeledVector, Method,
    OptimalK, Outcome, ScoringRule, SourceError,
};
pub use error::{Error, Result};
pub use reduce::reduce_dimensions;
pub use vector::{
    centroid, cosine_similarity, euclidean_distance, manhattan_distance, normalize, top_k,
    Candidate, Metric, Neighbor,
};
