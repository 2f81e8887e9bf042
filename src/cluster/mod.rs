//! Clustering algorithms for grouping similar vectors.
//!
//! Both algorithms here are **hard** clusterers: each point lands in exactly
//! one group, and every returned [`Group`] is non-empty. Together the groups
//! of a [`Partition`] cover the input exactly once.
//!
//! ## Algorithms
//!
//! ### K-means
//!
//! Assign each point to the nearest centroid, then move centroids to the mean
//! of their points. Repeat.
//!
//! **Objective**: minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! **Assumptions**: roughly spherical clusters of similar size, k known in
//! advance (or searched for, see the engine's auto mode).
//!
//! ### Agglomerative
//!
//! Start from singletons and merge the two clusters with the closest
//! centroids until the requested count remains. Deterministic, no seeding,
//! but quadratic memory.
//!
//! ## Quality
//!
//! [`quality`] scores a labeling: silhouette (higher is better),
//! Davies–Bouldin (lower is better), and per-group coherence.
//!
//! ## Usage
//!
//! ```rust
//! use concept_cluster::cluster::{Agglomerative, Clustering, Kmeans};
//!
//! let data = vec![
//!     vec![0.0, 0.0],
//!     vec![0.1, 0.1],
//!     vec![10.0, 10.0],
//!     vec![10.1, 10.1],
//! ];
//!
//! let labels = Kmeans::new(2).with_seed(42).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//!
//! let partition = Agglomerative::new(2).fit(&data).unwrap();
//! assert_eq!(partition.groups[0].members, vec![0, 1]);
//! assert_eq!(partition.groups[1].members, vec![2, 3]);
//! ```

mod agglomerative;
mod kmeans;
pub mod quality;
mod traits;
mod util;

pub use agglomerative::Agglomerative;
pub use kmeans::{Kmeans, Seeding};
pub use quality::{davies_bouldin_index, silhouette_score};
pub use traits::{Clustering, Group, Partition};

pub(crate) use util::check_dimensions;
