use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One non-empty group produced by a clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Mean of the member vectors.
    pub centroid: Vec<f32>,
    /// Indices into the input slice, ascending.
    pub members: Vec<usize>,
    /// Tightness in `[0, 1]`; see [`coherence`](super::quality::coherence).
    pub coherence: f32,
}

impl Group {
    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always `false` for groups returned by this crate.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Output of a hard clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    /// Non-empty groups. Every input point belongs to exactly one.
    pub groups: Vec<Group>,
    /// `labels[i]` is the index into `groups` of point `i`.
    pub labels: Vec<usize>,
    /// Refinement iterations performed (merges for agglomerative runs).
    pub iterations: usize,
    /// Whether the run settled below its tolerance before hitting its
    /// iteration cap.
    pub converged: bool,
    /// Within-cluster sum of squared distances to the centroids.
    pub inertia: f32,
}

impl Partition {
    /// Partition of zero points.
    pub fn empty() -> Self {
        Self {
            groups: Vec::new(),
            labels: Vec::new(),
            iterations: 0,
            converged: true,
            inertia: 0.0,
        }
    }

    /// Number of groups.
    pub fn n_groups(&self) -> usize {
        self.groups.len()
    }
}

/// Common interface for hard clustering algorithms (one label per point).
pub trait Clustering {
    /// Fit the model and return the resulting partition.
    fn fit(&self, data: &[Vec<f32>]) -> Result<Partition>;

    /// Fit the model (if needed) and return one cluster label per input point.
    fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    /// The configured (maximum) number of clusters.
    fn n_clusters(&self) -> usize;
}
