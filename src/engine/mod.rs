//! Clustering orchestrator.
//!
//! [`ClusterEngine`] is the entry point for calling code. One call:
//!
//! 1. validates the [`ClusterOptions`],
//! 2. resolves every document id through the [`EmbeddingSource`] in a single
//!    bulk request (missing documents and dimension mismatches fail fast),
//! 3. runs k-means, agglomerative clustering, or the auto search,
//! 4. applies the opt-in post-filters (`min_cluster_size`,
//!    `coherence_threshold`),
//! 5. optionally splits large clusters into sub-clusters,
//! 6. computes [`ClusterAnalytics`] over the result.
//!
//! The engine holds no state between calls beyond its source and an optional
//! [`CancelToken`]. A cancelled call returns [`Outcome::Cancelled`], never a
//! partial result.
//!
//! ```rust
//! use concept_cluster::{ClusterEngine, ClusterOptions, InMemoryEmbeddings, Method};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let source = InMemoryEmbeddings::new()
//!     .with("a", vec![1.0, 0.0])
//!     .with("b", vec![0.9, 0.1])
//!     .with("c", vec![0.0, 1.0])
//!     .with("d", vec![-0.1, 0.9]);
//! let engine = ClusterEngine::new(source);
//!
//! let ids: Vec<String> = ["a", "b", "c", "d"].map(String::from).to_vec();
//! let options = ClusterOptions {
//!     max_clusters: 2,
//!     seed: Some(7),
//!     ..ClusterOptions::with_method(Method::Kmeans)
//! };
//! let result = engine.cluster_documents(&ids, &options).await.unwrap().completed().unwrap();
//! assert_eq!(result.clusters.len(), 2);
//! # });
//! ```

mod options;
mod source;
mod types;

pub use options::{ClusterOptions, Method, ScoringRule};
pub use source::{EmbeddingSource, InMemoryEmbeddings, SourceError};
pub use types::{
    AutoClusterResult, Cluster, ClusterAnalytics, ClusteringResult, KScore, LabeledVector,
    OptimalK, Outcome,
};

use crate::cancel::{self, CancelToken};
use crate::cluster::{silhouette_score, Agglomerative, Clustering, Kmeans, Partition};
use crate::error::{Error, Result};

/// Orchestrates embedding resolution, clustering and analytics.
#[derive(Debug, Clone)]
pub struct ClusterEngine<S> {
    source: S,
    cancel: Option<CancelToken>,
}

impl<S: EmbeddingSource> ClusterEngine<S> {
    /// Engine resolving embeddings through `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            cancel: None,
        }
    }

    /// Observe `token` between iterations, merges and auto-search candidates.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The embedding source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Cluster `ids` as configured by `options`.
    ///
    /// An empty id list yields an empty result. Unresolvable documents,
    /// mismatched embedding dimensions and invalid options are errors.
    pub async fn cluster_documents(
        &self,
        ids: &[String],
        options: &ClusterOptions,
    ) -> Result<Outcome<ClusteringResult>> {
        into_outcome(self.run(ids, options).await)
    }

    /// Search for a good cluster count with default options, then cluster.
    pub async fn auto_cluster(&self, ids: &[String]) -> Result<Outcome<AutoClusterResult>> {
        self.auto_cluster_with(ids, &ClusterOptions::with_method(Method::Auto))
            .await
    }

    /// [`auto_cluster`](Self::auto_cluster) with explicit options; `method`
    /// is forced to [`Method::Auto`].
    pub async fn auto_cluster_with(
        &self,
        ids: &[String],
        options: &ClusterOptions,
    ) -> Result<Outcome<AutoClusterResult>> {
        let options = ClusterOptions {
            method: Method::Auto,
            ..options.clone()
        };
        let outcome = into_outcome(self.run(ids, &options).await)?;
        Ok(outcome.map(|result| {
            let rec = result
                .recommendation
                .clone()
                .unwrap_or_else(|| no_documents(options.scoring));
            AutoClusterResult {
                chosen_k: rec.optimal_k,
                scores: rec.scores,
                recommendation: rec.recommendation,
                result,
            }
        }))
    }

    /// Analytics over caller-held clusters.
    pub fn analyze_cluster_quality(&self, clusters: &[Cluster]) -> Result<ClusterAnalytics> {
        analyze_cluster_quality(clusters)
    }

    /// Try k = 2..=`max_candidate_k` (bounded by document count) and
    /// recommend the best-scoring one.
    ///
    /// `max_candidate_k` also serves as `max_clusters`, so it must be at
    /// least 2.
    pub async fn find_optimal_cluster_count(
        &self,
        ids: &[String],
        max_candidate_k: usize,
    ) -> Result<Outcome<OptimalK>> {
        let options = ClusterOptions {
            max_clusters: max_candidate_k,
            auto_max_k: max_candidate_k,
            ..ClusterOptions::with_method(Method::Auto)
        };
        self.find_optimal_cluster_count_with(ids, &options).await
    }

    /// [`find_optimal_cluster_count`](Self::find_optimal_cluster_count) using
    /// the search settings in `options`.
    pub async fn find_optimal_cluster_count_with(
        &self,
        ids: &[String],
        options: &ClusterOptions,
    ) -> Result<Outcome<OptimalK>> {
        into_outcome(self.optimal_k(ids, options).await)
    }

    async fn optimal_k(&self, ids: &[String], options: &ClusterOptions) -> Result<OptimalK> {
        options.validate()?;
        if ids.is_empty() {
            return Ok(no_documents(options.scoring));
        }
        let docs = self.resolve(ids).await?;
        let data: Vec<Vec<f32>> = docs.iter().map(|d| d.vector.clone()).collect();
        self.search(&data, options)
    }

    async fn run(&self, ids: &[String], options: &ClusterOptions) -> Result<ClusteringResult> {
        options.validate()?;
        cancel::check(self.cancel.as_ref())?;

        if ids.is_empty() {
            let mut result = ClusteringResult::empty(options);
            if options.method == Method::Auto {
                result.recommendation = Some(no_documents(options.scoring));
            }
            return Ok(result);
        }

        let docs = self.resolve(ids).await?;
        let data: Vec<Vec<f32>> = docs.iter().map(|d| d.vector.clone()).collect();

        let mut recommendation = None;
        let algorithm: Box<dyn Clustering> = match options.method {
            Method::Kmeans => Box::new(self.kmeans(options, options.max_clusters)),
            Method::Hierarchical => Box::new(self.agglomerative(options.max_clusters)),
            Method::Auto => {
                let rec = self.search(&data, options)?;
                let k = rec.optimal_k;
                recommendation = Some(rec);
                Box::new(self.kmeans(options, k))
            }
        };
        let partition = algorithm.fit(&data)?;
        let mut converged = partition.converged;

        let mut unclustered = Vec::new();
        let mut clusters = to_clusters(&docs, partition);
        let before = clusters.len();
        clusters.retain(|c| {
            let keep = c.size() >= options.min_cluster_size
                && options
                    .coherence_threshold
                    .map_or(true, |t| c.coherence >= t);
            if !keep {
                unclustered.extend(c.members.iter().map(|m| m.id.clone()));
            }
            keep
        });
        if clusters.len() < before {
            tracing::warn!(
                dropped_clusters = before - clusters.len(),
                unclustered = unclustered.len(),
                min_cluster_size = options.min_cluster_size,
                coherence_threshold = ?options.coherence_threshold,
                "post-filters dropped clusters"
            );
        }

        for (i, cluster) in clusters.iter_mut().enumerate() {
            cluster.id = format!("cluster-{i}");
            if options.include_sub_clusters {
                converged &= self.split(cluster, options, 1)?;
            }
        }

        let analytics = analyze_cluster_quality(&clusters)?;
        tracing::info!(
            documents = docs.len(),
            method = ?options.method,
            clusters = clusters.len(),
            converged,
            silhouette = analytics.silhouette,
            "clustered documents"
        );

        Ok(ClusteringResult {
            clusters,
            options: options.clone(),
            method: options.method,
            converged,
            analytics,
            unclustered,
            recommendation,
        })
    }

    async fn resolve(&self, ids: &[String]) -> Result<Vec<LabeledVector>> {
        let resolved = self
            .source
            .embed_documents(ids)
            .await
            .map_err(|e| Error::EmbeddingSource(e.to_string()))?;

        if resolved.len() != ids.len() {
            return Err(Error::EmbeddingSource(format!(
                "requested {} embeddings, source returned {}",
                ids.len(),
                resolved.len()
            )));
        }

        let missing: Vec<String> = ids
            .iter()
            .zip(&resolved)
            .filter(|(_, v)| v.is_none())
            .map(|(id, _)| id.clone())
            .collect();
        if !missing.is_empty() {
            return Err(Error::UnresolvedDocuments { ids: missing });
        }

        let mut docs = Vec::with_capacity(ids.len());
        let mut expected: Option<usize> = None;
        for (id, vector) in ids
            .iter()
            .zip(resolved)
            .filter_map(|(id, v)| v.map(|v| (id, v)))
        {
            if vector.is_empty() {
                return Err(Error::EmptyEmbedding {
                    document_id: id.clone(),
                });
            }
            let dim = *expected.get_or_insert(vector.len());
            if vector.len() != dim {
                return Err(Error::DocumentDimensionMismatch {
                    document_id: id.clone(),
                    expected: dim,
                    found: vector.len(),
                });
            }
            docs.push(LabeledVector::new(id.clone(), vector));
        }
        Ok(docs)
    }

    /// Score every candidate k and pick the best; ties keep the smaller k.
    fn search(&self, data: &[Vec<f32>], options: &ClusterOptions) -> Result<OptimalK> {
        let n = data.len();
        let rule = options.scoring;

        if n < 3 {
            if n == 0 {
                return Ok(no_documents(rule));
            }
            return Ok(OptimalK {
                optimal_k: 1,
                scoring: rule,
                scores: Vec::new(),
                recommendation: format!(
                    "k = 1: {n} document(s) are too few to compare cluster counts"
                ),
            });
        }

        // Never more than max_clusters, at least two documents per group on
        // average, and never all singletons.
        let upper = options
            .auto_max_k
            .min(options.max_clusters)
            .min((n / 2).max(2))
            .min(n - 1);
        let lower = options.auto_min_k;
        if upper < lower {
            return Ok(OptimalK {
                optimal_k: upper,
                scoring: rule,
                scores: Vec::new(),
                recommendation: format!(
                    "k = {upper}: no candidates between k = {lower} and the cap of {upper} \
                     ({n} documents, max_clusters = {})",
                    options.max_clusters
                ),
            });
        }

        let mut scores = Vec::with_capacity(upper - lower + 1);
        let mut best: Option<KScore> = None;
        for k in lower..=upper {
            cancel::check(self.cancel.as_ref())?;

            let partition = self.kmeans(options, k).fit(data)?;
            let entry = KScore {
                k,
                score: rule.score(data, &partition.labels)?,
                groups: partition.n_groups(),
                converged: partition.converged,
            };
            tracing::debug!(k, score = entry.score, groups = entry.groups, "scored candidate k");

            if best.map_or(true, |b| rule.is_better(entry.score, b.score)) {
                best = Some(entry);
            }
            scores.push(entry);
        }

        let Some(best) = best else {
            return Err(Error::InvalidParameter {
                name: "auto_max_k",
                message: "leaves no candidate cluster counts to try",
            });
        };

        tracing::info!(
            chosen_k = best.k,
            score = best.score,
            candidates = scores.len(),
            "recommended cluster count"
        );

        Ok(OptimalK {
            optimal_k: best.k,
            scoring: rule,
            recommendation: format!(
                "k = {} has the best {} ({:.3}) among {} candidates (k = {}..={})",
                best.k,
                rule.describe(),
                best.score,
                scores.len(),
                lower,
                upper
            ),
            scores,
        })
    }

    /// Split `cluster` into sub-clusters, recursing up to `max_depth`.
    ///
    /// Returns whether every k-means run kept in the tree converged.
    fn split(&self, cluster: &mut Cluster, options: &ClusterOptions, depth: usize) -> Result<bool> {
        if depth > options.max_depth || cluster.size() < options.sub_cluster_min_size.max(2) {
            return Ok(true);
        }

        let data: Vec<Vec<f32>> = cluster.members.iter().map(|m| m.vector.clone()).collect();
        let partition = self.kmeans(options, options.sub_cluster_count).fit(&data)?;
        if partition.n_groups() < 2 {
            return Ok(true);
        }

        let mut converged = partition.converged;
        if !converged {
            tracing::warn!(
                cluster = %cluster.id,
                depth,
                "sub-cluster k-means stopped before converging"
            );
        }
        let mut subs = to_clusters(&cluster.members, partition);
        for (j, sub) in subs.iter_mut().enumerate() {
            sub.id = format!("{}.{j}", cluster.id);
            converged &= self.split(sub, options, depth + 1)?;
        }
        cluster.sub_clusters = subs;
        Ok(converged)
    }

    fn kmeans(&self, options: &ClusterOptions, k: usize) -> Kmeans {
        let model = Kmeans::new(k)
            .with_max_iter(options.max_iterations)
            .with_tol(options.tolerance)
            .with_seeding(options.seeding)
            .with_optional_seed(options.seed);
        match &self.cancel {
            Some(token) => model.with_cancel_token(token.clone()),
            None => model,
        }
    }

    fn agglomerative(&self, max_clusters: usize) -> Agglomerative {
        let model = Agglomerative::new(max_clusters);
        match &self.cancel {
            Some(token) => model.with_cancel_token(token.clone()),
            None => model,
        }
    }
}

/// Total count, mean size, mean coherence and silhouette of `clusters`.
///
/// Empty input yields all-zero analytics.
pub fn analyze_cluster_quality(clusters: &[Cluster]) -> Result<ClusterAnalytics> {
    if clusters.is_empty() {
        return Ok(ClusterAnalytics::default());
    }

    let total = clusters.len();
    let members: usize = clusters.iter().map(Cluster::size).sum();
    let coherence: f32 = clusters.iter().map(|c| c.coherence).sum();

    let mut data = Vec::with_capacity(members);
    let mut labels = Vec::with_capacity(members);
    for (label, cluster) in clusters.iter().enumerate() {
        for m in &cluster.members {
            data.push(m.vector.clone());
            labels.push(label);
        }
    }

    Ok(ClusterAnalytics {
        total_clusters: total,
        mean_cluster_size: members as f32 / total as f32,
        mean_coherence: coherence / total as f32,
        silhouette: silhouette_score(&data, &labels)?,
    })
}

fn to_clusters(docs: &[LabeledVector], partition: Partition) -> Vec<Cluster> {
    partition
        .groups
        .into_iter()
        .map(|g| Cluster {
            id: String::new(),
            members: g.members.iter().map(|&i| docs[i].clone()).collect(),
            centroid: g.centroid,
            coherence: g.coherence,
            keywords: Vec::new(),
            sub_clusters: Vec::new(),
        })
        .collect()
}

fn no_documents(scoring: ScoringRule) -> OptimalK {
    OptimalK {
        optimal_k: 0,
        scoring,
        scores: Vec::new(),
        recommendation: "no documents to cluster".to_string(),
    }
}

fn into_outcome<T>(result: Result<T>) -> Result<Outcome<T>> {
    match result {
        Ok(value) => Ok(Outcome::Completed(value)),
        Err(Error::Cancelled) => {
            tracing::debug!("clustering call cancelled");
            Ok(Outcome::Cancelled)
        }
        Err(e) => Err(e),
    }
}
