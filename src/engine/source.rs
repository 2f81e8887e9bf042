//! Embedding resolution.
//!
//! The engine never computes embeddings. It asks an [`EmbeddingSource`] for
//! all of them in one bulk call before any algorithm runs, and fails fast if
//! any document cannot be resolved: no zero-vector substitutes.

use std::collections::HashMap;

use async_trait::async_trait;

/// Error type returned by embedding sources.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Resolves document identifiers to embedding vectors.
#[async_trait]
pub trait EmbeddingSource: Send + Sync {
    /// One entry per id, in the same order: `Some(vector)` when resolved,
    /// `None` when the document is missing or unsupported.
    ///
    /// An `Err` means the lookup itself failed (transport, backend).
    async fn embed_documents(
        &self,
        ids: &[String],
    ) -> std::result::Result<Vec<Option<Vec<f32>>>, SourceError>;
}

/// Map-backed source for callers that already hold their vectors.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEmbeddings {
    vectors: HashMap<String, Vec<f32>>,
}

impl InMemoryEmbeddings {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a document's vector.
    pub fn insert(&mut self, id: impl Into<String>, vector: Vec<f32>) -> Option<Vec<f32>> {
        self.vectors.insert(id.into(), vector)
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, id: impl Into<String>, vector: Vec<f32>) -> Self {
        self.insert(id, vector);
        self
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether no documents are stored.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<f32>)> for InMemoryEmbeddings {
    fn from_iter<I: IntoIterator<Item = (K, Vec<f32>)>>(iter: I) -> Self {
        Self {
            vectors: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[async_trait]
impl EmbeddingSource for InMemoryEmbeddings {
    async fn embed_documents(
        &self,
        ids: &[String],
    ) -> std::result::Result<Vec<Option<Vec<f32>>>, SourceError> {
        Ok(ids.iter().map(|id| self.vectors.get(id).cloned()).collect())
    }
}
