use thiserror::Error;

/// Errors returned by primitives, clustering algorithms and the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Two vectors passed to a pairwise primitive have different lengths.
    #[error("length mismatch: left vector has {left} components, right has {right}")]
    LengthMismatch {
        /// Length of the first vector.
        left: usize,
        /// Length of the second vector.
        right: usize,
    },

    /// Points in a dataset have inconsistent dimensionality.
    #[error("dimension mismatch at index {index}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Position of the offending vector in the input.
        index: usize,
        /// Expected dimensionality (taken from the first vector).
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A resolved document embedding has the wrong (or zero) dimensionality.
    #[error("document {document_id}: embedding has {found} dimensions, expected {expected}")]
    DocumentDimensionMismatch {
        /// Identifier of the offending document.
        document_id: String,
        /// Expected dimensionality.
        expected: usize,
        /// Found dimensionality.
        found: usize,
    },

    /// A resolved document embedding has no components at all.
    #[error("document {document_id}: embedding is empty")]
    EmptyEmbedding {
        /// Identifier of the offending document.
        document_id: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// The embedding source could not produce vectors for some documents.
    #[error("unresolved documents: {}", ids.join(", "))]
    UnresolvedDocuments {
        /// Every identifier that had no embedding.
        ids: Vec<String>,
    },

    /// The embedding source itself failed.
    #[error("embedding source failed: {0}")]
    EmbeddingSource(String),

    /// A cancellation token fired before the computation finished.
    #[error("operation cancelled")]
    Cancelled,
}

impl Error {
    /// Whether this error only reports cooperative cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
