//! Error types for the RAG workbench.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom error.
pub type Result<T> = std::result::Result<T, RagBenchError>;

/// Errors that can occur in the workbench.
#[derive(Error, Debug)]
pub enum RagBenchError {
    /// Error reading or writing files.
    #[error("I/O error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The corpus directory does not exist or is not a directory.
    #[error("Corpus path '{0}' does not exist or is not a directory")]
    InvalidCorpusPath(PathBuf),

    /// No documents found in the corpus.
    #[error("No documents found in corpus at '{0}'")]
    EmptyCorpus(PathBuf),

    /// Failed to extract text from a PDF file.
    #[error("Failed to extract text from PDF '{path}': {message}")]
    Pdf { path: PathBuf, message: String },

    /// The vector store does not exist at the given location.
    #[error("Vector store not found at '{0}'")]
    StoreNotFound(PathBuf),

    /// A chunking configuration violates its invariants.
    #[error("Invalid chunk configuration: {0}")]
    InvalidChunkConfig(String),

    /// A question fixture file is malformed.
    #[error("Invalid question set: {0}")]
    Questions(String),

    /// Error during serialization/deserialization.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Embedding API error.
    #[error("Embedding API error: {0}")]
    EmbeddingApi(String),

    /// LLM API error.
    #[error("LLM API error: {0}")]
    LlmApi(String),

    /// HTTP request error.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RagBenchError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for RagBenchError {
    fn from(err: reqwest::Error) -> Self {
        RagBenchError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for RagBenchError {
    fn from(err: serde_json::Error) -> Self {
        RagBenchError::Serialization(err.to_string())
    }
}
