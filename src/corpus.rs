//! Corpus loading for the RAG workbench.
//!
//! A corpus is a flat directory of markdown and PDF files. Each file becomes
//! one [`Document`] tagged with its path as the source identifier, so later
//! source-accuracy checks can substring-match against either bare filenames
//! or full paths.

use crate::error::{RagBenchError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use walkdir::WalkDir;

/// A loaded document with its originating source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Source identifier (file path as a string).
    pub source: String,
    /// Full text content.
    pub content: String,
}

impl Document {
    /// Create a document from raw parts.
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
        }
    }
}

/// Load all markdown and PDF documents from the top level of a directory.
///
/// Files are visited in name order so repeated loads produce the same
/// document sequence. PDF pages are combined into a single document to
/// preserve cross-page context.
pub fn load_corpus(dir: &Path) -> Result<Vec<Document>> {
    if !dir.is_dir() {
        return Err(RagBenchError::InvalidCorpusPath(dir.to_path_buf()));
    }

    let mut documents = Vec::new();

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            match e.into_io_error() {
                Some(io) => RagBenchError::io(path, io),
                None => RagBenchError::InvalidCorpusPath(path),
            }
        })?;

        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let content = match extension.as_deref() {
            Some("md") => {
                std::fs::read_to_string(path).map_err(|e| RagBenchError::io(path, e))?
            }
            Some("pdf") => pdf_extract::extract_text(path).map_err(|e| RagBenchError::Pdf {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?,
            _ => continue,
        };

        documents.push(Document::new(path.to_string_lossy(), content));
    }

    if documents.is_empty() {
        return Err(RagBenchError::EmptyCorpus(dir.to_path_buf()));
    }

    Ok(documents)
}
