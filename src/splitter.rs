//! Overlapping text chunking.
//!
//! Documents are split into character windows of `chunk_size` with `overlap`
//! characters shared between consecutive windows, preferring to end a window
//! at a sentence boundary. Each chunk keeps its document's source and the
//! character offset where the window started.

use crate::corpus::Document;
use crate::error::{RagBenchError, Result};
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// How far back from a window end to look for a sentence boundary.
const BOUNDARY_SEARCH_WINDOW: usize = 100;

/// A chunking configuration under evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Maximum characters per chunk.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks.
    pub overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1200,
            overlap: 500,
        }
    }
}

impl ChunkConfig {
    /// Create a configuration.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Check the chunking invariants.
    ///
    /// The overlap must be strictly less than the chunk size: at an overlap
    /// of chunk_size or more, splitting cannot make progress without every
    /// chunk re-including the whole previous one.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(RagBenchError::InvalidChunkConfig(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.overlap >= self.chunk_size {
            return Err(RagBenchError::InvalidChunkConfig(format!(
                "overlap ({}) must be less than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    /// Configuration name used for index locations and report keys.
    pub fn label(&self) -> String {
        format!("chunk_{}_overlap_{}", self.chunk_size, self.overlap)
    }
}

/// A bounded span of document text, the atomic unit indexed and retrieved.
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct Chunk {
    /// Chunk text content.
    pub content: String,
    /// Source identifier inherited from the originating document.
    pub source: String,
    /// Character offset of the window start in the original document.
    pub start_offset: usize,
}

/// Split a batch of documents into overlapping chunks.
///
/// Documents are processed in order and each one's chunks appear in document
/// order, so the output sequence is deterministic for a given corpus.
pub fn split_documents(documents: &[Document], config: &ChunkConfig) -> Result<Vec<Chunk>> {
    config.validate()?;

    let mut chunks = Vec::new();
    for doc in documents {
        for (content, start_offset) in split_text(&doc.content, config) {
            chunks.push(Chunk {
                content,
                source: doc.source.clone(),
                start_offset,
            });
        }
    }

    Ok(chunks)
}

/// Split one text into overlapping (content, start_offset) windows.
fn split_text(text: &str, config: &ChunkConfig) -> Vec<(String, usize)> {
    let mut pieces = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let text_len = chars.len();

    if text_len == 0 {
        return pieces;
    }

    let mut start = 0;

    while start < text_len {
        let end = (start + config.chunk_size).min(text_len);

        // Try to break at a sentence boundary if possible
        let adjusted_end = if end < text_len && end > start {
            let search_start = end.saturating_sub(BOUNDARY_SEARCH_WINDOW).max(start);
            if search_start < end {
                let search_text: String = chars[search_start..end].iter().collect();

                if let Some(pos) = search_text.rfind(|c| c == '.' || c == '!' || c == '?') {
                    let candidate = search_start + pos + 1;
                    // Only use this if it's past start
                    if candidate > start { candidate } else { end }
                } else {
                    end
                }
            } else {
                end
            }
        } else {
            end
        };

        let final_end = adjusted_end.max(start + 1).min(text_len);

        let window: String = chars[start..final_end].iter().collect();

        if !window.trim().is_empty() {
            pieces.push((window.trim().to_string(), start));
        }

        if final_end >= text_len {
            break;
        }

        // Step back by the overlap, always moving forward by at least one
        let next_start = if config.overlap > 0 && final_end > config.overlap {
            final_end - config.overlap
        } else {
            final_end
        };

        start = if next_start <= start {
            start + 1
        } else {
            next_start
        };
    }

    pieces
}
