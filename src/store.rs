//! Disk-persisted vector store.
//!
//! A store is a directory holding one binary file of chunk/embedding pairs.
//! The harness owns the full lifecycle: build a fresh store per chunking
//! configuration, query it, then destroy the directory before the next
//! configuration is evaluated. Building on a location is only well-defined
//! after destroying whatever was there before.

use crate::embedding::{Embedder, cosine_similarity};
use crate::error::{RagBenchError, Result};
use crate::splitter::Chunk;
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File inside a store directory holding the encoded entries.
const STORE_FILENAME: &str = "store.bin";

/// Number of chunks embedded per API request.
const EMBED_BATCH_SIZE: usize = 32;

/// A stored chunk with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct IndexEntry {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// One retrieved chunk with its similarity score in [0, 1].
#[derive(Debug, Clone, Serialize)]
pub struct Retrieval {
    /// The matched chunk.
    pub chunk: Chunk,
    /// Relevance score; higher = closer.
    pub score: f32,
}

/// Map a cosine similarity from [-1, 1] onto the [0, 1] relevance scale.
///
/// Service embeddings are not guaranteed normalized or non-negative, so the
/// raw cosine can dip below zero; this keeps ordering while pinning scores to
/// the documented domain.
pub fn relevance_from_cosine(cosine: f32) -> f32 {
    ((cosine + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// A queryable similarity index over embedded chunks.
pub struct VectorStore {
    entries: Vec<IndexEntry>,
}

impl VectorStore {
    /// Build a store by embedding chunks in batches.
    pub async fn build(chunks: Vec<Chunk>, embedder: &dyn Embedder) -> Result<Self> {
        let mut entries = Vec::with_capacity(chunks.len());

        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let texts: Vec<&str> = batch.iter().map(|c| c.content.as_str()).collect();
            let embeddings = embedder.embed_batch(&texts).await?;

            for (chunk, embedding) in batch.iter().zip(embeddings) {
                entries.push(IndexEntry {
                    chunk: chunk.clone(),
                    embedding,
                });
            }
        }

        Ok(Self { entries })
    }

    /// Persist the store into a directory.
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir).map_err(|e| RagBenchError::io(dir, e))?;

        let config = bincode::config::standard();
        let data = bincode::encode_to_vec(&self.entries, config)
            .map_err(|e| RagBenchError::Serialization(e.to_string()))?;

        let path = dir.join(STORE_FILENAME);
        std::fs::write(&path, &data).map_err(|e| RagBenchError::io(path, e))?;

        Ok(())
    }

    /// Open a previously saved store.
    pub fn open(dir: &Path) -> Result<Self> {
        let path = dir.join(STORE_FILENAME);
        if !path.is_file() {
            return Err(RagBenchError::StoreNotFound(dir.to_path_buf()));
        }

        let data = std::fs::read(&path).map_err(|e| RagBenchError::io(path, e))?;

        let config = bincode::config::standard();
        let (entries, _): (Vec<IndexEntry>, usize) = bincode::decode_from_slice(&data, config)
            .map_err(|e| RagBenchError::Serialization(e.to_string()))?;

        Ok(Self { entries })
    }

    /// Check whether a store exists at the given location.
    pub fn exists(dir: &Path) -> bool {
        dir.join(STORE_FILENAME).is_file()
    }

    /// Remove a store directory. A no-op when nothing is there.
    pub fn destroy(dir: &Path) -> Result<()> {
        if dir.exists() {
            std::fs::remove_dir_all(dir).map_err(|e| RagBenchError::io(dir, e))?;
        }
        Ok(())
    }

    /// On-disk size of a store in bytes.
    pub fn size_bytes(dir: &Path) -> Result<u64> {
        let path = dir.join(STORE_FILENAME);
        let metadata = std::fs::metadata(&path).map_err(|e| RagBenchError::io(path, e))?;
        Ok(metadata.len())
    }

    /// Retrieve the top-k most similar chunks for a question.
    ///
    /// Results are ordered by descending score; fewer than k results are
    /// returned when the store holds fewer chunks.
    pub async fn query(
        &self,
        embedder: &dyn Embedder,
        question: &str,
        k: usize,
    ) -> Result<Vec<Retrieval>> {
        let query_embedding = embedder.embed(question).await?;

        let mut results: Vec<Retrieval> = self
            .entries
            .iter()
            .map(|entry| Retrieval {
                chunk: entry.chunk.clone(),
                score: relevance_from_cosine(cosine_similarity(
                    &query_embedding,
                    &entry.embedding,
                )),
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        results.truncate(k);

        Ok(results)
    }

    /// Number of chunks in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    use tempfile::TempDir;

    /// Deterministic embedder: hashes words into a fixed number of buckets,
    /// so texts sharing words point in similar directions.
    struct BucketEmbedder;

    const DIMS: usize = 16;

    impl BucketEmbedder {
        fn vector(text: &str) -> Vec<f32> {
            let mut v = vec![0.0f32; DIMS];
            for word in text.to_lowercase().split_whitespace() {
                let mut hasher = DefaultHasher::new();
                word.hash(&mut hasher);
                v[(hasher.finish() as usize) % DIMS] += 1.0;
            }
            v
        }
    }

    #[async_trait]
    impl Embedder for BucketEmbedder {
        async fn embed(&self, text: &str) -> crate::error::Result<Vec<f32>> {
            Ok(Self::vector(text))
        }

        async fn embed_batch(&self, texts: &[&str]) -> crate::error::Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| Self::vector(t)).collect())
        }
    }

    fn chunk(content: &str, source: &str) -> Chunk {
        Chunk {
            content: content.to_string(),
            source: source.to_string(),
            start_offset: 0,
        }
    }

    #[test]
    fn test_relevance_from_cosine() {
        assert!((relevance_from_cosine(1.0) - 1.0).abs() < 1e-6);
        assert!((relevance_from_cosine(-1.0)).abs() < 1e-6);
        assert!((relevance_from_cosine(0.0) - 0.5).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_build_and_query_orders_by_score() {
        let chunks = vec![
            chunk("alpha alpha alpha", "a.md"),
            chunk("beta gamma delta", "b.md"),
        ];
        let store = VectorStore::build(chunks, &BucketEmbedder).await.unwrap();

        let results = store.query(&BucketEmbedder, "alpha", 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert!(results[0].score >= results[1].score);
        assert_eq!(results[0].chunk.source, "a.md");
        for r in &results {
            assert!(r.score >= 0.0 && r.score <= 1.0);
        }
    }

    #[tokio::test]
    async fn test_query_returns_fewer_than_k() {
        let store = VectorStore::build(vec![chunk("only one", "a.md")], &BucketEmbedder)
            .await
            .unwrap();

        let results = store.query(&BucketEmbedder, "anything", 5).await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_save_open_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store");

        let chunks = vec![chunk("persisted text", "doc.md")];
        let store = VectorStore::build(chunks, &BucketEmbedder).await.unwrap();
        store.save(&path).unwrap();

        assert!(VectorStore::exists(&path));
        assert!(VectorStore::size_bytes(&path).unwrap() > 0);

        let loaded = VectorStore::open(&path).unwrap();
        assert_eq!(loaded.len(), 1);

        let results = loaded.query(&BucketEmbedder, "persisted", 1).await.unwrap();
        assert_eq!(results[0].chunk.source, "doc.md");
        assert_eq!(results[0].chunk.content, "persisted text");
    }

    #[test]
    fn test_open_missing_store() {
        let result = VectorStore::open(Path::new("/nonexistent/store"));
        assert!(matches!(result, Err(RagBenchError::StoreNotFound(_))));
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store");

        let store = VectorStore::build(vec![chunk("x", "a.md")], &BucketEmbedder)
            .await
            .unwrap();
        store.save(&path).unwrap();
        assert!(VectorStore::exists(&path));

        VectorStore::destroy(&path).unwrap();
        assert!(!VectorStore::exists(&path));
        assert!(!path.exists());

        // Destroying again is fine
        VectorStore::destroy(&path).unwrap();
    }
}
