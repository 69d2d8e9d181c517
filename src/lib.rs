//! RAG Bench - a retrieval-quality workbench for chunked RAG pipelines.
//!
//! The workbench ingests a small corpus of markdown and PDF documents,
//! splits it into overlapping chunks, embeds the chunks into a persisted
//! vector store, and answers questions by retrieving the closest chunks and
//! handing them to an LLM as context. Its centerpiece is an evaluation
//! harness that sweeps chunking parameters, rebuilds the store per
//! configuration, runs a fixed question set against each, and scores
//! retrieval quality into a comparative report.
//!
//! # Quick Start
//!
//! ```no_run
//! use rag_bench::{
//!     config::Config,
//!     embedding::EmbeddingClient,
//!     eval::{SweepOptions, SweepRunner, builtin_test_cases, write_report},
//! };
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     config.validate_embedding()?;
//!
//!     let embedder = EmbeddingClient::new(config.embedding);
//!
//!     let runner = SweepRunner::new(
//!         SweepOptions::default(),
//!         builtin_test_cases(),
//!         &embedder,
//!     );
//!     let results = runner.run().await?;
//!
//!     write_report(&results, Path::new("rag_performance_results.txt"))?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **corpus**: document loading (markdown + PDF)
//! - **splitter**: overlapping character chunking
//! - **embedding**: the [`embedding::Embedder`] seam and its OpenAI-compatible client
//! - **store**: disk-persisted vector index with full lifecycle control
//! - **llm**: chat client and the answer prompt
//! - **eval**: metrics, question fixtures, the sweep orchestrator, and
//!   report rendering

pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod eval;
pub mod llm;
pub mod splitter;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use corpus::Document;
pub use embedding::{Embedder, EmbeddingClient};
pub use error::{RagBenchError, Result};
pub use eval::{MetricSet, SweepOptions, SweepResults, SweepRunner, TestCase};
pub use llm::LlmClient;
pub use splitter::{Chunk, ChunkConfig};
pub use store::{Retrieval, VectorStore};
