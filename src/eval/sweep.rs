//! Chunking-parameter sweep orchestrator.
//!
//! Runs the full cross-product of chunking configurations and test questions.
//! Each configuration gets its own freshly built vector store at a location
//! derived from the configuration and a run identifier; the store is
//! destroyed on every exit path before the next configuration starts, so at
//! most one store is ever live and no configuration sees another's index.

use crate::corpus::{Document, load_corpus};
use crate::embedding::Embedder;
use crate::error::{RagBenchError, Result};
use crate::eval::metrics::{MetricSet, evaluate};
use crate::eval::questions::TestCase;
use crate::splitter::{ChunkConfig, split_documents};
use crate::store::VectorStore;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Options for a sweep run.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Directory holding the document corpus.
    pub corpus_dir: PathBuf,
    /// Directory under which per-configuration index directories are created.
    pub index_root: PathBuf,
    /// Identifier distinguishing this run's index locations from other runs'.
    pub run_id: String,
    /// Number of chunks retrieved per question. Fixed across the sweep,
    /// never part of a configuration.
    pub top_k: usize,
    /// Configurations to evaluate, in order.
    pub configs: Vec<ChunkConfig>,
    /// Per-question progress output.
    pub verbose: bool,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from("data"),
            index_root: PathBuf::from("."),
            run_id: format!("run{}", std::process::id()),
            top_k: 3,
            configs: default_configs(),
            verbose: false,
        }
    }
}

/// The default configuration grid: 20% overlap at several sizes, plus the
/// 50% overlap variant used by the interactive build command.
pub fn default_configs() -> Vec<ChunkConfig> {
    vec![
        ChunkConfig::new(500, 100),
        ChunkConfig::new(1000, 200),
        ChunkConfig::new(1000, 500),
        ChunkConfig::new(1500, 300),
        ChunkConfig::new(2000, 400),
    ]
}

/// Scored outcome of one question against one configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResult {
    pub case: TestCase,
    pub metrics: MetricSet,
}

/// Full evaluation of one configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigReport {
    pub config: ChunkConfig,
    /// Wall-clock seconds to split, embed, and persist the index.
    pub build_time_seconds: f64,
    /// Number of chunks the configuration produced.
    pub chunk_count: usize,
    /// Per-question results in evaluation order.
    pub results: Vec<QuestionResult>,
}

/// Tagged per-configuration outcome, so a failed build skips one
/// configuration without breaking the report's contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConfigOutcome {
    Completed(ConfigReport),
    Skipped { reason: String },
}

/// Results of a full sweep, keyed by configuration label in declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResults {
    pub outcomes: Vec<(String, ConfigOutcome)>,
}

/// Drives the build/query/evaluate loop across all configurations.
pub struct SweepRunner<'a> {
    options: SweepOptions,
    cases: Vec<TestCase>,
    embedder: &'a dyn Embedder,
}

impl<'a> SweepRunner<'a> {
    /// Create a runner over a fixed question set.
    pub fn new(options: SweepOptions, cases: Vec<TestCase>, embedder: &'a dyn Embedder) -> Self {
        Self {
            options,
            cases,
            embedder,
        }
    }

    /// Run the sweep.
    ///
    /// Fixture-shape problems (no configurations, no questions, invalid
    /// chunk parameters) and corpus load failures are fatal and surface
    /// before any index is built. Build failures skip one configuration;
    /// query failures degrade one question to a zero MetricSet.
    pub async fn run(&self) -> Result<SweepResults> {
        if self.options.configs.is_empty() {
            return Err(RagBenchError::InvalidChunkConfig(
                "no configurations to sweep".to_string(),
            ));
        }
        if self.cases.is_empty() {
            return Err(RagBenchError::Questions(
                "no questions to evaluate".to_string(),
            ));
        }
        for config in &self.options.configs {
            config.validate()?;
        }

        let documents = load_corpus(&self.options.corpus_dir)?;

        println!(
            "Sweeping {} configurations x {} questions over {} documents...",
            self.options.configs.len(),
            self.cases.len(),
            documents.len()
        );

        let mut outcomes = Vec::with_capacity(self.options.configs.len());

        for config in &self.options.configs {
            let label = config.label();

            if self.options.verbose {
                println!("\nTesting configuration: {}", label);
                println!("Chunk size: {}, Overlap: {}", config.chunk_size, config.overlap);
            } else {
                print!(".");
                std::io::stdout().flush().ok();
            }

            let index_dir = self
                .options
                .index_root
                .join(format!("{}_{}", self.options.run_id, label));

            let outcome = self.evaluate_config(&documents, config, &index_dir).await;

            // Teardown runs on every exit path so index state never leaks
            // into the next configuration.
            if let Err(e) = VectorStore::destroy(&index_dir) {
                eprintln!(
                    "warning: failed to clean up index at '{}': {}",
                    index_dir.display(),
                    e
                );
            }

            let outcome = match outcome {
                Ok(report) => ConfigOutcome::Completed(report),
                Err(e) => {
                    eprintln!("\nConfiguration {} skipped: {}", label, e);
                    ConfigOutcome::Skipped {
                        reason: e.to_string(),
                    }
                }
            };

            outcomes.push((label, outcome));
        }

        if !self.options.verbose {
            println!();
        }

        Ok(SweepResults { outcomes })
    }

    /// Build, query, and score one configuration.
    async fn evaluate_config(
        &self,
        documents: &[Document],
        config: &ChunkConfig,
        index_dir: &Path,
    ) -> Result<ConfigReport> {
        // A stale index from a prior run at the same location would
        // contaminate scores; rebuild from scratch.
        VectorStore::destroy(index_dir)?;

        let start = Instant::now();

        let chunks = split_documents(documents, config)?;
        let chunk_count = chunks.len();

        let store = VectorStore::build(chunks, self.embedder).await?;
        store.save(index_dir)?;

        let build_time_seconds = start.elapsed().as_secs_f64();

        if self.options.verbose {
            println!(
                "Built index with {} chunks in {:.2} seconds",
                chunk_count, build_time_seconds
            );
        }

        let mut results = Vec::with_capacity(self.cases.len());

        for case in &self.cases {
            if self.options.verbose {
                let preview: String = case.question.chars().take(50).collect();
                println!("  Testing: {}...", preview);
            }

            let metrics = match store
                .query(self.embedder, &case.question, self.options.top_k)
                .await
            {
                Ok(retrieved) => evaluate(&retrieved, &case.expected_topics, &case.expected_source),
                Err(e) => {
                    // One failed question must not abort the configuration;
                    // it shows up in the report as a zero row.
                    if self.options.verbose {
                        eprintln!("  Query failed: {}", e);
                    }
                    MetricSet::zero()
                }
            };

            results.push(QuestionResult {
                case: case.clone(),
                metrics,
            });
        }

        Ok(ConfigReport {
            config: *config,
            build_time_seconds,
            chunk_count,
            results,
        })
    }
}
