//! Chunking-parameter sweep CLI.
//!
//! Usage:
//!   sweep                          # Default grid, built-in questions
//!   sweep --config 500,100 --config 1000,500
//!   sweep --questions custom.json --corpus docs/
//!
//! The sweep always writes its report, even when every configuration was
//! skipped; per-configuration failures show up inside the report rather
//! than aborting the run.

use anyhow::{Context, Result};
use clap::Parser;
use rag_bench::{
    config::Config,
    embedding::EmbeddingClient,
    eval::{
        DEFAULT_REPORT_PATH, SweepOptions, SweepRunner, builtin_test_cases, default_configs,
        load_test_cases, render_summary, write_report,
    },
    splitter::ChunkConfig,
};
use std::path::PathBuf;

/// Sweep chunking configurations and score retrieval quality
#[derive(Parser)]
#[command(name = "sweep")]
#[command(about = "Evaluate chunking configurations against a fixed question set", long_about = None)]
struct Cli {
    /// Directory containing markdown and PDF documents
    #[arg(short, long, default_value = "data")]
    corpus: PathBuf,

    /// Directory under which per-configuration indexes are created
    #[arg(long, default_value = ".")]
    index_root: PathBuf,

    /// Number of chunks retrieved per question
    #[arg(long, default_value_t = 3)]
    top_k: usize,

    /// Configuration to test as "<chunk_size>,<overlap>"; repeat for several.
    /// Defaults to the built-in grid when omitted.
    #[arg(long = "config", value_name = "SIZE,OVERLAP")]
    configs: Vec<String>,

    /// JSON file with a custom question set (defaults to the built-in set)
    #[arg(short, long)]
    questions: Option<PathBuf>,

    /// Where to write the text report
    #[arg(short, long, default_value = DEFAULT_REPORT_PATH)]
    output: PathBuf,

    /// Also dump raw results as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Per-question progress output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_config(raw: &str) -> Result<ChunkConfig> {
    let (size, overlap) = raw
        .split_once(',')
        .with_context(|| format!("Expected '<chunk_size>,<overlap>', got '{}'", raw))?;

    let chunk_size = size
        .trim()
        .parse()
        .with_context(|| format!("Invalid chunk size in '{}'", raw))?;
    let overlap = overlap
        .trim()
        .parse()
        .with_context(|| format!("Invalid overlap in '{}'", raw))?;

    Ok(ChunkConfig::new(chunk_size, overlap))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().context("Failed to load configuration")?;
    config
        .validate_embedding()
        .context("Invalid configuration")?;

    let configs = if cli.configs.is_empty() {
        default_configs()
    } else {
        cli.configs
            .iter()
            .map(|raw| parse_config(raw))
            .collect::<Result<Vec<_>>>()?
    };

    let cases = match &cli.questions {
        Some(path) => load_test_cases(path).context("Failed to load question set")?,
        None => builtin_test_cases(),
    };

    println!("Starting RAG performance sweep...");
    println!("Embedding model: {}", config.embedding.model);

    let embedder = EmbeddingClient::new(config.embedding);

    let options = SweepOptions {
        corpus_dir: cli.corpus,
        index_root: cli.index_root,
        run_id: format!("sweep{}", std::process::id()),
        top_k: cli.top_k,
        configs,
        verbose: cli.verbose,
    };

    let runner = SweepRunner::new(options, cases, &embedder);
    let results = runner.run().await.context("Sweep failed")?;

    println!("\n{}", render_summary(&results));

    write_report(&results, &cli.output).context("Failed to write report")?;
    println!("Detailed results saved to '{}'", cli.output.display());

    if let Some(json_path) = cli.json {
        let json = serde_json::to_string_pretty(&results)?;
        std::fs::write(&json_path, json)
            .with_context(|| format!("Failed to write '{}'", json_path.display()))?;
        println!("Raw results saved to '{}'", json_path.display());
    }

    Ok(())
}
