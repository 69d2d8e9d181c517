//! RAG Bench CLI
//!
//! Build a vector store from a document corpus and ask questions against it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rag_bench::{
    config::Config,
    corpus::load_corpus,
    embedding::EmbeddingClient,
    llm::{LlmClient, Prompts},
    splitter::{ChunkConfig, split_documents},
    store::VectorStore,
};
use std::path::PathBuf;
use std::time::Instant;

/// Retrieval threshold below which an answer is refused.
const MIN_RELEVANCE: f32 = 0.65;

/// RAG Bench - build, query, and inspect a chunked vector store
#[derive(Parser)]
#[command(name = "rag")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the vector store from a document corpus
    Build {
        /// Directory containing markdown and PDF documents
        #[arg(short, long, default_value = "data")]
        corpus: PathBuf,

        /// Output directory for the vector store
        #[arg(short, long, default_value = "rag_index")]
        index: PathBuf,

        /// Maximum characters per chunk
        #[arg(long, default_value_t = 1200)]
        chunk_size: usize,

        /// Characters shared between consecutive chunks
        #[arg(long, default_value_t = 500)]
        overlap: usize,
    },

    /// Answer a question from the indexed corpus
    Ask {
        /// The question to answer
        question: String,

        /// Path to the vector store directory
        #[arg(short, long, default_value = "rag_index")]
        index: PathBuf,

        /// Number of chunks to retrieve as context
        #[arg(short = 'k', long, default_value_t = 4)]
        top_k: usize,

        /// Print retrieved chunks without calling the LLM
        #[arg(long)]
        retrieve_only: bool,
    },

    /// Show information about the vector store
    Info {
        /// Path to the vector store directory
        #[arg(default_value = "rag_index")]
        index: PathBuf,
    },

    /// Test LLM connection
    Test,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            corpus,
            index,
            chunk_size,
            overlap,
        } => cmd_build(corpus, index, chunk_size, overlap).await,
        Commands::Ask {
            question,
            index,
            top_k,
            retrieve_only,
        } => cmd_ask(question, index, top_k, retrieve_only).await,
        Commands::Info { index } => cmd_info(index),
        Commands::Test => cmd_test().await,
    }
}

async fn cmd_build(
    corpus_dir: PathBuf,
    index_dir: PathBuf,
    chunk_size: usize,
    overlap: usize,
) -> Result<()> {
    println!("Loading configuration...");
    let config = Config::load().context("Failed to load configuration")?;
    config
        .validate_embedding()
        .context("Invalid configuration")?;

    let chunk_config = ChunkConfig::new(chunk_size, overlap);
    chunk_config.validate().context("Invalid chunking flags")?;

    let start = Instant::now();

    let documents = load_corpus(&corpus_dir).context("Failed to load corpus")?;
    println!(
        "Loaded {} documents from {}",
        documents.len(),
        corpus_dir.display()
    );

    let chunks =
        split_documents(&documents, &chunk_config).context("Failed to split documents")?;
    println!("Split into {} chunks", chunks.len());

    // Rebuild from scratch; a stale store at this location would mix
    // configurations.
    VectorStore::destroy(&index_dir).context("Failed to remove existing store")?;

    let embedder = EmbeddingClient::new(config.embedding);

    println!("Embedding chunks...");
    let store = VectorStore::build(chunks, &embedder)
        .await
        .context("Failed to build vector store")?;
    store.save(&index_dir).context("Failed to save store")?;

    println!(
        "Saved {} chunks to store at {} in {:.2?}",
        store.len(),
        index_dir.display(),
        start.elapsed()
    );

    Ok(())
}

async fn cmd_ask(
    question: String,
    index_dir: PathBuf,
    top_k: usize,
    retrieve_only: bool,
) -> Result<()> {
    if !VectorStore::exists(&index_dir) {
        anyhow::bail!(
            "Vector store not found at '{}'. Run 'build' first.",
            index_dir.display()
        );
    }

    let config = Config::load().context("Failed to load configuration")?;
    config
        .validate_embedding()
        .context("Invalid configuration")?;

    let store = VectorStore::open(&index_dir).context("Failed to open store")?;
    let embedder = EmbeddingClient::new(config.embedding.clone());

    let results = store
        .query(&embedder, &question, top_k)
        .await
        .context("Retrieval failed")?;

    if results.is_empty() || results[0].score < MIN_RELEVANCE {
        println!("Unable to find relevant results.");
        return Ok(());
    }

    let context_text = results
        .iter()
        .map(|r| r.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");

    if retrieve_only {
        for (i, result) in results.iter().enumerate() {
            println!(
                "{:>2}. [score {:.3}] {} (offset {})",
                i + 1,
                result.score,
                result.chunk.source,
                result.chunk.start_offset
            );
        }
        println!("\n{}", context_text);
        return Ok(());
    }

    config.validate_llm().context("Invalid configuration")?;
    let llm = LlmClient::new(config.llm);

    let prompt = Prompts::fill_rag_answer(&context_text, &question);
    let response = llm
        .complete(None, &prompt)
        .await
        .context("LLM call failed")?;

    println!(
        "Response: {}\n---\nRelevant Quotes:\n{}",
        response.trim(),
        context_text
    );

    Ok(())
}

fn cmd_info(index_dir: PathBuf) -> Result<()> {
    if !VectorStore::exists(&index_dir) {
        anyhow::bail!(
            "Vector store not found at '{}'. Run 'build' first.",
            index_dir.display()
        );
    }

    let store = VectorStore::open(&index_dir).context("Failed to open store")?;
    let size = VectorStore::size_bytes(&index_dir)?;

    println!("Vector Store Information");
    println!("{}", "─".repeat(40));
    println!("  Chunks:     {}", store.len());
    println!("  File size:  {:.1} KB", size as f64 / 1024.0);
    println!("  Store path: {}", index_dir.display());

    Ok(())
}

async fn cmd_test() -> Result<()> {
    println!("Testing LLM connection...\n");

    let config = Config::load().context("Failed to load configuration")?;

    println!("Configuration:");
    println!("  API Base:  {}", config.llm.api_base);
    println!("  Model:     {}", config.llm.model);
    println!(
        "  API Key:   {}...",
        &config.llm.api_key[..config.llm.api_key.len().min(8)]
    );
    println!();

    if let Err(e) = config.validate_llm() {
        println!("Configuration error: {}", e);
        return Ok(());
    }

    let client = LlmClient::new(config.llm);

    println!("Sending test request...");
    match client.test_connection().await {
        Ok(()) => {
            println!("Connection successful!");
        }
        Err(e) => {
            println!("Connection failed: {}", e);
        }
    }

    Ok(())
}
