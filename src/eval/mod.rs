//! Retrieval-quality evaluation harness.
//!
//! This module provides:
//! - Quality metrics scoring retrieval results against expected answer profiles
//! - The fixed question set (and custom JSON question loading)
//! - The chunking-parameter sweep orchestrator
//! - Plain-text report rendering

pub mod metrics;
pub mod questions;
pub mod report;
pub mod sweep;

pub use metrics::{MetricSet, avg_relevance_score, evaluate, source_accuracy, topic_overlap};
pub use questions::{NO_EXPECTED_SOURCE, TestCase, builtin_test_cases, load_test_cases};
pub use report::{DEFAULT_REPORT_PATH, render, render_summary, write_report};
pub use sweep::{
    ConfigOutcome, ConfigReport, QuestionResult, SweepOptions, SweepResults, SweepRunner,
    default_configs,
};
