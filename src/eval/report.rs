//! Report rendering for sweep results.
//!
//! Produces one plain-text artifact: a summary section with per-configuration
//! metric averages followed by a per-question detail dump. Output is fully
//! determined by the input data (configurations and questions keep their
//! evaluation order), so reports from identical runs diff cleanly.

use crate::error::{RagBenchError, Result};
use crate::eval::metrics::MetricSet;
use crate::eval::sweep::{ConfigOutcome, QuestionResult, SweepResults};
use std::fmt::Write as _;
use std::path::Path;

/// Well-known location the sweep writes its report to.
pub const DEFAULT_REPORT_PATH: &str = "rag_performance_results.txt";

/// Unweighted mean of one metric across a configuration's questions.
fn mean(results: &[QuestionResult], metric: fn(&MetricSet) -> f64) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(|r| metric(&r.metrics)).sum::<f64>() / results.len() as f64
}

/// Render the per-configuration summary section.
pub fn render_summary(results: &SweepResults) -> String {
    let mut summary = String::from("=== RAG Performance Test Results ===\n\n");

    for (name, outcome) in &results.outcomes {
        let _ = writeln!(summary, "Configuration: {}", name);
        let _ = writeln!(summary, "{}", "=".repeat(50));

        match outcome {
            ConfigOutcome::Completed(report) => {
                let _ = writeln!(
                    summary,
                    "Average Topic Overlap: {:.3}",
                    mean(&report.results, |m| m.topic_overlap)
                );
                let _ = writeln!(
                    summary,
                    "Average Source Accuracy: {:.3}",
                    mean(&report.results, |m| m.source_accuracy)
                );
                let _ = writeln!(
                    summary,
                    "Average Relevance Score: {:.3}",
                    mean(&report.results, |m| m.avg_relevance_score)
                );
                let _ = writeln!(summary, "Total Questions: {}", report.results.len());
                let _ = writeln!(summary, "Chunks Indexed: {}", report.chunk_count);
                let _ = writeln!(
                    summary,
                    "Build Time: {:.2} seconds",
                    report.build_time_seconds
                );
            }
            ConfigOutcome::Skipped { reason } => {
                let _ = writeln!(summary, "Skipped: {}", reason);
            }
        }

        summary.push('\n');
    }

    summary
}

/// Render the full report: summary section followed by the detail section.
pub fn render(results: &SweepResults) -> String {
    let mut out = render_summary(results);

    out.push_str("\n=== Detailed Results ===\n");

    for (name, outcome) in &results.outcomes {
        let _ = writeln!(out, "\n{}:", name);

        match outcome {
            ConfigOutcome::Completed(report) => {
                for result in &report.results {
                    let _ = writeln!(out, "\nQuestion: {}", result.case.question);
                    let _ = writeln!(out, "Category: {}", result.case.category);
                    let _ = writeln!(out, "Metrics: {}", result.metrics);
                    let _ = writeln!(out, "{}", "-".repeat(50));
                }
            }
            ConfigOutcome::Skipped { reason } => {
                let _ = writeln!(out, "Skipped: {}", reason);
            }
        }
    }

    out
}

/// Write the full report to a file.
pub fn write_report(results: &SweepResults, path: &Path) -> Result<()> {
    std::fs::write(path, render(results)).map_err(|e| RagBenchError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::questions::TestCase;
    use crate::eval::sweep::ConfigReport;
    use crate::splitter::ChunkConfig;
    use tempfile::TempDir;

    fn question_result(question: &str, topic: f64, source: f64, relevance: f64) -> QuestionResult {
        QuestionResult {
            case: TestCase {
                question: question.to_string(),
                expected_topics: vec!["x".to_string()],
                expected_source: "a.md".to_string(),
                category: "basic".to_string(),
            },
            metrics: MetricSet {
                topic_overlap: topic,
                source_accuracy: source,
                avg_relevance_score: relevance,
                num_chunks_retrieved: 3,
            },
        }
    }

    fn sample_results() -> SweepResults {
        SweepResults {
            outcomes: vec![
                (
                    "chunk_500_overlap_100".to_string(),
                    ConfigOutcome::Completed(ConfigReport {
                        config: ChunkConfig::new(500, 100),
                        build_time_seconds: 1.5,
                        chunk_count: 42,
                        results: vec![
                            question_result("Who is Alice?", 1.0, 1.0, 0.8),
                            question_result("What is attention?", 0.5, 0.0, 0.6),
                        ],
                    }),
                ),
                (
                    "chunk_1000_overlap_500".to_string(),
                    ConfigOutcome::Skipped {
                        reason: "Embedding API error: service down".to_string(),
                    },
                ),
            ],
        }
    }

    #[test]
    fn test_summary_averages() {
        let summary = render_summary(&sample_results());

        assert!(summary.contains("Configuration: chunk_500_overlap_100"));
        assert!(summary.contains("Average Topic Overlap: 0.750"));
        assert!(summary.contains("Average Source Accuracy: 0.500"));
        assert!(summary.contains("Average Relevance Score: 0.700"));
        assert!(summary.contains("Total Questions: 2"));
        assert!(summary.contains("Chunks Indexed: 42"));
        assert!(summary.contains("Build Time: 1.50 seconds"));
    }

    #[test]
    fn test_summary_lists_skipped_configs() {
        let summary = render_summary(&sample_results());

        assert!(summary.contains("Configuration: chunk_1000_overlap_500"));
        assert!(summary.contains("Skipped: Embedding API error: service down"));
    }

    #[test]
    fn test_detail_section_preserves_order() {
        let rendered = render(&sample_results());

        let detail_start = rendered.find("=== Detailed Results ===").unwrap();
        let detail = &rendered[detail_start..];

        let alice = detail.find("Question: Who is Alice?").unwrap();
        let attention = detail.find("Question: What is attention?").unwrap();
        assert!(alice < attention);

        assert!(detail.contains("Category: basic"));
        assert!(detail.contains("num_chunks_retrieved=3"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let results = sample_results();
        assert_eq!(render(&results), render(&results));
    }

    #[test]
    fn test_zero_questions_does_not_divide_by_zero() {
        let results = SweepResults {
            outcomes: vec![(
                "chunk_500_overlap_100".to_string(),
                ConfigOutcome::Completed(ConfigReport {
                    config: ChunkConfig::new(500, 100),
                    build_time_seconds: 0.1,
                    chunk_count: 0,
                    results: vec![],
                }),
            )],
        };

        let summary = render_summary(&results);
        assert!(summary.contains("Average Topic Overlap: 0.000"));
        assert!(summary.contains("Total Questions: 0"));
    }

    #[test]
    fn test_write_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.txt");

        write_report(&sample_results(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("=== RAG Performance Test Results ==="));
        assert!(content.contains("=== Detailed Results ==="));
    }
}
