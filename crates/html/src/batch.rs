//! Parallel conversion of many independent documents.

use crate::renderer::{Options, convert_with_options};
use golb_md_core::{ParseDiagnostics, ParseOptions};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Input for batch processing - represents a single document to convert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchInput {
    /// Document identifier (typically the file path).
    pub id: String,
    /// Markdown source content.
    pub source: String,
}

/// Result for a single document in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    /// Document identifier matching the input.
    pub id: String,
    /// Rendered HTML.
    pub html: String,
    /// Problems recovered while parsing this document.
    pub diagnostics: ParseDiagnostics,
}

/// Statistics for batch processing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchStats {
    /// Total number of documents processed.
    pub total: usize,
    /// Number of documents that produced at least one diagnostic.
    pub with_diagnostics: usize,
    /// Total processing time in milliseconds.
    pub processing_time_ms: f64,
}

/// Options for batch processing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Maximum number of threads to use. Defaults to the global rayon pool.
    #[serde(default)]
    pub max_threads: Option<usize>,
    /// Parser limits applied to every document.
    #[serde(default)]
    pub parse: ParseOptions,
    /// Rendering options applied to every document.
    #[serde(default)]
    pub render: Options,
}

/// Result of batch processing containing all results and statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutput {
    /// Individual results, in input order.
    pub results: Vec<BatchResult>,
    /// Processing statistics.
    pub stats: BatchStats,
}

/// Converts documents in parallel; each conversion is independent.
pub fn convert_batch(inputs: Vec<BatchInput>, options: &BatchOptions) -> BatchOutput {
    let start = Instant::now();
    let total = inputs.len();

    // Configure thread pool if max_threads is specified
    let pool = options.max_threads.and_then(|threads| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|err| log::warn!("falling back to global thread pool: {}", err))
            .ok()
    });

    let process_input = |input: BatchInput| -> BatchResult {
        let converted = convert_with_options(&input.source, &options.parse, &options.render);
        BatchResult {
            id: input.id,
            html: converted.html,
            diagnostics: converted.diagnostics,
        }
    };

    let results: Vec<BatchResult> = match pool {
        Some(pool) => pool.install(|| inputs.into_par_iter().map(process_input).collect()),
        None => inputs.into_par_iter().map(process_input).collect(),
    };

    let with_diagnostics = results
        .iter()
        .filter(|result| result.diagnostics.has_any())
        .count();
    let elapsed = start.elapsed();

    BatchOutput {
        results,
        stats: BatchStats {
            total,
            with_diagnostics,
            processing_time_ms: elapsed.as_secs_f64() * 1000.0,
        },
    }
}
