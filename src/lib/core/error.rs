//! Error types for the snpclust library

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnpclustError {
    #[error("Invalid interval {chrom}:{start}-{stop}: start must be < stop")]
    InvalidInterval { chrom: String, start: u64, stop: u64 },

    #[error("Invalid chunk size {0}: must be > 0")]
    InvalidChunkSize(i64),

    #[error(
        "Reads are not sorted by position: ({tid}, {pos}) arrived after ({prev_tid}, {prev_pos})"
    )]
    UnorderedInput {
        prev_tid: i32,
        prev_pos: i64,
        tid: i32,
        pos: i64,
    },

    #[error("Failed to load accepted barcodes from {path}: {source}")]
    IdentityLoadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid locus descriptor line {line}: {reason}")]
    InvalidDescriptor { line: usize, reason: String },

    #[error("Annotation error: {0}")]
    Annotation(String),

    #[error("BAM error: {0}")]
    Bam(#[from] rust_htslib::errors::Error),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("External tool `{tool}` could not be started: {source}")]
    ToolNotFound {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("External tool `{tool}` exited with {status}")]
    ToolFailure { tool: String, status: String },

    #[error("Worker panicked while processing locus {index}: {message}")]
    LocusPanicked { index: usize, message: String },
}

pub type Result<T> = std::result::Result<T, SnpclustError>;
