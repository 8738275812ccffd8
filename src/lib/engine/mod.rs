//! Core algorithms: interval partitioning, duplicate filtering and per-locus scheduling.

pub mod dedup;
pub mod par_loci;
pub mod partition;

pub use par_loci::{LocusOutcome, LocusProcessor, LocusRunner};
