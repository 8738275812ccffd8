//! Parallel per-locus execution.
//!
//! The [`LocusRunner`] fans locus groups out across a Rayon pool and streams each
//! locus's [`LocusOutcome`] through a bounded crossbeam channel. Callers implement
//! [`LocusProcessor`] to define the per-locus work.

mod scheduler;
mod types;

pub use scheduler::LocusRunner;
pub use types::{LocusOutcome, LocusProcessor, OUTCOMES_PER_THREAD};
