use crate::core::error::Result;
use crate::engine::partition::LocusGroup;

/// Number of in-flight outcomes buffered per worker thread.
pub const OUTCOMES_PER_THREAD: usize = 2;

/// Trait defining how one locus is processed.
pub trait LocusProcessor {
    /// The value produced for a successfully processed locus.
    type Output: 'static + Send;

    /// Process the locus at position `index` of the partition.
    fn process_locus(&self, index: usize, locus: &LocusGroup) -> Result<Self::Output>;
}

/// Result of one locus; failures are reported per locus and never abort siblings.
#[derive(Debug)]
pub struct LocusOutcome<O> {
    pub index: usize,
    pub bases: u64,
    pub result: Result<O>,
}
