//! Duplicate-candidate predicates.
//!
//! Only reads accepted by a [`CandidateFilter`] take part in duplicate-key bookkeeping.
//! [`DefaultCandidateFilter`] mirrors the usual single-cell rule: mapped primary alignments
//! with a UMI and a high-confidence mapping quality.

use super::record::ReadRecord;

/// A trait deciding whether a read is eligible for duplicate checking.
pub trait CandidateFilter {
    /// Returns `true` when `read` should be duplicate-checked.
    fn is_candidate<P>(&self, read: &ReadRecord<P>) -> bool;
}

/// Mapped, primary, UMI-bearing reads at or above a mapping-quality threshold.
#[derive(Debug, Clone, Copy)]
pub struct DefaultCandidateFilter {
    /// Reads need `mapq >= high_conf_mapq`; 255 is the aligner's unique-mapping value.
    high_conf_mapq: u8,
}

impl DefaultCandidateFilter {
    pub fn new(high_conf_mapq: u8) -> Self {
        Self { high_conf_mapq }
    }

    pub fn high_conf_mapq(&self) -> u8 {
        self.high_conf_mapq
    }
}

impl CandidateFilter for DefaultCandidateFilter {
    #[inline(always)]
    fn is_candidate<P>(&self, read: &ReadRecord<P>) -> bool {
        !read.is_unmapped
            && !read.is_secondary
            && read.umi.is_some()
            && read.mapq >= self.high_conf_mapq
    }
}
