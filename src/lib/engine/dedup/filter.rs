use rustc_hash::FxHashSet;
use serde::Serialize;
use std::ops::AddAssign;

use super::barcodes::AcceptedBarcodes;
use super::candidate::CandidateFilter;
use super::record::{DuplicateKey, ReadRecord};
use crate::core::error::{Result, SnpclustError};

/// What happens to accepted-barcode reads that are not duplicate candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NonCandidatePolicy {
    /// Never emit a read that was not key-checked.
    #[default]
    Drop,
    /// Emit non-candidates unchanged, without touching the seen-key set.
    PassThrough,
}

/// Runtime options for [`DedupFilter`].
#[derive(Debug, Clone, Copy)]
pub struct FilterConfig {
    pub non_candidates: NonCandidatePolicy,
    /// Report [`SnpclustError::UnorderedInput`] when positions go backwards.
    pub check_order: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            non_candidates: NonCandidatePolicy::Drop,
            check_order: cfg!(debug_assertions),
        }
    }
}

/// Per-filter counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub reads_seen: u64,
    pub position_groups: u64,
    pub dropped_barcode: u64,
    pub dropped_duplicate: u64,
    pub dropped_non_candidate: u64,
    pub emitted: u64,
}

impl AddAssign for FilterStats {
    fn add_assign(&mut self, other: Self) {
        self.reads_seen += other.reads_seen;
        self.position_groups += other.position_groups;
        self.dropped_barcode += other.dropped_barcode;
        self.dropped_duplicate += other.dropped_duplicate;
        self.dropped_non_candidate += other.dropped_non_candidate;
        self.emitted += other.emitted;
    }
}

/// Streaming barcode filter and position-local duplicate remover.
///
/// Wraps an iterator of reads sorted by `(tid, pos)` and yields, in arrival order, only
/// reads whose barcode is accepted and which are the first of their [`DuplicateKey`]
/// within the current position group. The seen-key set is cleared whenever the
/// position changes, so memory is bounded by the number of distinct keys at one
/// position.
///
/// Unsorted input is a caller error. With [`FilterConfig::check_order`] it is reported as
/// [`SnpclustError::UnorderedInput`]; without it grouping is silently wrong.
pub struct DedupFilter<'a, I, F> {
    reads: I,
    accepted: &'a AcceptedBarcodes,
    candidates: &'a F,
    config: FilterConfig,
    current: Option<(i32, i64)>,
    seen: FxHashSet<DuplicateKey>,
    stats: FilterStats,
}

impl<'a, I, F, P> DedupFilter<'a, I, F>
where
    I: Iterator<Item = Result<ReadRecord<P>>>,
    F: CandidateFilter,
{
    pub fn new(
        reads: I,
        accepted: &'a AcceptedBarcodes,
        candidates: &'a F,
        config: FilterConfig,
    ) -> Self {
        Self {
            reads,
            accepted,
            candidates,
            config,
            current: None,
            seen: FxHashSet::default(),
            stats: FilterStats::default(),
        }
    }

    pub fn stats(&self) -> FilterStats {
        self.stats
    }

    fn enter_position(&mut self, key: (i32, i64)) -> Result<()> {
        if self.current == Some(key) {
            return Ok(());
        }
        if let Some(prev) = self.current {
            if self.config.check_order && key < prev {
                return Err(SnpclustError::UnorderedInput {
                    prev_tid: prev.0,
                    prev_pos: prev.1,
                    tid: key.0,
                    pos: key.1,
                });
            }
        }
        self.current = Some(key);
        self.seen.clear();
        self.stats.position_groups += 1;
        Ok(())
    }
}

impl<'a, I, F, P> Iterator for DedupFilter<'a, I, F>
where
    I: Iterator<Item = Result<ReadRecord<P>>>,
    F: CandidateFilter,
{
    type Item = Result<ReadRecord<P>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut read = match self.reads.next()? {
                Ok(read) => read,
                Err(err) => return Some(Err(err)),
            };
            self.stats.reads_seen += 1;

            if let Err(err) = self.enter_position(read.position_key()) {
                return Some(Err(err));
            }

            let accepted = read
                .barcode
                .as_deref()
                .is_some_and(|barcode| self.accepted.contains(barcode));
            if !accepted {
                self.stats.dropped_barcode += 1;
                continue;
            }

            if !self.candidates.is_candidate(&read) {
                match self.config.non_candidates {
                    NonCandidatePolicy::Drop => {
                        self.stats.dropped_non_candidate += 1;
                        continue;
                    }
                    NonCandidatePolicy::PassThrough => {
                        self.stats.emitted += 1;
                        return Some(Ok(read));
                    }
                }
            }

            if !self.seen.insert(read.duplicate_key()) {
                self.stats.dropped_duplicate += 1;
                continue;
            }

            read.is_duplicate = false;
            self.stats.emitted += 1;
            return Some(Ok(read));
        }
    }
}
