use log::debug;
use smartstring::alias::String as CompactString;

use super::barcodes::AcceptedBarcodes;
use super::candidate::CandidateFilter;
use super::filter::{DedupFilter, FilterConfig, FilterStats};
use super::record::ReadRecord;
use crate::core::error::Result;
use crate::engine::partition::{GenomicInterval, LocusGroup};

/// Boxed stream of reads returned by [`ReadSource::fetch`].
pub type ReadIter<'a, P> = Box<dyn Iterator<Item = Result<ReadRecord<P>>> + 'a>;

/// Windowed access to position-sorted reads.
pub trait ReadSource {
    /// Alignment payload carried by each [`ReadRecord`].
    type Payload;

    /// Stream the reads overlapping `interval`, sorted by `(tid, pos)`.
    fn fetch(&mut self, interval: &GenomicInterval) -> Result<ReadIter<'_, Self::Payload>>;
}

/// An in-memory, position-sorted read set; `contigs[tid]` names each target.
#[derive(Debug, Clone, Default)]
pub struct VecReadSource<P = ()> {
    contigs: Vec<CompactString>,
    reads: Vec<ReadRecord<P>>,
}

impl<P> VecReadSource<P> {
    pub fn new(contigs: &[&str], mut reads: Vec<ReadRecord<P>>) -> Self {
        reads.sort_by_key(|r| r.position_key());
        Self {
            contigs: contigs.iter().map(|c| CompactString::from(*c)).collect(),
            reads,
        }
    }
}

impl<P: Clone> ReadSource for VecReadSource<P> {
    type Payload = P;

    fn fetch(&mut self, interval: &GenomicInterval) -> Result<ReadIter<'_, P>> {
        let Some(tid) = self.contigs.iter().position(|c| *c == interval.chrom) else {
            return Ok(Box::new(std::iter::empty()));
        };
        let tid = tid as i32;
        let (start, stop) = (interval.start as i64, interval.stop as i64);
        Ok(Box::new(
            self.reads
                .iter()
                .filter(move |r| r.tid == tid && r.pos >= start && r.pos < stop)
                .cloned()
                .map(Ok),
        ))
    }
}

/// Run the duplicate filter over every interval of `locus`, handing kept reads to `sink`.
///
/// Reads that start before the end of the previous interval on the same chromosome were
/// already fetched for that interval and are skipped, so a read spanning two intervals
/// is emitted once.
pub fn filter_locus<S, F, W>(
    source: &mut S,
    locus: &LocusGroup,
    accepted: &AcceptedBarcodes,
    candidates: &F,
    config: FilterConfig,
    mut sink: W,
) -> Result<FilterStats>
where
    S: ReadSource,
    F: CandidateFilter,
    W: FnMut(ReadRecord<S::Payload>) -> Result<()>,
{
    let mut stats = FilterStats::default();
    let mut previous: Option<&GenomicInterval> = None;

    for interval in locus.intervals() {
        let skip_before = match previous {
            Some(prev) if prev.chrom == interval.chrom => prev.stop as i64,
            _ => i64::MIN,
        };
        previous = Some(interval);

        let reads = source
            .fetch(interval)?
            .filter(move |read| read.as_ref().map_or(true, |r| r.pos >= skip_before));
        let mut filter = DedupFilter::new(reads, accepted, candidates, config);
        for read in filter.by_ref() {
            sink(read?)?;
        }

        let interval_stats = filter.stats();
        debug!(
            "{}:{}-{} kept {} of {} reads",
            interval.chrom, interval.start, interval.stop, interval_stats.emitted, interval_stats.reads_seen
        );
        stats += interval_stats;
    }

    Ok(stats)
}
