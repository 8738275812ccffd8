use serde::Serialize;

use super::interval::GenomicInterval;
use super::merge::merge_intervals;
use crate::core::error::{Result, SnpclustError};

/// An ordered set of intervals handed to one parallel work unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocusGroup {
    intervals: Vec<GenomicInterval>,
    bases: u64,
}

impl LocusGroup {
    /// A locus made of exactly one interval.
    pub fn single(interval: GenomicInterval) -> Self {
        let bases = interval.len();
        Self {
            intervals: vec![interval],
            bases,
        }
    }

    pub fn push(&mut self, interval: GenomicInterval) {
        self.bases += interval.len();
        self.intervals.push(interval);
    }

    pub fn intervals(&self) -> &[GenomicInterval] {
        &self.intervals
    }

    pub fn into_intervals(self) -> Vec<GenomicInterval> {
        self.intervals
    }

    /// Sum of `stop - start` over all intervals.
    pub fn bases(&self) -> u64 {
        self.bases
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Render the locus as newline-joined `chrom\tstart\tstop` lines.
    pub fn to_descriptor(&self) -> String {
        self.intervals
            .iter()
            .map(|iv| iv.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Parse a descriptor produced by [`LocusGroup::to_descriptor`].
    ///
    /// Fields may be separated by any whitespace; blank lines are skipped. Descriptors
    /// carry coordinates only, so parsed intervals have no strand.
    pub fn from_descriptor(text: &str) -> Result<Self> {
        let mut locus = LocusGroup::default();
        for (i, line) in text.lines().enumerate() {
            let line_no = i + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() < 3 {
                return Err(SnpclustError::InvalidDescriptor {
                    line: line_no,
                    reason: format!("expected 3 fields, found {}", fields.len()),
                });
            }
            let parse = |field: &str, name: &str| {
                field
                    .parse::<u64>()
                    .map_err(|e| SnpclustError::InvalidDescriptor {
                        line: line_no,
                        reason: format!("unable to parse {} '{}': {}", name, field, e),
                    })
            };
            let start = parse(fields[1], "start")?;
            let stop = parse(fields[2], "stop")?;
            locus.push(GenomicInterval::new(fields[0], start, stop)?);
        }
        Ok(locus)
    }
}

/// Greedily pack intervals, in order, into locus groups of at least `chunk_size` bases.
///
/// A group is closed as soon as its running base count reaches `chunk_size`; the last
/// group may be smaller. Intervals are never split, so an interval longer than
/// `chunk_size` forms a group on its own.
pub fn build_loci(intervals: Vec<GenomicInterval>, chunk_size: u64) -> Result<Vec<LocusGroup>> {
    if chunk_size == 0 {
        return Err(SnpclustError::InvalidChunkSize(0));
    }

    let mut loci = Vec::new();
    let mut current = LocusGroup::default();
    for iv in intervals {
        iv.validate()?;
        current.push(iv);
        if current.bases() >= chunk_size {
            loci.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        loci.push(current);
    }
    Ok(loci)
}

/// Merge `intervals` with `merge_threshold` and pack the result into loci of `chunk_size` bases.
pub fn partition(
    intervals: Vec<GenomicInterval>,
    merge_threshold: u64,
    chunk_size: u64,
) -> Result<Vec<LocusGroup>> {
    if chunk_size == 0 {
        return Err(SnpclustError::InvalidChunkSize(0));
    }
    let merged = merge_intervals(intervals, merge_threshold)?;
    log::debug!("Merged annotation into {} intervals", merged.len());
    build_loci(merged, chunk_size)
}
