use rustc_hash::FxHashMap;
use smartstring::alias::String as CompactString;

use super::interval::GenomicInterval;
use crate::core::error::Result;

/// Group intervals by chromosome, keeping chromosomes in order of first appearance
/// and sorting each group by `(start, stop)`.
pub(crate) fn group_by_chrom(intervals: Vec<GenomicInterval>) -> Result<Vec<Vec<GenomicInterval>>> {
    let mut index: FxHashMap<CompactString, usize> = FxHashMap::default();
    let mut groups: Vec<Vec<GenomicInterval>> = Vec::new();

    for iv in intervals {
        iv.validate()?;
        let slot = match index.get(&iv.chrom) {
            Some(slot) => *slot,
            None => {
                index.insert(iv.chrom.clone(), groups.len());
                groups.push(Vec::new());
                groups.len() - 1
            }
        };
        groups[slot].push(iv);
    }

    for group in groups.iter_mut() {
        // stable: equal (start, stop) keep input order
        group.sort_by(|a, b| a.start.cmp(&b.start).then(a.stop.cmp(&b.stop)));
    }
    Ok(groups)
}

/// Merge intervals whose gap is at most `merge_threshold` bases.
///
/// A threshold of 0 merges only overlapping or touching intervals. The result is a
/// flat list ordered by chromosome (first appearance in `intervals`) and then by start.
/// For any two neighbours on the same chromosome, `next.start - prev.stop > merge_threshold`.
pub fn merge_intervals(
    intervals: Vec<GenomicInterval>,
    merge_threshold: u64,
) -> Result<Vec<GenomicInterval>> {
    let groups = group_by_chrom(intervals)?;
    let mut merged = Vec::with_capacity(groups.iter().map(Vec::len).sum());

    for group in groups {
        let mut ivs = group.into_iter();
        let Some(mut current) = ivs.next() else {
            continue;
        };
        for next in ivs {
            if next.start <= current.stop.saturating_add(merge_threshold) {
                current.stop = current.stop.max(next.stop);
                if current.strand != next.strand {
                    current.strand = None;
                }
            } else {
                merged.push(std::mem::replace(&mut current, next));
            }
        }
        merged.push(current);
    }

    Ok(merged)
}
