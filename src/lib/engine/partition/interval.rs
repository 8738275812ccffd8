use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;
use smartstring::alias::String as CompactString;

use crate::core::error::{Result, SnpclustError};

/// Strand annotation carried by an interval when the source provides one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    /// Parse a `+`/`-` annotation column; `.` and anything else mean "no strand".
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Strand::Forward),
            "-" => Some(Strand::Reverse),
            _ => None,
        }
    }
}

/// A 0-based, half-open genomic interval `[start, stop)` on one chromosome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GenomicInterval {
    pub chrom: CompactString,
    pub start: u64,
    pub stop: u64,
    pub strand: Option<Strand>,
}

impl GenomicInterval {
    /// Create an interval, rejecting empty or inverted coordinates.
    pub fn new(chrom: &str, start: u64, stop: u64) -> Result<Self> {
        Self::with_strand(chrom, start, stop, None)
    }

    pub fn with_strand(chrom: &str, start: u64, stop: u64, strand: Option<Strand>) -> Result<Self> {
        let interval = Self {
            chrom: CompactString::from(chrom),
            start,
            stop,
            strand,
        };
        interval.validate()?;
        Ok(interval)
    }

    /// Check the `start < stop` invariant.
    pub fn validate(&self) -> Result<()> {
        if self.start >= self.stop {
            return Err(SnpclustError::InvalidInterval {
                chrom: self.chrom.to_string(),
                start: self.start,
                stop: self.stop,
            });
        }
        Ok(())
    }

    /// Number of bases covered.
    #[inline]
    pub fn len(&self) -> u64 {
        self.stop.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Ord for GenomicInterval {
    fn cmp(&self, other: &Self) -> Ordering {
        self.chrom
            .cmp(&other.chrom)
            .then(self.start.cmp(&other.start))
            .then(self.stop.cmp(&other.stop))
            .then(self.strand.cmp(&other.strand))
    }
}

impl PartialOrd for GenomicInterval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GenomicInterval {
    /// BED-like `chrom\tstart\tstop`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.chrom, self.start, self.stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_inverted_intervals() {
        assert!(matches!(
            GenomicInterval::new("chr1", 10, 10),
            Err(SnpclustError::InvalidInterval { .. })
        ));
        assert!(GenomicInterval::new("chr1", 11, 10).is_err());
        assert_eq!(GenomicInterval::new("chr1", 10, 11).unwrap().len(), 1);
    }

    #[test]
    fn orders_by_chrom_then_coordinates() {
        let mut ivs = vec![
            GenomicInterval::new("chr2", 0, 5).unwrap(),
            GenomicInterval::new("chr1", 10, 20).unwrap(),
            GenomicInterval::new("chr1", 10, 15).unwrap(),
            GenomicInterval::new("chr1", 3, 50).unwrap(),
        ];
        ivs.sort();
        let coords: Vec<(&str, u64, u64)> = ivs
            .iter()
            .map(|iv| (iv.chrom.as_str(), iv.start, iv.stop))
            .collect();
        assert_eq!(
            coords,
            vec![("chr1", 3, 50), ("chr1", 10, 15), ("chr1", 10, 20), ("chr2", 0, 5)]
        );
    }

    #[test]
    fn parses_strand_symbols() {
        assert_eq!(Strand::from_symbol("+"), Some(Strand::Forward));
        assert_eq!(Strand::from_symbol("-"), Some(Strand::Reverse));
        assert_eq!(Strand::from_symbol("."), None);
    }
}
