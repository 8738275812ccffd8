//! Loading genomic intervals from annotation files.

use bio::io::bed;
use log::info;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::core::error::{Result, SnpclustError};
use crate::core::io::open_text;
use crate::engine::partition::{partition, GenomicInterval, LocusGroup, Strand};

/// Where the loci of a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationSource {
    /// Every BED record is its own locus.
    Bed(PathBuf),
    /// GTF exons, merged and packed into loci.
    Gtf(PathBuf),
}

impl AnnotationSource {
    /// Load the loci; `merge_threshold` and `chunk_size` only apply to GTF input.
    pub fn loci(&self, merge_threshold: u64, chunk_size: u64) -> Result<Vec<LocusGroup>> {
        match self {
            AnnotationSource::Bed(path) => loci_from_bed(path),
            AnnotationSource::Gtf(path) => {
                partition(exon_intervals_from_gtf(path)?, merge_threshold, chunk_size)
            }
        }
    }
}

/// Read every record of a BED file as a 0-based half-open interval.
pub fn intervals_from_bed<P: AsRef<Path>>(path: P) -> Result<Vec<GenomicInterval>> {
    let path = path.as_ref();
    let mut reader = bed::Reader::from_file(path).map_err(|e| {
        SnpclustError::Annotation(format!("Error opening BED file '{}': {}", path.display(), e))
    })?;

    let mut intervals = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            SnpclustError::Annotation(format!("BED record {} is invalid: {}", i, e))
        })?;
        intervals.push(GenomicInterval::new(record.chrom(), record.start(), record.end())?);
    }
    info!("Read {} intervals from {}", intervals.len(), path.display());
    Ok(intervals)
}

/// One locus per BED record, in file order; records are neither merged nor packed.
pub fn loci_from_bed<P: AsRef<Path>>(path: P) -> Result<Vec<LocusGroup>> {
    Ok(intervals_from_bed(path)?
        .into_iter()
        .map(LocusGroup::single)
        .collect())
}

/// Extract the `exon` features of a GTF file (plain or gzipped).
///
/// GTF coordinates are 1-based and inclusive; the returned intervals are 0-based and
/// half-open, so `start - 1 .. end`.
pub fn exon_intervals_from_gtf<P: AsRef<Path>>(path: P) -> Result<Vec<GenomicInterval>> {
    let path = path.as_ref();
    let reader = open_text(path)?;
    let exons = parse_gtf_exons(reader)?;
    info!("Read {} exons from {}", exons.len(), path.display());
    Ok(exons)
}

fn parse_gtf_exons<R: BufRead>(reader: R) -> Result<Vec<GenomicInterval>> {
    let mut exons = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 8 {
            return Err(SnpclustError::Annotation(format!(
                "GTF line {} has {} columns, expected at least 8",
                i + 1,
                fields.len()
            )));
        }
        if fields[2] != "exon" {
            continue;
        }

        let coordinate = |field: &str| {
            field.parse::<u64>().map_err(|e| {
                SnpclustError::Annotation(format!(
                    "GTF line {}: unable to parse coordinate '{}': {}",
                    i + 1,
                    field,
                    e
                ))
            })
        };
        let start = coordinate(fields[3])?;
        let end = coordinate(fields[4])?;
        if start == 0 {
            return Err(SnpclustError::Annotation(format!(
                "GTF line {}: start must be >= 1",
                i + 1
            )));
        }
        exons.push(GenomicInterval::with_strand(
            fields[0],
            start - 1,
            end,
            Strand::from_symbol(fields[6]),
        )?);
    }
    Ok(exons)
}
