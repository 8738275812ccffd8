//! Locus processor writing one deduplicated BAM per locus.
//!
//! [`BamLocusFilter`] implements [`LocusProcessor`] so that the [`LocusRunner`] can fan
//! loci out across worker threads. Each locus is fetched interval by interval from the
//! input BAM, passed through the barcode and duplicate filter, and written to
//! `<out_dir>/locus_<index>.bam` together with a `.bai` index and a `locus_<index>.bed`
//! listing the intervals the BAM covers.
//!
//! [`LocusRunner`]: crate::engine::LocusRunner

use log::debug;
use parking_lot::Mutex;
use rust_htslib::bam;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::source::{BamReadSource, TagConfig};
use crate::core::error::Result;
use crate::engine::dedup::{
    filter_locus, AcceptedBarcodes, DefaultCandidateFilter, FilterConfig, FilterStats,
    NonCandidatePolicy, HIGH_CONF_MAPQ,
};
use crate::engine::partition::LocusGroup;
use crate::engine::LocusProcessor;

/// Options for [`BamLocusFilter`].
#[derive(Debug, Clone)]
pub struct BamFilterConfig {
    pub high_conf_mapq: u8,
    pub non_candidates: NonCandidatePolicy,
    pub check_order: bool,
    pub tags: TagConfig,
}

impl Default for BamFilterConfig {
    fn default() -> Self {
        let filter = FilterConfig::default();
        Self {
            high_conf_mapq: HIGH_CONF_MAPQ,
            non_candidates: filter.non_candidates,
            check_order: filter.check_order,
            tags: TagConfig::default(),
        }
    }
}

/// Written BAM for one locus.
#[derive(Debug, Clone, Serialize)]
pub struct LocusFilterOutput {
    pub index: usize,
    pub path: PathBuf,
    /// BED file with the locus intervals.
    pub locus: PathBuf,
    pub bases: u64,
    pub intervals: usize,
    pub stats: FilterStats,
}

pub struct BamLocusFilter {
    bam_path: PathBuf,
    out_dir: PathBuf,
    barcodes: Arc<AcceptedBarcodes>,
    candidates: DefaultCandidateFilter,
    filter_config: FilterConfig,
    tags: TagConfig,
    /// Reusable readers, so each worker opens the BAM and its index once.
    reader_pool: Mutex<Vec<BamReadSource>>,
}

impl BamLocusFilter {
    pub fn new(
        bam_path: PathBuf,
        out_dir: PathBuf,
        barcodes: Arc<AcceptedBarcodes>,
        config: BamFilterConfig,
    ) -> Self {
        Self {
            bam_path,
            out_dir,
            barcodes,
            candidates: DefaultCandidateFilter::new(config.high_conf_mapq),
            filter_config: FilterConfig {
                non_candidates: config.non_candidates,
                check_order: config.check_order,
            },
            tags: config.tags,
            reader_pool: Mutex::new(Vec::new()),
        }
    }

    /// Output path of the locus at `index`.
    pub fn locus_path(&self, index: usize) -> PathBuf {
        locus_bam_path(&self.out_dir, index)
    }

    fn checkout_reader(&self) -> Result<BamReadSource> {
        let pooled = self.reader_pool.lock().pop();
        match pooled {
            Some(source) => Ok(source),
            None => BamReadSource::from_path(&self.bam_path, self.tags.clone()),
        }
    }

    fn write_locus(
        &self,
        source: &mut BamReadSource,
        locus: &LocusGroup,
        path: &Path,
    ) -> Result<FilterStats> {
        let header = bam::Header::from_template(source.header());
        let mut writer = bam::Writer::from_path(path, &header, bam::Format::Bam)?;

        let stats = filter_locus(
            source,
            locus,
            &self.barcodes,
            &self.candidates,
            self.filter_config,
            |read| {
                let mut record = read.payload;
                if !read.is_duplicate {
                    record.unset_duplicate();
                }
                writer.write(&record)?;
                Ok(())
            },
        )?;

        // the file must be flushed and closed before it can be indexed
        drop(writer);
        bam::index::build(path, None, bam::index::Type::Bai, 1)?;
        Ok(stats)
    }
}

impl LocusProcessor for BamLocusFilter {
    type Output = LocusFilterOutput;

    fn process_locus(&self, index: usize, locus: &LocusGroup) -> Result<LocusFilterOutput> {
        let path = self.locus_path(index);
        let locus_bed = path.with_extension("bed");
        std::fs::write(&locus_bed, locus.to_descriptor() + "\n")?;

        let mut source = self.checkout_reader()?;
        let result = self.write_locus(&mut source, locus, &path);
        self.reader_pool.lock().push(source);

        let stats = result?;
        debug!(
            "Locus {} wrote {} of {} reads to {}",
            index,
            stats.emitted,
            stats.reads_seen,
            path.display()
        );
        Ok(LocusFilterOutput {
            index,
            path,
            locus: locus_bed,
            bases: locus.bases(),
            intervals: locus.len(),
            stats,
        })
    }
}

/// `<out_dir>/locus_<index>.bam`
pub fn locus_bam_path(out_dir: &Path, index: usize) -> PathBuf {
    out_dir.join(format!("locus_{}.bam", index))
}
