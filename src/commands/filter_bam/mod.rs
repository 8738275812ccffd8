//! `filter-bam`: keep reads from accepted cells, drop duplicates, one BAM per locus.

mod args;

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use snpclust_lib::core::prelude::determine_allowed_cpus;
use snpclust_lib::engine::dedup::{AcceptedBarcodes, FilterStats};
use snpclust_lib::engine::LocusRunner;
use snpclust_lib::pipeline::filter_bam::{BamLocusFilter, LocusFilterOutput};
use std::path::PathBuf;
use std::sync::Arc;

use crate::commands::common;

pub use args::{FilterBamArgs, FilterBamConfig};

/// Manifest row for one filtered locus.
#[derive(Debug, Serialize)]
struct FilterRow {
    index: usize,
    path: PathBuf,
    locus: PathBuf,
    bases: u64,
    intervals: usize,
    reads_seen: u64,
    position_groups: u64,
    dropped_barcode: u64,
    dropped_duplicate: u64,
    dropped_non_candidate: u64,
    emitted: u64,
}

impl From<LocusFilterOutput> for FilterRow {
    fn from(output: LocusFilterOutput) -> Self {
        let stats = output.stats;
        FilterRow {
            index: output.index,
            path: output.path,
            locus: output.locus,
            bases: output.bases,
            intervals: output.intervals,
            reads_seen: stats.reads_seen,
            position_groups: stats.position_groups,
            dropped_barcode: stats.dropped_barcode,
            dropped_duplicate: stats.dropped_duplicate,
            dropped_non_candidate: stats.dropped_non_candidate,
            emitted: stats.emitted,
        }
    }
}

/// Execute the `filter-bam` command end-to-end.
pub fn run_filter_bam(args: FilterBamArgs) -> Result<()> {
    let config = FilterBamConfig::try_from(args)?;
    info!("Running snpclust filter-bam on {:?}", config.bam);
    let threads = determine_allowed_cpus(config.threads)?;

    let barcodes = AcceptedBarcodes::from_file(&config.barcodes)?;
    info!(
        "Loaded {} accepted barcodes from {}",
        barcodes.len(),
        config.barcodes.display()
    );

    let loci = config.loci.load()?;
    let total = loci.len();
    common::ensure_output_dir(&config.output_dir)?;

    let processor = BamLocusFilter::new(
        config.bam.clone(),
        config.output_dir.clone(),
        Arc::new(barcodes),
        config.filter.clone(),
    );
    let runner = LocusRunner::new(loci, Some(threads), processor)
        .context("Failed to start locus workers")?;
    let (outputs, failed) = common::collect_outcomes(runner.process());
    let succeeded = outputs.len();

    let mut totals = FilterStats::default();
    for (_, output) in &outputs {
        totals += output.stats;
    }
    info!(
        "Kept {} of {} reads ({} duplicates, {} from unaccepted barcodes, {} non-candidates)",
        totals.emitted,
        totals.reads_seen,
        totals.dropped_duplicate,
        totals.dropped_barcode,
        totals.dropped_non_candidate
    );

    common::write_manifest(
        &config.manifest,
        outputs.into_iter().map(|(_, output)| FilterRow::from(output)),
    )?;
    common::report_failures(&failed, succeeded, total)?;

    info!("filter-bam complete -> {}", config.output_dir.display());
    Ok(())
}
