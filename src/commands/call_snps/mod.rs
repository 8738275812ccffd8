//! `call-snps`: run SplitNCigarReads and HaplotypeCaller once per locus.

mod args;

use anyhow::{Context, Result};
use log::info;
use snpclust_lib::core::prelude::determine_allowed_cpus;
use snpclust_lib::engine::LocusRunner;
use snpclust_lib::pipeline::prelude::{prepare_reference, CommandToolchain, LocusVariantCaller};

use crate::commands::common;

pub use args::{CallSnpsArgs, CallSnpsConfig};

/// Execute the `call-snps` command end-to-end.
pub fn run_call_snps(args: CallSnpsArgs) -> Result<()> {
    let config = CallSnpsConfig::try_from(args)?;
    info!("Running snpclust call-snps on {:?}", config.bam);
    let threads = determine_allowed_cpus(config.threads)?;

    let loci = config.loci.load()?;
    let total = loci.len();
    common::ensure_output_dir(&config.output_dir)?;

    let toolchain = CommandToolchain::new(&config.samtools, &config.gatk);
    let fasta = prepare_reference(
        &toolchain,
        &config.reference,
        &config.output_dir.join("reference"),
    )
    .with_context(|| format!("Failed to prepare reference {}", config.reference.display()))?;

    let caller = LocusVariantCaller::new(
        config.bam.clone(),
        fasta,
        config.output_dir.clone(),
        toolchain,
    );
    let runner = LocusRunner::new(loci, Some(threads), caller)
        .context("Failed to start locus workers")?;
    let (called, failed) = common::collect_outcomes(runner.process());
    let succeeded = called.len();
    info!("Called {} of {} loci", succeeded, total);

    common::write_manifest(
        &config.manifest,
        called.into_iter().map(|(_, locus)| locus),
    )?;
    common::report_failures(&failed, succeeded, total)?;

    info!("call-snps complete -> {}", config.output_dir.display());
    Ok(())
}
