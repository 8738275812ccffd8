//! snpclust - exon-locus partitioning and barcode-aware BAM deduplication
//!
//! snpclust prepares single-cell RNA-seq alignments for per-locus SNP calling: the
//! annotation is split into balanced loci, reads from unknown cells and PCR duplicates
//! are removed per locus, and an external caller is run on each locus.
//!
//! # Tools
//!
//! - `partition`: Merge annotated regions and write one BED per locus
//! - `filter-bam`: Write a barcode-filtered, deduplicated BAM per locus
//! - `call-snps`: Run SplitNCigarReads and HaplotypeCaller per locus
//!
//! # Usage
//!
//! ```bash
//! # Pack exons into ~50 Mb loci
//! snpclust partition --gtf genes.gtf.gz -o loci/
//!
//! # Filter and deduplicate every locus of a Cell Ranger BAM
//! snpclust filter-bam --bam possorted_genome_bam.bam --barcodes barcodes.tsv.gz --gtf genes.gtf.gz -o filtered/
//!
//! # Call variants on each BED record
//! snpclust call-snps --bam filtered.bam --reference genome.fa --bed loci.bed -o calls/
//! ```

extern crate snpclust_lib;
pub mod commands;
use anyhow::Result;
use env_logger::Env;
use log::*;
use snpclust_lib::core::prelude::is_broken_pipe;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case", author, about)]
/// Locus partitioning and barcode-aware duplicate filtering for single-cell SNP calling
struct Args {
    #[structopt(subcommand)]
    subcommand: Subcommand,
}

#[derive(StructOpt)]
enum Subcommand {
    /// Merge annotated regions and write one BED file per locus
    Partition(commands::PartitionArgs),
    /// Keep reads from accepted cells and drop duplicates, one BAM per locus
    FilterBam(commands::FilterBamArgs),
    /// Call variants per locus with an external toolchain
    CallSnps(commands::CallSnpsArgs),
}

impl Subcommand {
    fn run(self) -> Result<()> {
        match self {
            Subcommand::Partition(args) => commands::run_partition(args)?,
            Subcommand::FilterBam(args) => commands::run_filter_bam(args)?,
            Subcommand::CallSnps(args) => commands::run_call_snps(args)?,
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    if let Err(err) = Args::from_args().subcommand.run() {
        if is_broken_pipe(&err) {
            std::process::exit(0);
        }
        error!("{}", err);
        std::process::exit(1);
    }
    Ok(())
}
