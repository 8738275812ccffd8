use std::path::PathBuf;
use structopt::StructOpt;

use crate::commands::common::{LociArgs, LociConfig, ManifestArgs};

/// CLI arguments for the `call-snps` subcommand.
#[derive(Debug, Clone, StructOpt)]
#[structopt(author, name = "call-snps")]
pub struct CallSnpsArgs {
    /// Indexed BAM to call from, typically a `filter-bam` output.
    #[structopt(long, short = "b")]
    pub bam: PathBuf,

    /// Reference FASTA the BAM was aligned against.
    #[structopt(long, short = "r")]
    pub reference: PathBuf,

    #[structopt(flatten)]
    pub loci: LociArgs,

    /// Directory receiving one working directory per locus and the manifest.
    #[structopt(long, short = "o")]
    pub output_dir: PathBuf,

    #[structopt(flatten)]
    pub manifest: ManifestArgs,

    /// Number of loci called concurrently.
    #[structopt(long, short = "t", default_value = "10")]
    pub threads: usize,

    /// samtools executable.
    #[structopt(long, default_value = "samtools")]
    pub samtools: PathBuf,

    /// GATK launcher executable.
    #[structopt(long, default_value = "gatk")]
    pub gatk: PathBuf,
}

/// Normalised configuration derived from [`CallSnpsArgs`].
#[derive(Debug, Clone)]
pub struct CallSnpsConfig {
    pub bam: PathBuf,
    pub reference: PathBuf,
    pub loci: LociConfig,
    pub output_dir: PathBuf,
    pub manifest: PathBuf,
    pub threads: usize,
    pub samtools: PathBuf,
    pub gatk: PathBuf,
}

impl TryFrom<CallSnpsArgs> for CallSnpsConfig {
    type Error = anyhow::Error;

    fn try_from(args: CallSnpsArgs) -> anyhow::Result<CallSnpsConfig> {
        Ok(CallSnpsConfig {
            bam: args.bam,
            reference: args.reference,
            loci: args.loci.try_into()?,
            manifest: args.manifest.resolve(&args.output_dir),
            output_dir: args.output_dir,
            threads: args.threads,
            samtools: args.samtools,
            gatk: args.gatk,
        })
    }
}
