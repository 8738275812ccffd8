use snpclust_lib::engine::dedup::{
    NonCandidatePolicy, CELL_BARCODE_TAG, HIGH_CONF_MAPQ_STR, UMI_TAG,
};
use snpclust_lib::pipeline::filter_bam::{BamFilterConfig, TagConfig};
use std::path::PathBuf;
use structopt::StructOpt;

use crate::commands::common::{LociArgs, LociConfig, ManifestArgs};

/// CLI arguments for the `filter-bam` subcommand.
#[derive(Debug, Clone, StructOpt)]
#[structopt(author, name = "filter-bam")]
pub struct FilterBamArgs {
    /// Coordinate-sorted, indexed input BAM.
    #[structopt(long, short = "b")]
    pub bam: PathBuf,

    /// Accepted cell barcodes, one per line (plain or gzipped).
    #[structopt(long)]
    pub barcodes: PathBuf,

    #[structopt(flatten)]
    pub loci: LociArgs,

    /// Directory receiving `locus_<index>.bam` files and the manifest.
    #[structopt(long, short = "o")]
    pub output_dir: PathBuf,

    #[structopt(flatten)]
    pub manifest: ManifestArgs,

    /// Number of worker threads to use.
    #[structopt(long, short = "t", default_value = "10")]
    pub threads: usize,

    /// Reads below this mapping quality are not duplicate candidates.
    #[structopt(long, short = "q", default_value = HIGH_CONF_MAPQ_STR.as_str())]
    pub high_conf_mapq: u8,

    /// Write accepted-barcode reads that are not duplicate candidates instead of dropping them.
    #[structopt(long)]
    pub pass_non_candidates: bool,

    /// Fail a locus when its reads are not sorted by position.
    #[structopt(long)]
    pub check_order: bool,

    /// BAM tag holding the cell barcode.
    #[structopt(long, default_value = CELL_BARCODE_TAG)]
    pub cb_tag: String,

    /// BAM tag holding the UMI.
    #[structopt(long, default_value = UMI_TAG)]
    pub umi_tag: String,
}

/// Normalised configuration derived from [`FilterBamArgs`].
#[derive(Debug, Clone)]
pub struct FilterBamConfig {
    pub bam: PathBuf,
    pub barcodes: PathBuf,
    pub loci: LociConfig,
    pub output_dir: PathBuf,
    pub manifest: PathBuf,
    pub threads: usize,
    pub filter: BamFilterConfig,
}

impl TryFrom<FilterBamArgs> for FilterBamConfig {
    type Error = anyhow::Error;

    fn try_from(args: FilterBamArgs) -> anyhow::Result<FilterBamConfig> {
        let non_candidates = if args.pass_non_candidates {
            NonCandidatePolicy::PassThrough
        } else {
            NonCandidatePolicy::Drop
        };
        Ok(FilterBamConfig {
            bam: args.bam,
            barcodes: args.barcodes,
            loci: args.loci.try_into()?,
            manifest: args.manifest.resolve(&args.output_dir),
            output_dir: args.output_dir,
            threads: args.threads,
            filter: BamFilterConfig {
                high_conf_mapq: args.high_conf_mapq,
                non_candidates,
                check_order: args.check_order || cfg!(debug_assertions),
                tags: TagConfig {
                    cell_barcode_tag: args.cb_tag,
                    umi_tag: args.umi_tag,
                },
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_arguments() {
        let args = FilterBamArgs::from_iter_safe(&[
            "filter-bam",
            "--bam",
            "possorted.bam",
            "--barcodes",
            "barcodes.tsv.gz",
            "--gtf",
            "genes.gtf",
            "--output-dir",
            "filtered",
        ])
        .unwrap();
        let config = FilterBamConfig::try_from(args).unwrap();

        assert_eq!(config.bam, PathBuf::from("possorted.bam"));
        assert_eq!(config.manifest, PathBuf::from("filtered").join("loci.tsv"));
        assert_eq!(config.threads, 10);
        assert_eq!(config.filter.high_conf_mapq, 255);
        assert_eq!(config.filter.non_candidates, NonCandidatePolicy::Drop);
        assert_eq!(config.filter.tags, TagConfig::default());
        assert_eq!(config.loci.chunk_size, 50_000_000);
    }

    #[test]
    fn overrides_tags_and_policy() {
        let args = FilterBamArgs::from_iter_safe(&[
            "filter-bam",
            "-b",
            "in.bam",
            "--barcodes",
            "bc.txt",
            "--bed",
            "regions.bed",
            "-o",
            "out",
            "--pass-non-candidates",
            "--cb-tag",
            "CR",
            "--umi-tag",
            "UR",
            "-q",
            "60",
        ])
        .unwrap();
        let config = FilterBamConfig::try_from(args).unwrap();

        assert_eq!(config.filter.non_candidates, NonCandidatePolicy::PassThrough);
        assert_eq!(config.filter.tags.cell_barcode_tag, "CR");
        assert_eq!(config.filter.tags.umi_tag, "UR");
        assert_eq!(config.filter.high_conf_mapq, 60);
    }
}
