use std::path::PathBuf;
use structopt::StructOpt;

use crate::commands::common::{LociArgs, LociConfig, ManifestArgs};

/// CLI arguments for the `partition` subcommand.
#[derive(Debug, Clone, StructOpt)]
#[structopt(author, name = "partition")]
pub struct PartitionArgs {
    #[structopt(flatten)]
    pub loci: LociArgs,

    /// Directory receiving one `locus_<index>.bed` per locus and the manifest.
    #[structopt(long, short = "o")]
    pub output_dir: PathBuf,

    #[structopt(flatten)]
    pub manifest: ManifestArgs,
}

/// Normalised configuration derived from [`PartitionArgs`].
#[derive(Debug, Clone)]
pub struct PartitionConfig {
    pub loci: LociConfig,
    pub output_dir: PathBuf,
    pub manifest: PathBuf,
}

impl TryFrom<PartitionArgs> for PartitionConfig {
    type Error = anyhow::Error;

    fn try_from(args: PartitionArgs) -> anyhow::Result<PartitionConfig> {
        Ok(PartitionConfig {
            loci: args.loci.try_into()?,
            manifest: args.manifest.resolve(&args.output_dir),
            output_dir: args.output_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snpclust_lib::pipeline::annotation::AnnotationSource;

    #[test]
    fn parses_bed_partition() {
        let args = PartitionArgs::from_iter_safe(&[
            "partition",
            "--bed",
            "regions.bed",
            "--output-dir",
            "loci",
            "--chunk-size",
            "1000",
        ])
        .unwrap();
        let config = PartitionConfig::try_from(args).unwrap();

        assert_eq!(config.output_dir, PathBuf::from("loci"));
        assert_eq!(config.loci.source, AnnotationSource::Bed(PathBuf::from("regions.bed")));
        assert_eq!(config.loci.chunk_size, 1000);
    }
}
