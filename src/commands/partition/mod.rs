//! `partition`: write the locus groups of an annotation as BED files.

mod args;

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use snpclust_lib::engine::partition::LocusGroup;
use std::path::{Path, PathBuf};

use crate::commands::common;

pub use args::{PartitionArgs, PartitionConfig};

/// Manifest row describing one written locus.
#[derive(Debug, Serialize)]
struct PartitionRow {
    index: usize,
    path: PathBuf,
    bases: u64,
    intervals: usize,
}

/// Execute the `partition` command end-to-end.
pub fn run_partition(args: PartitionArgs) -> Result<()> {
    let config = PartitionConfig::try_from(args)?;
    info!("Partitioning {:?}", config.loci.source);

    let loci = config.loci.load()?;
    common::ensure_output_dir(&config.output_dir)?;
    let rows = write_locus_beds(&config.output_dir, &loci)?;
    common::write_manifest(&config.manifest, rows)?;

    info!("Partition complete -> {}", config.output_dir.display());
    Ok(())
}

fn write_locus_beds(out_dir: &Path, loci: &[LocusGroup]) -> Result<Vec<PartitionRow>> {
    loci.iter()
        .enumerate()
        .map(|(index, locus)| {
            let path = out_dir.join(format!("locus_{}.bed", index));
            std::fs::write(&path, locus.to_descriptor() + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(PartitionRow {
                index,
                path,
                bases: locus.bases(),
                intervals: locus.len(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use structopt::StructOpt;
    use tempfile::tempdir;

    #[test]
    fn writes_beds_and_manifest() {
        let dir = tempdir().unwrap();
        let gtf = dir.path().join("in.gtf");
        std::fs::write(
            &gtf,
            "chr1\ts\texon\t1\t30\t.\t+\t.\tx\nchr1\ts\texon\t26\t60\t.\t+\t.\tx\nchr2\ts\texon\t1\t10\t.\t-\t.\tx\n",
        )
        .unwrap();
        let out = dir.path().join("loci");

        let args = PartitionArgs::from_iter_safe(&[
            "partition",
            "--gtf",
            gtf.to_str().unwrap(),
            "--chunk-size",
            "50",
            "-o",
            out.to_str().unwrap(),
        ])
        .unwrap();
        run_partition(args).unwrap();

        assert_eq!(
            std::fs::read_to_string(out.join("locus_0.bed")).unwrap(),
            "chr1\t0\t60\n"
        );
        assert_eq!(
            std::fs::read_to_string(out.join("locus_1.bed")).unwrap(),
            "chr2\t0\t10\n"
        );
        let manifest = std::fs::read_to_string(out.join(common::MANIFEST_NAME)).unwrap();
        let lines: Vec<&str> = manifest.lines().collect();
        assert_eq!(lines[0], "index\tpath\tbases\tintervals");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].ends_with("\t60\t1"));
    }
}
