//! Per-locus variant calling through an [`ExternalToolchain`].

use log::debug;
use serde::Serialize;
use std::path::PathBuf;

use super::toolchain::{call_locus_variants, ExternalToolchain, REGION_BED};
use crate::core::error::Result;
use crate::engine::partition::LocusGroup;
use crate::engine::LocusProcessor;

/// VCF produced for one locus.
#[derive(Debug, Clone, Serialize)]
pub struct CalledLocus {
    pub index: usize,
    pub vcf: PathBuf,
    /// BED file with the locus intervals passed to the caller.
    pub locus: PathBuf,
    pub bases: u64,
    pub intervals: usize,
}

/// Runs the toolchain on each locus inside `<out_dir>/locus_<index>/`.
pub struct LocusVariantCaller<T> {
    bam_path: PathBuf,
    fasta: PathBuf,
    out_dir: PathBuf,
    toolchain: T,
}

impl<T: ExternalToolchain> LocusVariantCaller<T> {
    /// `fasta` must already be indexed, see [`prepare_reference`](super::toolchain::prepare_reference).
    pub fn new(bam_path: PathBuf, fasta: PathBuf, out_dir: PathBuf, toolchain: T) -> Self {
        Self {
            bam_path,
            fasta,
            out_dir,
            toolchain,
        }
    }
}

impl<T: ExternalToolchain> LocusProcessor for LocusVariantCaller<T> {
    type Output = CalledLocus;

    fn process_locus(&self, index: usize, locus: &LocusGroup) -> Result<CalledLocus> {
        let workdir = self.out_dir.join(format!("locus_{}", index));
        let vcf = call_locus_variants(
            &self.toolchain,
            &self.bam_path,
            &self.fasta,
            locus,
            &workdir,
        )?;
        debug!("Locus {} called into {}", index, vcf.display());
        Ok(CalledLocus {
            index,
            vcf,
            locus: workdir.join(REGION_BED),
            bases: locus.bases(),
            intervals: locus.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SnpclustError;
    use crate::engine::partition::GenomicInterval;
    use crate::engine::LocusRunner;
    use std::path::Path;
    use tempfile::tempdir;

    /// Creates empty output files and fails on chr2.
    struct TouchToolchain;

    impl ExternalToolchain for TouchToolchain {
        fn faidx(&self, _fasta: &Path) -> Result<()> {
            Ok(())
        }

        fn sequence_dictionary(&self, _fasta: &Path, _dict: &Path) -> Result<()> {
            Ok(())
        }

        fn split_n_cigar(&self, _bam: &Path, _fasta: &Path, out_bam: &Path) -> Result<()> {
            std::fs::write(out_bam, b"")?;
            Ok(())
        }

        fn call_variants(
            &self,
            _bam: &Path,
            _fasta: &Path,
            regions_bed: &Path,
            out_vcf: &Path,
        ) -> Result<()> {
            if std::fs::read_to_string(regions_bed)?.starts_with("chr2") {
                return Err(SnpclustError::ToolFailure {
                    tool: "gatk".to_string(),
                    status: "exit status: 2".to_string(),
                });
            }
            std::fs::write(out_vcf, b"##fileformat=VCFv4.2\n")?;
            Ok(())
        }
    }

    #[test]
    fn each_locus_gets_its_own_workdir() {
        let dir = tempdir().unwrap();
        let caller = LocusVariantCaller::new(
            dir.path().join("in.bam"),
            dir.path().join("genome.fa"),
            dir.path().to_path_buf(),
            TouchToolchain,
        );
        let loci = vec![
            LocusGroup::single(GenomicInterval::new("chr1", 0, 100).unwrap()),
            LocusGroup::single(GenomicInterval::new("chr2", 0, 100).unwrap()),
            LocusGroup::single(GenomicInterval::new("chr3", 0, 50).unwrap()),
        ];

        let mut outcomes: Vec<_> = LocusRunner::new(loci, Some(2), caller)
            .unwrap()
            .process()
            .into_iter()
            .collect();
        outcomes.sort_by_key(|o| o.index);

        let first = outcomes[0].result.as_ref().unwrap();
        assert_eq!(first.vcf, dir.path().join("locus_0").join("output.vcf"));
        assert!(first.vcf.exists());
        assert_eq!(std::fs::read_to_string(&first.locus).unwrap(), "chr1\t0\t100\n");
        assert!(outcomes[1].result.is_err());
        assert_eq!(outcomes[2].result.as_ref().unwrap().bases, 50);
    }
}
