//! External tools (samtools, GATK) used to prepare references and call variants.

use log::{debug, info};
use std::ffi::OsStr;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::core::error::{Result, SnpclustError};
use crate::engine::partition::LocusGroup;

/// Minimum mapping quality passed to the variant caller.
pub const CALLER_MIN_MAPQ: u8 = 30;

/// Minimum base quality passed to the variant caller.
pub const CALLER_MIN_BASE_QUALITY: u8 = 20;

/// File name of the per-locus region list inside a calling workdir.
pub const REGION_BED: &str = "region.bed";

/// Operations delegated to third-party binaries.
pub trait ExternalToolchain {
    /// Write `<fasta>.fai`.
    fn faidx(&self, fasta: &Path) -> Result<()>;

    /// Write a sequence dictionary for `fasta` to `dict`.
    fn sequence_dictionary(&self, fasta: &Path, dict: &Path) -> Result<()>;

    /// Split reads at `N` CIGAR operations and reassign STAR's unique-mapping quality.
    fn split_n_cigar(&self, bam: &Path, fasta: &Path, out_bam: &Path) -> Result<()>;

    /// Call variants from `bam` restricted to the regions in `regions_bed`.
    fn call_variants(&self, bam: &Path, fasta: &Path, regions_bed: &Path, out_vcf: &Path)
        -> Result<()>;
}

/// [`ExternalToolchain`] that spawns `samtools` and `gatk` processes.
#[derive(Debug, Clone)]
pub struct CommandToolchain {
    samtools: PathBuf,
    gatk: PathBuf,
}

impl Default for CommandToolchain {
    fn default() -> Self {
        Self::new("samtools", "gatk")
    }
}

impl CommandToolchain {
    pub fn new<S: Into<PathBuf>, G: Into<PathBuf>>(samtools: S, gatk: G) -> Self {
        Self {
            samtools: samtools.into(),
            gatk: gatk.into(),
        }
    }

    fn run<I, A>(&self, program: &Path, args: I, stdout: Option<File>) -> Result<()>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<OsStr>,
    {
        let mut command = Command::new(program);
        command.args(args);
        if let Some(out) = stdout {
            command.stdout(Stdio::from(out));
        }
        debug!("Running {:?}", command);

        let tool = program.display().to_string();
        let status = command
            .status()
            .map_err(|source| SnpclustError::ToolNotFound {
                tool: tool.clone(),
                source,
            })?;
        if !status.success() {
            return Err(SnpclustError::ToolFailure {
                tool,
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

impl ExternalToolchain for CommandToolchain {
    fn faidx(&self, fasta: &Path) -> Result<()> {
        self.run(&self.samtools, [OsStr::new("faidx"), fasta.as_os_str()], None)
    }

    fn sequence_dictionary(&self, fasta: &Path, dict: &Path) -> Result<()> {
        let out = File::create(dict)?;
        self.run(&self.samtools, [OsStr::new("dict"), fasta.as_os_str()], Some(out))
    }

    fn split_n_cigar(&self, bam: &Path, fasta: &Path, out_bam: &Path) -> Result<()> {
        self.run(
            &self.gatk,
            [
                OsStr::new("SplitNCigarReads"),
                OsStr::new("-I"),
                bam.as_os_str(),
                OsStr::new("-O"),
                out_bam.as_os_str(),
                OsStr::new("-R"),
                fasta.as_os_str(),
                OsStr::new("--skip-mapping-quality-transform"),
                OsStr::new("false"),
                OsStr::new("--create-output-bam-index"),
                OsStr::new("true"),
            ],
            None,
        )
    }

    fn call_variants(
        &self,
        bam: &Path,
        fasta: &Path,
        regions_bed: &Path,
        out_vcf: &Path,
    ) -> Result<()> {
        let min_mapq = CALLER_MIN_MAPQ.to_string();
        let min_base_quality = CALLER_MIN_BASE_QUALITY.to_string();
        self.run(
            &self.gatk,
            [
                OsStr::new("HaplotypeCaller"),
                OsStr::new("-R"),
                fasta.as_os_str(),
                OsStr::new("-I"),
                bam.as_os_str(),
                OsStr::new("-O"),
                out_vcf.as_os_str(),
                OsStr::new("-L"),
                regions_bed.as_os_str(),
                OsStr::new("--minimum-mapping-quality"),
                OsStr::new(&min_mapq),
                OsStr::new("--min-base-quality-score"),
                OsStr::new(&min_base_quality),
                OsStr::new("--dont-use-soft-clipped-bases"),
                OsStr::new("true"),
                OsStr::new("--add-output-vcf-command-line"),
                OsStr::new("false"),
            ],
            None,
        )
    }
}

/// Link (or copy) `fasta` into `workdir` as `genome.fa` and build its `.fai` and `.dict`.
///
/// Returns the path of the prepared FASTA.
pub fn prepare_reference<T: ExternalToolchain + ?Sized>(
    toolchain: &T,
    fasta: &Path,
    workdir: &Path,
) -> Result<PathBuf> {
    std::fs::create_dir_all(workdir)?;
    let local = workdir.join("genome.fa");
    if local.exists() {
        std::fs::remove_file(&local)?;
    }
    let source = std::fs::canonicalize(fasta)?;
    if link(&source, &local).is_err() {
        std::fs::copy(&source, &local)?;
    }

    toolchain.faidx(&local)?;
    toolchain.sequence_dictionary(&local, &local.with_extension("dict"))?;
    info!("Prepared reference {}", local.display());
    Ok(local)
}

#[cfg(unix)]
fn link(source: &Path, dest: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(source, dest)
}

#[cfg(not(unix))]
fn link(source: &Path, dest: &Path) -> std::io::Result<()> {
    std::fs::hard_link(source, dest)
}

/// Call variants for one locus inside `workdir`.
///
/// Writes the locus intervals to `region.bed`, splits spliced reads into `split.bam` and
/// calls into `output.vcf`, whose path is returned.
pub fn call_locus_variants<T: ExternalToolchain + ?Sized>(
    toolchain: &T,
    bam: &Path,
    fasta: &Path,
    locus: &LocusGroup,
    workdir: &Path,
) -> Result<PathBuf> {
    std::fs::create_dir_all(workdir)?;
    let bed = workdir.join(REGION_BED);
    std::fs::write(&bed, locus.to_descriptor() + "\n")?;

    let split = workdir.join("split.bam");
    toolchain.split_n_cigar(bam, fasta, &split)?;

    let vcf = workdir.join("output.vcf");
    toolchain.call_variants(&split, fasta, &bed, &vcf)?;
    Ok(vcf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::partition::GenomicInterval;
    use parking_lot::Mutex;
    use tempfile::tempdir;

    /// Records every invocation instead of running anything.
    #[derive(Default)]
    struct RecordingToolchain {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingToolchain {
        fn log(&self, call: String) -> Result<()> {
            self.calls.lock().push(call);
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    fn name(path: &Path) -> String {
        path.file_name().unwrap().to_string_lossy().into_owned()
    }

    impl ExternalToolchain for RecordingToolchain {
        fn faidx(&self, fasta: &Path) -> Result<()> {
            self.log(format!("faidx {}", name(fasta)))
        }

        fn sequence_dictionary(&self, fasta: &Path, dict: &Path) -> Result<()> {
            self.log(format!("dict {} {}", name(fasta), name(dict)))
        }

        fn split_n_cigar(&self, bam: &Path, _fasta: &Path, out_bam: &Path) -> Result<()> {
            self.log(format!("split {} {}", name(bam), name(out_bam)))
        }

        fn call_variants(
            &self,
            bam: &Path,
            _fasta: &Path,
            regions_bed: &Path,
            out_vcf: &Path,
        ) -> Result<()> {
            self.log(format!(
                "call {} {} {}",
                name(bam),
                name(regions_bed),
                name(out_vcf)
            ))
        }
    }

    #[test]
    fn prepares_reference_in_workdir() {
        let dir = tempdir().unwrap();
        let fasta = dir.path().join("ref.fasta");
        std::fs::write(&fasta, ">chr1\nACGT\n").unwrap();

        let toolchain = RecordingToolchain::default();
        let work = dir.path().join("work");
        let local = prepare_reference(&toolchain, &fasta, &work).unwrap();

        assert_eq!(local, work.join("genome.fa"));
        assert_eq!(std::fs::read_to_string(&local).unwrap(), ">chr1\nACGT\n");
        assert_eq!(
            toolchain.calls(),
            vec!["faidx genome.fa", "dict genome.fa genome.dict"]
        );

        // preparing twice replaces the previous link
        prepare_reference(&toolchain, &fasta, &work).unwrap();
    }

    #[test]
    fn locus_calling_writes_region_bed() {
        let dir = tempdir().unwrap();
        let mut locus = LocusGroup::single(GenomicInterval::new("chr1", 10, 20).unwrap());
        locus.push(GenomicInterval::new("chr1", 40, 90).unwrap());

        let toolchain = RecordingToolchain::default();
        let vcf = call_locus_variants(
            &toolchain,
            Path::new("locus_0.bam"),
            Path::new("genome.fa"),
            &locus,
            dir.path(),
        )
        .unwrap();

        assert_eq!(vcf, dir.path().join("output.vcf"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("region.bed")).unwrap(),
            "chr1\t10\t20\nchr1\t40\t90\n"
        );
        assert_eq!(
            toolchain.calls(),
            vec![
                "split locus_0.bam split.bam",
                "call split.bam region.bed output.vcf"
            ]
        );
    }

    #[test]
    fn missing_binary_is_reported() {
        let toolchain = CommandToolchain::new("/nonexistent/samtools", "/nonexistent/gatk");
        let err = toolchain.faidx(Path::new("genome.fa")).unwrap_err();
        assert!(matches!(err, SnpclustError::ToolNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_a_failure() {
        let toolchain = CommandToolchain::new("false", "false");
        let err = toolchain.faidx(Path::new("genome.fa")).unwrap_err();
        assert!(matches!(err, SnpclustError::ToolFailure { .. }));
    }
}
