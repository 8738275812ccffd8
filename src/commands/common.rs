use anyhow::{bail, Context, Result};
use log::{error, info};
use serde::Serialize;
use snpclust_lib::core::prelude::*;
use snpclust_lib::engine::partition::{
    LocusGroup, DEFAULT_MERGE_THRESHOLD_STR, REGION_SPLIT_SIZE_STR,
};
use snpclust_lib::engine::LocusOutcome;
use snpclust_lib::pipeline::annotation::AnnotationSource;
use std::path::{Path, PathBuf};
use structopt::StructOpt;

/// File name of the per-run manifest written into the output directory.
pub const MANIFEST_NAME: &str = "loci.tsv";

/// Where loci come from and how GTF exons are packed.
#[derive(Debug, Clone, StructOpt)]
pub struct LociArgs {
    /// BED file; every record becomes its own locus.
    #[structopt(long, required_unless = "gtf", conflicts_with = "gtf")]
    pub bed: Option<PathBuf>,

    /// GTF (plain or gzipped) whose exons are merged and packed into loci.
    #[structopt(long)]
    pub gtf: Option<PathBuf>,

    /// Largest gap, in bases, between exons that are still merged.
    #[structopt(long, default_value = DEFAULT_MERGE_THRESHOLD_STR.as_str())]
    pub merge_threshold: u64,

    /// Bases packed into one locus before a new one is started.
    #[structopt(long, short = "c", default_value = REGION_SPLIT_SIZE_STR.as_str())]
    pub chunk_size: u64,
}

/// Where the run manifest is written.
#[derive(Debug, Clone, StructOpt)]
pub struct ManifestArgs {
    /// Manifest path; `-` writes to stdout and a `.gz` suffix compresses it.
    /// Defaults to `<output-dir>/loci.tsv`.
    #[structopt(long)]
    pub manifest: Option<PathBuf>,
}

impl ManifestArgs {
    pub fn resolve(self, out_dir: &Path) -> PathBuf {
        self.manifest
            .unwrap_or_else(|| out_dir.join(MANIFEST_NAME))
    }
}

/// Normalised configuration derived from [`LociArgs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LociConfig {
    pub source: AnnotationSource,
    pub merge_threshold: u64,
    pub chunk_size: u64,
}

impl TryFrom<LociArgs> for LociConfig {
    type Error = anyhow::Error;

    fn try_from(args: LociArgs) -> Result<LociConfig> {
        let source = match (args.bed, args.gtf) {
            (Some(bed), None) => AnnotationSource::Bed(bed),
            (None, Some(gtf)) => AnnotationSource::Gtf(gtf),
            _ => bail!("exactly one of --bed or --gtf is required"),
        };
        Ok(LociConfig {
            source,
            merge_threshold: args.merge_threshold,
            chunk_size: args.chunk_size,
        })
    }
}

impl LociConfig {
    pub fn load(&self) -> Result<Vec<LocusGroup>> {
        let loci = self
            .source
            .loci(self.merge_threshold, self.chunk_size)
            .with_context(|| format!("Failed to load loci from {:?}", self.source))?;
        info!(
            "Loaded {} loci covering {} bases",
            loci.len(),
            loci.iter().map(|l| l.bases()).sum::<u64>()
        );
        Ok(loci)
    }
}

/// Create the output directory `dir`, which will hold the manifest, when missing.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    make_parent_dirs(dir.join(MANIFEST_NAME))
        .with_context(|| format!("Failed to create output directory {}", dir.display()))
}

/// Split runner outcomes into successful outputs, sorted by locus index, and failures.
pub fn collect_outcomes<O, I>(outcomes: I) -> (Vec<(usize, O)>, Vec<(usize, SnpclustError)>)
where
    I: IntoIterator<Item = LocusOutcome<O>>,
{
    let mut succeeded = Vec::new();
    let mut failed = Vec::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(output) => succeeded.push((outcome.index, output)),
            Err(err) => failed.push((outcome.index, err)),
        }
    }
    succeeded.sort_by_key(|(index, _)| *index);
    failed.sort_by_key(|(index, _)| *index);
    (succeeded, failed)
}

/// Write `rows` as a tab-separated manifest with a header row.
///
/// `-` writes to stdout; paths ending in `.gz`/`.bgzf` are gzip-compressed.
pub fn write_manifest<R: Serialize>(path: &Path, rows: impl IntoIterator<Item = R>) -> Result<()> {
    let to_stdout = path.as_os_str() == "-";
    if !to_stdout {
        make_parent_dirs(path)?;
    }
    let mut writer = get_writer(&Some(path), is_bgzipped(path), true, 1, 6)
        .with_context(|| format!("Failed to open manifest {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    if !to_stdout {
        info!("Wrote manifest {}", path.display());
    }
    Ok(())
}

/// Log every failed locus and fail when any locus failed or never reported back.
pub fn report_failures(
    failed: &[(usize, SnpclustError)],
    succeeded: usize,
    total: usize,
) -> Result<()> {
    for (index, err) in failed {
        error!("Locus {} failed: {}", index, err);
    }
    let missing = total.saturating_sub(succeeded + failed.len());
    if missing > 0 {
        bail!(
            "{} of {} loci produced no outcome ({} failed)",
            missing,
            total,
            failed.len()
        );
    }
    if !failed.is_empty() {
        bail!("{} of {} loci failed", failed.len(), total);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bed_and_gtf_are_exclusive() {
        assert!(LociArgs::from_iter_safe(&["loci", "--bed", "a.bed", "--gtf", "a.gtf"]).is_err());
        assert!(LociArgs::from_iter_safe(&["loci"]).is_err());

        let args = LociArgs::from_iter_safe(&["loci", "--gtf", "genes.gtf.gz"]).unwrap();
        let config = LociConfig::try_from(args).unwrap();
        assert_eq!(config.source, AnnotationSource::Gtf(PathBuf::from("genes.gtf.gz")));
        assert_eq!(config.merge_threshold, 0);
        assert_eq!(config.chunk_size, 50_000_000);
    }

    #[derive(Serialize)]
    struct Row {
        index: usize,
        bases: u64,
    }

    #[test]
    fn manifest_defaults_into_output_dir() {
        let args = ManifestArgs { manifest: None };
        assert_eq!(args.resolve(Path::new("out")), PathBuf::from("out/loci.tsv"));
        let args = ManifestArgs::from_iter_safe(&["manifest", "--manifest", "-"]).unwrap();
        assert_eq!(args.resolve(Path::new("out")), PathBuf::from("-"));
    }

    #[test]
    fn writes_gzipped_manifest() {
        use std::io::BufRead;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("loci.tsv.gz");
        write_manifest(&path, vec![Row { index: 0, bases: 60 }, Row { index: 1, bases: 10 }])
            .unwrap();

        let lines: Vec<String> = open_text(&path)
            .unwrap()
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines, vec!["index\tbases", "0\t60", "1\t10"]);
    }

    #[test]
    fn outcomes_are_split_and_sorted() {
        let outcomes = vec![
            LocusOutcome { index: 2, bases: 10, result: Ok("c") },
            LocusOutcome {
                index: 1,
                bases: 10,
                result: Err(SnpclustError::Annotation("bad".into())),
            },
            LocusOutcome { index: 0, bases: 10, result: Ok("a") },
        ];
        let (ok, failed) = collect_outcomes(outcomes);
        assert_eq!(ok, vec![(0, "a"), (2, "c")]);
        assert_eq!(failed.len(), 1);
        assert!(report_failures(&failed, ok.len(), 3).is_err());
        assert!(report_failures(&[], 3, 3).is_ok());
    }

    #[test]
    fn missing_outcomes_fail_the_run() {
        let outcomes = vec![
            LocusOutcome { index: 0, bases: 10, result: Ok(()) },
            LocusOutcome { index: 1, bases: 10, result: Ok(()) },
        ];
        let (ok, failed) = collect_outcomes(outcomes);
        let err = report_failures(&failed, ok.len(), 5).unwrap_err();
        assert!(err.to_string().contains("3 of 5 loci produced no outcome"));
    }
}
