use anyhow::Result;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;

/// Create parent directories for a path when missing.
pub fn make_parent_dirs<P: AsRef<Path>>(path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Detect whether a path uses a gzip/BGZF-compatible extension.
pub fn is_bgzipped<P: AsRef<Path>>(path: P) -> bool {
    matches!(
        path.as_ref().extension().unwrap_or_else(|| OsStr::new("")),
        ext if ext == "gz" || ext == "gzip" || ext == "bgzf"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn detects_compressed_extensions() {
        assert!(is_bgzipped("barcodes.tsv.gz"));
        assert!(is_bgzipped("genes.gtf.bgzf"));
        assert!(!is_bgzipped("barcodes.tsv"));
        assert!(!is_bgzipped("no_extension"));
    }

    #[test]
    fn creates_missing_parents() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("loci.tsv");
        make_parent_dirs(&nested).unwrap();
        assert!(nested.parent().unwrap().is_dir());
    }
}
