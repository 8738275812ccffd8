//! Accepted cell barcodes

use rustc_hash::FxHashSet;
use std::io::BufRead;
use std::path::Path;

use crate::core::error::{Result, SnpclustError};
use crate::core::io::open_text;

/// Immutable set of barcodes a read must carry to be kept.
///
/// Built once per run and shared read-only (behind an `Arc`) by every locus worker.
#[derive(Debug, Clone, Default)]
pub struct AcceptedBarcodes {
    barcodes: FxHashSet<String>,
}

impl AcceptedBarcodes {
    /// Load barcodes from a plain or gzip-compressed file, one per line.
    ///
    /// Only the first tab-separated column is used and blank lines are ignored. An empty
    /// file is valid and yields a set that rejects every read.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let load_failure = |source| SnpclustError::IdentityLoadFailure {
            path: path.to_path_buf(),
            source,
        };
        let reader = open_text(path).map_err(load_failure)?;
        Self::from_reader(reader).map_err(load_failure)
    }

    fn from_reader<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let mut barcodes = FxHashSet::default();
        for line in reader.lines() {
            let line = line?;
            let barcode = line.split('\t').next().unwrap_or("").trim();
            if !barcode.is_empty() {
                barcodes.insert(barcode.to_string());
            }
        }
        barcodes.shrink_to_fit();
        Ok(Self { barcodes })
    }

    #[inline]
    pub fn contains(&self, barcode: &str) -> bool {
        self.barcodes.contains(barcode)
    }

    pub fn len(&self) -> usize {
        self.barcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.barcodes.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AcceptedBarcodes {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            barcodes: iter.into_iter().map(Into::into).collect(),
        }
    }
}
