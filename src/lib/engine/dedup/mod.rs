//! Barcode-aware, position-local duplicate removal.
//!
//! [`DedupFilter`] consumes a position-sorted stream of [`ReadRecord`]s and keeps, per
//! `(tid, pos)` group, the first read of every [`DuplicateKey`] whose barcode is in the
//! [`AcceptedBarcodes`] set. [`filter_locus`] drives the filter over every interval of a
//! locus using any [`ReadSource`].

mod barcodes;
mod candidate;
mod filter;
mod record;
mod source;
mod types;

pub use barcodes::AcceptedBarcodes;
pub use candidate::{CandidateFilter, DefaultCandidateFilter};
pub use filter::{DedupFilter, FilterConfig, FilterStats, NonCandidatePolicy};
pub use record::{DuplicateKey, OrientationSignature, ReadRecord};
pub use source::{filter_locus, ReadIter, ReadSource, VecReadSource};
pub use types::{CELL_BARCODE_TAG, HIGH_CONF_MAPQ, HIGH_CONF_MAPQ_STR, UMI_TAG};
