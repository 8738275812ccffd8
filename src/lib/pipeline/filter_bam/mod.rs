//! Barcode filtering and duplicate removal over an indexed BAM, one output BAM per locus.

mod processor;
mod source;

pub use processor::{locus_bam_path, BamFilterConfig, BamLocusFilter, LocusFilterOutput};
pub use source::{decode_record, BamReadSource, TagConfig};
