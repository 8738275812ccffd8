//! Interval partitioning.
//!
//! Annotated regions (exons, BED records) are merged per chromosome and greedily packed
//! into [`LocusGroup`]s of roughly [`REGION_SPLIT_SIZE`] bases so that downstream work can
//! be fanned out one locus per task.

mod interval;
mod locus;
mod merge;
mod types;

pub use interval::{GenomicInterval, Strand};
pub use locus::{build_loci, partition, LocusGroup};
pub use merge::merge_intervals;
pub use types::{
    DEFAULT_MERGE_THRESHOLD, DEFAULT_MERGE_THRESHOLD_STR, REGION_SPLIT_SIZE, REGION_SPLIT_SIZE_STR,
};
