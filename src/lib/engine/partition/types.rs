use lazy_static::lazy_static;

/// Target number of bases packed into one locus group (50 Mb).
pub const REGION_SPLIT_SIZE: u64 = 50_000_000;

/// Default maximum gap, in bases, that still merges two neighbouring intervals.
pub const DEFAULT_MERGE_THRESHOLD: u64 = 0;

lazy_static! {
    /// [`REGION_SPLIT_SIZE`] as a string.
    pub static ref REGION_SPLIT_SIZE_STR: String = REGION_SPLIT_SIZE.to_string();
    /// [`DEFAULT_MERGE_THRESHOLD`] as a string.
    pub static ref DEFAULT_MERGE_THRESHOLD_STR: String = DEFAULT_MERGE_THRESHOLD.to_string();
}
