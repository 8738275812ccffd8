pub mod call_snps;
pub mod common;
pub mod filter_bam;
pub mod partition;

pub use call_snps::{run_call_snps, CallSnpsArgs};
pub use filter_bam::{run_filter_bam, FilterBamArgs};
pub use partition::{run_partition, PartitionArgs};
