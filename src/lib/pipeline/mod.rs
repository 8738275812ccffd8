//! File-backed adapters around the core algorithms: annotation loading, the BAM locus
//! filter, and the external variant-calling toolchain.

pub mod annotation;
pub mod call_snps;
pub mod filter_bam;
pub mod toolchain;

pub mod prelude {
    pub use super::annotation::{
        exon_intervals_from_gtf, intervals_from_bed, loci_from_bed, AnnotationSource,
    };
    pub use super::call_snps::{CalledLocus, LocusVariantCaller};
    pub use super::filter_bam::{
        BamFilterConfig, BamLocusFilter, BamReadSource, LocusFilterOutput, TagConfig,
    };
    pub use super::toolchain::{
        call_locus_variants, prepare_reference, CommandToolchain, ExternalToolchain,
    };
}
