//! snpclust: exon-locus partitioning and barcode-aware BAM deduplication
//!
//! snpclust prepares single-cell RNA-seq alignments for per-locus SNP calling. The
//! library provides:
//! 1. Merging annotated regions and packing them into balanced locus groups
//! 2. Streaming removal of reads from unknown cells and of PCR duplicates
//! 3. Parallel processing of locus groups
//! 4. Adapters for BAM files, BED/GTF annotations and the external calling toolchain
//!
//! # Modules
//!
//! - [`core`]: errors, file helpers, writers and CPU accounting shared by everything else
//! - [`engine`]: interval partitioning, duplicate filtering and the locus runner
//! - [`pipeline`]: BAM, annotation and toolchain adapters built on the engine

pub mod core;
pub mod engine;
pub mod pipeline;
