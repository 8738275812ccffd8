//! [`ReadSource`] backed by an indexed BAM file

use log::warn;
use rust_htslib::bam::{self, record::Aux, Read};
use smartstring::alias::String as CompactString;
use std::path::Path;

use crate::core::error::Result;
use crate::engine::dedup::{OrientationSignature, ReadIter, ReadRecord, ReadSource};
use crate::engine::partition::GenomicInterval;

/// BAM aux tags holding the cell barcode and the UMI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagConfig {
    pub cell_barcode_tag: String,
    pub umi_tag: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            cell_barcode_tag: crate::engine::dedup::CELL_BARCODE_TAG.to_string(),
            umi_tag: crate::engine::dedup::UMI_TAG.to_string(),
        }
    }
}

/// Coordinate-sorted, indexed BAM exposed as a stream of [`ReadRecord`]s carrying the
/// original [`bam::Record`].
pub struct BamReadSource {
    reader: bam::IndexedReader,
    tags: TagConfig,
}

impl BamReadSource {
    pub fn from_path<P: AsRef<Path>>(path: P, tags: TagConfig) -> Result<Self> {
        let reader = bam::IndexedReader::from_path(path.as_ref())?;
        Ok(Self { reader, tags })
    }

    pub fn header(&self) -> &bam::HeaderView {
        self.reader.header()
    }
}

impl ReadSource for BamReadSource {
    type Payload = bam::Record;

    fn fetch(&mut self, interval: &GenomicInterval) -> Result<ReadIter<'_, bam::Record>> {
        let Some(tid) = self.reader.header().tid(interval.chrom.as_bytes()) else {
            warn!("Contig {} is not in the BAM header; skipping", interval.chrom);
            return Ok(Box::new(std::iter::empty()));
        };
        self.reader
            .fetch((tid as i32, interval.start as i64, interval.stop as i64))?;

        let tags = &self.tags;
        Ok(Box::new(self.reader.records().map(
            move |record| -> Result<ReadRecord<bam::Record>> { Ok(decode_record(record?, tags)) },
        )))
    }
}

/// Lift the fields the duplicate filter looks at out of a BAM record.
pub fn decode_record(record: bam::Record, tags: &TagConfig) -> ReadRecord<bam::Record> {
    let paired = record.is_paired();
    let orientation = OrientationSignature {
        is_reverse: record.is_reverse(),
        is_first_in_template: paired && record.is_first_in_template(),
        mate_tid: if paired { record.mtid() } else { -1 },
        mate_pos: if paired { record.mpos() } else { -1 },
        mate_is_reverse: paired && record.is_mate_reverse(),
    };

    ReadRecord {
        tid: record.tid(),
        pos: record.pos(),
        barcode: string_tag(&record, tags.cell_barcode_tag.as_bytes()),
        umi: string_tag(&record, tags.umi_tag.as_bytes()),
        orientation,
        mapq: record.mapq(),
        is_unmapped: record.is_unmapped(),
        is_secondary: record.is_secondary(),
        is_duplicate: record.is_duplicate(),
        payload: record,
    }
}

/// Read a string-valued aux tag; missing, empty, `-` and non-UTF-8 values are `None`.
fn string_tag(record: &bam::Record, tag: &[u8]) -> Option<CompactString> {
    let value = match record.aux(tag) {
        Ok(Aux::String(s)) => CompactString::from(s),
        Ok(Aux::ArrayU8(arr)) => {
            let bytes: Vec<u8> = arr.iter().collect();
            CompactString::from(std::str::from_utf8(&bytes).ok()?)
        }
        _ => return None,
    };
    if value.is_empty() || value == "-" {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_htslib::bam::header::HeaderRecord;

    fn header_view() -> bam::HeaderView {
        let mut header = bam::Header::new();
        let mut sq = HeaderRecord::new(b"SQ");
        sq.push_tag(b"SN", &"chr1");
        sq.push_tag(b"LN", &1000);
        header.push_record(&sq);
        bam::HeaderView::from_header(&header)
    }

    fn decode(sam: &str) -> ReadRecord<bam::Record> {
        let record = bam::Record::from_sam(&header_view(), sam.as_bytes()).unwrap();
        decode_record(record, &TagConfig::default())
    }

    #[test]
    fn decodes_tags_and_flags() {
        let read = decode(
            "r1\t1040\tchr1\t101\t255\t4M\t*\t0\t0\tACGT\tIIII\tCB:Z:AAAC-1\tUB:Z:TTTT",
        );
        assert_eq!(read.position_key(), (0, 100));
        assert_eq!(read.barcode.as_deref(), Some("AAAC-1"));
        assert_eq!(read.umi.as_deref(), Some("TTTT"));
        assert!(read.is_duplicate);
        assert!(read.orientation.is_reverse);
        assert!(!read.is_unmapped);
        assert_eq!(read.orientation.mate_tid, -1);
    }

    #[test]
    fn unmapped_reads_are_flagged() {
        let read = decode("r2\t4\tchr1\t101\t0\t*\t*\t0\t0\tACGT\tIIII\tUB:Z:-");
        assert!(read.is_unmapped);
        assert_eq!(read.barcode, None);
        assert_eq!(read.umi, None);
    }
}
