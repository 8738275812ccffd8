use smartstring::alias::String as CompactString;

/// Strand and alignment-shape information shared by PCR copies of one molecule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrientationSignature {
    pub is_reverse: bool,
    pub is_first_in_template: bool,
    pub mate_tid: i32,
    pub mate_pos: i64,
    pub mate_is_reverse: bool,
}

impl OrientationSignature {
    /// Signature of an unpaired read on the given strand.
    pub fn single_end(is_reverse: bool) -> Self {
        Self {
            is_reverse,
            is_first_in_template: false,
            mate_tid: -1,
            mate_pos: -1,
            mate_is_reverse: false,
        }
    }
}

/// Reads sharing a position and this key are treated as PCR/optical duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DuplicateKey {
    pub orientation: OrientationSignature,
    pub umi: Option<CompactString>,
}

/// An aligned read reduced to the fields the duplicate filter looks at.
///
/// `payload` carries the decoded alignment so it can be written back out unchanged,
/// apart from the duplicate flag.
#[derive(Debug, Clone)]
pub struct ReadRecord<P = ()> {
    pub tid: i32,
    pub pos: i64,
    pub barcode: Option<CompactString>,
    pub umi: Option<CompactString>,
    pub orientation: OrientationSignature,
    pub mapq: u8,
    /// Unmapped reads may still carry a position, usually their mate's.
    pub is_unmapped: bool,
    pub is_secondary: bool,
    pub is_duplicate: bool,
    pub payload: P,
}

impl ReadRecord<()> {
    pub fn new(tid: i32, pos: i64) -> Self {
        Self::with_payload(tid, pos, ())
    }
}

impl<P> ReadRecord<P> {
    pub fn with_payload(tid: i32, pos: i64, payload: P) -> Self {
        Self {
            tid,
            pos,
            barcode: None,
            umi: None,
            orientation: OrientationSignature::default(),
            mapq: 0,
            is_unmapped: false,
            is_secondary: false,
            is_duplicate: false,
            payload,
        }
    }

    pub fn barcode(mut self, barcode: &str) -> Self {
        self.barcode = Some(CompactString::from(barcode));
        self
    }

    pub fn umi(mut self, umi: &str) -> Self {
        self.umi = Some(CompactString::from(umi));
        self
    }

    pub fn mapq(mut self, mapq: u8) -> Self {
        self.mapq = mapq;
        self
    }

    pub fn orientation(mut self, orientation: OrientationSignature) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn unmapped(mut self, is_unmapped: bool) -> Self {
        self.is_unmapped = is_unmapped;
        self
    }

    pub fn secondary(mut self, is_secondary: bool) -> Self {
        self.is_secondary = is_secondary;
        self
    }

    pub fn duplicate(mut self, is_duplicate: bool) -> Self {
        self.is_duplicate = is_duplicate;
        self
    }

    /// `(tid, pos)`; reads are grouped on this and the input must be sorted by it.
    #[inline]
    pub fn position_key(&self) -> (i32, i64) {
        (self.tid, self.pos)
    }

    #[inline]
    pub fn duplicate_key(&self) -> DuplicateKey {
        DuplicateKey {
            orientation: self.orientation,
            umi: self.umi.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_key_combines_orientation_and_umi() {
        let fwd = ReadRecord::new(0, 100).umi("ACGT");
        let rev = ReadRecord::new(0, 100)
            .umi("ACGT")
            .orientation(OrientationSignature::single_end(true));
        let other_umi = ReadRecord::new(0, 100).umi("TTTT");

        assert_eq!(fwd.duplicate_key(), fwd.clone().mapq(3).duplicate_key());
        assert_ne!(fwd.duplicate_key(), rev.duplicate_key());
        assert_ne!(fwd.duplicate_key(), other_umi.duplicate_key());
    }

    #[test]
    fn position_key_orders_by_tid_then_pos() {
        assert!(ReadRecord::new(0, 500).position_key() < ReadRecord::new(1, 0).position_key());
        assert!(ReadRecord::new(1, 10).position_key() < ReadRecord::new(1, 11).position_key());
    }
}
