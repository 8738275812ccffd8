use lazy_static::lazy_static;

/// Mapping quality assigned by STAR to uniquely mapped reads.
pub const HIGH_CONF_MAPQ: u8 = 255;

/// BAM tag holding the corrected cell barcode.
pub const CELL_BARCODE_TAG: &str = "CB";

/// BAM tag holding the corrected UMI.
pub const UMI_TAG: &str = "UB";

lazy_static! {
    /// [`HIGH_CONF_MAPQ`] as a string.
    pub static ref HIGH_CONF_MAPQ_STR: String = HIGH_CONF_MAPQ.to_string();
}
