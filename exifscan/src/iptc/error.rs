use crate::cursor::BoundsError;

/// An error that occurred while decoding IPTC datasets.
#[derive(Clone, Debug, PartialEq)]
pub enum IptcError {
    /// The segment's range isn't within the held bytes.
    SegmentOutOfBounds(BoundsError),

    /// A dataset's value runs past the end of the segment.
    DatasetOutOfBounds {
        /// The dataset's ID.
        id: u8,

        /// The absolute offset the value would end at.
        value_end: usize,

        /// The absolute offset the segment ends at.
        segment_end: usize,
    },
}

impl core::fmt::Display for IptcError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            IptcError::SegmentOutOfBounds(e) => {
                write!(f, "IPTC segment isn't within the held bytes. {e}")
            }
            IptcError::DatasetOutOfBounds {
                id,
                value_end,
                segment_end,
            } => write!(
                f,
                "IPTC dataset `{id:#04x}` ends at `{value_end}`, past the segment end (`{segment_end}`)."
            ),
        }
    }
}

impl core::error::Error for IptcError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            IptcError::SegmentOutOfBounds(e) => Some(e),
            IptcError::DatasetOutOfBounds { .. } => None,
        }
    }
}
