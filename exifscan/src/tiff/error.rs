use crate::{cursor::BoundsError, source::SourceError};

/// Result of decoding part of a TIFF body.
pub type TiffResult<T> = Result<T, TiffError>;

/// Something went wrong while decoding a TIFF header or one of its IFDs.
///
/// Header errors are fatal for the whole TIFF segment. Any other error only
/// affects the IFD being decoded when it happened.
#[derive(Clone, Debug)]
pub enum TiffError {
    /// The byte order marker was weird - it's not one of the two expected
    /// values (in ASCII, should be either `II` or `MM`).
    WeirdByteOrderMarker { found: [u8; 2] },

    /// The magic number after the byte order marker wasn't `42`.
    MagicNumberWasntTiff { found: u16 },

    /// IFD 0 would start inside the 8-byte header.
    Ifd0OffsetInsideHeader { offset: u32 },

    /// The header itself ran past the held bytes.
    HeaderTruncated(BoundsError),

    /// An IFD's entry table ran past the held bytes.
    IfdTruncated(BoundsError),

    /// An entry used a type code we don't know, so its size (and everything
    /// after it) can't be trusted.
    UnknownType { tag: u16, ty: u16 },

    /// An entry's value lives outside the held bytes.
    ValueOutOfBounds { tag: u16, err: BoundsError },

    /// The IFD starts outside the held bytes, and a fresh read didn't help.
    SegmentOffsetOutOfBounds { offset: usize, held_end: usize },

    /// Fetching more bytes for an IFD failed.
    Fetch(SourceError),
}

impl core::fmt::Display for TiffError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TiffError::WeirdByteOrderMarker { found } => match core::str::from_utf8(found) {
                Ok(ascii) => write!(f, "Expected byte order marker `II` or `MM`, but got `{ascii}`."),
                Err(_) => write!(
                    f,
                    "Expected byte order marker `II` or `MM`, but got non-ASCII bytes: {found:?}"
                ),
            },
            TiffError::MagicNumberWasntTiff { found } => {
                write!(f, "Expected TIFF magic number `0x002A`, but got `{found:#06x}`.")
            }
            TiffError::Ifd0OffsetInsideHeader { offset } => write!(
                f,
                "IFD 0 offset must be at least 8 to clear the header, but was `{offset}`."
            ),
            TiffError::HeaderTruncated(e) => write!(f, "TIFF header was cut short. {e}"),
            TiffError::IfdTruncated(e) => write!(f, "IFD entry table was cut short. {e}"),
            TiffError::UnknownType { tag, ty } => {
                write!(f, "Entry for tag `{tag:#06x}` has unknown type code `{ty}`.")
            }
            TiffError::ValueOutOfBounds { tag, err } => {
                write!(f, "Value of tag `{tag:#06x}` is out of bounds. {err}")
            }
            TiffError::SegmentOffsetOutOfBounds { offset, held_end } => write!(
                f,
                "Segment offset `{offset}` is out of bounds of the held bytes (`{held_end}`)."
            ),
            TiffError::Fetch(e) => write!(f, "Couldn't fetch bytes for an IFD. err: {e}"),
        }
    }
}

impl core::error::Error for TiffError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            TiffError::HeaderTruncated(e)
            | TiffError::IfdTruncated(e)
            | TiffError::ValueOutOfBounds { err: e, .. } => Some(e),
            TiffError::Fetch(e) => Some(e),
            TiffError::WeirdByteOrderMarker { .. }
            | TiffError::MagicNumberWasntTiff { .. }
            | TiffError::Ifd0OffsetInsideHeader { .. }
            | TiffError::UnknownType { .. }
            | TiffError::SegmentOffsetOutOfBounds { .. } => None,
        }
    }
}

impl From<SourceError> for TiffError {
    fn from(value: SourceError) -> Self {
        TiffError::Fetch(value)
    }
}
