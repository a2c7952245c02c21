use crate::cursor::BoundsError;

/// An error that occurred while decoding a FLIR FFF segment.
#[derive(Clone, Debug, PartialEq)]
pub enum FlirError {
    /// The header or record directory ran past the held bytes.
    HeaderTruncated(BoundsError),

    /// A field of a known record ran past the held bytes.
    FieldOutOfBounds {
        record_type: u16,
        field: &'static str,
        err: BoundsError,
    },
}

impl core::fmt::Display for FlirError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FlirError::HeaderTruncated(e) => {
                write!(f, "FLIR header or record directory was cut short. {e}")
            }
            FlirError::FieldOutOfBounds {
                record_type,
                field,
                err,
            } => write!(
                f,
                "Field `{field}` of FLIR record `{record_type:#06x}` is out of bounds. {err}"
            ),
        }
    }
}

impl core::error::Error for FlirError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            FlirError::HeaderTruncated(e) | FlirError::FieldOutOfBounds { err: e, .. } => Some(e),
        }
    }
}
