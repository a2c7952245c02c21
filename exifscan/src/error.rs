use exifscan_types::tiff::IfdGroup;

use crate::{flir::error::FlirError, iptc::error::IptcError, tiff::error::TiffError};

/// An error from one part of a metadata parse.
///
/// These never stop the whole parse. Each one is attached to the container
/// (or IFD) it came from, and everything else is still decoded.
#[derive(Clone, Debug)]
pub enum MetadataError {
    /// Decoding one of the TIFF directories failed.
    Tiff { group: IfdGroup, error: TiffError },

    /// The FLIR record directory couldn't be decoded.
    Flir(FlirError),

    /// The IPTC datasets couldn't be decoded.
    Iptc(IptcError),
}

impl core::fmt::Display for MetadataError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MetadataError::Tiff { group, error } => {
                write!(f, "Failed to decode the {group} IFD. err: {error}")
            }
            MetadataError::Flir(e) => write!(f, "Failed to decode FLIR metadata. err: {e}"),
            MetadataError::Iptc(e) => write!(f, "Failed to decode IPTC metadata. err: {e}"),
        }
    }
}

impl core::error::Error for MetadataError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            MetadataError::Tiff { error, .. } => Some(error),
            MetadataError::Flir(e) => Some(e),
            MetadataError::Iptc(e) => Some(e),
        }
    }
}

impl From<FlirError> for MetadataError {
    fn from(value: FlirError) -> Self {
        MetadataError::Flir(value)
    }
}

impl From<IptcError> for MetadataError {
    fn from(value: IptcError) -> Self {
        MetadataError::Iptc(value)
    }
}
