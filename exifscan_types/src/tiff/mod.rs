//! Types describing a TIFF body: its byte order, its directories, and the
//! tags those directories carry.

pub mod primitives;
pub mod tags;
pub mod translate;

/// Each TIFF body starts with a byte order marker - its endianness.
///
/// It's either `II` (Intel, for little-endian) or `MM` (Motorola, for
/// big-endian).
#[repr(u8)]
#[derive(Copy, Clone, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum Endianness {
    /// `II` for Intel, little-endian.
    Little,

    /// `MM` for Motorola. Big-endian.
    Big,
}

impl Endianness {
    /// Returns the other byte order.
    pub const fn flip(self) -> Self {
        match self {
            Endianness::Little => Endianness::Big,
            Endianness::Big => Endianness::Little,
        }
    }

    /// Reads a byte order marker, if the two bytes are one.
    pub const fn from_marker(marker: [u8; 2]) -> Option<Self> {
        match marker {
            [b'I', b'I'] => Some(Endianness::Little),
            [b'M', b'M'] => Some(Endianness::Big),
            _ => None,
        }
    }
}

/// One of the five directory roles in a TIFF body.
///
/// IFD 0 carries pointer tags to the Exif, GPS and Interop directories. IFD 1
/// (the thumbnail) is instead chained from IFD 0's next-IFD pointer.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Eq, Ord, Hash)]
pub enum IfdGroup {
    /// The main image directory.
    #[doc(alias = "IFD0")]
    _0,

    /// Camera settings, like exposure info.
    #[doc(alias = "ExifIFD")]
    Exif,

    /// Location metadata.
    #[doc(alias = "GPSIFD")]
    Gps,

    /// Interoperability info.
    #[doc(alias = "InteropIFD")]
    Interop,

    /// The thumbnail directory.
    #[doc(alias = "IFD1")]
    _1,
}

impl IfdGroup {
    /// Grabs the name of this group's tag for `tag_id`, if any.
    ///
    /// GPS has its own dictionary. Every other group shares one.
    pub fn tag_name(&self, tag_id: u16) -> Option<&'static str> {
        match self {
            IfdGroup::Gps => tags::GpsTag::try_from(tag_id).ok().map(|t| t.tag_name()),
            IfdGroup::_0 | IfdGroup::Exif | IfdGroup::Interop | IfdGroup::_1 => {
                tags::ExifTag::try_from(tag_id).ok().map(|t| t.tag_name())
            }
        }
    }
}

impl core::fmt::Display for IfdGroup {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            IfdGroup::_0 => "IFD0",
            IfdGroup::Exif => "Exif",
            IfdGroup::Gps => "GPS",
            IfdGroup::Interop => "Interop",
            IfdGroup::_1 => "IFD1",
        })
    }
}
