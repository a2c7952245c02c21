/// An enumeration of the TIFF field types.
///
/// Used in each IFD entry to describe how its value is stored.
#[repr(u16)]
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum PrimitiveTy {
    Byte = 1,
    Ascii = 2,
    Short = 3,
    Long = 4,
    Rational = 5,
    SByte = 6,
    Undefined = 7,
    SShort = 8,
    SLong = 9,
    SRational = 10,
    Float = 11,
    Double = 12,

    /// An alias of `Long` used by some writers for sub-IFD pointers.
    Ifd = 13,
}

impl PrimitiveTy {
    /// Grabs the primitive type's size in bytes.
    ///
    /// ```
    /// use exifscan_types::tiff::primitives::PrimitiveTy;
    ///
    /// assert_eq!(PrimitiveTy::SRational.size_bytes(), 8_u8);
    /// assert_eq!(PrimitiveTy::Ifd.size_bytes(), 4_u8);
    /// ```
    pub const fn size_bytes(&self) -> u8 {
        match self {
            PrimitiveTy::Byte | PrimitiveTy::Ascii | PrimitiveTy::SByte | PrimitiveTy::Undefined => {
                1_u8
            }
            PrimitiveTy::Short | PrimitiveTy::SShort => 2_u8,
            PrimitiveTy::Long
            | PrimitiveTy::SLong
            | PrimitiveTy::Float
            | PrimitiveTy::Ifd => 4_u8,
            PrimitiveTy::Rational | PrimitiveTy::SRational | PrimitiveTy::Double => 8_u8,
        }
    }
}

impl TryFrom<u16> for PrimitiveTy {
    type Error = ();

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Byte),
            2 => Ok(Self::Ascii),
            3 => Ok(Self::Short),
            4 => Ok(Self::Long),
            5 => Ok(Self::Rational),
            6 => Ok(Self::SByte),
            7 => Ok(Self::Undefined),
            8 => Ok(Self::SShort),
            9 => Ok(Self::SLong),
            10 => Ok(Self::SRational),
            11 => Ok(Self::Float),
            12 => Ok(Self::Double),
            13 => Ok(Self::Ifd),

            _ => Err(()),
        }
    }
}
