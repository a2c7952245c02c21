//! Tag dictionaries for the directories in a TIFF body.
//!
//! # `tags`
//!
//! IFD 0, Exif, Interop and IFD 1 all share one dictionary, [`ExifTag`]. GPS
//! reuses small tag IDs for different meanings, so it gets its own:
//! [`GpsTag`].
//!
//! A tag that isn't listed here still decodes fine. It's just keyed by its
//! numeric ID instead of a name.
//!
//! ## For contributors
//!
//! To add a tag, add a line to the matching `make_tag_list!` call:
//!
//! ```no_compile
//! make_tag_list!(enum ExifTag,
//!     // ...snip!
//!     YourNewKey = 0x1234 => "YourNewKey",
//! );
//! ```
//!
//! The name is what shows up as the key in decoded output, and it's also the
//! key the value translation table looks up.

/// Creates a tag dictionary.
///
/// These may include duplicate tag IDs from other dictionaries.
macro_rules! make_tag_list {
    (enum $enum_name:ident,
        $( $key_ident:ident = $key_tag:expr => $tag_name:expr, )+
    ) => {
        #[doc = "A list of all known tags in this dictionary."]
        #[repr(u16)]
        #[non_exhaustive]
        #[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
        pub enum $enum_name {
            $(
              $key_ident = $key_tag,
            )+
        }

        impl $enum_name {
            /// Returns this key's tag ID.
            pub const fn tag_id(&self) -> u16 {
                *self as u16
            }

            /// Grabs the key's humanized name.
            pub const fn tag_name(&self) -> &'static str {
                match self {
                    $( Self::$key_ident => $tag_name, )+
                }
            }
        }

        impl core::convert::TryFrom<u16> for $enum_name {
            type Error = ();

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $key_tag => Ok($enum_name::$key_ident), )+
                    _ => Err(()),
                }
            }
        }
    }
}

make_tag_list!(enum ExifTag,
    InteropIndex = 0x0001 => "InteropIndex",
    InteropVersion = 0x0002 => "InteropVersion",
    ProcessingSoftware = 0x000B => "ProcessingSoftware",
    SubfileType = 0x00FE => "SubfileType",
    OldSubfileType = 0x00FF => "OldSubfileType",
    ImageWidth = 0x0100 => "ImageWidth",
    ImageHeight = 0x0101 => "ImageHeight",
    BitsPerSample = 0x0102 => "BitsPerSample",
    Compression = 0x0103 => "Compression",
    PhotometricInterpretation = 0x0106 => "PhotometricInterpretation",
    Thresholding = 0x0107 => "Thresholding",
    CellWidth = 0x0108 => "CellWidth",
    CellLength = 0x0109 => "CellLength",
    FillOrder = 0x010A => "FillOrder",
    DocumentName = 0x010D => "DocumentName",
    ImageDescription = 0x010E => "ImageDescription",
    Make = 0x010F => "Make",
    Model = 0x0110 => "Model",
    StripOffsets = 0x0111 => "StripOffsets",
    Orientation = 0x0112 => "Orientation",
    SamplesPerPixel = 0x0115 => "SamplesPerPixel",
    RowsPerStrip = 0x0116 => "RowsPerStrip",
    StripByteCounts = 0x0117 => "StripByteCounts",
    MinSampleValue = 0x0118 => "MinSampleValue",
    MaxSampleValue = 0x0119 => "MaxSampleValue",
    XResolution = 0x011A => "XResolution",
    YResolution = 0x011B => "YResolution",
    PlanarConfiguration = 0x011C => "PlanarConfiguration",
    PageName = 0x011D => "PageName",
    XPosition = 0x011E => "XPosition",
    YPosition = 0x011F => "YPosition",
    GrayResponseUnit = 0x0122 => "GrayResponseUnit",
    GrayResponseCurve = 0x0123 => "GrayResponseCurve",
    T4Options = 0x0124 => "T4Options",
    T6Options = 0x0125 => "T6Options",
    ResolutionUnit = 0x0128 => "ResolutionUnit",
    PageNumber = 0x0129 => "PageNumber",
    TransferFunction = 0x012D => "TransferFunction",
    Software = 0x0131 => "Software",
    ModifyDate = 0x0132 => "ModifyDate",
    Artist = 0x013B => "Artist",
    HostComputer = 0x013C => "HostComputer",
    Predictor = 0x013D => "Predictor",
    WhitePoint = 0x013E => "WhitePoint",
    PrimaryChromaticities = 0x013F => "PrimaryChromaticities",
    HalftoneHints = 0x0141 => "HalftoneHints",
    TileWidth = 0x0142 => "TileWidth",
    TileLength = 0x0143 => "TileLength",
    InkSet = 0x014C => "InkSet",
    TargetPrinter = 0x0151 => "TargetPrinter",
    ExtraSamples = 0x0152 => "ExtraSamples",
    SampleFormat = 0x0153 => "SampleFormat",
    ThumbnailOffset = 0x0201 => "ThumbnailOffset",
    ThumbnailLength = 0x0202 => "ThumbnailLength",
    YCbCrCoefficients = 0x0211 => "YCbCrCoefficients",
    YCbCrSubSampling = 0x0212 => "YCbCrSubSampling",
    YCbCrPositioning = 0x0213 => "YCbCrPositioning",
    ReferenceBlackWhite = 0x0214 => "ReferenceBlackWhite",
    ApplicationNotes = 0x02BC => "ApplicationNotes",
    RelatedImageFileFormat = 0x1000 => "RelatedImageFileFormat",
    RelatedImageWidth = 0x1001 => "RelatedImageWidth",
    RelatedImageHeight = 0x1002 => "RelatedImageHeight",
    Rating = 0x4746 => "Rating",
    RatingPercent = 0x4749 => "RatingPercent",
    Copyright = 0x8298 => "Copyright",
    ExposureTime = 0x829A => "ExposureTime",
    FNumber = 0x829D => "FNumber",
    IptcNaa = 0x83BB => "IPTC-NAA",
    ExifIfdPointer = 0x8769 => "ExifIFDPointer",
    IccProfile = 0x8773 => "ICC_Profile",
    ExposureProgram = 0x8822 => "ExposureProgram",
    SpectralSensitivity = 0x8824 => "SpectralSensitivity",
    GpsInfoIfdPointer = 0x8825 => "GPSInfoIFDPointer",
    Iso = 0x8827 => "ISO",
    Oecf = 0x8828 => "OECF",
    SensitivityType = 0x8830 => "SensitivityType",
    StandardOutputSensitivity = 0x8831 => "StandardOutputSensitivity",
    RecommendedExposureIndex = 0x8832 => "RecommendedExposureIndex",
    IsoSpeed = 0x8833 => "ISOSpeed",
    ExifVersion = 0x9000 => "ExifVersion",
    DateTimeOriginal = 0x9003 => "DateTimeOriginal",
    CreateDate = 0x9004 => "CreateDate",
    OffsetTime = 0x9010 => "OffsetTime",
    OffsetTimeOriginal = 0x9011 => "OffsetTimeOriginal",
    OffsetTimeDigitized = 0x9012 => "OffsetTimeDigitized",
    ComponentsConfiguration = 0x9101 => "ComponentsConfiguration",
    CompressedBitsPerPixel = 0x9102 => "CompressedBitsPerPixel",
    ShutterSpeedValue = 0x9201 => "ShutterSpeedValue",
    ApertureValue = 0x9202 => "ApertureValue",
    BrightnessValue = 0x9203 => "BrightnessValue",
    ExposureCompensation = 0x9204 => "ExposureCompensation",
    MaxApertureValue = 0x9205 => "MaxApertureValue",
    SubjectDistance = 0x9206 => "SubjectDistance",
    MeteringMode = 0x9207 => "MeteringMode",
    LightSource = 0x9208 => "LightSource",
    Flash = 0x9209 => "Flash",
    FocalLength = 0x920A => "FocalLength",
    SubjectArea = 0x9214 => "SubjectArea",
    MakerNote = 0x927C => "MakerNote",
    UserComment = 0x9286 => "UserComment",
    SubSecTime = 0x9290 => "SubSecTime",
    SubSecTimeOriginal = 0x9291 => "SubSecTimeOriginal",
    SubSecTimeDigitized = 0x9292 => "SubSecTimeDigitized",
    XpTitle = 0x9C9B => "XPTitle",
    XpComment = 0x9C9C => "XPComment",
    XpAuthor = 0x9C9D => "XPAuthor",
    XpKeywords = 0x9C9E => "XPKeywords",
    XpSubject = 0x9C9F => "XPSubject",
    FlashpixVersion = 0xA000 => "FlashpixVersion",
    ColorSpace = 0xA001 => "ColorSpace",
    ExifImageWidth = 0xA002 => "ExifImageWidth",
    ExifImageHeight = 0xA003 => "ExifImageHeight",
    RelatedSoundFile = 0xA004 => "RelatedSoundFile",
    InteroperabilityIfdPointer = 0xA005 => "InteroperabilityIFDPointer",
    FlashEnergy = 0xA20B => "FlashEnergy",
    FocalPlaneXResolution = 0xA20E => "FocalPlaneXResolution",
    FocalPlaneYResolution = 0xA20F => "FocalPlaneYResolution",
    FocalPlaneResolutionUnit = 0xA210 => "FocalPlaneResolutionUnit",
    SubjectLocation = 0xA214 => "SubjectLocation",
    ExposureIndex = 0xA215 => "ExposureIndex",
    SensingMethod = 0xA217 => "SensingMethod",
    FileSource = 0xA300 => "FileSource",
    SceneType = 0xA301 => "SceneType",
    CfaPattern = 0xA302 => "CFAPattern",
    CustomRendered = 0xA401 => "CustomRendered",
    ExposureMode = 0xA402 => "ExposureMode",
    WhiteBalance = 0xA403 => "WhiteBalance",
    DigitalZoomRatio = 0xA404 => "DigitalZoomRatio",
    FocalLengthIn35mmFormat = 0xA405 => "FocalLengthIn35mmFormat",
    SceneCaptureType = 0xA406 => "SceneCaptureType",
    GainControl = 0xA407 => "GainControl",
    Contrast = 0xA408 => "Contrast",
    Saturation = 0xA409 => "Saturation",
    Sharpness = 0xA40A => "Sharpness",
    DeviceSettingDescription = 0xA40B => "DeviceSettingDescription",
    SubjectDistanceRange = 0xA40C => "SubjectDistanceRange",
    ImageUniqueId = 0xA420 => "ImageUniqueID",
    OwnerName = 0xA430 => "OwnerName",
    SerialNumber = 0xA431 => "SerialNumber",
    LensInfo = 0xA432 => "LensInfo",
    LensMake = 0xA433 => "LensMake",
    LensModel = 0xA434 => "LensModel",
    LensSerialNumber = 0xA435 => "LensSerialNumber",
    Gamma = 0xA500 => "Gamma",
    PrintIm = 0xC4A5 => "PrintIM",
    DngVersion = 0xC612 => "DNGVersion",
    DngBackwardVersion = 0xC613 => "DNGBackwardVersion",
    UniqueCameraModel = 0xC614 => "UniqueCameraModel",
    Padding = 0xEA1C => "Padding",
    OffsetSchema = 0xEA1D => "OffsetSchema",
);

make_tag_list!(enum GpsTag,
    GpsVersionId = 0x00 => "GPSVersionID",
    GpsLatitudeRef = 0x01 => "GPSLatitudeRef",
    GpsLatitude = 0x02 => "GPSLatitude",
    GpsLongitudeRef = 0x03 => "GPSLongitudeRef",
    GpsLongitude = 0x04 => "GPSLongitude",
    GpsAltitudeRef = 0x05 => "GPSAltitudeRef",
    GpsAltitude = 0x06 => "GPSAltitude",
    GpsTimeStamp = 0x07 => "GPSTimeStamp",
    GpsSatellites = 0x08 => "GPSSatellites",
    GpsStatus = 0x09 => "GPSStatus",
    GpsMeasureMode = 0x0A => "GPSMeasureMode",
    GpsDop = 0x0B => "GPSDOP",
    GpsSpeedRef = 0x0C => "GPSSpeedRef",
    GpsSpeed = 0x0D => "GPSSpeed",
    GpsTrackRef = 0x0E => "GPSTrackRef",
    GpsTrack = 0x0F => "GPSTrack",
    GpsImgDirectionRef = 0x10 => "GPSImgDirectionRef",
    GpsImgDirection = 0x11 => "GPSImgDirection",
    GpsMapDatum = 0x12 => "GPSMapDatum",
    GpsDestLatitudeRef = 0x13 => "GPSDestLatitudeRef",
    GpsDestLatitude = 0x14 => "GPSDestLatitude",
    GpsDestLongitudeRef = 0x15 => "GPSDestLongitudeRef",
    GpsDestLongitude = 0x16 => "GPSDestLongitude",
    GpsDestBearingRef = 0x17 => "GPSDestBearingRef",
    GpsDestBearing = 0x18 => "GPSDestBearing",
    GpsDestDistanceRef = 0x19 => "GPSDestDistanceRef",
    GpsDestDistance = 0x1A => "GPSDestDistance",
    GpsProcessingMethod = 0x1B => "GPSProcessingMethod",
    GpsAreaInformation = 0x1C => "GPSAreaInformation",
    GpsDateStamp = 0x1D => "GPSDateStamp",
    GpsDifferential = 0x1E => "GPSDifferential",
    GpsHPositioningError = 0x1F => "GPSHPositioningError",
);

#[cfg(test)]
mod tests {
    use super::{ExifTag, GpsTag};

    #[test]
    fn pointer_tags_have_their_names() {
        assert_eq!(ExifTag::ExifIfdPointer.tag_id(), 0x8769);
        assert_eq!(
            ExifTag::try_from(0xA005).map(|t| t.tag_name()),
            Ok("InteroperabilityIFDPointer")
        );
        assert_eq!(
            ExifTag::try_from(0x8825).map(|t| t.tag_name()),
            Ok("GPSInfoIFDPointer")
        );
    }

    /// GPS reuses small IDs, so the two dictionaries can't be mixed up.
    #[test]
    fn gps_ids_overlap_interop_ids() {
        assert_eq!(GpsTag::try_from(0x01).map(|t| t.tag_name()), Ok("GPSLatitudeRef"));
        assert_eq!(ExifTag::try_from(0x01).map(|t| t.tag_name()), Ok("InteropIndex"));
        assert_eq!(GpsTag::try_from(0x20), Err(()));
    }
}
