//! The table describing how decoded TIFF values get rewritten when
//! post-processing is on.
//!
//! Each entry is keyed by tag name (as found in [`super::tags`]) and says
//! which [`Translation`] applies to it. The rewriting itself lives in the
//! `exifscan` crate.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

/// A code-to-label table.
pub type LabelTable = &'static [(u32, &'static str)];

/// How one tag's value is rewritten.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Translation {
    /// `YYYY:MM:DD HH:MM:SS`-ish text, revived into ISO-8601 form.
    Date,

    /// A numeric code mapped through a label table.
    ///
    /// Unknown codes keep their numeric value.
    Enum(LabelTable),

    /// Each byte of an opaque value mapped through a label table, joined
    /// with `", "`.
    ByteLabels(LabelTable),

    /// Opaque bytes that are really ASCII digits, like `0231`.
    AsciiDigits,

    /// Components joined with `.`.
    DotJoined,

    /// Components joined with `:`.
    ColonJoined,
}

impl Translation {
    /// Finds the translation for a tag name, if it has one.
    pub fn for_tag(name: &str) -> Option<Translation> {
        TRANSLATION_TABLE.get(name).copied()
    }
}

/// Looks up a code's label in a table.
pub fn label_for(table: LabelTable, code: u32) -> Option<&'static str> {
    table.iter().find(|(c, _)| *c == code).map(|(_, label)| *label)
}

pub static TRANSLATION_TABLE: LazyLock<FxHashMap<&'static str, Translation>> =
    LazyLock::new(|| {
        use Translation as T;

        let mut m = FxHashMap::default();

        // dates
        m.insert("ModifyDate", T::Date);
        m.insert("DateTimeOriginal", T::Date);
        m.insert("CreateDate", T::Date);

        // enums
        m.insert("ExposureProgram", T::Enum(EXPOSURE_PROGRAM));
        m.insert("ExposureMode", T::Enum(EXPOSURE_MODE));
        m.insert("MeteringMode", T::Enum(METERING_MODE));
        m.insert("LightSource", T::Enum(LIGHT_SOURCE));
        m.insert("Flash", T::Enum(FLASH));
        m.insert("SensingMethod", T::Enum(SENSING_METHOD));
        m.insert("SceneCaptureType", T::Enum(SCENE_CAPTURE_TYPE));
        m.insert("CustomRendered", T::Enum(CUSTOM_RENDERED));
        m.insert("WhiteBalance", T::Enum(WHITE_BALANCE));
        m.insert("GainControl", T::Enum(GAIN_CONTROL));
        m.insert("Contrast", T::Enum(CONTRAST));
        m.insert("Saturation", T::Enum(SATURATION));
        m.insert("Sharpness", T::Enum(SHARPNESS));
        m.insert("SubjectDistanceRange", T::Enum(SUBJECT_DISTANCE_RANGE));
        m.insert("FileSource", T::Enum(FILE_SOURCE));

        // per-byte labels
        m.insert("SceneType", T::ByteLabels(SCENE_TYPE));
        m.insert("ComponentsConfiguration", T::ByteLabels(COMPONENTS));

        // byte strings
        m.insert("ExifVersion", T::AsciiDigits);
        m.insert("FlashpixVersion", T::AsciiDigits);
        m.insert("GPSVersionID", T::DotJoined);
        m.insert("GPSTimeStamp", T::ColonJoined);

        m
    });

pub const EXPOSURE_PROGRAM: LabelTable = &[
    (0, "Not defined"),
    (1, "Manual"),
    (2, "Normal program"),
    (3, "Aperture priority"),
    (4, "Shutter priority"),
    (5, "Creative program"),
    (6, "Action program"),
    (7, "Portrait mode"),
    (8, "Landscape mode"),
];

pub const EXPOSURE_MODE: LabelTable = &[
    (0, "Auto exposure"),
    (1, "Manual exposure"),
    (2, "Auto bracket"),
];

pub const METERING_MODE: LabelTable = &[
    (0, "Unknown"),
    (1, "Average"),
    (2, "CenterWeightedAverage"),
    (3, "Spot"),
    (4, "MultiSpot"),
    (5, "Pattern"),
    (6, "Partial"),
    (255, "Other"),
];

pub const LIGHT_SOURCE: LabelTable = &[
    (0, "Unknown"),
    (1, "Daylight"),
    (2, "Fluorescent"),
    (3, "Tungsten (incandescent light)"),
    (4, "Flash"),
    (9, "Fine weather"),
    (10, "Cloudy weather"),
    (11, "Shade"),
    (12, "Daylight fluorescent (D 5700 - 7100K)"),
    (13, "Day white fluorescent (N 4600 - 5400K)"),
    (14, "Cool white fluorescent (W 3900 - 4500K)"),
    (15, "White fluorescent (WW 3200 - 3700K)"),
    (17, "Standard light A"),
    (18, "Standard light B"),
    (19, "Standard light C"),
    (20, "D55"),
    (21, "D65"),
    (22, "D75"),
    (23, "D50"),
    (24, "ISO studio tungsten"),
    (255, "Other"),
];

pub const FLASH: LabelTable = &[
    (0x00, "Flash did not fire"),
    (0x01, "Flash fired"),
    (0x05, "Strobe return light not detected"),
    (0x07, "Strobe return light detected"),
    (0x09, "Flash fired, compulsory flash mode"),
    (0x0D, "Flash fired, compulsory flash mode, return light not detected"),
    (0x0F, "Flash fired, compulsory flash mode, return light detected"),
    (0x10, "Flash did not fire, compulsory flash mode"),
    (0x18, "Flash did not fire, auto mode"),
    (0x19, "Flash fired, auto mode"),
    (0x1D, "Flash fired, auto mode, return light not detected"),
    (0x1F, "Flash fired, auto mode, return light detected"),
    (0x20, "No flash function"),
    (0x41, "Flash fired, red-eye reduction mode"),
    (0x45, "Flash fired, red-eye reduction mode, return light not detected"),
    (0x47, "Flash fired, red-eye reduction mode, return light detected"),
    (0x49, "Flash fired, compulsory flash mode, red-eye reduction mode"),
    (
        0x4D,
        "Flash fired, compulsory flash mode, red-eye reduction mode, return light not detected",
    ),
    (
        0x4F,
        "Flash fired, compulsory flash mode, red-eye reduction mode, return light detected",
    ),
    (0x59, "Flash fired, auto mode, red-eye reduction mode"),
    (
        0x5D,
        "Flash fired, auto mode, return light not detected, red-eye reduction mode",
    ),
    (
        0x5F,
        "Flash fired, auto mode, return light detected, red-eye reduction mode",
    ),
];

pub const SENSING_METHOD: LabelTable = &[
    (1, "Not defined"),
    (2, "One-chip color area sensor"),
    (3, "Two-chip color area sensor"),
    (4, "Three-chip color area sensor"),
    (5, "Color sequential area sensor"),
    (7, "Trilinear sensor"),
    (8, "Color sequential linear sensor"),
];

pub const SCENE_CAPTURE_TYPE: LabelTable = &[
    (0, "Standard"),
    (1, "Landscape"),
    (2, "Portrait"),
    (3, "Night scene"),
];

pub const SCENE_TYPE: LabelTable = &[(1, "Directly photographed")];

pub const CUSTOM_RENDERED: LabelTable = &[(0, "Normal process"), (1, "Custom process")];

pub const WHITE_BALANCE: LabelTable = &[(0, "Auto white balance"), (1, "Manual white balance")];

pub const GAIN_CONTROL: LabelTable = &[
    (0, "None"),
    (1, "Low gain up"),
    (2, "High gain up"),
    (3, "Low gain down"),
    (4, "High gain down"),
];

pub const CONTRAST: LabelTable = &[(0, "Normal"), (1, "Soft"), (2, "Hard")];

pub const SATURATION: LabelTable = &[
    (0, "Normal"),
    (1, "Low saturation"),
    (2, "High saturation"),
];

pub const SHARPNESS: LabelTable = &[(0, "Normal"), (1, "Soft"), (2, "Hard")];

pub const SUBJECT_DISTANCE_RANGE: LabelTable = &[
    (0, "Unknown"),
    (1, "Macro"),
    (2, "Close view"),
    (3, "Distant view"),
];

pub const FILE_SOURCE: LabelTable = &[(3, "DSC")];

pub const COMPONENTS: LabelTable = &[
    (0, ""),
    (1, "Y"),
    (2, "Cb"),
    (3, "Cr"),
    (4, "R"),
    (5, "G"),
    (6, "B"),
];
