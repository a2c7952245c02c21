//! Record schemas for the FLIR FFF segment.
//!
//! An FFF segment holds a directory of records. Each record type we know
//! about has a fixed layout: a list of fields, each at a fixed byte offset
//! from the record's schema base, with a declared primitive type.

/// A primitive stored in a FLIR record.
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum FlirPrimitive {
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
    F32,
    F64,

    /// NUL-terminated text, bounded to the given length.
    Text(u8),
}

impl FlirPrimitive {
    /// How many bytes a field of this type spans.
    pub const fn size_bytes(&self) -> usize {
        match self {
            FlirPrimitive::U8 | FlirPrimitive::I8 => 1,
            FlirPrimitive::U16 | FlirPrimitive::I16 => 2,
            FlirPrimitive::U32 | FlirPrimitive::I32 | FlirPrimitive::F32 => 4,
            FlirPrimitive::F64 => 8,
            FlirPrimitive::Text(len) => *len as usize,
        }
    }
}

/// One field of a record schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlirField {
    pub name: &'static str,
    pub offset: u32,
    pub ty: FlirPrimitive,
}

/// The layout of one record type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlirSchema {
    pub record_type: u16,
    pub name: &'static str,
    pub fields: &'static [FlirField],
}

/// The raw thermal image record. Its subtype carries its byte order.
pub const RAW_DATA: u16 = 0x01;

/// Camera, lens and filter identity, plus calibration constants.
pub const CAMERA_INFO: u16 = 0x20;

/// The palette used to render the thermal image.
pub const PALETTE_INFO: u16 = 0x22;

/// Location info recorded by the camera itself.
pub const GPS_INFO: u16 = 0x2B;

/// Grabs the schema for a record type, if we know it.
pub fn schema_for(record_type: u16) -> Option<&'static FlirSchema> {
    SCHEMAS.iter().find(|s| s.record_type == record_type)
}

const fn field(name: &'static str, offset: u32, ty: FlirPrimitive) -> FlirField {
    FlirField { name, offset, ty }
}

use FlirPrimitive as P;

static SCHEMAS: &[FlirSchema] = &[
    FlirSchema {
        record_type: RAW_DATA,
        name: "RawData",
        fields: &[
            field("RawThermalImageWidth", 0x02, P::U16),
            field("RawThermalImageHeight", 0x04, P::U16),
        ],
    },
    FlirSchema {
        record_type: CAMERA_INFO,
        name: "CameraInfo",
        fields: &[
            field("Emissivity", 0x20, P::F32),
            field("ObjectDistance", 0x24, P::F32),
            field("ReflectedApparentTemperature", 0x28, P::F32),
            field("AtmosphericTemperature", 0x2C, P::F32),
            field("IRWindowTemperature", 0x30, P::F32),
            field("IRWindowTransmission", 0x34, P::F32),
            field("RelativeHumidity", 0x3C, P::F32),
            field("PlanckR1", 0x58, P::F32),
            field("PlanckB", 0x5C, P::F32),
            field("PlanckF", 0x60, P::F32),
            field("AtmosphericTransAlpha1", 0x70, P::F32),
            field("AtmosphericTransAlpha2", 0x74, P::F32),
            field("AtmosphericTransBeta1", 0x78, P::F32),
            field("AtmosphericTransBeta2", 0x7C, P::F32),
            field("AtmosphericTransX", 0x80, P::F32),
            field("CameraTemperatureRangeMax", 0x90, P::F32),
            field("CameraTemperatureRangeMin", 0x94, P::F32),
            field("CameraTemperatureMaxClip", 0x98, P::F32),
            field("CameraTemperatureMinClip", 0x9C, P::F32),
            field("CameraTemperatureMaxWarn", 0xA0, P::F32),
            field("CameraTemperatureMinWarn", 0xA4, P::F32),
            field("CameraTemperatureMaxSaturated", 0xA8, P::F32),
            field("CameraTemperatureMinSaturated", 0xAC, P::F32),
            field("CameraModel", 0xD4, P::Text(32)),
            field("CameraPartNumber", 0xF4, P::Text(16)),
            field("CameraSerialNumber", 0x104, P::Text(16)),
            field("CameraSoftware", 0x114, P::Text(16)),
            field("LensModel", 0x170, P::Text(32)),
            field("LensPartNumber", 0x190, P::Text(16)),
            field("LensSerialNumber", 0x1A0, P::Text(16)),
            field("FieldOfView", 0x1B4, P::F32),
            field("FilterModel", 0x1EC, P::Text(16)),
            field("FilterPartNumber", 0x1FC, P::Text(32)),
            field("FilterSerialNumber", 0x21C, P::Text(32)),
            field("PlanckO", 0x308, P::I32),
            field("PlanckR2", 0x30C, P::F32),
            field("RawValueRangeMin", 0x310, P::U16),
            field("RawValueRangeMax", 0x312, P::U16),
            field("RawValueMedian", 0x338, P::U16),
            field("RawValueRange", 0x33C, P::U16),
            field("FocusStepCount", 0x390, P::U16),
            field("FocusDistance", 0x45C, P::F32),
            field("FrameRate", 0x464, P::U16),
        ],
    },
    FlirSchema {
        record_type: PALETTE_INFO,
        name: "PaletteInfo",
        fields: &[
            field("PaletteColors", 0x00, P::U8),
            field("PaletteMethod", 0x1A, P::U8),
            field("PaletteStretch", 0x1B, P::U8),
            field("PaletteFileName", 0x30, P::Text(32)),
            field("PaletteName", 0x50, P::Text(32)),
        ],
    },
    FlirSchema {
        record_type: GPS_INFO,
        name: "GPSInfo",
        fields: &[
            field("GPSValid", 0x00, P::U32),
            field("GPSLatitudeRef", 0x08, P::Text(2)),
            field("GPSLongitudeRef", 0x0A, P::Text(2)),
            field("GPSLatitude", 0x10, P::F64),
            field("GPSLongitude", 0x18, P::F64),
            field("GPSAltitude", 0x20, P::F32),
            field("GPSDOP", 0x40, P::F32),
            field("GPSSpeedRef", 0x44, P::Text(2)),
            field("GPSTrackRef", 0x46, P::Text(2)),
            field("GPSSpeed", 0x4C, P::F32),
            field("GPSTrack", 0x50, P::F32),
            field("GPSImgDirection", 0x54, P::F32),
            field("GPSMapDatum", 0x58, P::Text(16)),
        ],
    },
];
