//! FLIR thermal cameras store their calibration data in an FFF record
//! directory, tucked away in an APP1 segment.
//!
//! The layout isn't documented by FLIR. What we know comes from reverse
//! engineering, so a few of the constants below are empirical.

use exifscan_types::{
    flir::{FlirPrimitive, RAW_DATA, schema_for},
    tiff::Endianness,
    value::{TagMap, Value},
};

use self::error::FlirError;
use crate::cursor::{BoundsError, Window};

pub mod error;

/// The size of one record directory entry.
const RECORD_LEN: usize = 32;

/// Valid FFF versions are in the hundreds. Reading anything else means we've
/// got the byte order wrong.
const VERSION_RANGE: core::ops::Range<u32> = 100..200;

/// Fields of every record except raw data sit this far past the record's
/// content offset.
///
/// Found empirically, and not described by any layout we know of.
const SCHEMA_BASE_SKEW: usize = 120;

/// The first `u16` at a record's schema base. Reading any other value means
/// the record uses the other byte order.
///
/// Also found empirically.
const BYTE_ORDER_PROBE: u16 = 2;

/// One entry of the FFF record directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FlirRecord {
    pub record_type: u16,

    /// For raw data, this is the byte order (`1` is big-endian, `2` is
    /// little-endian). Other records usually have `1`.
    pub subtype: u16,

    pub version: u32,

    /// Where the record's content starts, relative to the FFF signature.
    pub content_offset: u32,

    pub length: u32,
}

/// A decoded FLIR FFF segment.
#[derive(Clone, Debug, PartialEq)]
pub struct Flir {
    /// The software that wrote the segment. Often empty.
    pub creator: String,

    /// The FFF format version. Usually `100`.
    pub version: u32,

    /// The byte order of the header and record directory.
    pub endianness: Endianness,

    /// Every entry of the record directory, including ones we don't decode.
    pub records: Vec<FlirRecord>,

    /// Fields from every record we know how to decode, flattened together.
    pub tags: TagMap,
}

/// Decodes the FFF segment starting at `start` (the `FFF\0` signature).
///
/// `assumed` is the byte order to try first. If the version number comes out
/// wrong, the other byte order is used instead.
pub fn parse_flir(
    window: &Window<'_>,
    start: usize,
    assumed: Endianness,
) -> Result<Flir, FlirError> {
    let creator = window
        .latin1_nul_at(start + 4, 16)
        .map_err(FlirError::HeaderTruncated)?;

    let mut endianness = assumed;
    let mut version = window
        .u32_at(start + 20, endianness)
        .map_err(FlirError::HeaderTruncated)?;
    if !VERSION_RANGE.contains(&version) {
        log::debug!("FFF version `{version}` is weird. Flipping byte order...");
        endianness = endianness.flip();
        version = window
            .u32_at(start + 20, endianness)
            .map_err(FlirError::HeaderTruncated)?;
    }
    log::trace!("FFF creator: `{creator}`, version: `{version}`, {endianness:?}-endian");

    let directory = start
        + window
            .u32_at(start + 24, endianness)
            .map_err(FlirError::HeaderTruncated)? as usize;
    let record_count = window
        .u32_at(start + 28, endianness)
        .map_err(FlirError::HeaderTruncated)?;

    let mut records = Vec::new();
    let mut tags = TagMap::new();
    for i in 0..record_count as usize {
        let record = read_record(window, directory + i * RECORD_LEN, endianness)
            .map_err(FlirError::HeaderTruncated)?;
        records.push(record);
        decode_record(window, start, &record, endianness, &mut tags)?;
    }

    Ok(Flir {
        creator,
        version,
        endianness,
        records,
        tags,
    })
}

fn read_record(
    window: &Window<'_>,
    offset: usize,
    e: Endianness,
) -> Result<FlirRecord, BoundsError> {
    Ok(FlirRecord {
        record_type: window.u16_at(offset, e)?,
        subtype: window.u16_at(offset + 2, e)?,
        version: window.u32_at(offset + 4, e)?,
        content_offset: window.u32_at(offset + 12, e)?,
        length: window.u32_at(offset + 16, e)?,
    })
}

/// Reads every field of a record's schema into `tags`.
///
/// Records without a schema, and raw data in a format we can't read, are
/// skipped.
fn decode_record(
    window: &Window<'_>,
    start: usize,
    record: &FlirRecord,
    directory_endianness: Endianness,
    tags: &mut TagMap,
) -> Result<(), FlirError> {
    let mut endianness = match (record.record_type, record.subtype) {
        (RAW_DATA, 1) => Endianness::Big,
        (RAW_DATA, 2) => Endianness::Little,
        (RAW_DATA, other) => {
            log::trace!("Skipping raw data record with subtype `{other}`.");
            return Ok(());
        }
        _ => directory_endianness,
    };

    let Some(schema) = schema_for(record.record_type) else {
        log::trace!("No schema for FLIR record `{:#06x}`.", record.record_type);
        return Ok(());
    };

    let mut base = start + record.content_offset as usize;
    if record.record_type != RAW_DATA {
        base += SCHEMA_BASE_SKEW;
    }

    let probe = window
        .u16_at(base, endianness)
        .map_err(|err| FlirError::FieldOutOfBounds {
            record_type: record.record_type,
            field: "byte order probe",
            err,
        })?;
    if probe != BYTE_ORDER_PROBE {
        endianness = endianness.flip();
    }
    log::trace!("Decoding FLIR {} record ({endianness:?}-endian)...", schema.name);

    for field in schema.fields {
        let value = read_field(window, base + field.offset as usize, field.ty, endianness)
            .map_err(|err| {
                log::error!("Couldn't read FLIR field `{}`. err: {err}", field.name);
                FlirError::FieldOutOfBounds {
                    record_type: record.record_type,
                    field: field.name,
                    err,
                }
            })?;
        tags.insert(field.name, value);
    }

    Ok(())
}

fn read_field(
    window: &Window<'_>,
    offset: usize,
    ty: FlirPrimitive,
    e: Endianness,
) -> Result<Value, BoundsError> {
    Ok(match ty {
        FlirPrimitive::U8 => Value::Unsigned(window.u8_at(offset)? as u32),
        FlirPrimitive::U16 => Value::Unsigned(window.u16_at(offset, e)? as u32),
        FlirPrimitive::U32 => Value::Unsigned(window.u32_at(offset, e)?),
        FlirPrimitive::I8 => Value::Signed(window.i8_at(offset)? as i32),
        FlirPrimitive::I16 => Value::Signed(window.i16_at(offset, e)? as i32),
        FlirPrimitive::I32 => Value::Signed(window.i32_at(offset, e)?),
        FlirPrimitive::F32 => Value::Float(window.f32_at(offset, e)? as f64),
        FlirPrimitive::F64 => Value::Float(window.f64_at(offset, e)?),
        FlirPrimitive::Text(len) => Value::Text(window.latin1_nul_at(offset, len as usize)?),
    })
}
