use exifscan_types::{
    tiff::{Endianness, primitives::PrimitiveTy},
    value::Value,
};

use super::error::{TiffError, TiffResult};
use crate::cursor::{BoundsError, Window};

/// Values this small are stored inside the entry instead of behind a pointer.
const INLINE_VALUE_MAX_BYTES: usize = 4;

/// One 12-byte IFD entry, with its value location resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct Entry {
    pub tag: u16,
    pub ty: PrimitiveTy,
    pub count: u32,

    /// The absolute offset of the value's first byte.
    pub value_offset: usize,
}

impl Entry {
    /// The number of bytes the value spans, if that fits in a `usize`.
    pub fn total_size(&self) -> Option<usize> {
        (self.count as usize).checked_mul(self.ty.size_bytes() as usize)
    }
}

/// Reads the entry starting at `entry_offset`.
pub(super) fn read_entry(
    window: &Window<'_>,
    tiff_start: usize,
    endianness: Endianness,
    entry_offset: usize,
) -> TiffResult<Entry> {
    let tag = window
        .u16_at(entry_offset, endianness)
        .map_err(TiffError::IfdTruncated)?;
    let raw_ty = window
        .u16_at(entry_offset + 2, endianness)
        .map_err(TiffError::IfdTruncated)?;
    let count = window
        .u32_at(entry_offset + 4, endianness)
        .map_err(TiffError::IfdTruncated)?;

    let ty = PrimitiveTy::try_from(raw_ty).map_err(|_| {
        log::error!("Entry for tag `{tag:#06x}` has unknown type `{raw_ty}`. Abandoning IFD.");
        TiffError::UnknownType { tag, ty: raw_ty }
    })?;

    let total_size = (count as usize).checked_mul(ty.size_bytes() as usize);
    let value_offset = match total_size {
        Some(size) if size <= INLINE_VALUE_MAX_BYTES => entry_offset + 8,
        _ => {
            let pointer = window
                .u32_at(entry_offset + 8, endianness)
                .map_err(TiffError::IfdTruncated)?;
            tiff_start + pointer as usize
        }
    };

    log::trace!(
        "(entry info...
    tag: {tag:#06x},
    ty: {ty:?},
    count: {count},
    value offset: {value_offset}
)"
    );

    Ok(Entry {
        tag,
        ty,
        count,
        value_offset,
    })
}

/// Decodes an entry's value.
///
/// ASCII and opaque values are decoded as one unit. Everything else becomes
/// a scalar when `count == 1`, or a list otherwise.
pub(super) fn read_value(
    window: &Window<'_>,
    endianness: Endianness,
    entry: &Entry,
) -> TiffResult<Value> {
    let out_of_bounds = |err: BoundsError| {
        log::error!(
            "Value for tag `{:#06x}` isn't within the held bytes. err: {err}",
            entry.tag
        );
        TiffError::ValueOutOfBounds {
            tag: entry.tag,
            err,
        }
    };

    let total_size = entry.total_size().ok_or_else(|| {
        out_of_bounds(BoundsError {
            offset: entry.value_offset,
            size: usize::MAX,
            window_end: window.end(),
        })
    })?;
    let bytes = window
        .slice(entry.value_offset, total_size)
        .map_err(out_of_bounds)?;

    match entry.ty {
        PrimitiveTy::Ascii => {
            let bytes = bytes.strip_suffix(&[0]).unwrap_or(bytes);
            Ok(Value::Text(crate::util::latin1(bytes)))
        }

        PrimitiveTy::Undefined => Ok(Value::Bytes(bytes.to_vec())),

        ty if entry.count == 1 => {
            read_scalar(window, endianness, ty, entry.value_offset).map_err(out_of_bounds)
        }

        ty => {
            let width = ty.size_bytes() as usize;
            (0..entry.count as usize)
                .map(|i| read_scalar(window, endianness, ty, entry.value_offset + i * width))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List)
                .map_err(out_of_bounds)
        }
    }
}

/// Reads one numeric primitive.
fn read_scalar(
    window: &Window<'_>,
    e: Endianness,
    ty: PrimitiveTy,
    offset: usize,
) -> Result<Value, BoundsError> {
    Ok(match ty {
        PrimitiveTy::Byte | PrimitiveTy::Ascii | PrimitiveTy::Undefined => {
            Value::Unsigned(window.u8_at(offset)? as u32)
        }
        PrimitiveTy::SByte => Value::Signed(window.i8_at(offset)? as i32),
        PrimitiveTy::Short => Value::Unsigned(window.u16_at(offset, e)? as u32),
        PrimitiveTy::SShort => Value::Signed(window.i16_at(offset, e)? as i32),
        PrimitiveTy::Long | PrimitiveTy::Ifd => Value::Unsigned(window.u32_at(offset, e)?),
        PrimitiveTy::SLong => Value::Signed(window.i32_at(offset, e)?),
        PrimitiveTy::Rational => {
            let numerator = window.u32_at(offset, e)? as f64;
            let denominator = window.u32_at(offset + 4, e)? as f64;
            Value::Float(numerator / denominator)
        }
        PrimitiveTy::SRational => {
            let numerator = window.i32_at(offset, e)? as f64;
            let denominator = window.i32_at(offset + 4, e)? as f64;
            Value::Float(numerator / denominator)
        }
        PrimitiveTy::Float => Value::Float(window.f32_at(offset, e)? as f64),
        PrimitiveTy::Double => Value::Float(window.f64_at(offset, e)?),
    })
}
