//! Bounds-checked, typed reads over a window of bytes.
//!
//! A [`Window`] is a slice of the source plus the absolute offset its first
//! byte sits at. Every read takes an absolute offset, so decoders don't need
//! to care whether they're looking at the whole file or a fetched range.

use exifscan_types::tiff::Endianness;
use winnow::{
    Parser,
    binary::{Endianness as WinnowEndianness, f32, f64, i8, i16, i32, u8, u16, u32},
    error::EmptyError,
};

/// A read crossed the edge of the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundsError {
    /// The absolute offset of the read.
    pub offset: usize,

    /// How many bytes the read wanted.
    pub size: usize,

    /// The absolute offset just past the window's last byte.
    pub window_end: usize,
}

impl core::fmt::Display for BoundsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Read of `{}` byte(s) at offset `{}` crosses the end of the held bytes (`{}`).",
            self.size, self.offset, self.window_end
        )
    }
}

impl core::error::Error for BoundsError {}

/// Maps our byte order onto `winnow`'s.
pub(crate) const fn winnow_endianness(endianness: Endianness) -> WinnowEndianness {
    match endianness {
        Endianness::Little => WinnowEndianness::Little,
        Endianness::Big => WinnowEndianness::Big,
    }
}

/// A window of bytes, addressed by absolute offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window<'a> {
    bytes: &'a [u8],
    base: usize,
}

impl<'a> Window<'a> {
    /// Creates a window whose first byte sits at absolute offset `base`.
    pub const fn new(bytes: &'a [u8], base: usize) -> Self {
        Self { bytes, base }
    }

    /// The absolute offset of the first byte.
    pub const fn base(&self) -> usize {
        self.base
    }

    /// The absolute offset just past the last byte.
    pub const fn end(&self) -> usize {
        self.base + self.bytes.len()
    }

    /// The number of bytes held.
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether no bytes are held.
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Checks whether `size` bytes starting at `offset` are all held.
    pub fn contains(&self, offset: usize, size: usize) -> bool {
        offset >= self.base
            && offset
                .checked_add(size)
                .is_some_and(|end| end <= self.end())
    }

    /// Grabs `size` bytes starting at `offset`.
    pub fn slice(&self, offset: usize, size: usize) -> Result<&'a [u8], BoundsError> {
        let err = BoundsError {
            offset,
            size,
            window_end: self.end(),
        };

        if !self.contains(offset, size) {
            return Err(err);
        }

        let start = offset - self.base;
        self.bytes.get(start..start + size).ok_or(err)
    }

    /// Runs a fixed-width `winnow` parser on the bytes at `offset`.
    fn read<T>(
        &self,
        offset: usize,
        size: usize,
        mut parser: impl Parser<&'a [u8], T, EmptyError>,
    ) -> Result<T, BoundsError> {
        let mut input: &'a [u8] = self.slice(offset, size)?;
        parser.parse_next(&mut input).map_err(|_: EmptyError| BoundsError {
            offset,
            size,
            window_end: self.end(),
        })
    }

    pub fn u8_at(&self, offset: usize) -> Result<u8, BoundsError> {
        self.read(offset, 1, u8)
    }

    pub fn i8_at(&self, offset: usize) -> Result<i8, BoundsError> {
        self.read(offset, 1, i8)
    }

    pub fn u16_at(&self, offset: usize, endianness: Endianness) -> Result<u16, BoundsError> {
        self.read(offset, 2, u16(winnow_endianness(endianness)))
    }

    pub fn i16_at(&self, offset: usize, endianness: Endianness) -> Result<i16, BoundsError> {
        self.read(offset, 2, i16(winnow_endianness(endianness)))
    }

    pub fn u32_at(&self, offset: usize, endianness: Endianness) -> Result<u32, BoundsError> {
        self.read(offset, 4, u32(winnow_endianness(endianness)))
    }

    pub fn i32_at(&self, offset: usize, endianness: Endianness) -> Result<i32, BoundsError> {
        self.read(offset, 4, i32(winnow_endianness(endianness)))
    }

    pub fn f32_at(&self, offset: usize, endianness: Endianness) -> Result<f32, BoundsError> {
        self.read(offset, 4, f32(winnow_endianness(endianness)))
    }

    pub fn f64_at(&self, offset: usize, endianness: Endianness) -> Result<f64, BoundsError> {
        self.read(offset, 8, f64(winnow_endianness(endianness)))
    }

    /// Reads exactly `size` bytes as Latin-1 text.
    pub fn latin1_at(&self, offset: usize, size: usize) -> Result<String, BoundsError> {
        self.slice(offset, size).map(crate::util::latin1)
    }

    /// Reads Latin-1 text that stops at the first NUL, or after `max` bytes.
    ///
    /// All `max` bytes must be held, even if the NUL comes early.
    pub fn latin1_nul_at(&self, offset: usize, max: usize) -> Result<String, BoundsError> {
        let bytes = self.slice(offset, max)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        Ok(crate::util::latin1(&bytes[..end]))
    }
}
