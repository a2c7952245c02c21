//! Finds metadata containers inside a JPEG byte stream (or at the head of a
//! bare TIFF file).
//!
//! All scans are linear and stop at the first match. A container whose
//! declared end falls outside the held bytes is reported as absent, except
//! for TIFF, which may legitimately run past a partial read.

/// The APP1 marker code. Exif, XMP and FLIR all live in APP1 segments.
const APP1_MARKER_CODE: u8 = 0xE1;

/// Identifies an Exif APP1 segment, four bytes past the marker.
const EXIF_SIGNATURE: &[u8] = b"Exif\0\0";

/// Identifies an XMP APP1 segment. The payload begins with a namespace URI.
const XMP_SIGNATURE: &[u8] = b"http";

/// Identifies a FLIR APP1 segment, four bytes past the marker.
const FLIR_SIGNATURE: &[u8] = b"FLIR";

/// Identifies the FFF record inside a FLIR segment, twelve bytes past the
/// marker.
const FFF_SIGNATURE: &[u8] = b"FFF\0";

/// The Photoshop `8BIM` resource header for IPTC data (resource ID `0x0404`).
const IPTC_SIGNATURE: &[u8] = &[0x38, 0x42, 0x49, 0x4D, 0x04, 0x04];

/// Scans never start a match within this many bytes of the end.
const SCAN_TAIL: usize = 10;

/// Which kind of container a segment holds.
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub enum SegmentKind {
    /// A TIFF body, either a bare TIFF file or the payload of an Exif APP1.
    Tiff,

    /// An XMP packet.
    Xmp,

    /// Photoshop IPTC datasets.
    Iptc,

    /// A FLIR FFF record directory.
    Flir,
}

impl core::fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            SegmentKind::Tiff => "TIFF",
            SegmentKind::Xmp => "XMP",
            SegmentKind::Iptc => "IPTC",
            SegmentKind::Flir => "FLIR",
        })
    }
}

/// A byte range within the source, tagged with what it holds.
#[derive(Clone, Copy, Debug, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct Segment {
    pub kind: SegmentKind,

    /// Where the container's payload starts.
    pub start: usize,

    /// The payload's declared size.
    ///
    /// For a bare TIFF file, this is the size of the held buffer.
    pub size: usize,

    /// Where the container ends.
    pub end: usize,
}

/// Finds the segment of the given kind.
pub fn find(buffer: &[u8], kind: SegmentKind) -> Option<Segment> {
    let found = match kind {
        SegmentKind::Tiff => find_tiff(buffer),
        SegmentKind::Xmp => find_xmp(buffer),
        SegmentKind::Iptc => find_iptc(buffer),
        SegmentKind::Flir => find_flir(buffer),
    };

    match found {
        Some(ref s) => log::debug!("Found {kind} segment. segment: {s:?}"),
        None => log::trace!("No {kind} segment in `{}` byte(s).", buffer.len()),
    }

    found
}

/// Grabs the big-endian `u16` at `offset`.
fn be_u16_at(buffer: &[u8], offset: usize) -> Option<u16> {
    let bytes = buffer.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

/// Checks whether `needle` sits at `offset`.
fn has_at(buffer: &[u8], offset: usize, needle: &[u8]) -> bool {
    offset
        .checked_add(needle.len())
        .and_then(|end| buffer.get(offset..end))
        .is_some_and(|found| found == needle)
}

/// Finds the first APP1 marker at which `condition` holds.
///
/// Returns the offset of the marker's `0xFF` byte.
fn find_app1(buffer: &[u8], condition: impl Fn(usize) -> bool) -> Option<usize> {
    let last = buffer.len().saturating_sub(SCAN_TAIL);
    (0..last).find(|&offset| {
        buffer[offset] == 0xFF && buffer[offset + 1] == APP1_MARKER_CODE && condition(offset)
    })
}

/// Finds the TIFF body.
///
/// Bare TIFF files start with a byte order marker. Otherwise, we look for an
/// Exif APP1 segment and point at the TIFF header right after its signature.
pub fn find_tiff(buffer: &[u8]) -> Option<Segment> {
    if has_at(buffer, 0, b"II") || has_at(buffer, 0, b"MM") {
        return Some(Segment {
            kind: SegmentKind::Tiff,
            start: 0,
            size: buffer.len(),
            end: buffer.len(),
        });
    }

    let marker = find_app1(buffer, |o| has_at(buffer, o + 4, EXIF_SIGNATURE))?;
    let start = marker + 10;
    let size = be_u16_at(buffer, marker + 2)? as usize;
    Some(Segment {
        kind: SegmentKind::Tiff,
        start,
        size,
        end: start + size,
    })
}

/// Finds the FLIR FFF record. Its payload starts at the `FFF\0` signature.
pub fn find_flir(buffer: &[u8]) -> Option<Segment> {
    let marker = find_app1(buffer, |o| {
        has_at(buffer, o + 4, FLIR_SIGNATURE) && has_at(buffer, o + 12, FFF_SIGNATURE)
    })?;
    let size = be_u16_at(buffer, marker + 2)? as usize;
    Some(Segment {
        kind: SegmentKind::Flir,
        start: marker + 12,
        size,
        end: marker + 2 + size,
    })
}

/// Finds the XMP packet.
///
/// The payload starts with the namespace URI, and the APP1 length field
/// (which counts itself) gives the end.
pub fn find_xmp(buffer: &[u8]) -> Option<Segment> {
    let marker = find_app1(buffer, |o| has_at(buffer, o + 4, XMP_SIGNATURE))?;
    let size = be_u16_at(buffer, marker + 2)? as usize;
    let end = marker + 2 + size;
    if end > buffer.len() {
        log::warn!(
            "XMP segment claims to end at `{end}`, but only `{}` byte(s) are held.",
            buffer.len()
        );
        return None;
    }

    Some(Segment {
        kind: SegmentKind::Xmp,
        start: marker + 4,
        size,
        end,
    })
}

/// Finds the IPTC datasets in a Photoshop `8BIM` resource.
///
/// The resource header has a Pascal-style name, padded to an even length.
/// Very old writers leave the name length at zero but still reserve four
/// bytes.
pub fn find_iptc(buffer: &[u8]) -> Option<Segment> {
    let last = buffer.len().saturating_sub(SCAN_TAIL);
    let marker = (0..last).find(|&o| has_at(buffer, o, IPTC_SIGNATURE))?;

    let mut name_len = buffer[marker + 7] as usize;
    if name_len % 2 != 0 {
        name_len += 1;
    }
    if name_len == 0 {
        name_len = 4;
    }

    let start = marker + 8 + name_len;
    let size = be_u16_at(buffer, marker + 6 + name_len)? as usize;
    let end = start + size;
    if end > buffer.len() {
        log::warn!(
            "IPTC segment claims to end at `{end}`, but only `{}` byte(s) are held.",
            buffer.len()
        );
        return None;
    }

    Some(Segment {
        kind: SegmentKind::Iptc,
        start,
        size,
        end,
    })
}
