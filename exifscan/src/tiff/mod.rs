//! TIFF is the container Exif metadata lives in.
//!
//! A TIFF body starts with an 8-byte header (byte order, the magic number
//! `42`, and a pointer to IFD 0). Each IFD (Image File Directory) is a
//! counted table of 12-byte entries followed by a pointer to the next IFD.
//!
//! Each entry is somewhat self-describing: it has a tag ID, a primitive type
//! and a count. When the value fits in four bytes, it's stored inside the
//! entry. Otherwise, the entry holds a pointer to it, relative to the start
//! of the TIFF body.
//!
//! IFD 0 also carries pointer tags for the Exif, GPS and Interop
//! directories. IFD 1 (the thumbnail) is the one chained after IFD 0.

use exifscan_types::{
    tiff::{Endianness, IfdGroup},
    value::{TagKey, TagMap},
};

use self::{
    error::{TiffError, TiffResult},
    value::{read_entry, read_value},
};
use crate::cursor::Window;

pub mod error;
mod value;

/// The fixed size of a TIFF header. IFD 0 can't start before this.
pub const HEADER_LEN: u32 = 8;

/// The size of one IFD entry.
const ENTRY_LEN: usize = 12;

/// The TIFF magic number, `42`.
const TIFF_MAGIC: u16 = 0x002A;

/// What a TIFF header tells us.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TiffHeader {
    /// The byte order of every multi-byte value in the body.
    pub endianness: Endianness,

    /// The offset of IFD 0, relative to the start of the body.
    pub ifd0_offset: u32,
}

/// Reads the TIFF header at `tiff_start`.
pub fn parse_header(window: &Window<'_>, tiff_start: usize) -> TiffResult<TiffHeader> {
    log::trace!("Looking for the BOM bytes...");
    let bom = window
        .slice(tiff_start, 2)
        .map_err(TiffError::HeaderTruncated)?;
    let found = [bom[0], bom[1]];

    let endianness = Endianness::from_marker(found).ok_or_else(|| {
        let e = TiffError::WeirdByteOrderMarker { found };
        log::error!("Couldn't parse TIFF header! err: {e}");
        e
    })?;
    log::trace!("TIFF body is {endianness:?}-endian.");

    let magic = window
        .u16_at(tiff_start + 2, endianness)
        .map_err(TiffError::HeaderTruncated)?;
    if magic != TIFF_MAGIC {
        log::error!("Magic number wasn't for TIFF. got: `{magic}`");
        return Err(TiffError::MagicNumberWasntTiff { found: magic });
    }

    let ifd0_offset = window
        .u32_at(tiff_start + 4, endianness)
        .map_err(TiffError::HeaderTruncated)?;
    if ifd0_offset < HEADER_LEN {
        log::error!("IFD 0 offset `{ifd0_offset}` points into the header.");
        return Err(TiffError::Ifd0OffsetInsideHeader {
            offset: ifd0_offset,
        });
    }

    Ok(TiffHeader {
        endianness,
        ifd0_offset,
    })
}

/// A range of bytes to fetch from the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ByteRange {
    /// The absolute offset to start at.
    pub start: usize,

    /// The minimum number of bytes wanted.
    pub size: usize,
}

/// The outcome of a decode step that might need bytes we don't hold.
#[derive(Clone, Debug, PartialEq)]
pub enum Fetch<T> {
    /// Decoding finished.
    Ready(T),

    /// The decoder needs this range before it can start. Fetch it, then
    /// retry with a window based at `range.start`.
    NeedMoreBytes(ByteRange),
}

/// What an IFD decoder needs to know about the body it's in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IfdContext {
    /// The absolute offset of the TIFF header. IFD and value pointers are
    /// relative to it.
    pub tiff_start: usize,

    pub endianness: Endianness,

    /// Which directory we're decoding. This picks the tag dictionary.
    pub group: IfdGroup,

    /// The size of the whole byte source. Bytes before this that the window
    /// doesn't hold can be fetched.
    pub source_len: usize,
}

/// A decoded IFD.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedIfd {
    /// The IFD's tags, in directory order.
    pub tags: TagMap,

    /// The offset of the next IFD in the chain, if there is one.
    pub next_ifd: Option<u32>,
}

/// Decodes the IFD at `ifd_offset` (relative to the TIFF start).
///
/// If the IFD doesn't start inside `window`, or the source holds part of its
/// entry table or values that `window` doesn't, this asks for those bytes
/// instead. Any other problem, including an entry with an unknown type, fails
/// the whole IFD.
pub fn parse_ifd(
    window: &Window<'_>,
    ctx: &IfdContext,
    ifd_offset: u32,
) -> TiffResult<Fetch<DecodedIfd>> {
    let start = ctx.tiff_start + ifd_offset as usize;
    if !window.contains(start, 2) {
        log::debug!(
            "{} IFD at `{start}` is outside the held bytes (`{}..{}`).",
            ctx.group,
            window.base(),
            window.end()
        );
        return Ok(Fetch::NeedMoreBytes(ByteRange { start, size: 2 }));
    }

    let entry_count = window
        .u16_at(start, ctx.endianness)
        .map_err(TiffError::IfdTruncated)?;

    if let Some(range) = missing_bytes(window, ctx, start, entry_count)? {
        log::debug!(
            "{} IFD at `{start}` reaches past the held bytes (`{}..{}`). Wants: `{}..{}`",
            ctx.group,
            window.base(),
            window.end(),
            range.start,
            range.start + range.size
        );
        return Ok(Fetch::NeedMoreBytes(range));
    }

    log::trace!("Parsing `{entry_count}` entries of the {} IFD...", ctx.group);

    let mut tags = TagMap::new();
    for i in 0..entry_count as usize {
        let entry = read_entry(
            window,
            ctx.tiff_start,
            ctx.endianness,
            start + 2 + i * ENTRY_LEN,
        )?;
        let value = read_value(window, ctx.endianness, &entry)?;

        let key = match ctx.group.tag_name(entry.tag) {
            Some(name) => TagKey::from(name),
            None => TagKey::Id(entry.tag),
        };
        tags.insert(key, value);
    }

    let next_ifd_at = start + 2 + entry_count as usize * ENTRY_LEN;
    let next_ifd = match window.u32_at(next_ifd_at, ctx.endianness) {
        Ok(0) => {
            log::trace!("There won't be a next IFD.");
            None
        }
        Ok(pointer) => {
            log::trace!("Another IFD was detected! offset: `{pointer}`");
            Some(pointer)
        }
        Err(e) => {
            log::warn!("IFD didn't contain a pointer to the next IFD. err: {e}");
            None
        }
    };

    Ok(Fetch::Ready(DecodedIfd { tags, next_ifd }))
}

/// Finds the bytes an IFD reads that the source has, but `window` doesn't.
///
/// That's the entry table with its next-IFD pointer, then every value the
/// entries point to. The returned range covers all of them, so one fetch is
/// enough. Bytes past the end of the source aren't asked for; reading them
/// fails as usual.
fn missing_bytes(
    window: &Window<'_>,
    ctx: &IfdContext,
    start: usize,
    entry_count: u16,
) -> TiffResult<Option<ByteRange>> {
    let unheld = |from: usize, size: usize| {
        let to = from.saturating_add(size).min(ctx.source_len);
        (from < to && !window.contains(from, to - from)).then_some((from, to))
    };

    let table_len = 2 + entry_count as usize * ENTRY_LEN + 4;
    if let Some((from, to)) = unheld(start, table_len) {
        // the entries themselves aren't here, so their values can't be known yet
        return Ok(Some(ByteRange {
            start: from,
            size: to - from,
        }));
    }

    let mut wanted: Option<(usize, usize)> = None;
    for i in 0..entry_count as usize {
        let entry = read_entry(
            window,
            ctx.tiff_start,
            ctx.endianness,
            start + 2 + i * ENTRY_LEN,
        )?;
        let Some(size) = entry.total_size() else {
            continue;
        };

        if let Some((from, to)) = unheld(entry.value_offset, size) {
            wanted = Some(match wanted {
                Some((lo, hi)) => (lo.min(from), hi.max(to)),
                None => (from, to),
            });
        }
    }

    Ok(wanted.map(|(lo, hi)| {
        let lo = lo.min(start);
        let hi = hi.max(start + table_len);
        ByteRange {
            start: lo,
            size: hi - lo,
        }
    }))
}

#[cfg(test)]
mod tests {
    use exifscan_types::{
        tiff::{Endianness, IfdGroup},
        value::{TagKey, Value},
    };

    use super::{DecodedIfd, Fetch, IfdContext, parse_header, parse_ifd, error::TiffError};
    use crate::{cursor::Window, util::logger};

    /// An entry to write into a test TIFF. `data` is already in the right
    /// byte order.
    struct RawEntry {
        tag: u16,
        ty: u16,
        count: u32,
        data: Vec<u8>,
    }

    fn u16b(e: Endianness, v: u16) -> [u8; 2] {
        match e {
            Endianness::Little => v.to_le_bytes(),
            Endianness::Big => v.to_be_bytes(),
        }
    }

    fn u32b(e: Endianness, v: u32) -> [u8; 4] {
        match e {
            Endianness::Little => v.to_le_bytes(),
            Endianness::Big => v.to_be_bytes(),
        }
    }

    /// Builds a TIFF body with IFD 0 at offset 8 and values after it.
    fn build_tiff(e: Endianness, entries: &[RawEntry], next_ifd: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(match e {
            Endianness::Little => b"II",
            Endianness::Big => b"MM",
        });
        bytes.extend_from_slice(&u16b(e, 42));
        bytes.extend_from_slice(&u32b(e, 8));

        let mut data_area = 8 + 2 + entries.len() * 12 + 4;
        let mut values = Vec::new();

        bytes.extend_from_slice(&u16b(e, entries.len() as u16));
        for entry in entries {
            bytes.extend_from_slice(&u16b(e, entry.tag));
            bytes.extend_from_slice(&u16b(e, entry.ty));
            bytes.extend_from_slice(&u32b(e, entry.count));
            if entry.data.len() <= 4 {
                let mut inline = [0_u8; 4];
                inline[..entry.data.len()].copy_from_slice(&entry.data);
                bytes.extend_from_slice(&inline);
            } else {
                bytes.extend_from_slice(&u32b(e, data_area as u32));
                values.extend_from_slice(&entry.data);
                data_area += entry.data.len();
            }
        }
        bytes.extend_from_slice(&u32b(e, next_ifd));
        bytes.extend_from_slice(&values);
        bytes
    }

    /// A mix of every common type.
    fn sample_entries(e: Endianness) -> Vec<RawEntry> {
        let rational = |n: u32, d: u32| [u32b(e, n), u32b(e, d)].concat();
        vec![
            RawEntry {
                tag: 0x010F,
                ty: 2,
                count: 7,
                data: b"Google\0".to_vec(),
            },
            RawEntry {
                tag: 0x0112,
                ty: 3,
                count: 1,
                data: u16b(e, 6).to_vec(),
            },
            RawEntry {
                tag: 0x011A,
                ty: 5,
                count: 1,
                data: rational(72, 1),
            },
            RawEntry {
                tag: 0x9204,
                ty: 10,
                count: 1,
                data: [u32b(e, (-1_i32) as u32), u32b(e, 3)].concat(),
            },
            RawEntry {
                tag: 0x0102,
                ty: 3,
                count: 3,
                data: [u16b(e, 8), u16b(e, 8), u16b(e, 8)].concat(),
            },
            RawEntry {
                tag: 0x9000,
                ty: 7,
                count: 4,
                data: b"0231".to_vec(),
            },
            RawEntry {
                tag: 0xBEEF,
                ty: 4,
                count: 1,
                data: u32b(e, 0xDEAD_BEEF).to_vec(),
            },
        ]
    }

    fn decode(bytes: &[u8], group: IfdGroup) -> Result<DecodedIfd, TiffError> {
        let window = Window::new(bytes, 0);
        let header = parse_header(&window, 0)?;
        let ctx = IfdContext {
            tiff_start: 0,
            endianness: header.endianness,
            group,
            source_len: bytes.len(),
        };
        match parse_ifd(&window, &ctx, header.ifd0_offset)? {
            Fetch::Ready(ifd) => Ok(ifd),
            Fetch::NeedMoreBytes(range) => panic!("didn't expect a fetch: {range:?}"),
        }
    }

    #[test]
    fn decodes_common_types() {
        logger();
        let bytes = build_tiff(Endianness::Big, &sample_entries(Endianness::Big), 0);
        let ifd = decode(&bytes, IfdGroup::_0).unwrap();

        assert_eq!(ifd.tags.get("Make"), Some(&Value::from("Google")));
        assert_eq!(ifd.tags.get("Orientation"), Some(&Value::Unsigned(6)));
        assert_eq!(ifd.tags.get("XResolution"), Some(&Value::Float(72.0)));
        assert_eq!(
            ifd.tags.get("ExposureCompensation"),
            Some(&Value::Float(-1.0 / 3.0))
        );
        assert_eq!(
            ifd.tags.get("BitsPerSample"),
            Some(&Value::List(vec![Value::Unsigned(8); 3]))
        );
        assert_eq!(ifd.tags.get("ExifVersion"), Some(&Value::Bytes(b"0231".to_vec())));
        assert_eq!(ifd.tags.get_id(0xBEEF), Some(&Value::Unsigned(0xDEAD_BEEF)));
        assert_eq!(ifd.next_ifd, None);

        // directory order is kept
        let keys: Vec<_> = ifd.tags.keys().cloned().collect();
        assert_eq!(keys[0], TagKey::from("Make"));
        assert_eq!(keys[6], TagKey::Id(0xBEEF));
    }

    /// Swapping every field's byte order (and the marker) changes nothing.
    #[test]
    fn byte_order_symmetry() {
        logger();
        let le = build_tiff(Endianness::Little, &sample_entries(Endianness::Little), 0);
        let be = build_tiff(Endianness::Big, &sample_entries(Endianness::Big), 0);
        assert_ne!(le, be);

        let le = decode(&le, IfdGroup::_0).unwrap();
        let be = decode(&be, IfdGroup::_0).unwrap();
        assert_eq!(le, be);
    }

    #[test]
    fn decoding_twice_is_idempotent() {
        logger();
        let bytes = build_tiff(Endianness::Little, &sample_entries(Endianness::Little), 0);
        assert_eq!(
            decode(&bytes, IfdGroup::_0).unwrap(),
            decode(&bytes, IfdGroup::_0).unwrap()
        );
    }

    /// Four bytes are stored inline, five are behind a pointer.
    #[test]
    fn inline_boundary() {
        logger();
        let e = Endianness::Little;
        let bytes = build_tiff(
            e,
            &[
                RawEntry {
                    tag: 0x0001,
                    ty: 1,
                    count: 4,
                    data: vec![1, 2, 3, 4],
                },
                RawEntry {
                    tag: 0x0002,
                    ty: 1,
                    count: 5,
                    data: vec![5, 6, 7, 8, 9],
                },
            ],
            0,
        );

        // the 4-byte value sits right in the entry
        assert_eq!(&bytes[10 + 8..10 + 12], &[1, 2, 3, 4]);
        // the 5-byte one is a pointer past the table
        assert_eq!(&bytes[22 + 8..22 + 12], &u32b(e, 38));

        let ifd = decode(&bytes, IfdGroup::Gps).unwrap();
        let as_list = |v: &[u32]| Value::List(v.iter().map(|&b| Value::Unsigned(b)).collect());
        assert_eq!(ifd.tags.get("GPSLatitudeRef"), Some(&as_list(&[1, 2, 3, 4])));
        assert_eq!(ifd.tags.get("GPSLatitude"), Some(&as_list(&[5, 6, 7, 8, 9])));
    }

    #[test]
    fn ascii_strips_one_nul_and_empty_counts() {
        logger();
        let e = Endianness::Big;
        let bytes = build_tiff(
            e,
            &[
                RawEntry {
                    tag: 0x0110,
                    ty: 2,
                    count: 6,
                    data: b"Pix\0\0\0".to_vec(),
                },
                RawEntry {
                    tag: 0x0102,
                    ty: 3,
                    count: 0,
                    data: Vec::new(),
                },
            ],
            0,
        );

        let ifd = decode(&bytes, IfdGroup::_0).unwrap();
        assert_eq!(ifd.tags.get("Model"), Some(&Value::from("Pix\0\0")));
        assert_eq!(ifd.tags.get("BitsPerSample"), Some(&Value::List(Vec::new())));
    }

    /// One bad type code takes the whole IFD down with it.
    #[test]
    fn unknown_type_aborts_ifd() {
        logger();
        let e = Endianness::Little;
        let mut entries = sample_entries(e);
        entries.push(RawEntry {
            tag: 0x1234,
            ty: 99,
            count: 1,
            data: vec![0; 4],
        });
        let bytes = build_tiff(e, &entries, 0);

        assert!(matches!(
            decode(&bytes, IfdGroup::_0),
            Err(TiffError::UnknownType { tag: 0x1234, ty: 99 })
        ));
    }

    #[test]
    fn value_pointer_past_the_end() {
        logger();
        let e = Endianness::Little;
        let mut bytes = build_tiff(e, &sample_entries(e), 0);
        // the last pointed-to value is `BitsPerSample`
        bytes.truncate(bytes.len() - 4);

        assert!(matches!(
            decode(&bytes, IfdGroup::_0),
            Err(TiffError::ValueOutOfBounds { tag: 0x0102, .. })
        ));
    }

    #[test]
    fn header_errors() {
        logger();
        fn window_of(bytes: &[u8]) -> Window<'_> {
            Window::new(bytes, 0)
        }

        assert!(matches!(
            parse_header(&window_of(b"XX\x00\x2A\x00\x00\x00\x08"), 0),
            Err(TiffError::WeirdByteOrderMarker { found: [b'X', b'X'] })
        ));
        assert!(matches!(
            parse_header(&window_of(b"MM\x00\x2B\x00\x00\x00\x08"), 0),
            Err(TiffError::MagicNumberWasntTiff { found: 0x2B })
        ));
        assert!(matches!(
            parse_header(&window_of(b"II\x2A\x00\x07\x00\x00\x00"), 0),
            Err(TiffError::Ifd0OffsetInsideHeader { offset: 7 })
        ));
        assert!(matches!(
            parse_header(&window_of(b"II\x2A\x00"), 0),
            Err(TiffError::HeaderTruncated(_))
        ));
    }

    #[test]
    fn thumbnail_pointer_is_kept() {
        logger();
        let bytes = build_tiff(Endianness::Big, &sample_entries(Endianness::Big), 0x1000);
        let ifd = decode(&bytes, IfdGroup::_0).unwrap();
        assert_eq!(ifd.next_ifd, Some(0x1000));
    }

    /// An IFD past the held bytes asks for them instead of failing.
    #[test]
    fn far_ifd_asks_for_bytes() {
        logger();
        let bytes = build_tiff(Endianness::Big, &sample_entries(Endianness::Big), 0);
        let window = Window::new(&bytes, 0);
        let ctx = IfdContext {
            tiff_start: 0,
            endianness: Endianness::Big,
            group: IfdGroup::Gps,
            source_len: bytes.len(),
        };

        match parse_ifd(&window, &ctx, 5000).unwrap() {
            Fetch::NeedMoreBytes(range) => assert_eq!(range.start, 5000),
            Fetch::Ready(_) => panic!("the IFD isn't held"),
        }
    }

    /// Parses IFD 0 of `bytes` while only holding its first `held` bytes.
    fn parse_held(bytes: &[u8], held: usize) -> Fetch<DecodedIfd> {
        let window = Window::new(&bytes[..held], 0);
        let ctx = IfdContext {
            tiff_start: 0,
            endianness: Endianness::Big,
            group: IfdGroup::_0,
            source_len: bytes.len(),
        };
        parse_ifd(&window, &ctx, 8).unwrap()
    }

    /// A table cut off by the end of the held bytes is fetched, not failed.
    #[test]
    fn straddling_table_asks_for_bytes() {
        logger();
        let e = Endianness::Big;
        let entries: Vec<_> = (0..3)
            .map(|i| RawEntry {
                tag: 0x0112 + i,
                ty: 3,
                count: 1,
                data: u16b(e, 1).to_vec(),
            })
            .collect();
        let bytes = build_tiff(e, &entries, 0);
        assert_eq!(bytes.len(), 50);

        assert_eq!(
            parse_held(&bytes, 20),
            Fetch::NeedMoreBytes(super::ByteRange { start: 8, size: 42 })
        );
    }

    /// Pointed-to values outside the held bytes are fetched along with the
    /// table.
    #[test]
    fn far_values_ask_for_bytes() {
        logger();
        let bytes = build_tiff(Endianness::Big, &sample_entries(Endianness::Big), 0);
        let table_end = 8 + 2 + 7 * 12 + 4;

        match parse_held(&bytes, table_end) {
            Fetch::NeedMoreBytes(range) => {
                assert_eq!(range.start, 8);
                assert_eq!(range.start + range.size, bytes.len());
            }
            Fetch::Ready(_) => panic!("the values aren't held"),
        }

        // once everything is held, it decodes
        assert!(matches!(parse_held(&bytes, bytes.len()), Fetch::Ready(_)));
    }

    /// Bytes the source doesn't have aren't asked for.
    #[test]
    fn truncated_source_still_fails() {
        logger();
        let bytes = build_tiff(Endianness::Big, &sample_entries(Endianness::Big), 0);
        let cut = &bytes[..40];
        let window = Window::new(cut, 0);
        let ctx = IfdContext {
            tiff_start: 0,
            endianness: Endianness::Big,
            group: IfdGroup::_0,
            source_len: cut.len(),
        };

        assert!(matches!(
            parse_ifd(&window, &ctx, 8),
            Err(TiffError::IfdTruncated(_))
        ));
    }
}
