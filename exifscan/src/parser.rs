//! Runs the decoders over one byte source, then gathers what they found.
//!
//! The parser holds one buffer of bytes: either the whole source, or its
//! first chunk. Segments are located in that buffer (once per kind, then
//! cached). TIFF directories that start past the end of a chunk are fetched
//! from the source on demand.

use std::borrow::Cow;

use exifscan_types::{
    tiff::{Endianness, IfdGroup},
    value::{TagMap, Value},
    xmp::XmpValue,
};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::{
    cursor::Window,
    error::MetadataError,
    flir::{self, Flir},
    iptc,
    segment::{self, Segment, SegmentKind},
    source::{ByteSource, SourceError},
    tiff::{
        self, DecodedIfd, Fetch, IfdContext,
        error::{TiffError, TiffResult},
    },
    translate, xmp,
};

/// Fetched ranges are never smaller than this.
const MIN_FETCH_SIZE: usize = 10_000;

/// How much of the source is read up front in chunked mode.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

const EXIF_POINTER: &str = "ExifIFDPointer";
const GPS_POINTER: &str = "GPSInfoIFDPointer";
const INTEROP_POINTER: &str = "InteroperabilityIFDPointer";

/// Some writers put XMP in this TIFF tag instead of its own segment.
const APPLICATION_NOTES: &str = "ApplicationNotes";

/// Which decoders run, and how their results are put together.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Options {
    /// Decode the TIFF body's main directory (IFD 0).
    ///
    /// All other TIFF directories are reached through IFD 0, so turning
    /// this off turns them off too.
    pub tiff: bool,

    /// Decode the Exif IFD.
    pub exif: bool,

    /// Decode the GPS IFD.
    pub gps: bool,

    /// Decode the Interop IFD.
    pub interop: bool,

    /// Decode IFD 1.
    ///
    /// This is ignored when merging output, since the thumbnail's tags would
    /// overwrite the main image's.
    pub thumbnail: bool,

    pub xmp: bool,
    pub iptc: bool,
    pub flir: bool,

    /// Accepted for compatibility. ICC profiles are never decoded.
    pub icc: bool,

    /// Flatten every TIFF directory and IPTC into one map.
    pub merge_output: bool,

    /// Translate raw values into friendlier ones, and derive GPS
    /// coordinates and timestamps.
    pub post_process: bool,

    /// Read the whole source up front. Otherwise, only the first
    /// `chunk_size` bytes are read, and more are fetched when needed.
    pub whole_file: bool,

    pub chunk_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tiff: true,
            exif: true,
            gps: true,
            interop: false,
            thumbnail: false,
            xmp: false,
            iptc: false,
            flir: false,
            icc: false,
            merge_output: true,
            post_process: true,
            whole_file: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Options {
    /// How many bytes to ask for when a directory isn't held.
    pub fn fetch_size(&self) -> usize {
        self.chunk_size.max(MIN_FETCH_SIZE)
    }
}

/// What each decoder produced, kept apart.
///
/// `None` means the container wasn't there (or its decoder was off).
#[derive(Clone, Debug, Default)]
pub struct Segments {
    /// IFD 0. Also holds TIFF header errors.
    pub image: Option<Result<TagMap, MetadataError>>,
    pub exif: Option<Result<TagMap, MetadataError>>,
    pub gps: Option<Result<TagMap, MetadataError>>,
    pub interop: Option<Result<TagMap, MetadataError>>,
    pub thumbnail: Option<Result<TagMap, MetadataError>>,
    pub iptc: Option<Result<TagMap, MetadataError>>,

    /// XMP that couldn't be decoded shows up as an empty map.
    pub xmp: Option<TagMap<XmpValue>>,

    pub flir: Option<Result<Flir, MetadataError>>,
}

impl Segments {
    /// Whether nothing at all was found.
    pub fn is_empty(&self) -> bool {
        self.image.is_none()
            && self.exif.is_none()
            && self.gps.is_none()
            && self.interop.is_none()
            && self.thumbnail.is_none()
            && self.iptc.is_none()
            && self.xmp.is_none()
            && self.flir.is_none()
    }

    /// Flattens the TIFF directories and IPTC into one map.
    ///
    /// Later directories win when keys collide: image, then Exif, GPS,
    /// Interop, thumbnail, and finally IPTC.
    pub fn into_merged(self) -> Merged {
        let mut tags = TagMap::new();
        let mut errors = Vec::new();

        for slot in [
            self.image,
            self.exif,
            self.gps,
            self.interop,
            self.thumbnail,
            self.iptc,
        ]
        .into_iter()
        .flatten()
        {
            match slot {
                Ok(t) => tags.merge(t),
                Err(e) => errors.push(e),
            }
        }

        let flir = match self.flir {
            Some(Ok(flir)) => Some(flir),
            Some(Err(e)) => {
                errors.push(e);
                None
            }
            None => None,
        };

        Merged {
            tags,
            xmp: self.xmp,
            flir,
            errors,
        }
    }
}

/// Every decoder's results, flattened.
#[derive(Clone, Debug, Default)]
pub struct Merged {
    pub tags: TagMap,
    pub xmp: Option<TagMap<XmpValue>>,
    pub flir: Option<Flir>,

    /// Errors from any container, in the order the containers were merged.
    pub errors: Vec<MetadataError>,
}

/// The result of a parse.
#[derive(Clone, Debug)]
pub enum Metadata {
    /// Results kept apart by container. See [`Options::merge_output`].
    Nested(Segments),
    Merged(Merged),
}

/// Parses metadata out of a [`ByteSource`].
///
/// Creating a parser reads from the source right away. Parsing doesn't
/// change the parser, so [`MetadataParser::parse`] can be called more than
/// once (and from more than one thread).
#[derive(Debug)]
pub struct MetadataParser<S: ByteSource> {
    source: S,
    options: Options,

    /// The held bytes, starting at offset 0 of the source.
    buffer: Vec<u8>,

    /// Segments we've already looked for, found or not.
    segments: RwLock<FxHashMap<SegmentKind, Option<Segment>>>,
}

impl<S: ByteSource> MetadataParser<S> {
    /// Reads from `source`, according to `options`.
    pub fn new(source: S, options: Options) -> Result<Self, SourceError> {
        let buffer = if options.whole_file {
            source.read_all()?
        } else if source.is_empty() {
            Vec::new()
        } else {
            source.read_range(0, options.chunk_size)?
        };
        log::debug!(
            "Holding `{}` of `{}` byte(s) from the source.",
            buffer.len(),
            source.len()
        );

        Ok(Self {
            source,
            options,
            buffer,
            segments: RwLock::new(FxHashMap::default()),
        })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The bytes read when the parser was created.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    fn window(&self) -> Window<'_> {
        Window::new(&self.buffer, 0)
    }

    /// Finds the segment of the given kind in the held bytes.
    ///
    /// Each kind is only searched for once.
    pub fn segment(&self, kind: SegmentKind) -> Option<Segment> {
        let cached = self.segments.read().get(&kind).copied();
        if let Some(found) = cached {
            log::trace!("Using cached {kind} segment lookup.");
            return found;
        }

        let mut locked = self.segments.write();

        // it might've been found while we waited for the lock
        if let Some(found) = locked.get(&kind) {
            return *found;
        }

        let found = segment::find(&self.buffer, kind);
        locked.insert(kind, found);
        found
    }

    /// Runs every enabled decoder.
    ///
    /// Returns `None` when no container was found. A container that failed
    /// to decode still counts as found.
    pub fn parse(&self) -> Option<Metadata> {
        let mut segments = Segments::default();

        let mut endianness = None;
        if self.options.tiff {
            endianness = self.decode_tiff(&mut segments);
        }

        if self.options.xmp {
            segments.xmp = self.decode_xmp(&mut segments);
        }

        if self.options.icc {
            log::debug!("ICC profiles aren't decoded. Skipping...");
        }

        if self.options.iptc {
            segments.iptc = self.decode_iptc();
        }

        if self.options.flir {
            // without a TIFF header to go by, FLIR is assumed to be big-endian
            segments.flir = self.decode_flir(endianness.unwrap_or(Endianness::Big));
        }

        if segments.is_empty() {
            log::debug!("No metadata containers were found.");
            return None;
        }

        if self.options.merge_output {
            Some(Metadata::Merged(segments.into_merged()))
        } else {
            Some(Metadata::Nested(segments))
        }
    }

    /// Decodes the TIFF body into `out`.
    ///
    /// Returns the body's byte order, if its header could be read.
    fn decode_tiff(&self, out: &mut Segments) -> Option<Endianness> {
        let tiff = self.segment(SegmentKind::Tiff)?;
        let window = self.window();

        let header = match tiff::parse_header(&window, tiff.start) {
            Ok(h) => h,
            Err(error) => {
                out.image = Some(Err(MetadataError::Tiff {
                    group: IfdGroup::_0,
                    error,
                }));
                return None;
            }
        };

        let ifd0_ctx = IfdContext {
            tiff_start: tiff.start,
            endianness: header.endianness,
            group: IfdGroup::_0,
            source_len: self.source.len(),
        };
        let ctx = |group| IfdContext { group, ..ifd0_ctx };

        let DecodedIfd {
            tags: mut image,
            next_ifd,
        } = match self.read_ifd(&window, &ifd0_ctx, header.ifd0_offset) {
            Ok(ifd) => ifd,
            Err(error) => {
                log::error!("Failed to decode IFD 0. err: {error}");
                out.image = Some(Err(MetadataError::Tiff {
                    group: IfdGroup::_0,
                    error,
                }));
                return Some(header.endianness);
            }
        };

        if image.is_empty() {
            log::debug!("IFD 0 is empty, so it can't point to other directories.");
            out.image = Some(Ok(image));
            return Some(header.endianness);
        }

        let exif_offset = pointer(&image, EXIF_POINTER);
        let gps_offset = pointer(&image, GPS_POINTER);
        let interop_offset = pointer(&image, INTEROP_POINTER);

        if self.options.exif {
            if let Some(offset) = exif_offset {
                out.exif = Some(self.decode_ifd(&window, &ctx(IfdGroup::Exif), offset));
            }
        }

        if self.options.gps {
            if let Some(offset) = gps_offset {
                out.gps = Some(
                    self.decode_ifd(&window, &ctx(IfdGroup::Gps), offset)
                        .map(|mut gps| {
                            if self.options.post_process {
                                translate::derive_gps(&mut gps);
                            }
                            gps
                        }),
                );
            }
        }

        if self.options.interop {
            // some writers only put the pointer in the Exif IFD
            let offset = interop_offset.or_else(|| match out.exif {
                Some(Ok(ref exif)) => pointer(exif, INTEROP_POINTER),
                _ => None,
            });
            if let Some(offset) = offset {
                out.interop = Some(self.decode_ifd(&window, &ctx(IfdGroup::Interop), offset));
            }
        }

        if self.options.thumbnail && !self.options.merge_output {
            if let Some(offset) = next_ifd {
                out.thumbnail = Some(self.decode_ifd(&window, &ctx(IfdGroup::_1), offset));
            }
        }

        if self.options.post_process {
            for key in [EXIF_POINTER, GPS_POINTER, INTEROP_POINTER] {
                image.remove(key);
            }
            translate::translate_tags(&mut image);
        }
        out.image = Some(Ok(image));

        Some(header.endianness)
    }

    /// Decodes a directory other than IFD 0, translating it if asked to.
    fn decode_ifd(
        &self,
        window: &Window<'_>,
        ctx: &IfdContext,
        offset: u32,
    ) -> Result<TagMap, MetadataError> {
        let mut tags = self
            .read_ifd(window, ctx, offset)
            .map_err(|error| {
                log::error!("Failed to decode the {} IFD. err: {error}", ctx.group);
                MetadataError::Tiff {
                    group: ctx.group,
                    error,
                }
            })?
            .tags;

        if self.options.post_process {
            translate::translate_tags(&mut tags);
        }
        Ok(tags)
    }

    /// Decodes a directory, fetching it from the source once if it isn't
    /// held.
    fn read_ifd(
        &self,
        window: &Window<'_>,
        ctx: &IfdContext,
        offset: u32,
    ) -> TiffResult<DecodedIfd> {
        let range = match tiff::parse_ifd(window, ctx, offset)? {
            Fetch::Ready(ifd) => return Ok(ifd),
            Fetch::NeedMoreBytes(range) => range,
        };

        let out_of_bounds = TiffError::SegmentOffsetOutOfBounds {
            offset: range.start,
            held_end: window.end(),
        };
        if self.options.whole_file {
            return Err(out_of_bounds);
        }

        let size = range.size.max(self.options.fetch_size());
        log::debug!(
            "Fetching `{size}` byte(s) at `{}` for the {} IFD...",
            range.start,
            ctx.group
        );
        let fetched = self.source.read_range(range.start, size)?;

        match tiff::parse_ifd(&Window::new(&fetched, range.start), ctx, offset)? {
            Fetch::Ready(ifd) => Ok(ifd),
            Fetch::NeedMoreBytes(_) => Err(out_of_bounds),
        }
    }

    /// Decodes XMP, from its own segment or from `ApplicationNotes`.
    ///
    /// When `ApplicationNotes` is used, it's removed from the TIFF results.
    fn decode_xmp(&self, out: &mut Segments) -> Option<TagMap<XmpValue>> {
        let raw: Cow<'_, [u8]> = match self.segment(SegmentKind::Xmp) {
            Some(s) => Cow::Borrowed(self.buffer.get(s.start..s.end)?),
            None => {
                log::trace!("No XMP segment. Checking `{APPLICATION_NOTES}`...");
                Cow::Owned(take_application_notes(out)?)
            }
        };

        Some(xmp::decode(&xmp::prepare_packet(&raw)))
    }

    fn decode_iptc(&self) -> Option<Result<TagMap, MetadataError>> {
        let segment = self.segment(SegmentKind::Iptc)?;
        Some(iptc::parse_iptc(&self.window(), &segment).map_err(MetadataError::from))
    }

    fn decode_flir(&self, assumed: Endianness) -> Option<Result<Flir, MetadataError>> {
        let segment = self.segment(SegmentKind::Flir)?;
        Some(
            flir::parse_flir(&self.window(), segment.start, assumed).map_err(|e| {
                log::error!("Failed to decode FLIR segment. err: {e}");
                MetadataError::from(e)
            }),
        )
    }
}

/// Reads a sub-IFD pointer out of a directory.
fn pointer(tags: &TagMap, name: &str) -> Option<u32> {
    tags.get(name).and_then(Value::as_u32)
}

/// Removes `ApplicationNotes` from IFD 0 and the Exif IFD, returning the
/// bytes of the first one found.
fn take_application_notes(out: &mut Segments) -> Option<Vec<u8>> {
    let mut notes = None;
    for slot in [&mut out.image, &mut out.exif] {
        if let Some(Ok(tags)) = slot {
            if let Some(value) = tags.remove(APPLICATION_NOTES) {
                notes = notes.or_else(|| value.to_bytes());
            }
        }
    }
    notes
}
