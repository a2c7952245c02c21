//! # `exifscan`
//!
//! A library to pull metadata out of JPEG and TIFF files: camera settings,
//! GPS coordinates, thermal calibration constants from FLIR cameras, XMP and
//! IPTC captions.
//!
//! ## Usage
//!
//! Hand a [`MetadataParser`] anything implementing [`ByteSource`] (byte
//! slices and vectors already do), then call [`MetadataParser::parse`]:
//!
//! ```
//! use exifscan::{MetadataParser, Options};
//!
//! let bytes: &[u8] = &[0xFF, 0xD8, 0xFF, 0xD9];
//! let parser = MetadataParser::new(bytes, Options::default()).unwrap();
//!
//! // no metadata containers, so there's nothing to report
//! assert!(parser.parse().is_none());
//! ```
//!
//! ## What gets decoded
//!
//! - TIFF/Exif: IFD 0, plus the Exif, GPS, Interop and thumbnail (IFD 1)
//!   directories it points at.
//! - XMP: turned into a tree of [`XmpTag`](exifscan_types::xmp::XmpTag)
//!   nodes.
//! - IPTC: a single Photoshop IPTC resource.
//! - FLIR FFF: the thermal camera's record directory.
//!
//! Each of those can be switched on or off through [`Options`].
//!
//! ## License
//!
//! This project is dual-licensed under either the Apache License 2.0 or the
//! MIT License at your option.

#![forbid(unsafe_code)]

pub mod cursor;
pub mod error;
pub mod flir;
pub mod iptc;
pub mod parser;
pub mod segment;
pub mod source;
pub mod tiff;
pub mod translate;
pub mod xmp;

pub use exifscan_types as types;
pub use exifscan_types::value::{TagKey, TagMap, Value};

pub use crate::{
    error::MetadataError,
    parser::{Merged, Metadata, MetadataParser, Options, Segments},
    segment::{Segment, SegmentKind},
    source::{ByteSource, SourceError},
};

/// Internal utility methods.
pub(crate) mod util {
    /// Converts a string to a number the lenient way many metadata writers
    /// expect.
    ///
    /// Surrounding whitespace is ignored, and an empty string is zero. Hex
    /// (`0x`), octal (`0o`) and binary (`0b`) integer prefixes are accepted,
    /// as is `Infinity`. Anything else must be a plain decimal float.
    pub fn lenient_number(s: &str) -> Option<f64> {
        let s = s.trim();
        if s.is_empty() {
            return Some(0.0);
        }

        for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
            if let Some(digits) = s.strip_prefix(prefix) {
                return u64::from_str_radix(digits, radix).ok().map(|n| n as f64);
            }
        }

        let unsigned = s.trim_start_matches(['+', '-']);
        if unsigned == "Infinity" {
            return Some(if s.starts_with('-') {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            });
        }

        // rust also accepts `inf` and `nan`, which we don't want
        if !s
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'+' | b'-' | b'e' | b'E'))
        {
            return None;
        }

        s.parse::<f64>().ok()
    }

    /// Decodes bytes as Latin-1, where every byte is one codepoint.
    pub fn latin1(bytes: &[u8]) -> String {
        bytes.iter().map(|&b| b as char).collect()
    }

    /// Helper function to initialize the logger for testing.
    #[cfg(test)]
    pub fn logger() {
        _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::max())
            .format_file(true)
            .format_line_number(true)
            .try_init();
    }

    #[cfg(test)]
    mod tests {
        use super::lenient_number;

        #[test]
        fn lenient_numbers() {
            assert_eq!(lenient_number("42"), Some(42.0));
            assert_eq!(lenient_number(" 7.5 "), Some(7.5));
            assert_eq!(lenient_number(""), Some(0.0));
            assert_eq!(lenient_number("0x1A"), Some(26.0));
            assert_eq!(lenient_number("1e3"), Some(1000.0));
            assert_eq!(lenient_number("-Infinity"), Some(f64::NEG_INFINITY));
            assert_eq!(lenient_number("inf"), None);
            assert_eq!(lenient_number("nan"), None);
            assert_eq!(lenient_number("12abc"), None);
        }
    }
}
