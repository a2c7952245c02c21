//! Types for decoding image metadata in `exifscan`.
//!
//! This crate holds the data side of things: the decoded value model, tag
//! dictionaries, value translation tables, FLIR record schemas and the XMP
//! node model. It doesn't parse anything on its own.

pub mod flir;
pub mod iptc;
pub mod tiff;
pub mod value;
pub mod xmp;
