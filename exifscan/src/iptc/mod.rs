//! IPTC IIM datasets, as stored in a Photoshop `8BIM` resource.
//!
//! Each dataset is a tag marker (`0x1C`), a record number, a dataset ID, a
//! big-endian size, and then the value itself. We only read the application
//! record (record 2), which holds captions, keywords, credits and the like.

use exifscan_types::{
    iptc::dataset_name,
    value::{TagKey, TagMap, Value},
};

use self::error::IptcError;
use crate::{cursor::Window, segment::Segment};

pub mod error;

/// Marks the start of an application record dataset.
const DATASET_MARKER: [u8; 2] = [0x1C, 0x02];

/// Marker, dataset ID, and a two-byte size.
const DATASET_HEADER_LEN: usize = 5;

/// Decodes every application record dataset in `segment`.
///
/// Datasets that show up more than once are collected into a list, in the
/// order they appear.
pub fn parse_iptc(window: &Window<'_>, segment: &Segment) -> Result<TagMap, IptcError> {
    let bytes = window
        .slice(segment.start, segment.end.saturating_sub(segment.start))
        .map_err(IptcError::SegmentOutOfBounds)?;

    let mut tags = TagMap::new();
    let mut offset = 0_usize;
    while offset < bytes.len() {
        if bytes.get(offset..offset + 2) != Some(DATASET_MARKER.as_slice()) {
            offset += 1;
            continue;
        }

        let Some(&[_, _, id, size_hi, size_lo]) = bytes.get(offset..offset + DATASET_HEADER_LEN)
        else {
            log::warn!("IPTC dataset header at `{offset}` is cut off by the segment end.");
            break;
        };
        let size = u16::from_be_bytes([size_hi, size_lo]) as usize;

        let value_start = offset + DATASET_HEADER_LEN;
        let value_end = value_start + size;
        let Some(raw) = bytes.get(value_start..value_end) else {
            log::error!("IPTC dataset `{id:#04x}` doesn't fit in its segment.");
            return Err(IptcError::DatasetOutOfBounds {
                id,
                value_end: segment.start + value_end,
                segment_end: segment.end,
            });
        };

        let key = match dataset_name(id) {
            Some(name) => TagKey::from(name),
            None => TagKey::Id(id as u16),
        };
        log::trace!("Found IPTC dataset `{key}` (`{size}` bytes).");
        push_dataset(&mut tags, key, Value::Text(crate::util::latin1(raw)));

        offset = value_end;
    }

    Ok(tags)
}

/// Adds a dataset, turning repeats into a list.
fn push_dataset(tags: &mut TagMap, key: TagKey, value: Value) {
    let existing = tags.iter_mut().find(|(k, _)| **k == key).map(|(_, v)| v);
    match existing {
        Some(Value::List(items)) => items.push(value),
        Some(single) => {
            let first = core::mem::replace(single, Value::List(Vec::new()));
            *single = Value::List(vec![first, value]);
        }
        None => {
            tags.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use exifscan_types::value::Value;

    use super::{error::IptcError, parse_iptc};
    use crate::{
        cursor::Window,
        segment::{Segment, SegmentKind},
        util::logger,
    };

    fn dataset(bytes: &mut Vec<u8>, id: u8, value: &[u8]) {
        bytes.extend_from_slice(&[0x1C, 0x02, id]);
        bytes.extend_from_slice(&(value.len() as u16).to_be_bytes());
        bytes.extend_from_slice(value);
    }

    fn whole(bytes: &[u8]) -> Segment {
        Segment {
            kind: SegmentKind::Iptc,
            start: 0,
            size: bytes.len(),
            end: bytes.len(),
        }
    }

    #[test]
    fn decodes_datasets() {
        logger();
        let mut bytes = Vec::new();
        // record version, from the envelope record, is ignored
        bytes.extend_from_slice(&[0x1C, 0x01, 0x5A, 0x00, 0x03, 0x1B, 0x25, 0x47]);
        dataset(&mut bytes, 0x78, b"A caf\xE9 at dusk");
        dataset(&mut bytes, 0x19, b"coffee");
        dataset(&mut bytes, 0x6E, b"Jane Doe");
        dataset(&mut bytes, 0x19, b"dusk");
        dataset(&mut bytes, 0x19, b"street");
        dataset(&mut bytes, 0xF0, b"???");

        let tags = parse_iptc(&Window::new(&bytes, 0), &whole(&bytes)).unwrap();

        assert_eq!(tags.get("caption"), Some(&Value::from("A café at dusk")));
        assert_eq!(tags.get("credit"), Some(&Value::from("Jane Doe")));
        assert_eq!(
            tags.get("keywords"),
            Some(&Value::List(vec![
                Value::from("coffee"),
                Value::from("dusk"),
                Value::from("street")
            ]))
        );
        assert_eq!(tags.get_id(0xF0), Some(&Value::from("???")));
        assert_eq!(tags.len(), 4);
    }

    /// Marker bytes inside a value don't start a new dataset.
    #[test]
    fn values_are_skipped() {
        logger();
        let mut bytes = Vec::new();
        dataset(&mut bytes, 0x69, &[b'a', 0x1C, 0x02, 0x78, 0x00, 0x01, b'b']);

        let tags = parse_iptc(&Window::new(&bytes, 0), &whole(&bytes)).unwrap();
        assert_eq!(tags.len(), 1);
        assert!(tags.contains("headline"));
    }

    #[test]
    fn only_the_segment_is_scanned() {
        logger();
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&[0; 8]);
        dataset(&mut bytes, 0x05, b"inside");
        let end = bytes.len();
        dataset(&mut bytes, 0x5A, b"outside");

        let segment = Segment {
            kind: SegmentKind::Iptc,
            start: 8,
            size: end - 8,
            end,
        };
        let tags = parse_iptc(&Window::new(&bytes, 0), &segment).unwrap();
        assert_eq!(tags.get("objectName"), Some(&Value::from("inside")));
        assert!(!tags.contains("city"));
    }

    #[test]
    fn value_past_the_end() {
        logger();
        let mut bytes = Vec::new();
        dataset(&mut bytes, 0x78, b"a long caption");
        bytes.truncate(bytes.len() - 4);

        assert_eq!(
            parse_iptc(&Window::new(&bytes, 0), &whole(&bytes)),
            Err(IptcError::DatasetOutOfBounds {
                id: 0x78,
                value_end: 19,
                segment_end: 15
            })
        );
    }
}
