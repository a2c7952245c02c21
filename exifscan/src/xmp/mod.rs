//! Decodes XMP packets into a tree of [`XmpTag`] nodes.
//!
//! XMP is RDF/XML. Every `rdf:Description` under `rdf:RDF` contributes its
//! attributes and child elements as top-level properties, keyed by their
//! qualified names (like `dc:title`).
//!
//! After the tree is built, text values are coerced into numbers and
//! booleans where they look like them. A few keys have a declared type that
//! overrides this (see [`XmpKeyType`]).
//!
//! Decoding is all-or-nothing. If anything fails, including one badly-typed
//! boolean, the whole packet is treated as empty.

use exifscan_types::{
    value::{TagKey, TagMap},
    xmp::{XmpKeyType, XmpTag, XmpValue},
};
use xmltree::Element;

use self::{
    error::XmpError,
    node::{Naming, RdfElementExt as _, attributes_as_tags, children_as_tags},
};

pub mod error;
mod node;

/// Opens an XMP packet.
const PACKET_START: &str = "<x:xmpmeta";

/// Closes an XMP packet.
const PACKET_END: &str = "x:xmpmeta>";

/// Cleans up raw XMP bytes so they can be handed to the XML parser.
///
/// NUL bytes are removed. The text is then cut down to the `x:xmpmeta`
/// element, or, if there isn't one, to everything from the first `<`.
pub fn prepare_packet(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw).replace('\0', "");

    let start = text.find(PACKET_START);
    let end = text.rfind(PACKET_END).map(|e| e + PACKET_END.len());
    match (start, end) {
        (Some(start), Some(end)) if start < end => text[start..end].to_string(),
        _ => match text.find('<') {
            Some(start) => text[start..].to_string(),
            None => text,
        },
    }
}

/// Decodes an XMP packet, or returns an empty map if it can't be decoded.
pub fn decode(text: &str) -> TagMap<XmpValue> {
    parse_xmp(text).unwrap_or_else(|e| {
        log::error!("Discarding XMP packet. err: {e}");
        TagMap::new()
    })
}

/// Decodes an XMP packet.
pub fn parse_xmp(text: &str) -> Result<TagMap<XmpValue>, XmpError> {
    let document = Element::parse(text.as_bytes())?;
    let rdf = find_rdf(&document).ok_or_else(|| {
        log::error!("Couldn't find an `rdf:RDF` element in the document.");
        XmpError::NoRdfElement
    })?;

    let mut tags: TagMap<XmpTag> = TagMap::new();
    for description in rdf.element_children() {
        log::trace!("Parsing `{}` under `rdf:RDF`.", description.qualified_name());
        tags.merge(attributes_as_tags(description, Naming::Qualified));
        tags.merge(children_as_tags(description, Naming::Qualified));
    }
    log::debug!("Found `{}` XMP properties.", tags.len());

    tags.into_iter()
        .map(|(key, tag)| {
            let value = coerce(&key, tag.value)?;
            Ok((key, value))
        })
        .collect()
}

/// Finds `rdf:RDF`, either as the root or inside `x:xmpmeta`.
fn find_rdf(element: &Element) -> Option<&Element> {
    if element.is_rdf("RDF") {
        return Some(element);
    }

    if !element.is_xmpmeta() {
        log::warn!(
            "XMP root is `{}`, not `x:xmpmeta` or `rdf:RDF`.",
            element.qualified_name()
        );
        return None;
    }

    element
        .element_children()
        .find(|c| c.is_rdf("RDF") || c.is_xmpmeta())
        .and_then(find_rdf)
}

/// Coerces text that looks like a number or boolean.
///
/// Arrays are coerced item by item. Structures are left alone.
fn coerce(key: &TagKey, value: XmpValue) -> Result<XmpValue, XmpError> {
    match value {
        XmpValue::Array(items) => items
            .into_iter()
            .map(|mut item| {
                item.value = coerce(key, item.value)?;
                Ok(item)
            })
            .collect::<Result<Vec<_>, _>>()
            .map(XmpValue::Array),
        XmpValue::Text(text) => coerce_text(key, text),
        other => Ok(other),
    }
}

fn coerce_text(key: &TagKey, text: String) -> Result<XmpValue, XmpError> {
    match key.name().and_then(XmpKeyType::for_key) {
        Some(XmpKeyType::Bool) => match text.as_str() {
            "True" | "true" | "1" => Ok(XmpValue::Bool(true)),
            "False" | "false" | "0" => Ok(XmpValue::Bool(false)),
            _ => {
                log::error!("`{key}` must be a boolean, but got `{text}`.");
                Err(XmpError::BadBool {
                    key: key.to_string(),
                    value: text,
                })
            }
        },

        Some(XmpKeyType::Text) => Ok(XmpValue::Text(text)),

        None => {
            if !text.trim().is_empty() {
                if let Some(n) = crate::util::lenient_number(&text) {
                    return Ok(XmpValue::Number(n));
                }
            }

            Ok(match text.as_str() {
                "True" | "true" => XmpValue::Bool(true),
                "False" | "false" => XmpValue::Bool(false),
                _ => XmpValue::Text(text),
            })
        }
    }
}
