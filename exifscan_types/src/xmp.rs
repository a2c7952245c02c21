//! The XMP tag tree.
//!
//! XMP is decoded into a tree of [`XmpTag`] nodes. Each node carries its
//! value, any qualifier attributes, and a human-readable description of the
//! value.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::value::TagMap;

/// One node of the XMP tree.
#[derive(Clone, Debug, PartialEq)]
pub struct XmpTag {
    /// The node's value.
    pub value: XmpValue,

    /// Qualifiers attached to the node, keyed by qualified name.
    pub attributes: TagMap<String>,

    /// A flattened, human-readable rendition of `value`.
    pub description: String,
}

/// The value of an XMP node.
#[derive(Clone, Debug, PartialEq)]
pub enum XmpValue {
    /// Plain text, or a `rdf:resource` URI.
    Text(String),

    /// A numeric-looking string, coerced.
    Number(f64),

    /// A boolean-looking string, coerced.
    Bool(bool),

    /// A structure: named child nodes.
    Struct(TagMap<XmpTag>),

    /// An RDF container (`rdf:Bag`, `rdf:Seq` or `rdf:Alt`).
    Array(Vec<XmpTag>),
}

impl XmpValue {
    /// Returns the contained text, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            XmpValue::Text(t) => Some(t.as_str()),
            _ => None,
        }
    }

    /// Returns the contained structure, if any.
    pub fn as_struct(&self) -> Option<&TagMap<XmpTag>> {
        match self {
            XmpValue::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the contained array, if any.
    pub fn as_array(&self) -> Option<&[XmpTag]> {
        match self {
            XmpValue::Array(a) => Some(a.as_slice()),
            _ => None,
        }
    }
}

/// A type some XMP keys are known to carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum XmpKeyType {
    /// Must be a boolean. `True`, `true`, `1`, `False`, `false`, `0` are the
    /// only accepted spellings.
    Bool,

    /// Must stay as text, even when it looks like a number.
    Text,
}

impl XmpKeyType {
    /// Finds the declared type of a qualified key, if it has one.
    pub fn for_key(key: &str) -> Option<XmpKeyType> {
        XMP_KEY_TYPES.get(key).copied()
    }
}

/// Keys whose values don't follow the generic coercion rules.
pub static XMP_KEY_TYPES: LazyLock<FxHashMap<&'static str, XmpKeyType>> = LazyLock::new(|| {
    let mut m = FxHashMap::default();

    // DJI drones
    m.insert("drone-dji:CamReverse", XmpKeyType::Bool);
    m.insert("drone-dji:GimbalReverse", XmpKeyType::Bool);

    // Camera Raw: `Version` looks numeric, but `11.0` and `11` aren't the
    // same version
    m.insert("crs:Version", XmpKeyType::Text);

    m.insert("Camera:IsNormalized", XmpKeyType::Bool);

    m
});

/// Renames contact-info keys when writing descriptions.
///
/// Only descriptions are affected. The keys in the tree keep their names.
pub fn clear_text_key(local_name: &str) -> &str {
    match local_name {
        "CiAdrCity" => "CreatorCity",
        "CiAdrCtry" => "CreatorCountry",
        "CiAdrExtadr" => "CreatorAddress",
        "CiAdrPcode" => "CreatorPostalCode",
        "CiAdrRegion" => "CreatorRegion",
        "CiEmailWork" => "CreatorWorkEmail",
        "CiTelWork" => "CreatorWorkPhone",
        "CiUrlWork" => "CreatorWorkUrl",
        other => other,
    }
}
