//! Turns RDF/XML elements into [`XmpTag`] nodes.
//!
//! RDF has a few ways of spelling the same thing. Each element is checked
//! against these shapes, in order:
//!
//! 1. a value wrapped in a description with `rdf:value` (plus qualifiers),
//! 2. a structure, written as `rdf:parseType="Resource"` or an inner
//!    `rdf:Description`,
//! 3. a compact structure, with its fields stored as attributes,
//! 4. an `rdf:Bag`, `rdf:Seq` or `rdf:Alt` container,
//! 5. a plain value.

use exifscan_types::{
    value::{TagKey, TagMap},
    xmp::{XmpTag, XmpValue, clear_text_key},
};
use xmltree::{AttributeName, Element, XMLNode};

/// The namespace of every `rdf:` element and attribute.
pub(super) const RDF_NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// The namespace of the `x:xmpmeta` wrapper.
pub(super) const X_NAMESPACE: &str = "adobe:ns:meta/";

/// How keys of a tag map are spelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Naming {
    /// `prefix:local`. Used for top-level properties, so properties from
    /// different namespaces can't collide.
    Qualified,

    /// Just the local name. Used for structure fields.
    Local,
}

fn qualified(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

fn is_rdf_attribute(key: &AttributeName, local: &str) -> bool {
    key.local_name == local
        && (key.namespace.as_deref() == Some(RDF_NAMESPACE) || key.prefix.as_deref() == Some("rdf"))
}

fn is_namespace_definition(key: &AttributeName) -> bool {
    key.prefix.as_deref() == Some("xmlns") || (key.prefix.is_none() && key.local_name == "xmlns")
}

pub(super) trait RdfElementExt {
    fn qualified_name(&self) -> String;
    fn key(&self, naming: Naming) -> TagKey;
    fn is_rdf(&self, local: &str) -> bool;
    fn is_xmpmeta(&self) -> bool;
    fn element_children(&self) -> impl Iterator<Item = &Element>;
    fn rdf_child(&self, local: &str) -> Option<&Element>;
    fn rdf_attribute(&self, local: &str) -> Option<&str>;
    fn text_only(&self) -> Option<&str>;
    fn sorted_attributes(&self) -> Vec<(&AttributeName, &str)>;
}

impl RdfElementExt for Element {
    fn qualified_name(&self) -> String {
        qualified(self.prefix.as_deref(), &self.name)
    }

    fn key(&self, naming: Naming) -> TagKey {
        match naming {
            Naming::Qualified => TagKey::from(self.qualified_name()),
            Naming::Local => TagKey::from(self.name.clone()),
        }
    }

    fn is_rdf(&self, local: &str) -> bool {
        self.name == local
            && (self.namespace.as_deref() == Some(RDF_NAMESPACE)
                || self.prefix.as_deref() == Some("rdf"))
    }

    fn is_xmpmeta(&self) -> bool {
        self.name == "xmpmeta"
            && (self.namespace.as_deref() == Some(X_NAMESPACE) || self.prefix.as_deref() == Some("x"))
    }

    fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| c.as_element())
    }

    fn rdf_child(&self, local: &str) -> Option<&Element> {
        self.element_children().find(|c| c.is_rdf(local))
    }

    fn rdf_attribute(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| is_rdf_attribute(key, local))
            .map(|(_, value)| value.as_str())
    }

    /// Grabs the element's text, if text is the only thing it holds.
    fn text_only(&self) -> Option<&str> {
        match self.children.as_slice() {
            [XMLNode::Text(text)] | [XMLNode::CData(text)] => Some(text.as_str()),
            _ => None,
        }
    }

    /// Attributes, ordered by qualified name so output doesn't depend on
    /// map ordering.
    fn sorted_attributes(&self) -> Vec<(&AttributeName, &str)> {
        let mut attributes: Vec<_> = self
            .attributes
            .iter()
            .map(|(key, value)| (key, value.as_str()))
            .collect();
        attributes.sort_by_key(|(key, _)| qualified(key.prefix.as_deref(), &key.local_name));
        attributes
    }
}

/// Builds a node, describing its value.
fn tag(value: XmpValue, attributes: TagMap<String>) -> XmpTag {
    let description = describe(&value);
    XmpTag {
        value,
        attributes,
        description,
    }
}

/// Flattens a value into human-readable text.
///
/// Arrays join their items with `", "`. Structures join `Field: value` pairs
/// with `"; "`.
pub(super) fn describe(value: &XmpValue) -> String {
    match value {
        XmpValue::Text(text) => text.clone(),
        XmpValue::Number(n) => n.to_string(),
        XmpValue::Bool(b) => b.to_string(),
        XmpValue::Array(items) => items
            .iter()
            .map(|item| describe(&item.value))
            .collect::<Vec<_>>()
            .join(", "),
        XmpValue::Struct(fields) => fields
            .iter()
            .map(|(key, field)| {
                let name = key.name().map(clear_text_key).unwrap_or_default();
                let value = match field.value {
                    XmpValue::Text(ref text) => text.as_str(),
                    _ => field.description.as_str(),
                };
                format!("{name}: {value}")
            })
            .collect::<Vec<_>>()
            .join("; "),
    }
}

/// Qualifiers on an element: its attributes, except RDF syntax and
/// namespace declarations.
pub(super) fn qualifiers(element: &Element) -> TagMap<String> {
    element
        .sorted_attributes()
        .into_iter()
        .filter(|(key, _)| {
            !is_rdf_attribute(key, "parseType")
                && !is_rdf_attribute(key, "resource")
                && !is_namespace_definition(key)
        })
        .map(|(key, value)| {
            (
                qualified(key.prefix.as_deref(), &key.local_name),
                value.to_string(),
            )
        })
        .collect()
}

/// Turns an element's attributes into text nodes.
pub(super) fn attributes_as_tags(element: &Element, naming: Naming) -> TagMap<XmpTag> {
    element
        .sorted_attributes()
        .into_iter()
        .filter(|(key, _)| !is_rdf_attribute(key, "parseType") && !is_namespace_definition(key))
        .map(|(key, value)| {
            let name = match naming {
                Naming::Qualified => qualified(key.prefix.as_deref(), &key.local_name),
                Naming::Local => key.local_name.clone(),
            };
            (name, tag(XmpValue::Text(value.to_string()), TagMap::new()))
        })
        .collect()
}

/// Turns an element's children into nodes.
///
/// A repeated child name keeps only the last child's node.
pub(super) fn children_as_tags(element: &Element, naming: Naming) -> TagMap<XmpTag> {
    element
        .element_children()
        .map(|child| (child.key(naming), parse_node(child)))
        .collect()
}

/// The container of an array-shaped element, if it has one.
fn array_container(element: &Element) -> Option<&Element> {
    ["Bag", "Seq", "Alt"]
        .into_iter()
        .find_map(|kind| element.rdf_child(kind))
}

fn has_rdf_value(element: &Element) -> bool {
    element.rdf_child("value").is_some()
}

fn is_parse_type_resource(element: &Element) -> bool {
    element.rdf_attribute("parseType") == Some("Resource")
}

/// Whether a value is wrapped in a description alongside its qualifiers.
fn is_described_value(element: &Element) -> bool {
    (is_parse_type_resource(element) && has_rdf_value(element))
        || element.rdf_child("Description").is_some_and(has_rdf_value)
}

/// Whether an element holds a structure through RDF syntax.
fn is_described_structure(element: &Element) -> bool {
    is_parse_type_resource(element) || element.rdf_child("Description").is_some()
}

/// Whether an element holds nothing but attributes.
fn is_attribute_only(element: &Element) -> bool {
    element.text_only().is_none() && element.element_children().next().is_none()
}

/// Parses one property element.
pub(super) fn parse_node(element: &Element) -> XmpTag {
    log::trace!("Parsing XMP property `{}`.", element.qualified_name());

    if is_described_value(element) {
        return parse_described_value(element);
    }

    if is_described_structure(element) {
        return parse_described_structure(element);
    }

    if is_attribute_only(element) && element.rdf_attribute("resource").is_none() {
        let fields = attributes_as_tags(element, Naming::Local);
        return tag(XmpValue::Struct(fields), TagMap::new());
    }

    if let Some(container) = array_container(element) {
        return parse_array(element, container);
    }

    let value = match element.rdf_attribute("resource").filter(|uri| !uri.is_empty()) {
        Some(uri) => XmpValue::Text(uri.to_string()),
        None => match element.text_only() {
            Some(text) => XmpValue::Text(text.to_string()),
            None => XmpValue::Struct(children_as_tags(element, Naming::Local)),
        },
    };
    tag(value, qualifiers(element))
}

/// Parses `<prop rdf:parseType="Resource"><rdf:value>..</rdf:value>..</prop>`
/// or the same with an inner `rdf:Description`.
///
/// Everything besides `rdf:value` becomes a qualifier.
fn parse_described_value(element: &Element) -> XmpTag {
    let mut attributes = qualifiers(element);
    let inner = element.rdf_child("Description").unwrap_or(element);
    if !core::ptr::eq(inner, element) {
        attributes.merge(qualifiers(inner));
    }

    for child in inner.element_children().filter(|c| !c.is_rdf("value")) {
        attributes.insert(
            child.qualified_name(),
            child.text_only().unwrap_or_default().to_string(),
        );
    }

    let value = inner
        .rdf_child("value")
        .and_then(|v| v.rdf_attribute("resource").or_else(|| v.text_only()))
        .unwrap_or_default();

    tag(XmpValue::Text(value.to_string()), attributes)
}

/// Parses a structure written with RDF syntax.
///
/// With an inner `rdf:Description`, its attributes are fields too, and the
/// outer element's attributes are qualifiers.
fn parse_described_structure(element: &Element) -> XmpTag {
    let mut fields = TagMap::new();
    let mut attributes = TagMap::new();

    let inner = match element.rdf_child("Description") {
        Some(description) => {
            fields.merge(attributes_as_tags(description, Naming::Local));
            attributes = qualifiers(element);
            description
        }
        None => element,
    };
    fields.merge(children_as_tags(inner, Naming::Local));

    tag(XmpValue::Struct(fields), attributes)
}

fn parse_array(element: &Element, container: &Element) -> XmpTag {
    let items = container
        .element_children()
        .filter(|c| c.is_rdf("li"))
        .map(parse_array_item)
        .collect();

    tag(XmpValue::Array(items), qualifiers(element))
}

fn parse_array_item(item: &Element) -> XmpTag {
    if is_described_value(item) {
        return parse_described_value(item);
    }

    if is_described_structure(item) {
        return parse_described_structure(item);
    }

    if let Some(container) = array_container(item) {
        return parse_array(item, container);
    }

    if item.element_children().next().is_some() {
        let fields = children_as_tags(item, Naming::Local);
        return tag(XmpValue::Struct(fields), qualifiers(item));
    }

    if is_attribute_only(item) && item.rdf_attribute("resource").is_none() {
        let fields = attributes_as_tags(item, Naming::Local);
        if !fields.is_empty() {
            return tag(XmpValue::Struct(fields), TagMap::new());
        }
    }

    let text = item
        .text_only()
        .or_else(|| item.rdf_attribute("resource"))
        .unwrap_or_default();
    tag(XmpValue::Text(text.to_string()), qualifiers(item))
}
