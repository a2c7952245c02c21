use std::sync::Arc;

/// This is an error that happened while we were decoding XMP.
///
/// Any of these discards the whole XMP result.
#[derive(Clone, Debug)]
pub enum XmpError {
    /// `xmltree` failed to parse the XML.
    XmlParseError(
        // note: `Arc` allows us to impl `Clone`
        Arc<xmltree::ParseError>,
    ),

    /// Initial XML scanning failed - no `rdf:RDF` element was found.
    NoRdfElement,

    /// A key that must hold a boolean held something else.
    BadBool { key: String, value: String },
}

impl core::fmt::Display for XmpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            XmpError::XmlParseError(e) => {
                write!(f, "Encountered error while parsing XML. err: {e}")
            }

            XmpError::NoRdfElement => {
                f.write_str("The XML is missing the `rdf:RDF` element, which is required.")
            }

            XmpError::BadBool { key, value } => write!(
                f,
                "Key `{key}` must be a boolean, but its value was `{value}`."
            ),
        }
    }
}

impl core::error::Error for XmpError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            XmpError::XmlParseError(e) => Some(e.as_ref()),
            XmpError::NoRdfElement | XmpError::BadBool { .. } => None,
        }
    }
}

impl From<xmltree::ParseError> for XmpError {
    fn from(value: xmltree::ParseError) -> Self {
        XmpError::XmlParseError(value.into())
    }
}
