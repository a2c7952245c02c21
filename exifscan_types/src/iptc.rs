//! Names for IPTC application record (record 2) datasets.

/// Grabs the name of an IPTC dataset, if it's one we know.
///
/// ```
/// use exifscan_types::iptc::dataset_name;
///
/// assert_eq!(dataset_name(0x78), Some("caption"));
/// assert_eq!(dataset_name(0xFE), None);
/// ```
pub fn dataset_name(id: u8) -> Option<&'static str> {
    Some(match id {
        0x05 => "objectName",
        0x0A => "urgency",
        0x0F => "category",
        0x14 => "supplementalCategories",
        0x19 => "keywords",
        0x28 => "specialInstructions",
        0x37 => "dateCreated",
        0x3C => "timeCreated",
        0x41 => "originatingProgram",
        0x50 => "byline",
        0x55 => "bylineTitle",
        0x5A => "city",
        0x5C => "sublocation",
        0x5F => "state",
        0x64 => "countryCode",
        0x65 => "country",
        0x67 => "transmissionReference",
        0x69 => "headline",
        0x6E => "credit",
        0x73 => "source",
        0x74 => "copyright",
        0x78 => "caption",
        0x7A => "captionWriter",
        _ => return None,
    })
}
