//! Rewrites decoded values into friendlier forms.
//!
//! This only runs when post-processing is on. Which tags get rewritten, and
//! how, is decided by [`Translation::for_tag`]. Tags without an entry pass
//! through untouched.

use chrono::{NaiveDate, TimeDelta};
use exifscan_types::{
    tiff::translate::{LabelTable, Translation, label_for},
    value::{TagMap, Value},
};

/// Rewrites every value in `tags` that has a translation.
pub fn translate_tags(tags: &mut TagMap) {
    for (key, value) in tags.iter_mut() {
        let Some(name) = key.name() else {
            continue;
        };

        let original = core::mem::replace(value, Value::List(Vec::new()));
        *value = translate_value(name, original);
    }
}

/// Rewrites one value, given the name of its tag.
///
/// A value that doesn't have the shape its translation expects is returned
/// as-is.
pub fn translate_value(name: &str, value: Value) -> Value {
    let Some(translation) = Translation::for_tag(name) else {
        return value;
    };
    log::trace!("Translating `{name}` with {translation:?}.");

    match translation {
        Translation::Date => match value.as_str().and_then(revive_date) {
            Some(revived) => Value::Text(revived),
            None => {
                log::warn!("Couldn't revive date for `{name}`. Keeping it. value: `{value}`");
                value
            }
        },

        Translation::Enum(table) => match enum_code(&value).and_then(|c| label_for(table, c)) {
            Some(label) => Value::from(label),
            None => value,
        },

        Translation::ByteLabels(table) => match value.to_bytes() {
            Some(bytes) => Value::Text(byte_labels(table, &bytes)),
            None => value,
        },

        Translation::AsciiDigits => match value.to_bytes() {
            Some(bytes) => Value::Text(crate::util::latin1(&bytes)),
            None => value,
        },

        Translation::DotJoined => Value::Text(join_components(&value, ".")),
        Translation::ColonJoined => Value::Text(join_components(&value, ":")),
    }
}

/// Grabs the code of an enum-ish value. Single-byte buffers count too.
fn enum_code(value: &Value) -> Option<u32> {
    value.as_u32().or_else(|| match value.to_bytes()?.as_slice() {
        [byte] => Some(*byte as u32),
        _ => None,
    })
}

/// Labels each byte, joined with `", "`. Unknown bytes get an empty label.
fn byte_labels(table: LabelTable, bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| label_for(table, b as u32).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_components(value: &Value, separator: &str) -> String {
    match value {
        Value::List(items) => items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(separator),
        Value::Bytes(bytes) => bytes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(separator),
        other => other.to_string(),
    }
}

/// Grabs the next field of a date or time, as a number.
///
/// A missing or non-numeric field makes the whole date invalid.
fn next_field<'a>(fields: &mut impl Iterator<Item = &'a str>) -> Option<f64> {
    crate::util::lenient_number(fields.next()?).filter(|n| n.is_finite())
}

/// Turns an Exif-style date into an ISO-8601 one.
///
/// Exif dates look like `2018:07:25 16:34:23`, though some writers use `.`
/// in the date, or put the year last. Fields roll over like a calendar does
/// (month 13 is January of the next year), two-digit years are in the 1900s,
/// and fractional parts are dropped.
///
/// Returns `None` if the text can't be read as a date.
///
/// ```
/// use exifscan::translate::revive_date;
///
/// assert_eq!(
///     revive_date("2018:07:25 16:34:23").as_deref(),
///     Some("2018-07-25T16:34:23")
/// );
/// assert_eq!(revive_date("sometime"), None);
/// ```
pub fn revive_date(text: &str) -> Option<String> {
    let mut halves = text.trim().split(' ');
    let date_part = halves.next()?;
    let time_part = halves.next().filter(|t| !t.is_empty());

    let mut date_fields = date_part.split([':', '.']);
    let mut year = next_field(&mut date_fields)?;
    let month = next_field(&mut date_fields)?;
    let mut day = next_field(&mut date_fields)?;

    // year came last
    if day > 1900.0 {
        core::mem::swap(&mut year, &mut day);
    }

    let mut year = year.trunc();
    if (0.0..=99.0).contains(&year) {
        year += 1900.0;
    }

    let month_index = (month - 1.0).trunc();
    let year = year + (month_index / 12.0).floor();
    let month_index = month_index.rem_euclid(12.0);

    let first_of_month = NaiveDate::from_ymd_opt(year as i32, month_index as u32 + 1, 1)?;
    let days_in = (day.trunc() as i64).checked_sub(1)?;
    let date = first_of_month.checked_add_signed(TimeDelta::try_days(days_in)?)?;
    let mut datetime = date.and_hms_opt(0, 0, 0)?;

    if let Some(time_part) = time_part {
        let mut time_fields = time_part.split(':');
        let hours = next_field(&mut time_fields)?.trunc();
        let minutes = next_field(&mut time_fields)?.trunc();
        let seconds = next_field(&mut time_fields)?.trunc();

        let offset = hours * 3600.0 + minutes * 60.0 + seconds;
        datetime = datetime.checked_add_signed(TimeDelta::try_seconds(offset as i64)?)?;
    }

    Some(datetime.format("%Y-%m-%dT%H:%M:%S").to_string())
}

/// Converts degrees, minutes and seconds into decimal degrees.
///
/// Southern and western references make the result negative.
pub fn dms_to_decimal(degrees: f64, minutes: f64, seconds: f64, reference: Option<&str>) -> f64 {
    let decimal = degrees + minutes / 60.0 + seconds / 3600.0;
    match reference {
        Some("S" | "W") => -decimal,
        _ => decimal,
    }
}

/// Reads a `[degrees, minutes, seconds]` value.
fn dms(value: &Value) -> Option<(f64, f64, f64)> {
    match value.as_list()? {
        [d, m, s] => Some((d.as_f64()?, m.as_f64()?, s.as_f64()?)),
        _ => None,
    }
}

/// Adds `latitude`, `longitude` and `timestamp` to a decoded GPS IFD.
///
/// Each is only added when the tags it's derived from are present.
pub fn derive_gps(gps: &mut TagMap) {
    for (source, reference, derived) in [
        ("GPSLatitude", "GPSLatitudeRef", "latitude"),
        ("GPSLongitude", "GPSLongitudeRef", "longitude"),
    ] {
        let Some((d, m, s)) = gps.get(source).and_then(dms) else {
            continue;
        };
        let reference = gps.get(reference).and_then(Value::as_str);
        let decimal = dms_to_decimal(d, m, s, reference);
        log::trace!("Derived `{derived}` from `{source}`: {decimal}");
        gps.insert(derived, Value::Float(decimal));
    }

    let date = gps.get("GPSDateStamp").and_then(Value::as_str);
    let time = gps.get("GPSTimeStamp").map(|t| match t {
        Value::Text(text) => text.clone(),
        other => join_components(other, ":"),
    });
    if let (Some(date), Some(time)) = (date, time) {
        let joined = format!("{date} {time}");
        let timestamp = revive_date(&joined).unwrap_or(joined);
        gps.insert("timestamp", Value::Text(timestamp));
    }
}

#[cfg(test)]
mod tests {
    use exifscan_types::value::{TagMap, Value};

    use super::{derive_gps, dms_to_decimal, revive_date, translate_tags, translate_value};
    use crate::util::logger;

    #[test]
    fn revives_dates() {
        logger();
        assert_eq!(
            revive_date("2018:07:25 16:34:23").as_deref(),
            Some("2018-07-25T16:34:23")
        );
        assert_eq!(
            revive_date("  2018.07.25 16:34:23 ").as_deref(),
            Some("2018-07-25T16:34:23")
        );

        // no time means midnight
        assert_eq!(revive_date("2018:07:25").as_deref(), Some("2018-07-25T00:00:00"));
    }

    /// Fields too big for any calendar make the date invalid.
    #[test]
    fn huge_fields_are_invalid() {
        logger();
        assert_eq!(revive_date("2018:07:-1e19 00:00:00"), None);
        assert_eq!(revive_date("2018:07:1e19"), None);
        assert_eq!(revive_date("2018:07:25 1e19:00:00"), None);
        assert_eq!(revive_date("1e19:07:25"), None);

        // and they're kept as-is
        assert_eq!(
            translate_value("DateTimeOriginal", Value::from("2018:07:-1e19 00:00:00")),
            Value::from("2018:07:-1e19 00:00:00")
        );
    }

    /// When the day is bigger than 1900, it's really the year.
    #[test]
    fn swapped_year_and_day() {
        logger();
        assert_eq!(
            revive_date("25:07:2018 16:34:23").as_deref(),
            Some("2018-07-25T16:34:23")
        );
    }

    #[test]
    fn dates_roll_over() {
        logger();

        // two-digit years
        assert_eq!(revive_date("99:12:31").as_deref(), Some("1999-12-31T00:00:00"));

        // month 13, day 32, hour 24
        assert_eq!(revive_date("2018:13:01").as_deref(), Some("2019-01-01T00:00:00"));
        assert_eq!(revive_date("2018:01:32").as_deref(), Some("2018-02-01T00:00:00"));
        assert_eq!(
            revive_date("2018:12:31 24:00:00").as_deref(),
            Some("2019-01-01T00:00:00")
        );

        // fractional seconds are dropped
        assert_eq!(
            revive_date("2018:07:25 16:34:23.75").as_deref(),
            Some("2018-07-25T16:34:23")
        );
    }

    #[test]
    fn bad_dates_are_rejected() {
        logger();
        assert_eq!(revive_date("2018:07"), None);
        assert_eq!(revive_date("2018:07:25 16:34"), None);
        assert_eq!(revive_date("yyyy:mm:dd"), None);

        // the original text is kept
        assert_eq!(
            translate_value("DateTimeOriginal", Value::from("unknown")),
            Value::from("unknown")
        );
    }

    #[test]
    fn dms_conversion() {
        logger();
        let north = dms_to_decimal(50.0, 51.0, 32.5779, Some("N"));
        assert!((north - 50.85904941666667).abs() < 1e-12, "got {north}");

        let south = dms_to_decimal(50.0, 51.0, 32.5779, Some("S"));
        assert_eq!(south, -north);
        assert_eq!(dms_to_decimal(1.0, 30.0, 0.0, Some("W")), -1.5);
        assert_eq!(dms_to_decimal(1.0, 30.0, 0.0, None), 1.5);
    }

    #[test]
    fn enums() {
        logger();
        assert_eq!(
            translate_value("ExposureProgram", Value::Unsigned(2)),
            Value::from("Normal program")
        );

        // unknown codes stay numeric
        assert_eq!(
            translate_value("ExposureProgram", Value::Unsigned(200)),
            Value::Unsigned(200)
        );

        // `FileSource` is stored as a single opaque byte
        assert_eq!(
            translate_value("FileSource", Value::Bytes(vec![3])),
            Value::from("DSC")
        );
    }

    #[test]
    fn byte_strings() {
        logger();
        assert_eq!(
            translate_value("ComponentsConfiguration", Value::Bytes(vec![1, 2, 3, 0])),
            Value::from("Y, Cb, Cr, ")
        );
        assert_eq!(
            translate_value("SceneType", Value::Bytes(vec![1])),
            Value::from("Directly photographed")
        );
        assert_eq!(
            translate_value("ExifVersion", Value::Bytes(b"0231".to_vec())),
            Value::from("0231")
        );
        assert_eq!(
            translate_value(
                "GPSVersionID",
                Value::List(vec![
                    Value::Unsigned(2),
                    Value::Unsigned(2),
                    Value::Unsigned(0),
                    Value::Unsigned(0)
                ])
            ),
            Value::from("2.2.0.0")
        );
        assert_eq!(
            translate_value(
                "GPSTimeStamp",
                Value::List(vec![Value::Float(16.0), Value::Float(34.0), Value::Float(23.5)])
            ),
            Value::from("16:34:23.5")
        );
    }

    #[test]
    fn untranslated_tags_pass_through() {
        logger();
        let mut tags = TagMap::new();
        tags.insert("Make", Value::from("Google"));
        tags.insert(0xBEEF_u16, Value::Unsigned(2));
        tags.insert("ModifyDate", Value::from("2018:07:25 16:34:23"));

        translate_tags(&mut tags);

        assert_eq!(tags.get("Make"), Some(&Value::from("Google")));
        assert_eq!(tags.get_id(0xBEEF), Some(&Value::Unsigned(2)));
        assert_eq!(tags.get("ModifyDate"), Some(&Value::from("2018-07-25T16:34:23")));
    }

    #[test]
    fn gps_derivation() {
        logger();
        let dms = |d: f64, m: f64, s: f64| {
            Value::List(vec![Value::Float(d), Value::Float(m), Value::Float(s)])
        };

        let mut gps = TagMap::new();
        gps.insert("GPSLatitudeRef", Value::from("S"));
        gps.insert("GPSLatitude", dms(50.0, 51.0, 32.5779));
        gps.insert("GPSLongitudeRef", Value::from("E"));
        gps.insert("GPSLongitude", dms(14.0, 30.0, 0.0));
        gps.insert("GPSDateStamp", Value::from("2018:07:25"));
        gps.insert("GPSTimeStamp", Value::from("16:34:23"));

        derive_gps(&mut gps);

        let latitude = gps.get("latitude").and_then(Value::as_f64).unwrap();
        assert!((latitude + 50.85904941666667).abs() < 1e-12);
        assert_eq!(gps.get("longitude"), Some(&Value::Float(14.5)));
        assert_eq!(gps.get("timestamp"), Some(&Value::from("2018-07-25T16:34:23")));
    }

    /// Nothing to derive from, nothing derived.
    #[test]
    fn gps_without_coordinates() {
        logger();
        let mut gps = TagMap::new();
        gps.insert("GPSAltitude", Value::Float(120.0));
        derive_gps(&mut gps);
        assert_eq!(gps.len(), 1);
    }
}
