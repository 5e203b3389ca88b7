//! Independent field predicates composed by the validation engines.
//!
//! Each function inspects one value and nothing else, so every rule can be
//! tested on its own.

use std::io::Cursor;

use chrono::{NaiveDate, NaiveTime};
use image::{ImageFormat, ImageReader};
use url::Url;

use crate::types::Timestamp;

/// URL schemes accepted for link and photo fields.
const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https"];

/// Image formats a photo upload may use.
pub const ACCEPTED_IMAGE_FORMATS: &[ImageFormat] =
    &[ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::WebP];

/// `true` when the value is empty or only whitespace.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// `true` for an absolute `http`/`https` URL with a non-empty host.
///
/// Bare host names such as `google.com` have no scheme and are rejected.
pub fn is_well_formed_url(value: &str) -> bool {
    let Ok(url) = Url::parse(value.trim()) else {
        return false;
    };
    ALLOWED_URL_SCHEMES.contains(&url.scheme()) && url.host_str().is_some_and(|h| !h.is_empty())
}

/// `true` when `date` falls on a calendar day after the UTC date of `now`.
///
/// Only calendar dates are compared; today itself does not count.
pub fn is_strictly_future_date(date: NaiveDate, now: Timestamp) -> bool {
    date > now.date_naive()
}

pub fn is_non_negative(value: i64) -> bool {
    value >= 0
}

/// `true` when the payload is an image.
///
/// A declared content type, when present, must be `image/*` (parameters and
/// case ignored). Independently, the bytes must decode as one of the
/// accepted formats; an empty payload never qualifies.
pub fn is_image_content_type(declared: Option<&str>, bytes: &[u8]) -> bool {
    declares_image(declared) && sniff_image_content_type(bytes).is_some()
}

/// `true` unless a declared content type names something other than `image/*`.
pub fn declares_image(declared: Option<&str>) -> bool {
    declared.map_or(true, |declared| media_type_essence(declared).starts_with("image/"))
}

/// Decode the payload and report the MIME type of its format.
///
/// A matching signature is not enough: the whole image must decode, and the
/// format must be one of [`ACCEPTED_IMAGE_FORMATS`].
pub fn sniff_image_content_type(bytes: &[u8]) -> Option<&'static str> {
    if bytes.is_empty() {
        return None;
    }
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?;
    let format = reader
        .format()
        .filter(|format| ACCEPTED_IMAGE_FORMATS.contains(format))?;
    reader.decode().ok()?;
    Some(format.to_mime_type())
}

/// Lower-cased `type/subtype` without parameters.
pub fn media_type_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Parse an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Parse a time of day as `HH:MM:SS` or `HH:MM`.
pub fn parse_hour(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// Parse a signed integer, tolerating surrounding whitespace.
pub fn parse_integer(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use image::DynamicImage;

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn encoded(format: ImageFormat) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::new_rgb8(2, 2).write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn blank_detects_whitespace_only() {
        assert!(is_blank(""));
        assert!(is_blank("   \t\n"));
        assert!(!is_blank(" Fulano "));
    }

    #[test]
    fn url_accepts_absolute_http_urls() {
        assert!(is_well_formed_url("https://www.google.com/"));
        assert!(is_well_formed_url("http://example.org/path?q=1"));
        assert!(is_well_formed_url("  https://example.org  "));
    }

    #[test]
    fn url_rejects_bare_hosts() {
        assert!(!is_well_formed_url("google.com"));
        assert!(!is_well_formed_url("incorrect.com"));
        assert!(!is_well_formed_url(""));
    }

    #[test]
    fn url_rejects_other_schemes_and_empty_hosts() {
        assert!(!is_well_formed_url("ftp://example.org/file"));
        assert!(!is_well_formed_url("mailto:someone@example.org"));
        assert!(!is_well_formed_url("http://"));
    }

    #[test]
    fn future_date_is_strict() {
        let now = at(2026, 5, 10, 23);
        let today = NaiveDate::from_ymd_opt(2026, 5, 10).unwrap();
        assert!(!is_strictly_future_date(today, now));
        assert!(!is_strictly_future_date(today.pred_opt().unwrap(), now));
        assert!(is_strictly_future_date(today.succ_opt().unwrap(), now));
        assert!(is_strictly_future_date(
            NaiveDate::from_ymd_opt(2099, 12, 14).unwrap(),
            now
        ));
    }

    #[test]
    fn future_date_ignores_time_of_day() {
        let tomorrow = NaiveDate::from_ymd_opt(2026, 5, 11).unwrap();
        assert!(is_strictly_future_date(tomorrow, at(2026, 5, 10, 0)));
        assert!(is_strictly_future_date(tomorrow, at(2026, 5, 10, 23)));
    }

    #[test]
    fn non_negative_boundary() {
        assert!(is_non_negative(0));
        assert!(is_non_negative(15));
        assert!(!is_non_negative(-1));
        assert!(!is_non_negative(-2));
    }

    #[test]
    fn image_accepts_png_and_jpeg_payloads() {
        let png = encoded(ImageFormat::Png);
        let jpeg = encoded(ImageFormat::Jpeg);
        assert!(is_image_content_type(Some("image/png"), &png));
        assert!(is_image_content_type(Some("IMAGE/JPEG; q=1"), &jpeg));
        assert!(is_image_content_type(None, &jpeg));
    }

    #[test]
    fn image_rejects_text_payloads() {
        assert!(!is_image_content_type(Some("text/plain"), b"just some notes"));
        assert!(!is_image_content_type(None, b"just some notes"));
    }

    #[test]
    fn image_rejects_text_that_starts_like_an_image() {
        assert!(!is_image_content_type(None, b"BMW owners meetup: bring drinks"));
        assert!(!is_image_content_type(None, b"P1 buy foods"));
        assert!(!is_image_content_type(Some("image/png"), PNG_SIGNATURE));
    }

    #[test]
    fn image_rejects_formats_outside_the_accepted_set() {
        let gif = b"GIF89a\x01\0\x01\0\0\0\0;";
        assert_eq!(sniff_image_content_type(gif), None);
        assert_eq!(sniff_image_content_type(b"BM\0\0\0\0\0\0\0\0"), None);
    }

    #[test]
    fn image_rejects_mislabelled_or_empty_payloads() {
        let png = encoded(ImageFormat::Png);
        assert!(!is_image_content_type(Some("text/plain"), &png));
        assert!(!is_image_content_type(Some("image/png"), b"not an image"));
        assert!(!is_image_content_type(Some("image/png"), b""));
    }

    #[test]
    fn declared_type_only_needs_to_be_an_image_when_present() {
        assert!(declares_image(None));
        assert!(declares_image(Some("image/webp")));
        assert!(!declares_image(Some("application/octet-stream")));
    }

    #[test]
    fn sniff_reports_mime_type() {
        assert_eq!(sniff_image_content_type(&encoded(ImageFormat::Png)), Some("image/png"));
        assert_eq!(sniff_image_content_type(&encoded(ImageFormat::Jpeg)), Some("image/jpeg"));
        assert_eq!(sniff_image_content_type(b"hello"), None);
    }

    #[test]
    fn parses_dates_and_hours() {
        assert_eq!(
            parse_date("2099-12-14"),
            NaiveDate::from_ymd_opt(2099, 12, 14)
        );
        assert_eq!(parse_date("14/12/2099"), None);
        assert_eq!(parse_hour("03:03:00"), NaiveTime::from_hms_opt(3, 3, 0));
        assert_eq!(parse_hour("03:03"), NaiveTime::from_hms_opt(3, 3, 0));
        assert_eq!(parse_hour("25:00"), None);
    }

    #[test]
    fn parses_integers() {
        assert_eq!(parse_integer(" -2 "), Some(-2));
        assert_eq!(parse_integer("0"), Some(0));
        assert_eq!(parse_integer("ten"), None);
    }
}
