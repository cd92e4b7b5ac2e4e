//! Best-effort post-date recovery
//!
//! A message's post date decides its year/month placement on disk. The API
//! usually supplies `ygData.postDate` as epoch seconds; older payloads only
//! carry a `Date:` header inside the embedded raw email. Neither is
//! guaranteed, and failure here is non-fatal: an undated message is archived
//! flat in the group directory.

use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;
use serde_json::Value;

/// Extracts the post timestamp from a raw message payload
///
/// Tries `ygData.postDate` (epoch seconds, number or numeric string) first,
/// then falls back to the `Date:` header inside `ygData.rawEmail`.
pub fn post_date_from_payload(payload: &[u8]) -> Option<DateTime<Utc>> {
    let value: Value = serde_json::from_slice(payload).ok()?;
    let yg_data = value.get("ygData")?;

    if let Some(epoch) = epoch_seconds(yg_data.get("postDate")) {
        if let Some(date) = Utc.timestamp_opt(epoch, 0).single() {
            return Some(date);
        }
    }

    let raw_email = yg_data.get("rawEmail")?.as_str()?;
    date_header(&unescape_html(raw_email))
}

/// Epoch seconds from a JSON number or numeric string
pub fn epoch_seconds(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Finds and parses the first `Date:` header line in an email blob
fn date_header(email: &str) -> Option<DateTime<Utc>> {
    let re = Regex::new(r"Date:\s*([^\r\n<]+)").ok()?;
    let captured = re.captures(email)?.get(1)?.as_str().trim();
    DateTime::parse_from_rfc2822(captured)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Minimal HTML entity unescape for raw-email blobs
///
/// The API HTML-escapes the embedded email; only the entities that can
/// appear inside a `Date:` header line matter here.
fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_post_date_as_string() {
        let payload = br#"{"ygData": {"postDate": "1234567890"}}"#;
        let date = post_date_from_payload(payload).unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2009, 2, 13));
    }

    #[test]
    fn test_post_date_as_number() {
        let payload = br#"{"ygData": {"postDate": 1234567890}}"#;
        assert!(post_date_from_payload(payload).is_some());
    }

    #[test]
    fn test_fallback_to_date_header() {
        let payload = br#"{"ygData": {"rawEmail": "From: a@b.example&lt;br&gt;Date: Fri, 13 Feb 2009 23:31:30 +0000&lt;br&gt;Subject: hi"}}"#;
        let date = post_date_from_payload(payload).unwrap();
        assert_eq!((date.year(), date.month()), (2009, 2));
    }

    #[test]
    fn test_unparseable_post_date_falls_through_to_header() {
        let payload = br#"{"ygData": {"postDate": "soon", "rawEmail": "Date: Fri, 13 Feb 2009 23:31:30 +0000\n"}}"#;
        assert!(post_date_from_payload(payload).is_some());
    }

    #[test]
    fn test_no_date_anywhere() {
        let payload = br#"{"ygData": {"msgId": 5}}"#;
        assert_eq!(post_date_from_payload(payload), None);
    }

    #[test]
    fn test_garbage_payload() {
        assert_eq!(post_date_from_payload(b"not json at all"), None);
        assert_eq!(post_date_from_payload(br#"{"other": true}"#), None);
    }

    #[test]
    fn test_garbage_date_header() {
        let payload = br#"{"ygData": {"rawEmail": "Date: yesterday-ish\n"}}"#;
        assert_eq!(post_date_from_payload(payload), None);
    }

    #[test]
    fn test_epoch_seconds_variants() {
        let n: Value = serde_json::json!(42);
        let s: Value = serde_json::json!(" 42 ");
        let b: Value = serde_json::json!(true);
        assert_eq!(epoch_seconds(Some(&n)), Some(42));
        assert_eq!(epoch_seconds(Some(&s)), Some(42));
        assert_eq!(epoch_seconds(Some(&b)), None);
        assert_eq!(epoch_seconds(None), None);
    }
}
