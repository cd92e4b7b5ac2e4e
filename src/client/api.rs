//! Upstream API endpoints
//!
//! Builds the message-API URLs for a group and performs the one pre-flight
//! lookup the planner needs: the highest message id in the group.

use crate::client::fetch::FetchClient;
use crate::{ConfigError, MothballError};
use regex::Regex;
use serde_json::Value;
use url::Url;

/// How much of an unparseable body to inspect for the login-page shape
const LOGIN_SNIFF_BYTES: usize = 200;

/// URL builder and pre-flight queries for the message API
pub struct GroupApi {
    base: Url,
}

impl GroupApi {
    /// Creates the API handle from a configured base URL
    pub fn new(base_url: &str) -> crate::Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| ConfigError::Validation(format!("invalid base-url: {}", e)))?;
        Ok(Self { base })
    }

    /// `GET /groups/{group}/messages?count=1&sortOrder=desc&direction=-1`
    fn last_message_url(&self, group: &str) -> Url {
        let mut url = self.endpoint(&["groups", group, "messages"]);
        url.query_pairs_mut()
            .append_pair("count", "1")
            .append_pair("sortOrder", "desc")
            .append_pair("direction", "-1");
        url
    }

    /// `GET /groups/{group}/messages/{id}/raw` — the archived artifact
    pub fn raw_message_url(&self, group: &str, id: u64) -> Url {
        self.endpoint(&["groups", group, "messages", &id.to_string(), "raw"])
    }

    /// `GET /groups/{group}/conversations/messages/{id}?noNavbar=true&chrome=raw`
    ///
    /// Used only for attachment discovery; the HTML inside is scanned, never
    /// persisted.
    pub fn rendered_message_url(&self, group: &str, id: u64) -> Url {
        let mut url = self.endpoint(&[
            "groups",
            group,
            "conversations",
            "messages",
            &id.to_string(),
        ]);
        url.query_pairs_mut()
            .append_pair("noNavbar", "true")
            .append_pair("chrome", "raw");
        url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        url
    }

    /// Queries the id of the last (highest-numbered) message in the group
    ///
    /// This is the authoritative upper bound of the id space; the first
    /// message id is implicitly 1. Failure here is fatal for the group:
    ///
    /// * non-200 response → [`MothballError::UpstreamUnavailable`]
    /// * 200 with a login-page-shaped body → [`MothballError::AuthRequired`]
    ///   (private group, needs the session cookie pair)
    /// * 200 with any other unparseable body →
    ///   [`MothballError::UpstreamUnavailable`]
    pub async fn last_record_id(&self, client: &FetchClient, group: &str) -> crate::Result<u64> {
        let url = self.last_message_url(group);
        let outcome = client.get(&url, None).await;

        if outcome.status != 200 {
            return Err(MothballError::UpstreamUnavailable {
                group: group.to_string(),
                reason: format!("last-message lookup returned HTTP {}", outcome.status),
            });
        }

        let parsed: Result<Value, _> = serde_json::from_slice(&outcome.body);
        let value = match parsed {
            Ok(value) => value,
            Err(e) => {
                let head_len = outcome.body.len().min(LOGIN_SNIFF_BYTES);
                let head = String::from_utf8_lossy(&outcome.body[..head_len]);
                if looks_like_login_page(&head) {
                    return Err(MothballError::AuthRequired {
                        group: group.to_string(),
                    });
                }
                return Err(MothballError::UpstreamUnavailable {
                    group: group.to_string(),
                    reason: format!("response is not JSON ({}): {}", e, head),
                });
            }
        };

        extract_last_record_id(&value).ok_or_else(|| MothballError::UpstreamUnavailable {
            group: group.to_string(),
            reason: "response is missing ygData.lastRecordId".to_string(),
        })
    }
}

/// Pulls the upper bound out of the `ygData` envelope
///
/// Prefers `lastRecordId`; falls back to `totalRecords`, which older API
/// responses carried instead. Either may arrive as a number or a numeric
/// string.
fn extract_last_record_id(value: &Value) -> Option<u64> {
    let yg_data = value.get("ygData")?;
    as_u64(yg_data.get("lastRecordId")).or_else(|| as_u64(yg_data.get("totalRecords")))
}

fn as_u64(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Detects the HTML login page the service serves for private groups
fn looks_like_login_page(head: &str) -> bool {
    if let Ok(re) = Regex::new(r"(?i)yahoo.*?login") {
        re.is_match(head)
    } else {
        false
    }
}
