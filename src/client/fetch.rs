//! HTTP fetch client
//!
//! One `reqwest::Client` per run, shared across every request and every
//! group, so the whole invocation rides a single connection pool. Non-2xx
//! statuses are ordinary return values; only client construction can fail.

use crate::config::Config;
use crate::ConfigError;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, REFERER};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Sentinel status for transport-level failures (DNS, timeout, reset)
///
/// Chosen above the real 5xx range so the backoff controller treats a flaky
/// connection like server distress: retried with escalating waits, and
/// eventually fatal if it never recovers.
pub const NETWORK_ERROR_STATUS: u16 = 599;

/// Result of a single fetch: the status code plus the raw body bytes
///
/// Transport failures surface as [`NETWORK_ERROR_STATUS`] with an empty
/// body, never as an error value.
#[derive(Debug)]
pub struct FetchOutcome {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// HTTP client carrying the identifying headers and optional session cookies
pub struct FetchClient {
    client: Client,
}

impl FetchClient {
    /// Builds the client from configuration
    ///
    /// The `Mozilla/5.0` user agent and the `T`/`Y` cookie pair mirror what
    /// the upstream service expects from a browser session; anything else
    /// tends to trip its anti-abuse heuristics.
    pub fn new(config: &Config) -> crate::Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(session) = &config.session {
            let cookie = format!("T={}; Y={}", session.cookie_t, session.cookie_y);
            let value = HeaderValue::from_str(&cookie).map_err(|_| {
                ConfigError::Validation(
                    "session cookies contain characters not allowed in headers".to_string(),
                )
            })?;
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .user_agent("Mozilla/5.0")
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    /// Fetches a URL, returning status and body
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    /// * `referer` - Optional `Referer:` header value (attachment CDN fetches
    ///   require the rendered-page URL here)
    ///
    /// Never returns an error: non-2xx statuses are data for the backoff
    /// controller, and transport failures map to [`NETWORK_ERROR_STATUS`].
    pub async fn get(&self, url: &Url, referer: Option<&Url>) -> FetchOutcome {
        let mut request = self.client.get(url.clone());
        if let Some(referer) = referer {
            request = request.header(REFERER, referer.as_str());
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.bytes().await {
                    Ok(body) => FetchOutcome {
                        status,
                        body: body.to_vec(),
                    },
                    Err(e) => {
                        tracing::warn!("failed to read response body from {}: {}", url, e);
                        FetchOutcome {
                            status: NETWORK_ERROR_STATUS,
                            body: Vec::new(),
                        }
                    }
                }
            }
            Err(e) => {
                let kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connection failed"
                } else {
                    "request failed"
                };
                tracing::warn!("{} fetching {}: {}", kind, url, e);
                FetchOutcome {
                    status: NETWORK_ERROR_STATUS,
                    body: Vec::new(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;

    #[test]
    fn test_build_client_without_session() {
        let config = Config::default();
        assert!(FetchClient::new(&config).is_ok());
    }

    #[test]
    fn test_build_client_with_session() {
        let mut config = Config::default();
        config.session = Some(SessionConfig {
            cookie_t: "tvalue".to_string(),
            cookie_y: "yvalue".to_string(),
        });
        assert!(FetchClient::new(&config).is_ok());
    }

    #[test]
    fn test_cookie_with_newline_rejected() {
        let mut config = Config::default();
        config.session = Some(SessionConfig {
            cookie_t: "bad\nvalue".to_string(),
            cookie_y: "yvalue".to_string(),
        });
        assert!(FetchClient::new(&config).is_err());
    }

    #[test]
    fn test_outcome_success_flag() {
        let ok = FetchOutcome {
            status: 200,
            body: Vec::new(),
        };
        let hole = FetchOutcome {
            status: 404,
            body: Vec::new(),
        };
        assert!(ok.is_success());
        assert!(!hole.is_success());
    }
}
