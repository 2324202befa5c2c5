//! HTTP client utilities shared by scrapers.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use reqwest::header::{HeaderMap, SET_COOKIE};
use serde_json::{Map, Value};

use crate::error::Result;

/// Browser-like agent some sites insist on.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Request settings common to every scraper.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub user_agent: String,
    pub timeout: Duration,
    /// Base pause between consecutive pages of one site.
    pub page_delay: Duration,
    /// Upper bound of the random extra pause.
    pub page_jitter: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            page_delay: Duration::from_secs(2),
            page_jitter: Duration::from_millis(500),
        }
    }
}

impl HttpSettings {
    /// `page_delay` plus a random share of `page_jitter`.
    #[must_use]
    pub fn jittered_delay(&self) -> Duration {
        let jitter_ms = u64::try_from(self.page_jitter.as_millis()).unwrap_or(u64::MAX);
        if jitter_ms == 0 {
            return self.page_delay;
        }
        let extra = rand::thread_rng().gen_range(0..=jitter_ms);
        self.page_delay + Duration::from_millis(extra)
    }
}

/// Create a configured asynchronous HTTP client.
///
/// The client keeps no cookie jar; adapters that need a session manage
/// cookies explicitly so they can be cached in the store.
pub fn create_client(settings: &HttpSettings) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&settings.user_agent)
        .timeout(settings.timeout)
        .build()?;
    Ok(client)
}

/// Cookies set by a response, with the earliest expiry any of them declared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseCookies {
    /// `name -> value`
    pub cookies: Map<String, Value>,
    pub expires: Option<DateTime<Utc>>,
}

/// Collect `Set-Cookie` headers.
///
/// Only `Expires` and `Max-Age` attributes are interpreted.
#[must_use]
pub fn response_cookies(headers: &HeaderMap, now: DateTime<Utc>) -> ResponseCookies {
    let mut collected = ResponseCookies::default();

    for raw in headers.get_all(SET_COOKIE).iter().filter_map(|v| v.to_str().ok()) {
        let mut parts = raw.split(';').map(str::trim);
        let Some((name, value)) = parts.next().and_then(|pair| pair.split_once('=')) else {
            continue;
        };
        collected
            .cookies
            .insert(name.to_string(), Value::String(value.to_string()));

        for attribute in parts {
            let Some((key, value)) = attribute.split_once('=') else {
                continue;
            };
            let expires = if key.eq_ignore_ascii_case("max-age") {
                value
                    .parse::<i64>()
                    .ok()
                    .map(|secs| now + chrono::Duration::seconds(secs))
            } else if key.eq_ignore_ascii_case("expires") {
                DateTime::parse_from_rfc2822(value)
                    .ok()
                    .map(|t| t.with_timezone(&Utc))
            } else {
                None
            };
            if let Some(expires) = expires {
                collected.expires = Some(collected.expires.map_or(expires, |e| e.min(expires)));
            }
        }
    }

    collected
}

/// Render a cached cookie object as a `Cookie` header value.
#[must_use]
pub fn cookie_header(cookies: &Value) -> Option<String> {
    let pairs: Vec<String> = cookies
        .as_object()?
        .iter()
        .filter_map(|(name, value)| value.as_str().map(|v| format!("{name}={v}")))
        .collect();
    (!pairs.is_empty()).then(|| pairs.join("; "))
}
