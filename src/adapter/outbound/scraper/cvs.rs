//! CVS state-wide vaccine status.
//!
//! CVS publishes one JSON document per state listing every city with a
//! store and whether it has availability. The whole state becomes a single
//! [`PharmacyRollup`] whose count is the number of available cities.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{COOKIE, REFERER};
use serde_json::Value;
use tracing::{info, warn};

use super::http::{cookie_header, response_cookies};
use super::pharmacy::PharmacyRollup;
use crate::domain::Clinic;
use crate::error::{AdapterError, Result};
use crate::port::{Scraper, StateStore};

const SITE: &str = "cvs";

pub const CVS_BASE_URL: &str = "https://www.cvs.com";
pub const CVS_SIGN_UP_PAGE: &str = "https://www.cvs.com/immunizations/covid-19-vaccine";
pub const DEFAULT_STATE: &str = "MA";

const BRAND: &str = "CVS";
const AVAILABLE: &str = "Available";

/// Scraper for the CVS state status endpoint.
pub struct CvsScraper {
    client: reqwest::Client,
    base_url: String,
    state: String,
}

impl CvsScraper {
    #[must_use]
    pub fn new(client: reqwest::Client, state: impl Into<String>) -> Self {
        Self::with_base_url(client, state, CVS_BASE_URL)
    }

    /// Point the scraper at another host, for tests.
    #[must_use]
    pub fn with_base_url(
        client: reqwest::Client,
        state: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            state: state.into(),
        }
    }

    fn status_url(&self) -> String {
        format!(
            "{}/immunizations/covid-19-vaccine.vaccine-status.{}.json?vaccineinfo",
            self.base_url, self.state
        )
    }

    /// Visit the home page for session cookies. Failure is not fatal.
    async fn init_session(&self) -> Option<String> {
        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .header(REFERER, format!("{}/", self.base_url))
            .send()
            .await;

        match response {
            Ok(response) => {
                let collected = response_cookies(response.headers(), Utc::now());
                cookie_header(&Value::Object(collected.cookies))
            }
            Err(e) => {
                warn!(site = SITE, error = %e, "Failed to get cookies");
                None
            }
        }
    }

    async fn fetch_status(&self, cookies: Option<String>) -> Result<Value> {
        let mut request = self.client.get(self.status_url()).header(
            REFERER,
            format!("{}/immunizations/covid-19-vaccine", self.base_url),
        );
        if let Some(cookies) = cookies {
            request = request.header(COOKIE, cookies);
        }

        let response = request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|source| AdapterError::Request { site: SITE, source })?;
        let body = response
            .json::<Value>()
            .await
            .map_err(|source| AdapterError::Request { site: SITE, source })?;
        Ok(body)
    }
}

/// Cities marked available in a state status document, in document order.
///
/// # Errors
/// Returns [`AdapterError::UnexpectedResponse`] if the state's entry list is
/// missing.
pub fn available_cities(body: &Value, state: &str) -> std::result::Result<Vec<String>, AdapterError> {
    let entries = body
        .pointer(&format!("/responsePayloadData/data/{state}"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            AdapterError::unexpected(
                SITE,
                format!("missing 'responsePayloadData.data.{state}' field"),
            )
        })?;

    Ok(entries
        .iter()
        .filter(|entry| entry.get("status").and_then(Value::as_str) == Some(AVAILABLE))
        .filter_map(|entry| entry.get("city").and_then(Value::as_str))
        .map(str::to_string)
        .collect())
}

#[async_trait]
impl Scraper for CvsScraper {
    fn name(&self) -> &'static str {
        SITE
    }

    async fn all_clinics(&self, _state: &StateStore) -> Result<Vec<Box<dyn Clinic>>> {
        info!(site = SITE, state = %self.state, "Checking status for all cities");

        let cookies = self.init_session().await;
        let body = self.fetch_status(cookies).await?;
        let cities = available_cities(&body, &self.state)?;

        if cities.is_empty() {
            info!(site = SITE, state = %self.state, "No availability for any city");
        } else {
            info!(
                site = SITE,
                cities = cities.len(),
                available = %cities.join(", "),
                "Cities with appointments"
            );
        }

        Ok(vec![Box::new(PharmacyRollup::new(
            BRAND,
            self.state.clone(),
            cities,
            CVS_SIGN_UP_PAGE,
        ))])
    }
}
