//! Name-to-scraper lookup.

use std::sync::Arc;

use super::cvs::CvsScraper;
use super::http::{create_client, HttpSettings};
use super::ma_immunizations::MaImmunizationsScraper;
use crate::error::{ConfigError, Result};
use crate::port::Scraper;

/// Every scraper name, in default run order.
pub const AVAILABLE_SCRAPERS: [&str; 2] = ["ma-immunizations", "cvs"];

/// What scrapers need to be built.
#[derive(Debug, Clone)]
pub struct ScraperContext {
    pub http: HttpSettings,
    /// State code for state-wide pharmacy roll-ups.
    pub state: String,
}

/// Build one scraper by name.
///
/// # Errors
/// Returns [`ConfigError::UnknownScraper`] for unregistered names.
pub fn build_scraper(
    name: &str,
    client: &reqwest::Client,
    context: &ScraperContext,
) -> Result<Arc<dyn Scraper>> {
    let scraper: Arc<dyn Scraper> = match name {
        "ma-immunizations" => Arc::new(MaImmunizationsScraper::new(
            client.clone(),
            context.http.clone(),
        )),
        "cvs" => Arc::new(CvsScraper::new(client.clone(), context.state.clone())),
        other => {
            return Err(ConfigError::UnknownScraper {
                name: other.to_string(),
                available: AVAILABLE_SCRAPERS.join(", "),
            }
            .into())
        }
    };
    Ok(scraper)
}

/// Build the named scrapers in order, or all of them when `names` is empty.
///
/// # Errors
/// Returns an error if any name is unknown or the HTTP client cannot be built.
pub fn build_scrapers(
    names: &[String],
    context: &ScraperContext,
) -> Result<Vec<Arc<dyn Scraper>>> {
    let client = create_client(&context.http)?;
    let selected: Vec<&str> = if names.is_empty() {
        AVAILABLE_SCRAPERS.to_vec()
    } else {
        names.iter().map(|n| n.trim()).collect()
    };

    selected
        .into_iter()
        .map(|name| build_scraper(name, &client, context))
        .collect()
}
