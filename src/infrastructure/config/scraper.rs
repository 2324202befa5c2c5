//! Scraper request settings.

use std::time::Duration;

use serde::Deserialize;

use crate::adapter::outbound::scraper::cvs::DEFAULT_STATE;
use crate::adapter::outbound::scraper::http::DEFAULT_USER_AGENT;
use crate::adapter::outbound::scraper::{HttpSettings, ScraperContext};

/// `[scraper]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperAppConfig {
    /// Scrapers to run, in order. Empty runs all of them.
    pub enabled: Vec<String>,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Pause between result pages of one site.
    pub page_delay_ms: u64,
    /// Random extra pause added to `page_delay_ms`.
    pub page_jitter_ms: u64,
    /// State code for state-wide pharmacy roll-ups.
    pub state: String,
}

impl Default for ScraperAppConfig {
    fn default() -> Self {
        Self {
            enabled: Vec::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            page_delay_ms: 2_000,
            page_jitter_ms: 500,
            state: DEFAULT_STATE.to_string(),
        }
    }
}

impl ScraperAppConfig {
    #[must_use]
    pub fn context(&self) -> ScraperContext {
        ScraperContext {
            http: HttpSettings {
                user_agent: self.user_agent.clone(),
                timeout: Duration::from_secs(self.timeout_secs),
                page_delay: Duration::from_millis(self.page_delay_ms),
                page_jitter: Duration::from_millis(self.page_jitter_ms),
            },
            state: self.state.clone(),
        }
    }
}
