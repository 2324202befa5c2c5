//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file with environment variable overrides
//! for secrets such as `SLACK_API_TOKEN`.
//!
//! # Example
//!
//! ```no_run
//! use slotwatch::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use super::channels::{DiscordAppConfig, MicroblogAppConfig, SlackAppConfig, TelegramAppConfig};
use super::logging::LoggingConfig;
use super::scraper::ScraperAppConfig;
use super::thresholds::ThresholdsConfig;
use crate::adapter::outbound::scraper::registry::AVAILABLE_SCRAPERS;
use crate::domain::ClinicClass;
use crate::error::{ConfigError, Result};

/// Environments in which captured errors are shipped to the report target.
const REPORTING_ENVIRONMENTS: [&str; 2] = ["production", "staging"];

/// Main application configuration.
///
/// Every section is optional; an empty file yields a working development
/// setup that logs announcements instead of posting them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Deployment environment name. `ENVIRONMENT` overrides it.
    pub environment: String,

    /// Seconds between iteration starts.
    pub update_frequency_secs: u64,

    /// SQLite database path, `:memory:`, or `memory` for the volatile store.
    pub database: String,

    /// Logging and tracing configuration.
    pub logging: LoggingConfig,

    /// Policy thresholds per clinic class.
    pub thresholds: ThresholdsConfig,

    /// Scraper selection and request settings.
    pub scraper: ScraperAppConfig,

    pub slack: SlackAppConfig,
    pub discord: DiscordAppConfig,
    pub telegram: TelegramAppConfig,
    pub microblog: MicroblogAppConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            update_frequency_secs: 60,
            database: default_database_path(),
            logging: LoggingConfig::default(),
            thresholds: ThresholdsConfig::default(),
            scraper: ScraperAppConfig::default(),
            slack: SlackAppConfig::default(),
            discord: DiscordAppConfig::default(),
            telegram: TelegramAppConfig::default(),
            microblog: MicroblogAppConfig::default(),
        }
    }
}

fn default_database_path() -> String {
    "slotwatch.db".to_string()
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// Secrets are read from the environment, never from the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Some(environment) = env_non_empty("ENVIRONMENT") {
            config.environment = environment;
        }
        config.slack.token = env_non_empty("SLACK_API_TOKEN");
        config.discord.webhook_url = env_non_empty("DISCORD_WEBHOOK_URL");
        config.microblog.access_token = env_non_empty("MICROBLOG_ACCESS_TOKEN");

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` if it exists, otherwise start from defaults.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`], or validation of the defaults fails.
    #[allow(clippy::result_large_err)]
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.update_frequency_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "update_frequency_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }
        if self.scraper.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scraper.timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        Self::validate_scrapers(&self.scraper.enabled)?;

        let table = self.thresholds.table();
        for class in [ClinicClass::Clinic, ClinicClass::Pharmacy] {
            if table.get(class).min_absolute < 0 {
                return Err(ConfigError::InvalidValue {
                    field: "thresholds.min_absolute",
                    reason: "must be 0 or greater".to_string(),
                }
                .into());
            }
        }

        if self.slack.enabled && self.slack.token.is_none() {
            return Err(ConfigError::MissingField {
                field: "SLACK_API_TOKEN",
            }
            .into());
        }
        if self.discord.enabled && self.discord.webhook_url.is_none() {
            return Err(ConfigError::MissingField {
                field: "DISCORD_WEBHOOK_URL",
            }
            .into());
        }
        if self.microblog.enabled {
            if self.microblog.instance_url.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: "microblog.instance_url",
                }
                .into());
            }
            if self.microblog.access_token.is_none() {
                return Err(ConfigError::MissingField {
                    field: "MICROBLOG_ACCESS_TOKEN",
                }
                .into());
            }
        }
        self.validate_telegram()?;

        Ok(())
    }

    #[cfg(feature = "telegram")]
    #[allow(clippy::result_large_err)]
    fn validate_telegram(&self) -> Result<()> {
        use crate::adapter::outbound::notifier::telegram::TelegramConfig;

        if self.telegram.enabled && TelegramConfig::from_env().is_none() {
            return Err(ConfigError::MissingField {
                field: "TELEGRAM_BOT_TOKEN/TELEGRAM_CHAT_ID",
            }
            .into());
        }
        Ok(())
    }

    #[cfg(not(feature = "telegram"))]
    #[allow(clippy::result_large_err)]
    fn validate_telegram(&self) -> Result<()> {
        if self.telegram.enabled {
            return Err(ConfigError::InvalidValue {
                field: "telegram.enabled",
                reason: "telegram support requires the telegram feature".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Reject scraper names that are not registered.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownScraper`] for the first unknown name.
    #[allow(clippy::result_large_err)]
    pub fn validate_scrapers(names: &[String]) -> Result<()> {
        if let Some(unknown) = names
            .iter()
            .find(|name| !AVAILABLE_SCRAPERS.contains(&name.trim()))
        {
            return Err(ConfigError::UnknownScraper {
                name: unknown.clone(),
                available: AVAILABLE_SCRAPERS.join(", "),
            }
            .into());
        }
        Ok(())
    }

    /// Interval between iteration starts.
    #[must_use]
    pub fn update_frequency(&self) -> Duration {
        Duration::from_secs(self.update_frequency_secs)
    }

    /// Whether isolated failures go to the report target.
    #[must_use]
    pub fn reports_errors(&self) -> bool {
        REPORTING_ENVIRONMENTS.contains(&self.environment.as_str())
    }

    /// Initialize logging from the `[logging]` section.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
