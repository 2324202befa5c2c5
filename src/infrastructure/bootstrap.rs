//! Composition root: turns a [`Config`] into a ready [`Orchestrator`].

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::adapter::outbound::memory::MemoryStore;
use crate::adapter::outbound::notifier::{
    DiscordConfig, DiscordNotifier, MicroblogConfig, MicroblogNotifier, SlackConfig,
    SlackNotifier,
};
#[cfg(feature = "telegram")]
use crate::adapter::outbound::notifier::{TelegramConfig, TelegramNotifier};
use crate::adapter::outbound::scraper::build_scrapers;
use crate::adapter::outbound::sqlite::SqliteStore;
use crate::application::{ErrorPolicy, Orchestrator};
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::settings::Config;
use crate::port::{
    ErrorReporter, KeyValueStore, LogNotifier, NotifierRegistry, NullReporter, StateStore,
    TracingReporter,
};

/// Database value selecting the volatile in-process store.
pub const MEMORY_DATABASE: &str = "memory";

/// Command-line overrides applied on top of the file configuration.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Scrapers to run instead of `[scraper].enabled`.
    pub scrapers: Option<Vec<String>>,
    /// Interval instead of `update_frequency_secs`.
    pub interval: Option<Duration>,
    /// Stop at the first scraper failure instead of isolating it.
    pub fail_fast: bool,
}

/// Open the configured key-value store.
///
/// # Errors
/// Returns an error if the database cannot be opened or migrated.
pub fn build_store(config: &Config) -> Result<Arc<dyn KeyValueStore>> {
    if config.database == MEMORY_DATABASE {
        info!("Using in-memory store; state is lost on restart");
        return Ok(Arc::new(MemoryStore::new()));
    }

    info!(database = %config.database, "Opening SQLite store");
    Ok(Arc::new(SqliteStore::open(&config.database)?))
}

/// Reporter for isolated failures.
#[must_use]
pub fn build_reporter(config: &Config) -> Arc<dyn ErrorReporter> {
    if config.reports_errors() {
        Arc::new(TracingReporter::new(config.environment.clone()))
    } else {
        Arc::new(NullReporter)
    }
}

/// Build the notifier registry from configuration.
///
/// When no channel is enabled the registry holds only the log notifier, so
/// announcements stay visible during development.
///
/// # Errors
/// Returns an error if an enabled channel lacks credentials or the HTTP
/// client cannot be built.
pub fn build_notifier_registry(config: &Config) -> Result<NotifierRegistry> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.scraper.timeout_secs))
        .build()?;
    let mut registry = NotifierRegistry::new();

    if config.slack.enabled {
        let token = config.slack.token.clone().ok_or(ConfigError::MissingField {
            field: "SLACK_API_TOKEN",
        })?;
        registry.register(Box::new(SlackNotifier::new(
            SlackConfig {
                token,
                channel: config.slack.channel.clone(),
                username: config.slack.username.clone(),
                icon_emoji: config.slack.icon_emoji.clone(),
                api_url: config.slack.api_url.clone(),
            },
            client.clone(),
        )));
        info!(channel = %config.slack.channel, "Slack notifier enabled");
    }

    if config.discord.enabled {
        let webhook_url = config
            .discord
            .webhook_url
            .clone()
            .ok_or(ConfigError::MissingField {
                field: "DISCORD_WEBHOOK_URL",
            })?;
        registry.register(Box::new(DiscordNotifier::new(
            DiscordConfig { webhook_url },
            client.clone(),
        )));
        info!("Discord notifier enabled");
    }

    #[cfg(feature = "telegram")]
    if config.telegram.enabled {
        let telegram = TelegramConfig::from_env().ok_or(ConfigError::MissingField {
            field: "TELEGRAM_BOT_TOKEN/TELEGRAM_CHAT_ID",
        })?;
        registry.register(Box::new(TelegramNotifier::new(telegram)));
    }

    if config.microblog.enabled {
        let access_token = config
            .microblog
            .access_token
            .clone()
            .ok_or(ConfigError::MissingField {
                field: "MICROBLOG_ACCESS_TOKEN",
            })?;
        registry.register(Box::new(MicroblogNotifier::new(
            MicroblogConfig {
                instance_url: config.microblog.instance_url.clone(),
                access_token,
            },
            client,
        )));
        info!(instance = %config.microblog.instance_url, "Microblog notifier enabled");
    }

    if registry.is_empty() {
        info!("No notification channel enabled, logging announcements instead");
        registry.register(Box::new(LogNotifier));
    }

    Ok(registry)
}

/// Wire every component of a polling run.
///
/// # Errors
/// Returns an error if any component cannot be built.
pub fn build_orchestrator(config: &Config, options: &RunOptions) -> Result<Orchestrator> {
    let names = options
        .scrapers
        .clone()
        .unwrap_or_else(|| config.scraper.enabled.clone());
    Config::validate_scrapers(&names)?;

    let interval = options.interval.unwrap_or_else(|| config.update_frequency());
    if interval.is_zero() {
        return Err(ConfigError::InvalidValue {
            field: "update_frequency_secs",
            reason: "must be greater than 0".to_string(),
        }
        .into());
    }
    let scraper_policy = if options.fail_fast {
        ErrorPolicy::Propagate
    } else {
        ErrorPolicy::Isolate
    };

    let scrapers = build_scrapers(&names, &config.scraper.context())?;
    let store = build_store(config)?;

    Orchestrator::builder()
        .scrapers(scrapers)
        .notifiers(build_notifier_registry(config)?)
        .state(StateStore::new(store))
        .thresholds(config.thresholds.table())
        .reporter(build_reporter(config))
        .interval(interval)
        .scraper_policy(scraper_policy)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn memory_config() -> Config {
        Config {
            database: MEMORY_DATABASE.to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn no_channels_falls_back_to_log() {
        let registry = build_notifier_registry(&memory_config()).unwrap();
        assert_eq!(registry.names(), vec!["log"]);
    }

    #[test]
    fn enabled_channels_are_registered_in_order() {
        let mut config = memory_config();
        config.slack.enabled = true;
        config.slack.token = Some("xoxb".into());
        config.discord.enabled = true;
        config.discord.webhook_url = Some("https://discord.example/hook".into());

        let registry = build_notifier_registry(&config).unwrap();
        assert_eq!(registry.names(), vec!["slack", "discord"]);
    }

    #[test]
    fn enabled_channel_without_secret_fails() {
        let mut config = memory_config();
        config.discord.enabled = true;
        assert!(build_notifier_registry(&config).is_err());
    }

    #[test]
    fn reporter_follows_environment() {
        let mut config = memory_config();
        config.environment = "production".into();
        assert!(config.reports_errors());
        config.environment = "development".into();
        assert!(!config.reports_errors());
        let _ = build_reporter(&config);
    }

    #[test]
    fn cli_overrides_win() {
        let options = RunOptions {
            scrapers: Some(vec!["cvs".into()]),
            interval: Some(Duration::from_secs(5)),
            fail_fast: false,
        };
        let orchestrator = build_orchestrator(&memory_config(), &options).unwrap();
        assert_eq!(orchestrator.scraper_names(), vec!["cvs"]);
        assert_eq!(orchestrator.interval(), Duration::from_secs(5));
    }

    #[test]
    fn unknown_cli_scraper_is_rejected() {
        let options = RunOptions {
            scrapers: Some(vec!["nope".into()]),
            interval: None,
            fail_fast: false,
        };
        assert!(build_orchestrator(&memory_config(), &options).is_err());
    }

    #[test]
    fn zero_interval_override_is_rejected() {
        let options = RunOptions {
            scrapers: None,
            interval: Some(Duration::ZERO),
            fail_fast: false,
        };
        assert!(matches!(
            build_orchestrator(&memory_config(), &options),
            Err(Error::Config(ConfigError::InvalidValue {
                field: "update_frequency_secs",
                ..
            }))
        ));
    }
}
