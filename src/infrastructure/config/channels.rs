//! Notification channel configuration.
//!
//! Only non-secret settings live in the file. Tokens and webhook URLs come
//! from the environment and are attached by [`super::settings::Config`].

use serde::Deserialize;

use crate::adapter::outbound::notifier::slack::{
    DEFAULT_SLACK_CHANNEL, DEFAULT_SLACK_ICON, DEFAULT_SLACK_USERNAME, SLACK_API_URL,
};

/// `[slack]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SlackAppConfig {
    pub enabled: bool,
    pub channel: String,
    pub username: String,
    pub icon_emoji: String,
    pub api_url: String,
    /// From `SLACK_API_TOKEN`.
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for SlackAppConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            channel: DEFAULT_SLACK_CHANNEL.to_string(),
            username: DEFAULT_SLACK_USERNAME.to_string(),
            icon_emoji: DEFAULT_SLACK_ICON.to_string(),
            api_url: SLACK_API_URL.to_string(),
            token: None,
        }
    }
}

/// `[discord]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DiscordAppConfig {
    pub enabled: bool,
    /// From `DISCORD_WEBHOOK_URL`.
    #[serde(skip)]
    pub webhook_url: Option<String>,
}

/// `[telegram]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TelegramAppConfig {
    pub enabled: bool,
}

/// `[microblog]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MicroblogAppConfig {
    pub enabled: bool,
    /// Instance root, e.g. `https://mastodon.social`.
    pub instance_url: String,
    /// From `MICROBLOG_ACCESS_TOKEN`.
    #[serde(skip)]
    pub access_token: Option<String>,
}
