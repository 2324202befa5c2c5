//! Slack channel via the Web API `chat.postMessage` method.
//!
//! Every selected clinic becomes one section block; the whole batch goes
//! out as a single message.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{check_status, request_error};
use crate::domain::Observation;
use crate::error::ChannelError;
use crate::port::Notifier;

const CHANNEL: &str = "slack";

/// Slack Web API root.
pub const SLACK_API_URL: &str = "https://slack.com/api";
pub const DEFAULT_SLACK_CHANNEL: &str = "#bot-vaccine";
pub const DEFAULT_SLACK_USERNAME: &str = "vaccine-bot";
pub const DEFAULT_SLACK_ICON: &str = ":old-man-yells-at-covid19:";

/// Configuration for the Slack notifier.
#[derive(Debug, Clone)]
pub struct SlackConfig {
    /// Bot token (`SLACK_API_TOKEN`).
    pub token: String,
    pub channel: String,
    pub username: String,
    pub icon_emoji: String,
    /// Overridable for tests.
    pub api_url: String,
}

impl SlackConfig {
    /// Configuration with the default channel, name and icon.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            channel: DEFAULT_SLACK_CHANNEL.to_string(),
            username: DEFAULT_SLACK_USERNAME.to_string(),
            icon_emoji: DEFAULT_SLACK_ICON.to_string(),
            api_url: SLACK_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SlackResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Posts block messages to a Slack channel.
pub struct SlackNotifier {
    config: SlackConfig,
    client: reqwest::Client,
}

impl SlackNotifier {
    #[must_use]
    pub fn new(config: SlackConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    /// Request body for `chat.postMessage`.
    #[must_use]
    pub fn payload(&self, batch: &[&Observation]) -> Value {
        let blocks: Vec<Value> = batch
            .iter()
            .map(|o| o.clinic.chat_block(o.new_appointments()))
            .collect();

        json!({
            "channel": self.config.channel,
            "username": self.config.username,
            "icon_emoji": self.config.icon_emoji,
            "blocks": blocks,
        })
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    fn name(&self) -> &'static str {
        CHANNEL
    }

    async fn post(&self, batch: &[&Observation]) -> Result<(), ChannelError> {
        if batch.is_empty() {
            return Ok(());
        }

        let url = format!("{}/chat.postMessage", self.config.api_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.token)
            .json(&self.payload(batch))
            .send()
            .await
            .map_err(|e| request_error(CHANNEL, &e))?;
        check_status(CHANNEL, &response)?;

        // The Web API reports failures in the body with a 200 status.
        let body: SlackResponse = response
            .json()
            .await
            .map_err(|e| request_error(CHANNEL, &e))?;
        if !body.ok {
            return Err(ChannelError::Rejected {
                channel: CHANNEL,
                reason: body.error.unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        Ok(())
    }
}
