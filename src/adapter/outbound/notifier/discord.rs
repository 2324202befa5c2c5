//! Discord channel via an incoming webhook.

use async_trait::async_trait;
use serde_json::json;

use super::{check_status, request_error, send_each};
use crate::domain::Observation;
use crate::error::ChannelError;
use crate::port::Notifier;

const CHANNEL: &str = "discord";

/// Configuration for the Discord notifier.
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    /// Full webhook URL (`DISCORD_WEBHOOK_URL`).
    pub webhook_url: String,
}

/// Sends each message as its own webhook execution.
pub struct DiscordNotifier {
    config: DiscordConfig,
    client: reqwest::Client,
}

impl DiscordNotifier {
    #[must_use]
    pub fn new(config: DiscordConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    async fn execute(&self, content: String) -> Result<(), ChannelError> {
        let response = self
            .client
            .post(&self.config.webhook_url)
            .json(&json!({ "content": content }))
            .send()
            .await
            .map_err(|e| request_error(CHANNEL, &e))?;
        check_status(CHANNEL, &response)
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    fn name(&self) -> &'static str {
        CHANNEL
    }

    async fn post(&self, batch: &[&Observation]) -> Result<(), ChannelError> {
        send_each(CHANNEL, batch, |content| self.execute(content)).await
    }
}
