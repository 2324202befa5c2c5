//! Microblog channel using the Mastodon-compatible statuses API.

use async_trait::async_trait;
use serde_json::json;

use super::{check_status, request_error, send_each};
use crate::domain::{weighted_length, Observation};
use crate::error::ChannelError;
use crate::port::Notifier;

const CHANNEL: &str = "microblog";

/// Maximum weighted length per status. Links count as
/// [`LINK_WEIGHT`](crate::domain::LINK_WEIGHT) whatever their real length.
pub const STATUS_LIMIT: usize = 280;

/// Configuration for the microblog notifier.
#[derive(Debug, Clone)]
pub struct MicroblogConfig {
    /// Instance root, e.g. `https://mastodon.social`.
    pub instance_url: String,
    /// OAuth access token (`MICROBLOG_ACCESS_TOKEN`).
    pub access_token: String,
}

/// Publishes one status per message.
pub struct MicroblogNotifier {
    config: MicroblogConfig,
    client: reqwest::Client,
}

impl MicroblogNotifier {
    #[must_use]
    pub fn new(config: MicroblogConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    async fn publish(&self, status: String) -> Result<(), ChannelError> {
        if weighted_length(&status) > STATUS_LIMIT {
            return Err(ChannelError::Rejected {
                channel: CHANNEL,
                reason: format!("status exceeds {STATUS_LIMIT} characters"),
            });
        }

        let url = format!(
            "{}/api/v1/statuses",
            self.config.instance_url.trim_end_matches('/')
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.access_token)
            .json(&json!({ "status": status }))
            .send()
            .await
            .map_err(|e| request_error(CHANNEL, &e))?;
        check_status(CHANNEL, &response)
    }
}

#[async_trait]
impl Notifier for MicroblogNotifier {
    fn name(&self) -> &'static str {
        CHANNEL
    }

    async fn post(&self, batch: &[&Observation]) -> Result<(), ChannelError> {
        send_each(CHANNEL, batch, |status| self.publish(status)).await
    }
}
