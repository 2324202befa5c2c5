//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for the supported channels.
//! Chat channels take the whole batch in one request; text channels send
//! one request per rendered message.

use std::future::Future;

use tracing::warn;

use crate::domain::Observation;
use crate::error::ChannelError;

pub mod discord;
pub mod microblog;
pub mod slack;
#[cfg(feature = "telegram")]
pub mod telegram;

pub use discord::{DiscordConfig, DiscordNotifier};
pub use microblog::{MicroblogConfig, MicroblogNotifier};
pub use slack::{SlackConfig, SlackNotifier};
#[cfg(feature = "telegram")]
pub use telegram::{TelegramConfig, TelegramNotifier};

/// Send every text message of every observation with `send`.
///
/// A failed message does not stop the rest. If any failed the result is
/// [`ChannelError::Partial`], listing the clinics that still went out in
/// full.
pub(crate) async fn send_each<F, Fut>(
    channel: &'static str,
    batch: &[&Observation],
    mut send: F,
) -> Result<(), ChannelError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<(), ChannelError>>,
{
    let mut total = 0;
    let mut failed = 0;
    let mut delivered = Vec::with_capacity(batch.len());

    for observation in batch {
        let key = observation.clinic.storage_key();
        let mut complete = true;
        for message in observation.clinic.notification_text().into_messages() {
            total += 1;
            if let Err(e) = send(message).await {
                warn!(channel, clinic = %key, error = %e, "Message delivery failed");
                failed += 1;
                complete = false;
            }
        }
        if complete {
            delivered.push(key);
        }
    }

    if failed > 0 {
        return Err(ChannelError::Partial {
            channel,
            failed,
            total,
            delivered,
        });
    }
    Ok(())
}

/// Map a transport failure onto [`ChannelError::Request`].
pub(crate) fn request_error(channel: &'static str, error: &reqwest::Error) -> ChannelError {
    ChannelError::Request {
        channel,
        reason: error.to_string(),
    }
}

/// Reject any non-2xx response.
pub(crate) fn check_status(
    channel: &'static str,
    response: &reqwest::Response,
) -> Result<(), ChannelError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(ChannelError::Rejected {
            channel,
            reason: format!("status {status}"),
        })
    }
}
