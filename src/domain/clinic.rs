//! The clinic capability every scraper produces.
//!
//! A clinic is one pollable unit of availability: a site on a date, or an
//! aggregate such as a pharmacy chain across a whole state. Adapters differ
//! wildly in how they compute counts, titles and links, so the core only
//! relies on this trait.

use std::fmt::Debug;

use serde_json::{json, Value};

use super::threshold::{ClinicClass, NotificationThresholds, ThresholdTable};

/// Appointment count at or above which chat output is highlighted.
pub const SIREN_THRESHOLD: u32 = 10;

/// Text rendered for text-only channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationText {
    /// One message.
    Single(String),
    /// Ordered messages, each within the channel's length limit.
    Split(Vec<String>),
}

impl NotificationText {
    /// Flatten into the ordered list of messages to send.
    #[must_use]
    pub fn into_messages(self) -> Vec<String> {
        match self {
            Self::Single(text) => vec![text],
            Self::Split(texts) => texts,
        }
    }
}

impl From<String> for NotificationText {
    fn from(text: String) -> Self {
        Self::Single(text)
    }
}

/// A schedulable unit of appointment availability.
///
/// Instances are built fresh every polling iteration and never mutate
/// afterwards. Everything here must be answerable without I/O.
pub trait Clinic: Debug + Send + Sync {
    /// Display name used in messages and logs.
    fn title(&self) -> String;

    /// Currently observed appointment count.
    fn appointments(&self) -> u32;

    /// Sign-up link. `None` suppresses notifications.
    fn link(&self) -> Option<String>;

    /// Stable identity across polls. Defaults to the title.
    fn storage_key(&self) -> String {
        self.title()
    }

    fn city(&self) -> Option<String> {
        None
    }

    fn address(&self) -> Option<String> {
        None
    }

    /// Page people are sent to from text channels.
    fn sign_up_page(&self) -> Option<String> {
        self.link()
    }

    fn class(&self) -> ClinicClass {
        ClinicClass::Clinic
    }

    /// Thresholds for this clinic, taken from its class unless overridden.
    fn thresholds(&self, table: &ThresholdTable) -> NotificationThresholds {
        table.get(self.class())
    }

    /// Message for text channels.
    fn notification_text(&self) -> NotificationText {
        NotificationText::Single(format!(
            "{} appointments available at {}. Check eligibility and sign up at {}",
            self.appointments(),
            self.title(),
            self.sign_up_page().unwrap_or_default()
        ))
    }

    /// Rich section block for chat channels.
    fn chat_block(&self, new_appointments: i64) -> Value {
        section_block(format!(
            "*{}*\n*Available appointments:* {}\n*Link:* {}",
            self.title(),
            render_appointments(self.appointments(), new_appointments),
            self.link().unwrap_or_default()
        ))
    }
}

/// `"<n> (<new> new)"`, wrapped in siren markers when the count is high.
#[must_use]
pub fn render_appointments(appointments: u32, new_appointments: i64) -> String {
    let text = format!("{appointments} ({new_appointments} new)");
    if appointments >= SIREN_THRESHOLD {
        format!(":siren: {text} :siren:")
    } else {
        text
    }
}

/// A markdown section block.
#[must_use]
pub fn section_block(text: String) -> Value {
    json!({
        "type": "section",
        "text": {
            "type": "mrkdwn",
            "text": text,
        },
    })
}
