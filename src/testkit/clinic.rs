//! Configurable in-memory clinic.

use crate::domain::{
    Clinic, ClinicClass, Decision, NotificationText, Observation, Verdict,
};

/// Link every [`MockClinic`] has unless told otherwise.
pub const MOCK_LINK: &str = "https://example.org/signup";

/// A clinic whose every answer is set by the test.
#[derive(Debug, Clone)]
pub struct MockClinic {
    title: String,
    appointments: u32,
    link: Option<String>,
    class: ClinicClass,
    storage_key: Option<String>,
    text: Option<NotificationText>,
}

impl MockClinic {
    #[must_use]
    pub fn new(title: impl Into<String>, appointments: u32) -> Self {
        Self {
            title: title.into(),
            appointments,
            link: Some(MOCK_LINK.to_string()),
            class: ClinicClass::Clinic,
            storage_key: None,
            text: None,
        }
    }

    #[must_use]
    pub fn with_link(mut self, link: Option<&str>) -> Self {
        self.link = link.map(str::to_string);
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: ClinicClass) -> Self {
        self.class = class;
        self
    }

    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: NotificationText) -> Self {
        self.text = Some(text);
        self
    }

    #[must_use]
    pub fn with_appointments(mut self, appointments: u32) -> Self {
        self.appointments = appointments;
        self
    }
}

impl Clinic for MockClinic {
    fn title(&self) -> String {
        self.title.clone()
    }

    fn appointments(&self) -> u32 {
        self.appointments
    }

    fn link(&self) -> Option<String> {
        self.link.clone()
    }

    fn storage_key(&self) -> String {
        self.storage_key.clone().unwrap_or_else(|| self.title.clone())
    }

    fn class(&self) -> ClinicClass {
        self.class
    }

    fn notification_text(&self) -> NotificationText {
        match &self.text {
            Some(text) => text.clone(),
            None => NotificationText::Single(format!(
                "{} appointments available at {}. Check eligibility and sign up at {}",
                self.appointments,
                self.title,
                self.link.clone().unwrap_or_default()
            )),
        }
    }
}

/// An observation already selected for notification.
#[must_use]
pub fn observation(clinic: impl Clinic + 'static, last_count: i64) -> Observation {
    let new_appointments = i64::from(clinic.appointments()) - last_count;
    Observation {
        scraper: "mock".to_string(),
        clinic: Box::new(clinic),
        last_count,
        last_post: None,
        decision: Decision {
            verdict: Verdict::Notify,
            new_appointments,
        },
    }
}
