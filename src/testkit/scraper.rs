//! Scrapers returning scripted results.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::clinic::MockClinic;
use crate::domain::Clinic;
use crate::error::{AdapterError, Result};
use crate::port::{Scraper, StateStore};

/// Returns a copy of its current clinic list on every call.
#[derive(Debug, Clone)]
pub struct StaticScraper {
    name: &'static str,
    clinics: Arc<Mutex<Vec<MockClinic>>>,
}

impl StaticScraper {
    #[must_use]
    pub fn new(name: &'static str, clinics: Vec<MockClinic>) -> Self {
        Self {
            name,
            clinics: Arc::new(Mutex::new(clinics)),
        }
    }

    /// Replace what later calls return.
    pub fn set_clinics(&self, clinics: Vec<MockClinic>) {
        *self.clinics.lock() = clinics;
    }
}

#[async_trait]
impl Scraper for StaticScraper {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn all_clinics(&self, _state: &StateStore) -> Result<Vec<Box<dyn Clinic>>> {
        Ok(self
            .clinics
            .lock()
            .iter()
            .cloned()
            .map(|c| Box::new(c) as Box<dyn Clinic>)
            .collect())
    }
}

/// Always fails with an adapter error.
#[derive(Debug, Clone)]
pub struct FailingScraper {
    name: &'static str,
    calls: Arc<AtomicUsize>,
}

impl FailingScraper {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            calls: Arc::default(),
        }
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Scraper for FailingScraper {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn all_clinics(&self, _state: &StateStore) -> Result<Vec<Box<dyn Clinic>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AdapterError::Other {
            site: self.name,
            reason: "scripted failure".to_string(),
        }
        .into())
    }
}
