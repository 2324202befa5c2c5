//! Scraper port: one implementation per third-party scheduling site.

use async_trait::async_trait;

use super::store::StateStore;
use crate::domain::Clinic;
use crate::error::Result;

/// Fetches current availability from one external site.
///
/// Called once per polling iteration. Implementations must tolerate being
/// invoked on a fixed cadence with no teardown in between, and must not
/// return two clinics with the same storage key from one call.
#[async_trait]
pub trait Scraper: Send + Sync {
    /// Registry name, as accepted by `--scrapers`.
    fn name(&self) -> &'static str;

    /// Scrape the site and build this iteration's clinics.
    ///
    /// `state` is available for adapter-private data such as cached
    /// session cookies.
    async fn all_clinics(&self, state: &StateStore) -> Result<Vec<Box<dyn Clinic>>>;
}
