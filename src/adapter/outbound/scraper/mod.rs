//! Scraper adapters.
//!
//! Each adapter turns one external site into [`crate::domain::Clinic`]s.

pub mod cvs;
pub mod http;
pub mod ma_immunizations;
pub mod pharmacy;
pub mod registry;

pub use cvs::CvsScraper;
pub use http::HttpSettings;
pub use ma_immunizations::MaImmunizationsScraper;
pub use pharmacy::PharmacyRollup;
pub use registry::{build_scrapers, ScraperContext, AVAILABLE_SCRAPERS};
