//! Infrastructure configuration modules.

pub mod channels;
pub mod logging;
pub mod scraper;
pub mod settings;
pub mod thresholds;

pub use settings::Config;
