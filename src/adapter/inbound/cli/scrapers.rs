//! Handler for the `scrapers` command.

use crate::adapter::outbound::scraper::AVAILABLE_SCRAPERS;

/// Print every registered scraper name, one per line.
pub fn execute() {
    for name in AVAILABLE_SCRAPERS {
        println!("{name}");
    }
}
