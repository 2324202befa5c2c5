//! Handler for the `config` command group.

use std::path::Path;

use crate::error::Result;
use crate::infrastructure::config::Config;

/// Execute `config validate`.
pub fn execute_validate(path: &Path) -> Result<()> {
    Config::load(path)?;
    println!("Configuration valid: {}", path.display());
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(path: &Path) -> Result<()> {
    let config = Config::load_or_default(path)?;

    println!("Environment      {}", config.environment);
    println!("Update frequency {}s", config.update_frequency_secs);
    println!("Database         {}", config.database);
    println!("Scrapers         {}", scraper_list(&config.scraper.enabled));
    println!("Channels         {}", channel_list(&config));
    Ok(())
}

fn scraper_list(enabled: &[String]) -> String {
    if enabled.is_empty() {
        "all".to_string()
    } else {
        enabled.join(", ")
    }
}

fn channel_list(config: &Config) -> String {
    let channels: Vec<&str> = [
        ("slack", config.slack.enabled),
        ("discord", config.discord.enabled),
        ("telegram", config.telegram.enabled),
        ("microblog", config.microblog.enabled),
    ]
    .into_iter()
    .filter_map(|(name, enabled)| enabled.then_some(name))
    .collect();

    if channels.is_empty() {
        "log".to_string()
    } else {
        channels.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_scraper_list_means_all() {
        assert_eq!(scraper_list(&[]), "all");
        assert_eq!(scraper_list(&["cvs".to_string()]), "cvs");
    }

    #[test]
    fn no_channels_shows_log() {
        let mut config = Config::default();
        assert_eq!(channel_list(&config), "log");
        config.discord.enabled = true;
        config.microblog.enabled = true;
        assert_eq!(channel_list(&config), "discord, microblog");
    }
}
