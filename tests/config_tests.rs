mod support;

use std::fs;
use std::time::Duration;

use slotwatch::domain::ClinicClass;
use slotwatch::error::{ConfigError, Error};
use slotwatch::infrastructure::config::logging::LogFormat;
use slotwatch::infrastructure::config::Config;
use support::write_temp_config;

#[test]
fn empty_file_is_a_working_development_setup() {
    let config = Config::parse_toml("").unwrap();
    assert_eq!(config.environment, "development");
    assert_eq!(config.update_frequency(), Duration::from_secs(60));
    assert_eq!(config.database, "slotwatch.db");
    assert!(config.scraper.enabled.is_empty());
    assert!(!config.slack.enabled);
    assert!(!config.reports_errors());
}

#[test]
fn full_file_round_trips_through_load() {
    let path = write_temp_config(
        "full",
        r#"
environment = "staging"
update_frequency_secs = 120
database = "memory"

[logging]
level = "debug"
format = "json"

[scraper]
enabled = ["cvs"]
timeout_secs = 10
page_delay_ms = 0
state = "RI"

[thresholds.clinic]
min_absolute = 5
cooldown_secs = 900

[thresholds.pharmacy]
min_increase = 2
"#,
    );

    let config = Config::load(&path).unwrap();
    let _ = fs::remove_file(&path);

    assert_eq!(config.update_frequency(), Duration::from_secs(120));
    assert_eq!(config.database, "memory");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.scraper.enabled, vec!["cvs".to_string()]);
    assert_eq!(config.scraper.state, "RI");

    let table = config.thresholds.table();
    let clinic = table.get(ClinicClass::Clinic);
    assert_eq!(clinic.min_absolute, 5);
    assert_eq!(clinic.min_increase, 10);
    assert_eq!(clinic.cooldown, Duration::from_secs(900));
    let pharmacy = table.get(ClinicClass::Pharmacy);
    assert_eq!(pharmacy.min_absolute, 10);
    assert_eq!(pharmacy.min_increase, 2);
}

#[test]
fn unknown_scraper_is_rejected() {
    let result = Config::parse_toml("[scraper]\nenabled = [\"walgreens\"]\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::UnknownScraper { ref name, .. })) if name == "walgreens"
    ));
}

#[test]
fn zero_interval_is_rejected() {
    let result = Config::parse_toml("update_frequency_secs = 0\n");
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue {
            field: "update_frequency_secs",
            ..
        }))
    ));
}

#[test]
fn negative_threshold_is_rejected() {
    let result = Config::parse_toml("[thresholds.pharmacy]\nmin_absolute = -1\n");
    assert!(result.is_err());
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let result = Config::parse_toml("update_frequency_secs = \"soon\"\n");
    assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let path = support::temp_path("absent", "toml");
    let config = Config::load_or_default(&path).unwrap();
    assert_eq!(config.update_frequency_secs, 60);
    assert!(Config::load(&path).is_err());
}
