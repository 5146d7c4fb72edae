//! Config tests.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serial_test::serial;

use super::AppConfig;

const VARS: [&str; 10] = [
    "MIN_REACTIONS",
    "MEDIA_ONLY",
    "MAX_MESSAGES",
    "BATCH_SIZE",
    "BATCH_DELAY_MS",
    "PAGE_SIZE",
    "OUT_OF_RANGE_THRESHOLD",
    "TOP_N_DISPLAY",
    "OUTPUT_DIR",
    "LOG_FILE",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_load_config_with_defaults() {
    clear_env();

    let config = AppConfig::load().unwrap();

    assert_eq!(config.min_reactions, 5);
    assert!(config.media_only);
    assert_eq!(config.max_messages, 1000);
    assert_eq!(config.batch_size, 100);
    assert_eq!(config.batch_delay, Duration::from_secs(1));
    assert_eq!(config.page_size, 100);
    assert_eq!(config.out_of_range_threshold, 10);
    assert_eq!(config.top_n_display, 20);
    assert_eq!(config.output_dir, PathBuf::from("output"));
    assert_eq!(config.log_file, "logs/tgstat.log");
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_load_config_with_custom_values() {
    clear_env();
    env::set_var("MIN_REACTIONS", "12");
    env::set_var("MEDIA_ONLY", "false");
    env::set_var("MAX_MESSAGES", "5000");
    env::set_var("BATCH_SIZE", "50");
    env::set_var("BATCH_DELAY_MS", "250");
    env::set_var("PAGE_SIZE", "20");
    env::set_var("OUT_OF_RANGE_THRESHOLD", "25");
    env::set_var("TOP_N_DISPLAY", "5");
    env::set_var("OUTPUT_DIR", "/tmp/tgstat-out");
    env::set_var("LOG_FILE", "/tmp/tgstat.log");

    let config = AppConfig::load().unwrap();

    assert_eq!(config.min_reactions, 12);
    assert!(!config.media_only);
    assert_eq!(config.max_messages, 5000);
    assert_eq!(config.batch_delay, Duration::from_millis(250));
    assert_eq!(config.out_of_range_threshold, 25);
    assert_eq!(config.output_dir, PathBuf::from("/tmp/tgstat-out"));

    let pacing = config.acquisition_config();
    assert_eq!(pacing.page_size, 20);
    assert_eq!(pacing.batch_size, 50);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_number_is_an_error() {
    clear_env();
    env::set_var("MIN_REACTIONS", "lots");

    let err = AppConfig::load().unwrap_err();
    assert!(err.to_string().contains("MIN_REACTIONS"));

    clear_env();
}

#[test]
#[serial]
fn test_media_only_flag_forms() {
    clear_env();
    for (raw, expected) in [("1", true), ("off", false), (" TRUE ", true), ("no", false)] {
        env::set_var("MEDIA_ONLY", raw);
        assert_eq!(AppConfig::load().unwrap().media_only, expected, "{:?}", raw);
    }
    env::set_var("MEDIA_ONLY", "maybe");
    assert!(AppConfig::load().is_err());
    clear_env();
}

#[test]
#[serial]
fn test_validate_rejects_zero_sizes() {
    clear_env();
    env::set_var("BATCH_SIZE", "0");
    let config = AppConfig::load().unwrap();
    assert!(config.validate().is_err());

    env::set_var("BATCH_SIZE", "10");
    env::set_var("TOP_N_DISPLAY", "0");
    let config = AppConfig::load().unwrap();
    assert!(config.validate().is_err());
    clear_env();
}
