/*!
 * Tests for configuration files and language lists
 */

use tokio_test::{assert_err, assert_ok};

use polytrans::app_config::{Config, LogLevel};
use polytrans::errors::ConfigError;
use polytrans::language_utils::{self, SUPPORTED_LANGUAGES};

use crate::common;

#[test]
fn test_config_save_then_load_should_round_trip() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("conf").join("conf.json");

    let mut config = common::test_config(dir.path(), &["es", "fr"], 3);
    config.engine = "bing".to_string();
    config.log_level = LogLevel::Debug;
    config.save(&path)?;

    let loaded = Config::load(&path)?;
    assert_eq!(loaded.engine, "bing");
    assert_eq!(loaded.target_languages, vec!["es", "fr"]);
    assert_eq!(loaded.jobs, 3);
    assert_eq!(loaded.log_level, LogLevel::Debug);
    assert_eq!(loaded.cache.path, config.cache.path);
    Ok(())
}

#[test]
fn test_load_or_default_with_missing_file_should_use_defaults() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let config = Config::load_or_default(dir.path().join("absent.json"))?;

    assert_eq!(config.engine, "google");
    assert_eq!(config.source_language, "auto");
    assert_eq!(config.jobs, 8);
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.cache.retention_days, 30);
    assert_ok!(config.validate());
    Ok(())
}

#[test]
fn test_load_with_invalid_json_should_error() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "conf.json", "{\"jobs\": \"many\"}")?;
    assert_err!(Config::load(&path));
    Ok(())
}

#[test]
fn test_validate_with_zero_attempts_should_name_field() {
    let mut config = Config::default();
    config.retry.max_attempts = 0;

    match config.validate() {
        Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "retry.max_attempts"),
        other => panic!("unexpected validation result: {:?}", other),
    }
}

#[test]
fn test_all_languages_should_expand_to_supported_list() {
    let mut config = Config::default();
    config.target_languages = vec!["all".to_string()];

    let resolved = config.resolved_target_languages();
    assert_eq!(resolved.len(), SUPPORTED_LANGUAGES.len());
    assert!(resolved.iter().all(|l| language_utils::is_supported(l)));
}
