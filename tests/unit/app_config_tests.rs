/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;
use sccfix::app_config::{Config, LogLevel};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.region_name, "us-west-1");
    assert_eq!(config.group_name, "fah");
    assert_eq!(config.project_name, "mrss-translator");
    assert_eq!(config.result_queue, "scc_correction_return");
    assert_eq!(config.storage_root, PathBuf::from("storage"));
    assert!(config.result_log.is_none());
    assert!(config.webhook_url.is_none());
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.result_queue = "  ".to_string();
    assert!(config.validate().is_err());
    config.result_queue = "scc_correction_return".to_string();

    config.webhook_url = Some("not a url".to_string());
    assert!(config.validate().is_err());

    config.webhook_url = Some("ftp://results.example.com/".to_string());
    assert!(config.validate().is_err());

    config.webhook_url = Some("https://results.example.com/hook".to_string());
    assert!(config.validate().is_ok());
    assert_eq!(config.webhook_endpoint().unwrap().unwrap().host_str(), Some("results.example.com"));

    config.webhook_timeout_secs = 0;
    assert!(config.validate().is_err());
}

/// Test that a partial file falls back to defaults
#[test]
fn test_config_fromFile_withPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"result_queue": "custom_return", "log_level": "debug"}"#,
    )?;

    let config = Config::from_file(&path)?;

    assert_eq!(config.result_queue, "custom_return");
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.region_name, "us-west-1");
    Ok(())
}

/// Test that a missing file is created with defaults
#[test]
fn test_config_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(Config::from_file(&path)?, config);
    Ok(())
}

/// Test environment overrides of the identity fields
#[test]
fn test_config_overrides_withEnvironmentValues_shouldReplaceIdentity() {
    let env: HashMap<&str, &str> = [("regionName", "eu-central-1"), ("projectName", "captions"), ("groupName", "")]
        .into_iter()
        .collect();

    let mut config = Config::default();
    config.apply_overrides_from(|key| env.get(key).map(|v| v.to_string()));

    assert_eq!(config.region_name, "eu-central-1");
    assert_eq!(config.project_name, "captions");
    // empty values are ignored
    assert_eq!(config.group_name, "fah");
    assert_eq!(config.identity(), "captions/fah (eu-central-1)");
}

#[test]
fn test_logLevel_shouldMapToLevelFilter() {
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
