/*!
 * Tests for application configuration functionality
 */

use std::path::PathBuf;

use memo::app_config::{Config, LogLevel, MessagingConfig};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert!(config.database_path.ends_with(".memo/db"));
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.messaging.send_command, "sendmail");
    assert_eq!(config.messaging.send_args, vec!["-t".to_string()]);
    assert_eq!(config.messaging.subject, "Memo test");
    assert_eq!(config.messaging.test_word_count, 10);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.messaging.test_word_count = 0;
    assert!(config.validate().is_err());
    config.messaging.test_word_count = 5;

    config.messaging.send_command = "  ".to_string();
    assert!(config.validate().is_err());
    config.messaging.send_command = "sendmail".to_string();

    config.database_path = PathBuf::new();
    assert!(config.validate().is_err());
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("nested").join("conf.json");

    let config = Config::load_or_create(&path).expect("Failed to create config");

    assert!(path.exists());
    assert_eq!(config, Config::default());
    assert_eq!(Config::from_file(&path).unwrap(), config);
}

#[test]
fn test_loadOrCreate_withExistingFile_shouldReadIt() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        &dir.path().to_path_buf(),
        "conf.json",
        r#"{
            "database_path": "/var/lib/memo/words.db",
            "messaging": { "send_command": "msmtp", "send_args": ["-a", "default"] },
            "log_level": "warn"
        }"#,
    )
    .unwrap();

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(config.database_path, PathBuf::from("/var/lib/memo/words.db"));
    assert_eq!(config.messaging.send_command, "msmtp");
    assert_eq!(config.messaging.send_args, vec!["-a", "default"]);
    assert_eq!(config.messaging.test_word_count, MessagingConfig::default().test_word_count);
    assert_eq!(config.log_level, LogLevel::Warn);
}

#[test]
fn test_fromFile_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(&dir.path().to_path_buf(), "conf.json", "{ not json")
        .unwrap();

    let error = Config::from_file(&path).unwrap_err();

    assert!(error.to_string().contains("Failed to parse config file"));
}
