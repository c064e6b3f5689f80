use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Path of the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Mail pipeline settings
    #[serde(default)]
    pub messaging: MessagingConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for sending tests and parsing replies
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MessagingConfig {
    // @field: Script turning a raw reply into question/answer lines
    #[serde(default = "default_reply_parse_script")]
    pub reply_parse_script: PathBuf,

    // @field: Program reading a complete message on stdin and sending it
    #[serde(default = "default_send_command")]
    pub send_command: String,

    // @field: Arguments passed to the send command
    #[serde(default = "default_send_args")]
    pub send_args: Vec<String>,

    // @field: Subject of test messages
    #[serde(default = "default_subject")]
    pub subject: String,

    // @field: Number of words per test
    #[serde(default = "default_test_word_count")]
    pub test_word_count: usize,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            reply_parse_script: default_reply_parse_script(),
            send_command: default_send_command(),
            send_args: default_send_args(),
            subject: default_subject(),
            test_word_count: default_test_word_count(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Directory holding memo's files, `~/.memo`
pub fn memo_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".memo")
}

/// Default location of the configuration file
pub fn default_config_path() -> PathBuf {
    memo_dir().join("conf.json")
}

fn default_database_path() -> PathBuf {
    memo_dir().join("db")
}

fn default_reply_parse_script() -> PathBuf {
    PathBuf::from("/usr/local/lib/memo/parse-reply.pl")
}

fn default_send_command() -> String {
    "sendmail".to_string()
}

fn default_send_args() -> Vec<String> {
    vec!["-t".to_string()]
}

fn default_subject() -> String {
    "Memo test".to_string()
}

fn default_test_word_count() -> usize {
    10
}

impl Config {
    /// Load the configuration file, writing a default one if it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// Read the configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(anyhow!("Database path can't be empty"));
        }

        if self.messaging.send_command.trim().is_empty() {
            return Err(anyhow!("Send command can't be empty"));
        }

        if self.messaging.reply_parse_script.as_os_str().is_empty() {
            return Err(anyhow!("Reply parse script can't be empty"));
        }

        if self.messaging.test_word_count == 0 {
            return Err(anyhow!("A test needs at least one word"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            database_path: default_database_path(),
            messaging: MessagingConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
