use anyhow::{Context, Result, anyhow};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use url::Url;

/// Application configuration module
/// This module handles loading, validating and saving the runtime settings
/// of the correction service.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Deployment region
    #[serde(default = "default_region_name")]
    pub region_name: String,

    /// Deployment group
    #[serde(default = "default_group_name")]
    pub group_name: String,

    /// Owning project
    #[serde(default = "default_project_name")]
    pub project_name: String,

    /// Name stamped on every result record
    #[serde(default = "default_result_queue")]
    pub result_queue: String,

    /// Directory backing the object store, one subdirectory per bucket
    #[serde(default = "default_storage_root")]
    pub storage_root: PathBuf,

    /// JSON-lines file receiving result records; stdout when absent
    #[serde(default)]
    pub result_log: Option<PathBuf>,

    /// HTTP endpoint receiving result records
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Webhook request timeout in seconds
    #[serde(default = "default_webhook_timeout_secs")]
    pub webhook_timeout_secs: u64,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
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

impl LogLevel {
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

// Environment variables that override the identity fields
pub const ENV_REGION_NAME: &str = "regionName";
pub const ENV_GROUP_NAME: &str = "groupName";
pub const ENV_PROJECT_NAME: &str = "projectName";

fn default_region_name() -> String {
    "us-west-1".to_string()
}

fn default_group_name() -> String {
    "fah".to_string()
}

fn default_project_name() -> String {
    "mrss-translator".to_string()
}

fn default_result_queue() -> String {
    "scc_correction_return".to_string()
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("storage")
}

fn default_webhook_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load a configuration file, writing the defaults there first when it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        log::warn!("Config file not found at {:?}, creating default config.", path);
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write config to file: {:?}", path))
    }

    /// Apply `regionName`, `groupName` and `projectName` from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply identity overrides from any variable lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let targets = [
            (ENV_REGION_NAME, &mut self.region_name),
            (ENV_GROUP_NAME, &mut self.group_name),
            (ENV_PROJECT_NAME, &mut self.project_name),
        ];
        for (key, field) in targets {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *field = value;
            }
        }
    }

    /// Human-readable deployment identity for logs
    pub fn identity(&self) -> String {
        format!("{}/{} ({})", self.project_name, self.group_name, self.region_name)
    }

    /// Parsed webhook endpoint, if one is configured
    pub fn webhook_endpoint(&self) -> Result<Option<Url>> {
        match self.webhook_url.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => {
                let url = Url::parse(raw).with_context(|| format!("Invalid webhook url: {}", raw))?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(anyhow!("Webhook url must use http or https: {}", raw));
                }
                Ok(Some(url))
            }
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.result_queue.trim().is_empty() {
            return Err(anyhow!("Result queue name must not be empty"));
        }

        self.webhook_endpoint()?;

        if self.webhook_url.is_some() && self.webhook_timeout_secs == 0 {
            return Err(anyhow!("Webhook timeout must be at least one second"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            region_name: default_region_name(),
            group_name: default_group_name(),
            project_name: default_project_name(),
            result_queue: default_result_queue(),
            storage_root: default_storage_root(),
            result_log: None,
            webhook_url: None,
            webhook_timeout_secs: default_webhook_timeout_secs(),
            log_level: LogLevel::default(),
        }
    }
}
