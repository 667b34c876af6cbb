use anyhow::{Context, Result};
use ingest::DataSource;
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "NEL_VIEWER_CONFIG";
pub const DATA_ENV: &str = "NEL_VIEWER_DATA";
pub const BIND_ENV: &str = "NEL_VIEWER_BIND";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub data: DataSourceConfig,
    /// Benchmarks in column order.
    pub benchmarks: Vec<String>,
    pub labels_file: String,
    pub results_dir: String,
    pub retry: RetryConfig,
    pub cache: CacheConfig,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "lowercase")]
pub enum DataSourceConfig {
    Http(String),
    Local(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_retries: usize,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: usize,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            data: DataSourceConfig::Local("data".to_string()),
            benchmarks: stats::DEFAULT_BENCHMARKS.iter().map(|b| b.to_string()).collect(),
            labels_file: "development_labels.jsonl".to_string(),
            results_dir: "evaluation-results".to_string(),
            retry: RetryConfig {
                max_retries: 3,
                initial_backoff_ms: 200,
                max_backoff_ms: 2000,
            },
            cache: CacheConfig {
                enabled: true,
                max_entries: 1000,
            },
            log_format: LogFormat::Pretty,
        }
    }
}

impl DataSourceConfig {
    /// `http://` and `https://` locations are served over HTTP, anything else
    /// is a local directory.
    pub fn from_location(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Http(location.to_string())
        } else {
            Self::Local(location.to_string())
        }
    }
}

impl AppConfig {
    /// Defaults, or the JSON file named by `NEL_VIEWER_CONFIG`, with the
    /// data and bind environment overrides applied on top.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        serde_json::from_str(&text).with_context(|| format!("Invalid config file {}", path))
    }

    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(location) = var(DATA_ENV) {
            self.data = DataSourceConfig::from_location(&location);
        }
        if let Some(bind_addr) = var(BIND_ENV) {
            self.bind_addr = bind_addr;
        }
    }

    pub fn data_source(&self) -> Result<DataSource> {
        match &self.data {
            DataSourceConfig::Http(base_url) => {
                DataSource::http(base_url).with_context(|| format!("Invalid data URL {}", base_url))
            }
            DataSourceConfig::Local(root) => Ok(DataSource::local(root)),
        }
    }
}
