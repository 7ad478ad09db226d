use crate::error::ConfigError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Maximum number of URLs accepted from one source.
pub const MAX_URLS: usize = 100;

/// Terms counted by the scanner when no vocabulary is configured.
pub const DEFAULT_VOCABULARY: [&str; 5] = ["Linux", "Science", "Code", "Libcurl", "Kernel"];

/// Global configuration loaded from `~/.config/wcrawl/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WcrawlConfig {
    /// Maximum number of URLs taken from the source; later lines are skipped.
    pub max_urls: usize,
    /// Maximum number of fetch workers in flight at once.
    pub max_concurrent: usize,
    /// Hard per-page timeout in seconds (connect + transfer).
    pub fetch_timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Optional User-Agent header sent with every GET.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Output file name prefix (`page` → `page1.html`).
    #[serde(default = "default_page_prefix")]
    pub page_prefix: String,
    /// Output file name suffix.
    #[serde(default = "default_page_suffix")]
    pub page_suffix: String,
    /// Terms counted by `scan` / `run`, reported in this order.
    #[serde(default = "default_vocabulary")]
    pub vocabulary: Vec<String>,
    /// File names the scanner never opens.
    #[serde(default)]
    pub scan_exclude: Vec<String>,
}

fn default_page_prefix() -> String {
    "page".to_string()
}

fn default_page_suffix() -> String {
    ".html".to_string()
}

fn default_vocabulary() -> Vec<String> {
    DEFAULT_VOCABULARY.iter().map(|s| s.to_string()).collect()
}

impl Default for WcrawlConfig {
    fn default() -> Self {
        Self {
            max_urls: MAX_URLS,
            max_concurrent: 8,
            fetch_timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: None,
            page_prefix: default_page_prefix(),
            page_suffix: default_page_suffix(),
            vocabulary: default_vocabulary(),
            scan_exclude: Vec::new(),
        }
    }
}

impl WcrawlConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Reject settings that would make a run meaningless or unbounded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_urls == 0 {
            return Err(ConfigError::Invalid("max_urls must be at least 1".into()));
        }
        if self.max_concurrent == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent must be at least 1".into(),
            ));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "fetch_timeout_secs must be at least 1".into(),
            ));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "connect_timeout_secs must be at least 1".into(),
            ));
        }
        if self.page_prefix.contains('/') || self.page_suffix.contains('/') {
            return Err(ConfigError::Invalid(
                "page_prefix and page_suffix must not contain '/'".into(),
            ));
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("wcrawl")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<WcrawlConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = WcrawlConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    Ok(load_from_path(&path)?)
}

/// Load configuration from an explicit path (`--config`).
pub fn load_from_path(path: &Path) -> Result<WcrawlConfig, ConfigError> {
    let data = fs::read_to_string(path).map_err(|e| ConfigError::ConfigFile {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    let cfg: WcrawlConfig = toml::from_str(&data).map_err(|e| ConfigError::ConfigFile {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    cfg.validate()?;
    Ok(cfg)
}
