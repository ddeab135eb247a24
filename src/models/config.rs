//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Pagination and throttling settings
    #[serde(default)]
    pub harvest: HarvestConfig,

    /// Page loading behavior
    #[serde(default)]
    pub renderer: RendererConfig,

    /// Filesystem locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.renderer.user_agent.trim().is_empty() {
            return Err(AppError::validation("renderer.user_agent is empty"));
        }
        if self.renderer.page_timeout_secs == 0 {
            return Err(AppError::validation(
                "renderer.page_timeout_secs must be > 0",
            ));
        }
        if self.renderer.window_width == 0 || self.renderer.window_height == 0 {
            return Err(AppError::validation(
                "renderer.window_width and renderer.window_height must be > 0",
            ));
        }
        if self.harvest.max_pages == 0 {
            return Err(AppError::validation("harvest.max_pages must be > 0"));
        }
        if self.harvest.max_concurrent == 0 {
            return Err(AppError::validation("harvest.max_concurrent must be > 0"));
        }
        if self.paths.links_dir.as_os_str().is_empty() {
            return Err(AppError::validation("paths.links_dir is empty"));
        }
        Ok(())
    }
}

/// Pagination and throttling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Delay before every page request, in seconds
    #[serde(default = "defaults::sleep_secs")]
    pub sleep_secs: u64,

    /// Upper bound on page indexes visited in a page-index scan
    #[serde(default = "defaults::max_pages")]
    pub max_pages: u32,

    /// Number of result pages fetched ahead of evaluation
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl HarvestConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.sleep_secs)
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            sleep_secs: defaults::sleep_secs(),
            max_pages: defaults::max_pages(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Which backend loads result pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererBackend {
    /// Plain HTTP fetch
    #[default]
    Http,
    /// Headless Chrome (requires the `browser` feature)
    Browser,
}

/// Page loading settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    #[serde(default)]
    pub backend: RendererBackend,

    /// Seconds to wait for a page load before retrying it
    #[serde(default = "defaults::page_timeout")]
    pub page_timeout_secs: u64,

    #[serde(default = "defaults::window_width")]
    pub window_width: u32,

    #[serde(default = "defaults::window_height")]
    pub window_height: u32,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,
}

impl RendererConfig {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            backend: RendererBackend::default(),
            page_timeout_secs: defaults::page_timeout(),
            window_width: defaults::window_width(),
            window_height: defaults::window_height(),
            user_agent: defaults::user_agent(),
        }
    }
}

/// Filesystem locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding the append-only link files
    #[serde(default = "defaults::links_dir")]
    pub links_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            links_dir: defaults::links_dir(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    // Harvest defaults
    pub fn sleep_secs() -> u64 {
        5
    }
    pub fn max_pages() -> u32 {
        1000
    }
    pub fn max_concurrent() -> usize {
        1
    }

    // Renderer defaults
    pub fn page_timeout() -> u64 {
        30
    }
    pub fn window_width() -> u32 {
        1120
    }
    pub fn window_height() -> u32 {
        550
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; news_harvester/0.1)".into()
    }

    pub fn links_dir() -> PathBuf {
        PathBuf::from("links")
    }
    pub fn log_level() -> String {
        "info".into()
    }
}
