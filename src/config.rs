//! Configuration management
//!
//! Where the image-fusion service lives and where diagnostics are written.
//! Resolved once at startup.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Environment variable that overrides the service base URL
pub const API_BASE_URL_ENV: &str = "FUSION_API_BASE_URL";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the image-fusion service
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Diagnostic log file; defaults to a file in the config directory
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            log_file: None,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".fusion-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load() -> Option<Config> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }

        let contents = fs::read_to_string(&config_path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// Resolve the startup configuration once: environment, then config file,
    /// then built-in defaults.
    pub fn resolve() -> Config {
        Self::load()
            .unwrap_or_default()
            .with_base_url_override(env::var(API_BASE_URL_ENV).ok())
    }

    /// Apply an override for the base URL; blank values are ignored
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        self.api_base_url = normalize_base_url(&self.api_base_url);
        self
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| Self::config_dir().map(|dir| dir.join("fusion-tui.log")))
    }
}

fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        default_api_base_url()
    } else {
        trimmed.to_string()
    }
}
