//! AppConfig data structure
//!
//! JSON configuration for the API endpoint, models, fonts and downloads.
//! Every field has a default so a partial file (or none at all) is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::i18n::Language;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the generative language API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// API key; usually supplied by CLI or environment instead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model used for text-to-image generation
    #[serde(default = "default_generate_model")]
    pub generate_model: String,

    /// Model used for instruction-based image editing
    #[serde(default = "default_edit_model")]
    pub edit_model: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Directory downloads are written into
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Extra directories searched for overlay fonts
    #[serde(default)]
    pub font_dirs: Vec<PathBuf>,

    /// UI language
    #[serde(default)]
    pub language: Language,

    /// Loading message rotation interval in milliseconds
    #[serde(default = "default_loading_message_interval_ms")]
    pub loading_message_interval_ms: u64,
}

fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_generate_model() -> String {
    "imagen-4.0-generate-001".to_string()
}

fn default_edit_model() -> String {
    "gemini-2.5-flash-image-preview".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_download_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_loading_message_interval_ms() -> u64 {
    2500
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_key: None,
            generate_model: default_generate_model(),
            edit_model: default_edit_model(),
            request_timeout_secs: default_request_timeout_secs(),
            download_dir: default_download_dir(),
            font_dirs: Vec::new(),
            language: Language::default(),
            loading_message_interval_ms: default_loading_message_interval_ms(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Resolve the API key: explicit value, then config, then environment
    pub fn resolve_api_key(&self, explicit: Option<&str>) -> Option<String> {
        explicit
            .map(str::to_string)
            .or_else(|| self.api_key.clone())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn loading_message_interval(&self) -> Duration {
        Duration::from_millis(self.loading_message_interval_ms.max(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.loading_message_interval_ms, 2500);
        assert_eq!(config.language, Language::En);
        assert!(config.api_base_url.starts_with("https://"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "language": "ru", "request_timeout_secs": 30 }"#).unwrap();
        assert_eq!(config.language, Language::Ru);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.generate_model, "imagen-4.0-generate-001");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("imagine.json");
        std::fs::write(&path, r#"{ "download_dir": "/tmp/out", "font_dirs": ["/opt/fonts"] }"#)
            .unwrap();
        let config = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(config.download_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.font_dirs, vec![PathBuf::from("/opt/fonts")]);
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let config = AppConfig {
            api_key: Some("from-file".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key(Some("cli")), Some("cli".to_string()));
        assert_eq!(config.resolve_api_key(None), Some("from-file".to_string()));
    }
}
