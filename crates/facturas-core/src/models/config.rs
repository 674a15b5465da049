//! Configuration structures for the facturas pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{FacturasError, Result};

/// Main configuration for the facturas pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FacturasConfig {
    /// Vision API configuration.
    pub api: ApiConfig,

    /// Report emission configuration.
    pub report: ReportConfig,
}

impl Default for FacturasConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

/// Vision API configuration.
///
/// The API key is never part of the config file; it comes from the
/// `OPENAI_API_KEY` environment variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,

    /// Model used for extraction.
    pub model: String,

    /// Maximum tokens in the model response.
    pub max_tokens: u32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o".to_string(),
            max_tokens: 1000,
            timeout_secs: 120,
        }
    }
}

/// Report emission configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Name of the single worksheet in the report file.
    pub sheet_name: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Report".to_string(),
        }
    }
}

impl FacturasConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| FacturasError::Config(format!("invalid config {}: {e}", path.display())))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = FacturasConfig::default();
        assert_eq!(config.api.model, "gpt-4o");
        assert_eq!(config.api.max_tokens, 1000);
        assert_eq!(config.report.sheet_name, "Report");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"api":{"model":"gpt-4o-mini"}}"#).unwrap();

        let config = FacturasConfig::from_file(&path).unwrap();
        assert_eq!(config.api.model, "gpt-4o-mini");
        assert_eq!(config.api.base_url, "https://api.openai.com/v1");
        assert_eq!(config.report.sheet_name, "Report");
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = FacturasConfig::default();
        config.report.sheet_name = "Facturas".to_string();
        config.save(&path).unwrap();

        let reloaded = FacturasConfig::from_file(&path).unwrap();
        assert_eq!(reloaded.report.sheet_name, "Facturas");
    }

    #[test]
    fn test_invalid_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FacturasConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("configuration error"));
    }
}
