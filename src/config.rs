//! Configuration file handling.
//!
//! Endpoints and BigQuery identifiers live in a TOML file instead of being
//! embedded literals, so they can change without a rebuild. The file is
//! stored at:
//!
//! - Linux: `~/.config/scorefetch/config.toml`
//! - macOS: `~/Library/Application Support/scorefetch/config.toml`
//! - Windows: `%APPDATA%\scorefetch\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! lookup_url = "https://api.deps.dev/v3alpha/purlbatch"
//! scorecard_api = "https://api.scorecard.dev"
//!
//! [bigquery]
//! project = "openssf"
//! dataset = "scorecardcron"
//! table = "scorecard-v2_latest"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Application configuration.
///
/// Defaults point at the public deps.dev and scorecard.dev services and the
/// OpenSSF scorecard cron dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Batch PURL lookup endpoint (deps.dev style).
    pub lookup_url: String,

    /// Scorecard REST API base URL.
    pub scorecard_api: String,

    /// BigQuery identifiers used in bulk mode.
    #[serde(default)]
    pub bigquery: BigQueryConfig,
}

/// Project, dataset, and table identifying the scorecard data in BigQuery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BigQueryConfig {
    pub project: String,
    pub dataset: String,
    pub table: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lookup_url: "https://api.deps.dev/v3alpha/purlbatch".to_string(),
            scorecard_api: "https://api.scorecard.dev".to_string(),
            bigquery: BigQueryConfig::default(),
        }
    }
}

impl Default for BigQueryConfig {
    fn default() -> Self {
        Self {
            project: "openssf".to_string(),
            dataset: "scorecardcron".to_string(),
            table: "scorecard-v2_latest".to_string(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scorefetch")
            .join("config.toml")
    }

    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            Error::Configuration(format!("failed to read config file {}: {e}", path.display()))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::Configuration(format!("invalid config file {}: {e}", path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_public_services() {
        let config = Config::default();
        assert_eq!(config.lookup_url, "https://api.deps.dev/v3alpha/purlbatch");
        assert_eq!(config.scorecard_api, "https://api.scorecard.dev");
        assert_eq!(config.bigquery.project, "openssf");
        assert_eq!(config.bigquery.table, "scorecard-v2_latest");
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_the_rest() {
        let config: Config = toml::from_str(
            r#"
            scorecard_api = "http://localhost:8080"

            [bigquery]
            project = "my-project"
            "#,
        )
        .unwrap();

        assert_eq!(config.scorecard_api, "http://localhost:8080");
        assert_eq!(config.lookup_url, "https://api.deps.dev/v3alpha/purlbatch");
        assert_eq!(config.bigquery.project, "my-project");
        assert_eq!(config.bigquery.dataset, "scorecardcron");
    }
}
