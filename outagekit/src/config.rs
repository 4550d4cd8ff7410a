use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::artifacts::{report_filename, ArtifactNames, COMPARISON_FILENAME, DEFAULT_PROVIDER};
use crate::errors::Result;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const ENV_PREFIX: &str = "OUTAGE";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Base URL of the analysis service. `OUTAGE_API_URL` overrides it.
    pub api_url: String,
    /// Provider whose data the landing route tracks.
    pub provider: String,
    /// Analysis artifact name; `"<provider>.json"` when unset.
    pub report_filename: Option<String>,
    pub comparison_filename: String,
    /// No timeout unless set. Scrapes routinely take several seconds.
    pub request_timeout_secs: Option<u64>,
    pub observability: ObservabilityConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            provider: DEFAULT_PROVIDER.to_string(),
            report_filename: None,
            comparison_filename: COMPARISON_FILENAME.to_string(),
            request_timeout_secs: None,
            observability: ObservabilityConfig::default(),
        }
    }
}

impl DashboardConfig {
    pub fn artifacts(&self) -> ArtifactNames {
        ArtifactNames {
            report: self
                .report_filename
                .clone()
                .unwrap_or_else(|| report_filename(&self.provider)),
            comparison: self.comparison_filename.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub log_dir: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "logs".to_string(),
        }
    }
}

/// Defaults, then the optional file, then `OUTAGE_*` environment variables.
/// Nested keys use a double underscore: `OUTAGE_OBSERVABILITY__LOG_LEVEL`.
pub fn load_config(path: Option<&str>) -> Result<DashboardConfig> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::with_name(path).required(false));
    }

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}
