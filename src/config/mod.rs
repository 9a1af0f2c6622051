//! Engine configuration.
//!
//! All settings have working defaults; a TOML file can override any subset.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the recommendation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Algorithm used when no experiment is active and the request names none.
    pub default_algorithm: String,
    /// Traffic split applied to experiments created without one.
    pub default_traffic_split: Vec<f64>,
    /// Success metrics applied to experiments created without any.
    pub default_success_metrics: Vec<String>,
    /// Capacity of the feedback notification channel.
    pub notification_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_algorithm: "collaborative".to_string(),
            default_traffic_split: vec![0.5, 0.5],
            default_success_metrics: vec!["ctr".to_string(), "engagement_rate".to_string()],
            notification_capacity: 256,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {:?}", path.as_ref()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path.as_ref()))
    }
}
