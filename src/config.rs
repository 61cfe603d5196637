//! Dashboard Configuration
//! Defaults for every control, optionally overridden from a JSON file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Bounds and default of the top-N slider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopNConfig {
    pub min: usize,
    pub max: usize,
    pub default: usize,
}

impl Default for TopNConfig {
    fn default() -> Self {
        Self {
            min: 5,
            max: 20,
            default: 10,
        }
    }
}

impl TopNConfig {
    /// Never panics: inverted bounds resolve to `min`.
    pub fn clamp(&self, n: usize) -> usize {
        n.min(self.max).max(self.min)
    }
}

/// Optional renderer extensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Extensions {
    /// Score distribution histogram.
    pub histogram: bool,
    pub histogram_bins: usize,
    /// Explanatory text under each section.
    pub notes: bool,
}

impl Default for Extensions {
    fn default() -> Self {
        Self {
            histogram: true,
            histogram_bins: 20,
            notes: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 900.0,
        }
    }
}

/// Top-level dashboard settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub dataset_path: PathBuf,
    pub banner_path: Option<PathBuf>,
    /// Countries preselected in the multi-select.
    pub default_countries: Vec<String>,
    /// Columns averaged in the global summary block.
    pub summary_columns: Vec<String>,
    pub top_n: TopNConfig,
    pub extensions: Extensions,
    pub window: WindowConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("cleaned_happiness.csv"),
            banner_path: Some(PathBuf::from("happy_world.png")),
            default_countries: vec![
                "Finland".to_string(),
                "Denmark".to_string(),
                "Norway".to_string(),
            ],
            summary_columns: vec!["score".to_string(), "gdp_per_capita".to_string()],
            top_n: TopNConfig::default(),
            extensions: Extensions::default(),
            window: WindowConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file; absent keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let TopNConfig { min, max, default } = self.top_n;
        if min == 0 || min > default || default > max {
            return Err(ConfigError::Invalid(format!(
                "top_n requires 1 <= min <= default <= max, got min={min} default={default} max={max}"
            )));
        }
        if self.extensions.histogram_bins == 0 {
            return Err(ConfigError::Invalid(
                "extensions.histogram_bins must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
