//! Run Configuration Module
//! Loads the immutable run configuration from a JSON file.

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file '{}' is missing", .0.display())]
    Missing(PathBuf),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A year referenced in the configuration.
///
/// The dataset names its year columns by decimal string ("1990"), while the
/// config file may give the year as either a JSON number or a string. Both
/// forms normalize to the column-name form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Year(String);

impl Year {
    /// The column-name form of the year.
    pub fn column_name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for Year {
    fn from(year: i64) -> Self {
        Year(year.to_string())
    }
}

impl From<&str> for Year {
    fn from(year: &str) -> Self {
        Year(year.to_string())
    }
}

impl<'de> Deserialize<'de> for Year {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Year(n.to_string())),
            Raw::Text(s) => Ok(Year(s)),
        }
    }
}

/// How chart artifacts are presented once written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Save each chart, then open it with the system viewer.
    Interactive,
    /// Save each chart only.
    #[default]
    File,
}

/// Image format for chart artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartBackend {
    #[default]
    Png,
    Svg,
}

impl ChartBackend {
    pub fn extension(&self) -> &'static str {
        match self {
            ChartBackend::Png => "png",
            ChartBackend::Svg => "svg",
        }
    }
}

/// Immutable run configuration, read once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub region: String,
    pub year: Year,
    /// Aggregate to compute; validated at aggregation time so that an
    /// unsupported value surfaces from the pipeline, not from parsing.
    pub operation: String,
    /// "dashboard" enables visualization; any other value skips it.
    pub output: String,
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub render_mode: RenderMode,
    #[serde(default)]
    pub backend: ChartBackend,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("data").join("gdp_dataset.csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

impl Config {
    /// Load the configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
