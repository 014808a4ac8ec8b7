//! Core configuration: document geometry and export location.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::DEFAULT_USE_TYPE;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "vetclinic_core=info"
}

/// Page geometry in millimetres.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_mm: f64,
    /// Body font size in points
    pub body_font_pt: f64,
    /// Vertical advance of one body line
    pub line_height_mm: f64,
    /// Characters per wrapped body line
    pub wrap_columns: usize,
}

impl Default for PageConfig {
    // A4 portrait
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm: 18.0,
            body_font_pt: 10.0,
            line_height_mm: 5.0,
            wrap_columns: 95,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub page: PageConfig,
    /// City printed before the date on the signature line
    pub city: String,
    /// Directory exported PDFs are written to
    pub export_dir: PathBuf,
    /// Bucket for medications without a use type
    pub default_use_type: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            page: PageConfig::default(),
            city: "São Paulo".into(),
            export_dir: PathBuf::from("exports"),
            default_use_type: DEFAULT_USE_TYPE.into(),
        }
    }
}

impl CoreConfig {
    /// Parse from JSON. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Reject geometry that leaves no room for content.
    pub fn validate(&self) -> ConfigResult<()> {
        let page = &self.page;
        if page.width_mm <= 2.0 * page.margin_mm || page.height_mm <= 2.0 * page.margin_mm {
            return Err(ConfigError::Invalid("margins exceed page size".into()));
        }
        if page.line_height_mm <= 0.0 || page.body_font_pt <= 0.0 {
            return Err(ConfigError::Invalid("line height and font size must be positive".into()));
        }
        if page.wrap_columns == 0 {
            return Err(ConfigError::Invalid("wrap_columns must be positive".into()));
        }
        if self.default_use_type.trim().is_empty() {
            return Err(ConfigError::Invalid("default_use_type must not be blank".into()));
        }
        Ok(())
    }
}
