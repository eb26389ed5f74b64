//! Booth configuration, read from a TOML file.
//!
//! Every field has a default, so an absent file yields a fully usable
//! configuration and a partial file only overrides what it names. Unknown
//! keys are rejected so typos surface at startup instead of silently
//! falling back to defaults.
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! template_directory = "templates"
//! default_template = "dual_photo"
//! school_name = "Your School Name"
//! event_name = "Photo Booth Event"
//! event_date = "2025-08-24"
//!
//! [output]
//! output_directory = "output"
//! image_format = "jpg"      # jpg, jpeg, or png
//! image_quality = 95        # JPEG quality (1-100)
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level booth configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoothConfig {
    /// Directory holding template JSON documents.
    pub template_directory: String,
    /// Template used when the operator does not pick one.
    pub default_template: String,
    /// Substituted for `{school_name}` in template text.
    pub school_name: String,
    /// Substituted for `{event_name}` in template text.
    pub event_name: String,
    /// Substituted for `{event_date}` in template text.
    pub event_date: String,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub output_directory: String,
    /// File extension for saved composites: "jpg", "jpeg", or "png".
    pub image_format: String,
    /// JPEG quality, clamped to 1..=100 at save time.
    pub image_quality: u32,
}

impl Default for BoothConfig {
    fn default() -> Self {
        Self {
            template_directory: "templates".into(),
            default_template: "dual_photo".into(),
            school_name: "Your School Name".into(),
            event_name: "Photo Booth Event".into(),
            event_date: "2025-08-24".into(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_directory: "output".into(),
            image_format: "jpg".into(),
            image_quality: 95,
        }
    }
}

impl BoothConfig {
    /// Load from a TOML file. The file must exist; use
    /// [`load_or_default`](Self::load_or_default) for an optional file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file, or fall back to defaults when the file does
    /// not exist. Parse errors in an existing file are still fatal.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.is_file() {
            Self::load(path)
        } else {
            info!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.template_directory.is_empty() {
            return Err(ConfigError::Invalid(
                "template_directory must not be empty".into(),
            ));
        }
        if self.default_template.is_empty() {
            return Err(ConfigError::Invalid(
                "default_template must not be empty".into(),
            ));
        }
        match self.output.image_format.as_str() {
            "jpg" | "jpeg" | "png" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unsupported image_format '{other}' (expected jpg, jpeg, or png)"
                )));
            }
        }
        Ok(())
    }
}
