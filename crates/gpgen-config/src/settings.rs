//! Tool settings

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Log levels accepted by `logging.level`
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Top-level settings read from config files and the environment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct GpgenSettings {
    /// Workflow generation settings
    pub generator: GeneratorSettings,
    /// Where generated workflows are written
    pub output: OutputSettings,
    /// Diagnostic logging
    pub logging: LoggingSettings,
}

/// Settings that shape the generated job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorSettings {
    /// Runner label for the job
    pub runs_on: String,
    /// Job identifier in the `jobs` map
    pub job_name: String,
}

/// Output location settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory that receives generated workflow files
    pub directory: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    /// Minimum level written to stderr
    pub level: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            runs_on: "ubuntu-latest".to_string(),
            job_name: "build".to_string(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: ".github/workflows".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl GpgenSettings {
    /// Validate settings values
    pub fn validate(&self) -> Result<()> {
        if self.generator.runs_on.trim().is_empty() {
            return Err(ConfigError::Validation(
                "generator.runs_on cannot be empty".to_string(),
            ));
        }
        if self.generator.job_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "generator.job_name cannot be empty".to_string(),
            ));
        }
        if self.output.directory.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.directory cannot be empty".to_string(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of: {}",
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}
