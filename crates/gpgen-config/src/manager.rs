//! Layered settings loader

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::settings::GpgenSettings;

/// Project-local settings file, resolved against the working directory
pub const PROJECT_CONFIG_FILE: &str = ".gpgen.toml";

/// Prefix for environment variable overrides (`GPGEN__GENERATOR__RUNS_ON`)
pub const ENV_PREFIX: &str = "GPGEN";

/// Loads [`GpgenSettings`] from defaults, the user file, the project file and
/// the environment, in increasing precedence.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// User-wide settings file
    user_config_path: Option<PathBuf>,
    /// Project settings file
    project_config_path: PathBuf,
    /// Whether a missing project file is an error
    project_required: bool,
    /// Environment prefix
    env_prefix: String,
}

impl ConfigManager {
    /// Create a manager using the default file locations
    pub fn new() -> Self {
        Self {
            user_config_path: Self::default_user_config_path(),
            project_config_path: PathBuf::from(PROJECT_CONFIG_FILE),
            project_required: false,
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Use an explicit project settings file, which must exist
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.project_config_path = path;
        self.project_required = true;
        self
    }

    /// Skip the user-wide settings file
    pub fn without_user_config(mut self) -> Self {
        self.user_config_path = None;
        self
    }

    /// Override the environment variable prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Default user settings path (`<config_dir>/gpgen/config.toml`)
    pub fn default_user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gpgen").join("config.toml"))
    }

    /// Project settings path in use
    pub fn project_config_path(&self) -> &Path {
        &self.project_config_path
    }

    /// Load and validate settings
    pub fn load(&self) -> Result<GpgenSettings> {
        if self.project_required && !self.project_config_path.exists() {
            return Err(ConfigError::NotFound(
                self.project_config_path.display().to_string(),
            ));
        }

        let mut builder = Config::builder();
        if let Some(user_path) = &self.user_config_path {
            builder = builder.add_source(File::from(user_path.clone()).required(false));
        }
        builder = builder
            .add_source(File::from(self.project_config_path.clone()).required(self.project_required))
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("__")
                    .separator("__"),
            );

        let settings: GpgenSettings = builder.build()?.try_deserialize()?;
        settings.validate()?;

        debug!(
            runs_on = %settings.generator.runs_on,
            job = %settings.generator.job_name,
            output = %settings.output.directory,
            "Loaded settings"
        );
        Ok(settings)
    }

    /// Write settings as TOML, creating parent directories
    pub fn save(&self, settings: &GpgenSettings, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(settings).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
