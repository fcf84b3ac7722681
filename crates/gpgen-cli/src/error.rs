// CLI error types and user-facing messages

use std::path::PathBuf;

use gpgen_config::ConfigError;
use gpgen_generator::GeneratorError;
use gpgen_manifest::ManifestError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("manifest file not found: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("manifest file {} already exists. Use --force to overwrite", .0.display())]
    ManifestExists(PathBuf),

    #[error("workflow file {} already exists. Use --overwrite to replace it", .0.display())]
    WorkflowExists(PathBuf),

    #[error("unknown template: {name}. Available templates: {}", .available.join(", "))]
    UnknownTemplate { name: String, available: Vec<String> },

    #[error("manifest validation failed: {0}")]
    Manifest(#[from] ManifestError),

    #[error("failed to generate workflow for {environment}: {source}")]
    Generation {
        environment: String,
        #[source]
        source: GeneratorError,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),
}

impl CliError {
    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { .. } => {
                format!("{}\n\nRun 'gpgen --help' for usage information.", self)
            }
            CliError::ManifestNotFound(_) => {
                format!("{}\n\nRun 'gpgen init' to create a manifest.", self)
            }
            CliError::UnknownTemplate { .. } => {
                format!("{}\n\nRun 'gpgen templates' to list them.", self)
            }
            CliError::Manifest(_) => {
                format!("{}\n\nRun 'gpgen validate' after fixing the manifest.", self)
            }
            CliError::Config(_) => {
                format!(
                    "{}\n\nCheck .gpgen.toml and GPGEN__* environment variables.",
                    self
                )
            }
            CliError::Io(e) => format!("File operation failed: {}", e),
            _ => self.to_string(),
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

pub type CliResult<T> = Result<T, CliError>;
