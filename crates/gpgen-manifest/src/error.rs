//! Error types for manifest operations

use thiserror::Error;

/// Errors raised while reading or validating a manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    /// YAML could not be parsed
    #[error("failed to parse YAML: {0}")]
    Parse(String),

    /// A mandatory top-level field is absent
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Unsupported `apiVersion`
    #[error("invalid apiVersion: {0}")]
    InvalidApiVersion(String),

    /// Unsupported `kind`
    #[error("invalid kind: {0}")]
    InvalidKind(String),

    /// A name that ends up in a workflow file name
    #[error("invalid {field} '{value}': must not contain '/', '\\' or '..'")]
    InvalidName {
        /// Offending field
        field: &'static str,
        /// Rejected value
        value: String,
    },

    /// Template is not in the catalog
    #[error("invalid template: {template} (available: {})", .available.join(", "))]
    InvalidTemplate {
        /// Requested template
        template: String,
        /// Known templates
        available: Vec<String>,
    },

    /// A custom step failed validation
    #[error("invalid custom step at index {index}{}: {reason}", .environment.as_ref().map(|e| format!(" in environment {}", e)).unwrap_or_default())]
    InvalidCustomStep {
        /// Position in its list
        index: usize,
        /// Environment owning the list, `None` for base steps
        environment: Option<String>,
        /// What is wrong
        reason: String,
    },

    /// A step override failed validation
    #[error("invalid override for step '{step}'{}: {reason}", .environment.as_ref().map(|e| format!(" in environment {}", e)).unwrap_or_default())]
    InvalidOverride {
        /// Template step id the override targets
        step: String,
        /// Environment owning the override, `None` for base overrides
        environment: Option<String>,
        /// What is wrong
        reason: String,
    },

    /// Manifest file could not be read
    #[error("failed to read manifest {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Result type for manifest operations
pub type ManifestResult<T> = Result<T, ManifestError>;
