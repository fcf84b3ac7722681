//! Error types for workflow generation

use gpgen_templates::TemplateError;
use thiserror::Error;

/// Errors raised while splicing a custom step into the step list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpliceError {
    /// Position is not `<directive>:<target>`
    #[error("invalid position format: {0} (expected 'before:step', 'after:step', or 'replace:step')")]
    InvalidFormat(String),

    /// Directive is not `before`, `after` or `replace`
    #[error("invalid position format: unknown directive '{directive}' in {position}")]
    UnknownDirective {
        /// Offending directive
        directive: String,
        /// Full position text
        position: String,
    },

    /// No step matches the target token
    #[error("target step not found: {0}")]
    TargetNotFound(String),
}

/// Errors raised while generating a workflow
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Template is not in the catalog
    #[error("failed to load template: {0}")]
    TemplateLoad(#[source] TemplateError),

    /// Effective inputs do not satisfy the template
    #[error("input validation failed: {0}")]
    InputValidation(#[source] TemplateError),

    /// A step field could not be rendered
    #[error("failed to process template step {step}: failed to substitute {field}: {source}")]
    Render {
        /// Template step id
        step: String,
        /// Field being rendered (`run`, `with parameter cache`, ...)
        field: String,
        /// Underlying expression error
        #[source]
        source: TemplateError,
    },

    /// An override names a step the template does not have
    #[error("unknown step '{step}' in overrides")]
    UnknownOverride {
        /// Step id from the manifest
        step: String,
    },

    /// A custom step could not be placed
    #[error("failed to apply custom step {name}: {source}")]
    CustomStep {
        /// Custom step name
        name: String,
        /// Underlying splice error
        #[source]
        source: SpliceError,
    },

    /// Workflow could not be serialized
    #[error("failed to encode workflow to YAML: {0}")]
    Serialization(#[from] serde_yaml::Error),
}

/// Result type for generation
pub type GeneratorResult<T> = Result<T, GeneratorError>;
