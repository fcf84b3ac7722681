//! Error types for template operations

use thiserror::Error;

use crate::models::InputType;

/// Errors raised while loading templates, validating inputs or evaluating
/// step expressions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    /// Template name is not in the catalog
    #[error("unknown template: {0}")]
    NotFound(String),

    /// A required input has no value
    #[error("required input '{name}' not provided")]
    MissingInput {
        /// Input name
        name: String,
    },

    /// An input value has the wrong type
    #[error("input '{name}' must be a {expected}")]
    TypeMismatch {
        /// Input name
        name: String,
        /// Declared input type
        expected: InputType,
    },

    /// An input value is outside its allowed set
    #[error("input '{name}' must be one of: {}", .allowed.join(", "))]
    NotAllowed {
        /// Input name
        name: String,
        /// Allowed values
        allowed: Vec<String>,
    },

    /// Expression text could not be parsed
    #[error("template syntax error at line {line}: {message}")]
    Syntax {
        /// Line number (1-based)
        line: usize,
        /// Error description
        message: String,
    },

    /// Expression evaluation failed
    #[error("template evaluation error: {0}")]
    Evaluation(String),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;
