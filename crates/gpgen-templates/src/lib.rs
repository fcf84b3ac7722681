#![warn(missing_docs)]

//! GPGen template catalog
//!
//! Provides the closed set of golden-path templates, the typed input values
//! they consume, the condition builder used for step gating, and the small
//! expression language (`{{ .Inputs.* }}`, `if`/`else`/`end`, `eq`) that step
//! fields are written in.

pub mod actions;
pub mod builtin;
pub mod catalog;
pub mod conditions;
pub mod error;
pub mod expression;
pub mod models;
pub mod value;

pub use catalog::TemplateCatalog;
pub use conditions::ConditionBuilder;
pub use error::{TemplateError, TemplateResult};
pub use expression::{ExpressionEngine, TemplateParser};
pub use models::{InputDefinition, InputType, Template, TemplateMetadata, TemplateStep};
pub use value::{InputMap, InputValue};
