#![warn(missing_docs)]

//! GPGen pipeline manifests
//!
//! A manifest names a golden-path template, supplies its inputs, adds custom
//! steps and overrides them per environment:
//!
//! ```yaml
//! apiVersion: gpgen.dev/v1
//! kind: Pipeline
//! metadata:
//!   name: my-app
//! spec:
//!   template: node-app
//!   inputs:
//!     nodeVersion: "20"
//!   customSteps:
//!     - name: Security Scan
//!       position: after:test
//!       run: npm audit
//!   environments:
//!     production:
//!       inputs:
//!         nodeVersion: "22"
//! ```

pub mod error;
pub mod models;
pub mod parser;

pub use error::{ManifestError, ManifestResult};
pub use models::{
    CustomStep, EnvironmentConfig, Manifest, ManifestMetadata, ManifestSpec, StepOverride,
    ValidationMode, DEFAULT_ENVIRONMENT,
};
pub use parser::ManifestParser;

#[cfg(test)]
mod parser_properties;
