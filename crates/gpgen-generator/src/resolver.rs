//! Effective input resolution
//!
//! Inputs are layered, later layers winning:
//! 1. template input defaults
//! 2. manifest base inputs
//! 3. the selected environment's inputs
//! 4. event-context flags, set only where no earlier layer set them
//!
//! The result is then normalized (see [`crate::normalize`]).

use gpgen_manifest::{Manifest, DEFAULT_ENVIRONMENT};
use gpgen_templates::{InputValue, TemplateCatalog};
use tracing::{debug, warn};

use crate::inputs::EffectiveInputs;
use crate::normalize::normalize;

/// Builds on pull requests
pub const CONTAINER_BUILD_ON_PR: &str = "containerBuildOnPR";
/// Builds on tag pushes and releases
pub const CONTAINER_BUILD_ON_PRODUCTION: &str = "containerBuildOnProduction";
/// Pushes images on tag pushes and releases
pub const CONTAINER_PUSH_ON_PRODUCTION: &str = "containerPushOnProduction";

/// Resolves the inputs a template is rendered with
pub struct InputResolver<'a> {
    catalog: &'a TemplateCatalog,
}

impl<'a> InputResolver<'a> {
    /// Create a resolver over a catalog
    pub fn new(catalog: &'a TemplateCatalog) -> Self {
        Self { catalog }
    }

    /// Resolve the effective inputs for a manifest and environment
    ///
    /// Never fails. An unknown template only drops the defaults layer;
    /// validating the result is up to the caller.
    pub fn resolve(&self, manifest: &Manifest, environment: &str) -> EffectiveInputs {
        let mut inputs = EffectiveInputs::new();

        match self.catalog.load(&manifest.spec.template) {
            Ok(template) => inputs.overlay(&template.default_inputs()),
            Err(e) => warn!(
                template = %manifest.spec.template,
                error = %e,
                "Template not found, resolving without defaults"
            ),
        }

        inputs.overlay(&manifest.spec.inputs);

        if environment != DEFAULT_ENVIRONMENT {
            if let Some(config) = manifest.environment(environment) {
                inputs.overlay(&config.inputs);
            }
        }

        for &(name, value) in event_context_flags(environment) {
            if !inputs.insert_if_absent(name, InputValue::Bool(value)) {
                debug!(input = name, "Keeping explicit event-context input");
            }
        }

        normalize(&mut inputs);

        debug!(
            environment,
            inputs = inputs.len(),
            "Resolved effective inputs"
        );
        inputs
    }
}

/// Event-context flags injected for an environment
///
/// Environments other than `default`, `staging` and `production` get none.
pub fn event_context_flags(environment: &str) -> &'static [(&'static str, bool)] {
    match environment {
        "default" | "staging" => &[
            (CONTAINER_BUILD_ON_PR, true),
            (CONTAINER_BUILD_ON_PRODUCTION, false),
            (CONTAINER_PUSH_ON_PRODUCTION, false),
        ],
        "production" => &[
            (CONTAINER_BUILD_ON_PR, false),
            (CONTAINER_BUILD_ON_PRODUCTION, true),
            (CONTAINER_PUSH_ON_PRODUCTION, true),
        ],
        _ => &[],
    }
}
