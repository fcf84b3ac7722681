//! Step condition builder
//!
//! Produces GitHub `if:` expressions that mix template references
//! (`{{ .Inputs.container.enabled }}`) with GitHub context checks. The
//! template references are evaluated at generation time; the rest is left for
//! the Actions runner.

use crate::actions::{EVENT_PULL_REQUEST, EVENT_PUSH, EVENT_RELEASE, TAG_REF_PREFIX};

/// Accumulates condition parts and joins them with `&&` or `||`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionBuilder {
    parts: Vec<String>,
}

impl ConditionBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reference to an input by dotted path
    pub fn input(mut self, path: &str) -> Self {
        self.parts.push(format!("{{{{ .Inputs.{} }}}}", path));
        self
    }

    /// Require a specific triggering event
    pub fn event_equals(mut self, event: &str) -> Self {
        self.parts.push(format!("github.event_name == '{}'", event));
        self
    }

    /// Require the ref to start with a prefix
    pub fn ref_starts_with(mut self, prefix: &str) -> Self {
        self.parts.push(format!("startsWith(github.ref, '{}')", prefix));
        self
    }

    /// Run regardless of earlier step failures
    pub fn always(mut self) -> Self {
        self.parts.push("always()".to_string());
        self
    }

    /// Add a pre-built expression
    pub fn custom(mut self, expression: impl Into<String>) -> Self {
        self.parts.push(expression.into());
        self
    }

    /// Join parts with `&&`
    pub fn and(&self) -> String {
        self.parts.join(" && ")
    }

    /// Join parts with `||`, parenthesised when there is more than one part
    pub fn or(&self) -> String {
        match self.parts.len() {
            0 => String::new(),
            1 => self.parts[0].clone(),
            _ => format!("({})", self.parts.join(" || ")),
        }
    }
}

/// Tag pushes and published releases
pub fn production_events() -> String {
    ConditionBuilder::new()
        .custom(
            ConditionBuilder::new()
                .event_equals(EVENT_PUSH)
                .ref_starts_with(TAG_REF_PREFIX)
                .and(),
        )
        .event_equals(EVENT_RELEASE)
        .or()
}

/// Gate for the container build steps
pub fn container_build() -> String {
    let triggers = ConditionBuilder::new()
        .input("container.build.alwaysBuild")
        .custom(
            ConditionBuilder::new()
                .input("container.build.onPR")
                .event_equals(EVENT_PULL_REQUEST)
                .and(),
        )
        .custom(
            ConditionBuilder::new()
                .input("container.build.onProduction")
                .custom(production_events())
                .and(),
        )
        .or();

    ConditionBuilder::new()
        .input("container.enabled")
        .custom(triggers)
        .and()
}

/// Gate for the registry login step
pub fn container_push() -> String {
    let triggers = ConditionBuilder::new()
        .input("container.push.alwaysPush")
        .custom(
            ConditionBuilder::new()
                .input("container.push.onProduction")
                .custom(production_events())
                .and(),
        )
        .or();

    ConditionBuilder::new()
        .input("container.enabled")
        .input("container.push.enabled")
        .custom(triggers)
        .and()
}

/// Gate for the Trivy scan step
pub fn security_scan() -> String {
    ConditionBuilder::new().input("security.trivy.enabled").and()
}

/// Gate for the SARIF upload, which also runs after a failing scan
pub fn security_upload() -> String {
    ConditionBuilder::new()
        .input("security.trivy.enabled")
        .always()
        .and()
}
