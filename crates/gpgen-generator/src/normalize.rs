//! Input normalization
//!
//! Runs after layering. The flat security and container inputs
//! (`trivySeverity`, `containerEnabled`, ...) are copied onto the nested
//! `security` and `container` trees the template steps read, and partial
//! trees are completed from the built-in defaults. Flat keys stay in place
//! since job permissions are derived from them.

use gpgen_config::languages::{is_valid_severity, SEVERITY_LEVELS};
use gpgen_templates::builtin::{default_container_config, default_security_config};
use gpgen_templates::value::lookup;
use gpgen_templates::{InputValue, TemplateError, TemplateResult};
use tracing::debug;

use crate::inputs::EffectiveInputs;

/// Nested security settings
pub const SECURITY: &str = "security";
/// Nested container settings
pub const CONTAINER: &str = "container";
/// Path of the scanner severity threshold
pub const TRIVY_SEVERITY_PATH: &str = "security.trivy.severity";

/// Flat boolean inputs and their nested path
const FLAT_BOOLEANS: &[(&str, &str, &str)] = &[
    ("trivyScanEnabled", SECURITY, "trivy.enabled"),
    ("containerEnabled", CONTAINER, "enabled"),
];

/// Flat string inputs and their nested path; empty strings are ignored
const FLAT_STRINGS: &[(&str, &str, &str)] = &[
    ("trivySeverity", SECURITY, "trivy.severity"),
    ("containerRegistry", CONTAINER, "registry"),
    ("containerImageName", CONTAINER, "imageName"),
    ("containerImageTag", CONTAINER, "imageTag"),
];

/// Normalize the security and container inputs in place
///
/// Flat values win over the nested ones. A tree that is present but not
/// an object is left alone for input validation to report.
pub fn normalize(inputs: &mut EffectiveInputs) {
    for &(flat, tree, path) in FLAT_BOOLEANS {
        if let Some(enabled) = inputs.get_bool(flat) {
            set_nested(inputs, tree, path, InputValue::Bool(enabled));
        }
    }

    for &(flat, tree, path) in FLAT_STRINGS {
        let value = inputs
            .get(flat)
            .and_then(InputValue::as_str)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        if let Some(value) = value {
            set_nested(inputs, tree, path, InputValue::String(value));
        }
    }

    if let Some(security) = inputs.get_mut(SECURITY) {
        security.fill_from(&default_security_config());
    }
    if let Some(container) = inputs.get_mut(CONTAINER) {
        container.fill_from(&default_container_config());
    }
}

fn set_nested(inputs: &mut EffectiveInputs, tree: &str, path: &str, value: InputValue) {
    let defaults: fn() -> InputValue = match tree {
        SECURITY => default_security_config,
        _ => default_container_config,
    };
    let target = inputs.get_or_insert_with(tree, defaults);
    if matches!(target, InputValue::Object(_)) {
        debug!(tree, path, "Mapping flat input onto nested settings");
        target.set_path(path, value);
    }
}

/// Check normalized values the template definitions cannot express
pub fn validate_normalized(inputs: &EffectiveInputs) -> TemplateResult<()> {
    if let Some(severity) = lookup(inputs.as_map(), TRIVY_SEVERITY_PATH).and_then(InputValue::as_str)
    {
        if !is_valid_severity(severity) {
            return Err(TemplateError::NotAllowed {
                name: TRIVY_SEVERITY_PATH.to_string(),
                allowed: SEVERITY_LEVELS.iter().map(|s| s.to_string()).collect(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_defaults() -> EffectiveInputs {
        let mut inputs = EffectiveInputs::new();
        inputs.insert(SECURITY, default_security_config());
        inputs.insert(CONTAINER, default_container_config());
        inputs
    }

    fn nested<'a>(inputs: &'a EffectiveInputs, path: &str) -> Option<&'a InputValue> {
        lookup(inputs.as_map(), path)
    }

    #[test]
    fn test_flat_security_inputs_map_onto_tree() {
        let mut inputs = with_defaults();
        inputs.insert("trivyScanEnabled", InputValue::Bool(false));
        inputs.insert("trivySeverity", InputValue::from("CRITICAL"));

        normalize(&mut inputs);

        assert_eq!(nested(&inputs, "security.trivy.enabled"), Some(&InputValue::Bool(false)));
        assert_eq!(nested(&inputs, TRIVY_SEVERITY_PATH), Some(&InputValue::from("CRITICAL")));
        assert_eq!(nested(&inputs, "security.trivy.exitCode"), Some(&InputValue::from("1")));
        assert_eq!(inputs.get_bool("trivyScanEnabled"), Some(false));
    }

    #[test]
    fn test_flat_container_inputs_map_onto_tree() {
        let mut inputs = with_defaults();
        inputs.insert("containerEnabled", InputValue::Bool(true));
        inputs.insert("containerRegistry", InputValue::from("registry.acme.dev"));
        inputs.insert("containerImageName", InputValue::from("acme/api"));
        inputs.insert("containerImageTag", InputValue::from("latest"));

        normalize(&mut inputs);

        assert_eq!(nested(&inputs, "container.enabled"), Some(&InputValue::Bool(true)));
        assert_eq!(nested(&inputs, "container.registry"), Some(&InputValue::from("registry.acme.dev")));
        assert_eq!(nested(&inputs, "container.imageName"), Some(&InputValue::from("acme/api")));
        assert_eq!(nested(&inputs, "container.imageTag"), Some(&InputValue::from("latest")));
        assert_eq!(nested(&inputs, "container.dockerfile"), Some(&InputValue::from("Dockerfile")));
        assert_eq!(inputs.get_bool("containerEnabled"), Some(true));
    }

    #[test]
    fn test_flat_values_beat_nested() {
        let mut inputs = with_defaults();
        inputs.insert(
            CONTAINER,
            InputValue::object([("enabled", InputValue::from(false))]),
        );
        inputs.insert("containerEnabled", InputValue::Bool(true));

        normalize(&mut inputs);

        assert_eq!(nested(&inputs, "container.enabled"), Some(&InputValue::Bool(true)));
    }

    #[test]
    fn test_empty_and_mistyped_flat_values_are_ignored() {
        let mut inputs = with_defaults();
        inputs.insert("trivySeverity", InputValue::from(""));
        inputs.insert("containerEnabled", InputValue::from("true"));

        normalize(&mut inputs);

        assert_eq!(nested(&inputs, TRIVY_SEVERITY_PATH), Some(&InputValue::from("CRITICAL,HIGH")));
        assert_eq!(nested(&inputs, "container.enabled"), Some(&InputValue::Bool(false)));
    }

    #[test]
    fn test_partial_container_is_completed() {
        let mut inputs = EffectiveInputs::new();
        inputs.insert(
            CONTAINER,
            InputValue::object([
                ("enabled", InputValue::from(true)),
                ("push", InputValue::object([("alwaysPush", InputValue::from(true))])),
            ]),
        );

        normalize(&mut inputs);

        assert_eq!(nested(&inputs, "container.enabled"), Some(&InputValue::Bool(true)));
        assert_eq!(nested(&inputs, "container.registry"), Some(&InputValue::from("ghcr.io")));
        assert_eq!(nested(&inputs, "container.buildContext"), Some(&InputValue::from(".")));
        assert_eq!(nested(&inputs, "container.push.alwaysPush"), Some(&InputValue::Bool(true)));
        assert_eq!(nested(&inputs, "container.push.enabled"), Some(&InputValue::Bool(true)));
        assert_eq!(nested(&inputs, "container.build.onPR"), Some(&InputValue::Bool(true)));
    }

    #[test]
    fn test_partial_security_is_completed() {
        let mut inputs = EffectiveInputs::new();
        inputs.insert(
            SECURITY,
            InputValue::object([(
                "trivy",
                InputValue::object([("severity", InputValue::from("HIGH"))]),
            )]),
        );

        normalize(&mut inputs);

        assert_eq!(nested(&inputs, TRIVY_SEVERITY_PATH), Some(&InputValue::from("HIGH")));
        assert_eq!(nested(&inputs, "security.trivy.enabled"), Some(&InputValue::Bool(true)));
        assert_eq!(nested(&inputs, "security.trivy.exitCode"), Some(&InputValue::from("1")));
    }

    #[test]
    fn test_absent_trees_stay_absent() {
        let mut inputs = EffectiveInputs::new();
        inputs.insert("testCommand", InputValue::from("cargo test"));
        normalize(&mut inputs);
        assert_eq!(inputs.len(), 1);
    }

    #[test]
    fn test_flat_input_creates_missing_tree() {
        let mut inputs = EffectiveInputs::new();
        inputs.insert("trivySeverity", InputValue::from("LOW"));
        normalize(&mut inputs);
        assert_eq!(nested(&inputs, TRIVY_SEVERITY_PATH), Some(&InputValue::from("LOW")));
        assert_eq!(nested(&inputs, "security.trivy.enabled"), Some(&InputValue::Bool(true)));
        assert!(!inputs.contains(CONTAINER));
    }

    #[test]
    fn test_non_object_tree_is_left_for_validation() {
        let mut inputs = EffectiveInputs::new();
        inputs.insert(CONTAINER, InputValue::from("yes"));
        inputs.insert("containerEnabled", InputValue::Bool(true));
        normalize(&mut inputs);
        assert_eq!(inputs.get(CONTAINER), Some(&InputValue::from("yes")));
    }

    #[test]
    fn test_severity_validation() {
        let mut inputs = with_defaults();
        assert!(validate_normalized(&inputs).is_ok());

        inputs.insert("trivySeverity", InputValue::from("URGENT"));
        normalize(&mut inputs);
        let err = validate_normalized(&inputs).unwrap_err();
        assert_eq!(
            err.to_string(),
            "input 'security.trivy.severity' must be one of: CRITICAL, HIGH, MEDIUM, LOW, CRITICAL,HIGH, CRITICAL,HIGH,MEDIUM"
        );
    }
}
