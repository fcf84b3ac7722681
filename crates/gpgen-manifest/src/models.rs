//! Manifest data models

use std::collections::BTreeMap;
use std::fmt;

use gpgen_templates::{InputMap, InputValue};
use serde::{Deserialize, Deserializer, Serialize};

/// Supported `apiVersion`
pub const API_VERSION: &str = "gpgen.dev/v1";
/// Supported `kind`
pub const KIND: &str = "Pipeline";
/// Environment used when none is requested
pub const DEFAULT_ENVIRONMENT: &str = "default";
/// Annotation selecting the validation mode
pub const VALIDATION_MODE_ANNOTATION: &str = "gpgen.dev/validation-mode";

/// Root of a pipeline manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Schema version (`gpgen.dev/v1`)
    pub api_version: String,
    /// Resource kind (`Pipeline`)
    pub kind: String,
    /// Pipeline metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ManifestMetadata>,
    /// Pipeline specification
    pub spec: ManifestSpec,
}

impl Manifest {
    /// Pipeline name from metadata, falling back to the template name
    pub fn pipeline_name(&self) -> &str {
        self.metadata
            .as_ref()
            .map(|m| m.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.spec.template)
    }

    /// Validation mode selected by the `gpgen.dev/validation-mode` annotation
    pub fn validation_mode(&self) -> ValidationMode {
        self.metadata
            .as_ref()
            .and_then(|m| m.annotations.get(VALIDATION_MODE_ANNOTATION))
            .map(|mode| ValidationMode::from_annotation(mode))
            .unwrap_or_default()
    }

    /// Environment block by name
    pub fn environment(&self, name: &str) -> Option<&EnvironmentConfig> {
        self.spec.environments.get(name)
    }

    /// `default` followed by every declared environment, without duplicates
    pub fn environment_names(&self) -> Vec<String> {
        std::iter::once(DEFAULT_ENVIRONMENT.to_string())
            .chain(
                self.spec
                    .environments
                    .keys()
                    .filter(|name| name.as_str() != DEFAULT_ENVIRONMENT)
                    .cloned(),
            )
            .collect()
    }
}

/// Pipeline metadata
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Pipeline name, used for the workflow name and file name
    #[serde(default)]
    pub name: String,
    /// Free-form annotations
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

/// Pipeline specification
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestSpec {
    /// Template name
    #[serde(default)]
    pub template: String,
    /// Base inputs
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inputs: InputMap,
    /// Custom steps applied in every environment
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_steps: Vec<CustomStep>,
    /// Field overrides for template steps, keyed by step id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, StepOverride>,
    /// Per-environment overrides
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environments: BTreeMap<String, EnvironmentConfig>,
}

/// Overrides for one environment
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentConfig {
    /// Free-form annotations
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    /// Inputs layered over the base inputs
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inputs: InputMap,
    /// Custom steps applied after the base custom steps
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_steps: Vec<CustomStep>,
    /// Step overrides applied after the base overrides
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<String, StepOverride>,
}

/// A user-defined step spliced into the template's step list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomStep {
    /// Display name
    pub name: String,
    /// `before:<step>`, `after:<step>`, `replace:<step>`, or empty to append
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub position: String,
    /// Action reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses: Option<String>,
    /// Shell command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
    /// Action parameters
    #[serde(
        default,
        deserialize_with = "scalar_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub with: BTreeMap<String, String>,
    /// Environment variables
    #[serde(
        default,
        deserialize_with = "scalar_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub env: BTreeMap<String, String>,
    /// Step condition
    #[serde(rename = "if", default, skip_serializing_if = "Option::is_none")]
    pub if_condition: Option<String>,
    /// Step timeout in minutes
    #[serde(rename = "timeout-minutes", default, skip_serializing_if = "Option::is_none")]
    pub timeout_minutes: Option<i64>,
    /// Keep the job going when this step fails
    #[serde(rename = "continue-on-error", default, skip_serializing_if = "Option::is_none")]
    pub continue_on_error: Option<bool>,
}

impl CustomStep {
    /// Create a shell step
    pub fn run(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            run: Some(command.into()),
            ..Default::default()
        }
    }

    /// Create an action step
    pub fn uses(name: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uses: Some(action.into()),
            ..Default::default()
        }
    }

    /// Set the position directive
    pub fn at(mut self, position: impl Into<String>) -> Self {
        self.position = position.into();
        self
    }

    /// Action reference, treating an empty string as absent
    pub fn action(&self) -> Option<&str> {
        self.uses.as_deref().filter(|u| !u.is_empty())
    }

    /// Shell command, treating an empty string as absent
    pub fn command(&self) -> Option<&str> {
        self.run.as_deref().filter(|r| !r.is_empty())
    }
}

/// Field overrides for an existing template step
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepOverride {
    /// Replacement display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement action reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses: Option<String>,
    /// Replacement shell command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<String>,
    /// Parameters merged over the step's own
    #[serde(
        default,
        deserialize_with = "scalar_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub with: BTreeMap<String, String>,
    /// Environment variables merged over the step's own
    #[serde(
        default,
        deserialize_with = "scalar_map",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub env: BTreeMap<String, String>,
    /// Replacement condition
    #[serde(rename = "if", default, skip_serializing_if = "Option::is_none")]
    pub if_condition: Option<String>,
    /// Replacement timeout
    #[serde(rename = "timeout-minutes", default, skip_serializing_if = "Option::is_none")]
    pub timeout_minutes: Option<i64>,
    /// Replacement failure handling
    #[serde(rename = "continue-on-error", default, skip_serializing_if = "Option::is_none")]
    pub continue_on_error: Option<bool>,
}

/// How strictly the CLI treats a manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Full validation (default)
    #[default]
    Strict,
    /// Relaxed validation, selected by annotation
    Relaxed,
}

impl ValidationMode {
    /// Interpret an annotation value; anything but `relaxed` is strict
    pub fn from_annotation(value: &str) -> Self {
        match value {
            "relaxed" => ValidationMode::Relaxed,
            _ => ValidationMode::Strict,
        }
    }

    /// Annotation spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationMode::Strict => "strict",
            ValidationMode::Relaxed => "relaxed",
        }
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accept any scalar as a string value (`fetch-depth: 0` becomes `"0"`)
fn scalar_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, InputValue>> = Option::deserialize(deserializer)?;
    raw.unwrap_or_default()
        .into_iter()
        .map(|(key, value)| match value {
            InputValue::Array(_) | InputValue::Object(_) => Err(serde::de::Error::custom(
                format!("value of '{}' must be a scalar", key),
            )),
            scalar => Ok((key, scalar.to_string())),
        })
        .collect()
}
