//! Manifest parser and validator

use std::collections::BTreeMap;
use std::path::Path;

use gpgen_templates::TemplateCatalog;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ManifestError, ManifestResult};
use crate::models::{
    CustomStep, Manifest, ManifestMetadata, ManifestSpec, StepOverride, API_VERSION, KIND,
};

/// Accepted shape of a custom step `position`
pub const POSITION_PATTERN: &str = r"^(before|after|replace):[a-z0-9-]+$";

static POSITION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(POSITION_PATTERN).expect("position pattern is a valid regex"));

const MIN_TIMEOUT_MINUTES: i64 = 1;
const MAX_TIMEOUT_MINUTES: i64 = 360;

/// Loose view of the document used to report missing sections by name
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawManifest {
    #[serde(default)]
    api_version: String,
    #[serde(default)]
    kind: String,
    #[serde(default)]
    metadata: Option<ManifestMetadata>,
    #[serde(default)]
    spec: Option<ManifestSpec>,
}

/// Parses and validates pipeline manifests
pub struct ManifestParser;

impl ManifestParser {
    /// Parse a manifest from YAML
    ///
    /// Only checks that the mandatory sections are present. Call
    /// [`ManifestParser::validate`] for the schema rules.
    pub fn parse_yaml(content: &str) -> ManifestResult<Manifest> {
        let raw: RawManifest =
            serde_yaml::from_str(content).map_err(|e| ManifestError::Parse(e.to_string()))?;

        if raw.api_version.is_empty() {
            return Err(ManifestError::MissingField("apiVersion"));
        }
        if raw.kind.is_empty() {
            return Err(ManifestError::MissingField("kind"));
        }
        let spec = raw.spec.ok_or(ManifestError::MissingField("spec"))?;
        if spec.template.is_empty() {
            return Err(ManifestError::MissingField("template"));
        }

        Ok(Manifest {
            api_version: raw.api_version,
            kind: raw.kind,
            metadata: raw.metadata,
            spec,
        })
    }

    /// Serialize a manifest back to YAML
    pub fn to_yaml(manifest: &Manifest) -> ManifestResult<String> {
        serde_yaml::to_string(manifest).map_err(|e| ManifestError::Parse(e.to_string()))
    }

    /// Validate a parsed manifest
    ///
    /// Validates:
    /// - `apiVersion` and `kind`
    /// - `metadata.name` when metadata is present, and that it and every
    ///   environment name are usable inside a file name
    /// - the template exists in the catalog
    /// - every custom step, base and per environment
    /// - timeouts of step overrides
    pub fn validate(manifest: &Manifest, catalog: &TemplateCatalog) -> ManifestResult<()> {
        if manifest.api_version != API_VERSION {
            return Err(ManifestError::InvalidApiVersion(format!(
                "{}, must be {}",
                manifest.api_version, API_VERSION
            )));
        }

        if manifest.kind != KIND {
            return Err(ManifestError::InvalidKind(format!(
                "{}, must be {}",
                manifest.kind, KIND
            )));
        }

        if let Some(metadata) = &manifest.metadata {
            if metadata.name.trim().is_empty() {
                return Err(ManifestError::MissingField("metadata.name"));
            }
            check_file_name_part("metadata.name", &metadata.name)?;
        }

        if !catalog.contains(&manifest.spec.template) {
            return Err(ManifestError::InvalidTemplate {
                template: manifest.spec.template.clone(),
                available: catalog.list().into_iter().map(str::to_string).collect(),
            });
        }

        for (index, step) in manifest.spec.custom_steps.iter().enumerate() {
            Self::validate_custom_step(step).map_err(|reason| ManifestError::InvalidCustomStep {
                index,
                environment: None,
                reason,
            })?;
        }
        Self::validate_overrides(&manifest.spec.overrides, None)?;

        for (name, environment) in &manifest.spec.environments {
            check_file_name_part("environment name", name)?;
            for (index, step) in environment.custom_steps.iter().enumerate() {
                Self::validate_custom_step(step).map_err(|reason| {
                    ManifestError::InvalidCustomStep {
                        index,
                        environment: Some(name.clone()),
                        reason,
                    }
                })?;
            }
            Self::validate_overrides(&environment.overrides, Some(name))?;
        }

        debug!(
            template = %manifest.spec.template,
            custom_steps = manifest.spec.custom_steps.len(),
            environments = manifest.spec.environments.len(),
            "Manifest validated"
        );
        Ok(())
    }

    /// Read, parse and validate a manifest file
    pub fn load_from_file(path: &Path, catalog: &TemplateCatalog) -> ManifestResult<Manifest> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let manifest = Self::parse_yaml(&content)?;
        Self::validate(&manifest, catalog)?;
        Ok(manifest)
    }

    /// Check a position directive; empty means append
    pub fn validate_position(position: &str) -> Result<(), String> {
        if position.is_empty() || POSITION_REGEX.is_match(position) {
            Ok(())
        } else {
            Err(format!(
                "invalid position format: {}, must match pattern '{}'",
                position, POSITION_PATTERN
            ))
        }
    }

    pub(crate) fn validate_custom_step(step: &CustomStep) -> Result<(), String> {
        if step.name.trim().is_empty() {
            return Err("step name cannot be empty".to_string());
        }

        Self::validate_position(&step.position)?;

        match (step.action(), step.command()) {
            (None, None) => return Err("step must have either 'uses' or 'run'".to_string()),
            (Some(_), Some(_)) => return Err("step cannot have both 'uses' and 'run'".to_string()),
            _ => {}
        }

        Self::validate_timeout(step.timeout_minutes)
    }

    fn validate_overrides(
        overrides: &BTreeMap<String, StepOverride>,
        environment: Option<&String>,
    ) -> ManifestResult<()> {
        for (step_id, step_override) in overrides {
            Self::validate_timeout(step_override.timeout_minutes).map_err(|reason| {
                ManifestError::InvalidOverride {
                    step: step_id.clone(),
                    environment: environment.cloned(),
                    reason,
                }
            })?;
        }
        Ok(())
    }

    fn validate_timeout(timeout: Option<i64>) -> Result<(), String> {
        match timeout {
            Some(minutes) if !(MIN_TIMEOUT_MINUTES..=MAX_TIMEOUT_MINUTES).contains(&minutes) => {
                Err(format!(
                    "timeout-minutes must be between {} and {}",
                    MIN_TIMEOUT_MINUTES, MAX_TIMEOUT_MINUTES
                ))
            }
            _ => Ok(()),
        }
    }
}

/// Whether a pipeline or environment name is safe inside a file name
pub fn is_file_name_safe(name: &str) -> bool {
    !name.contains(['/', '\\']) && !name.contains("..")
}

fn check_file_name_part(field: &'static str, value: &str) -> ManifestResult<()> {
    if is_file_name_safe(value) {
        Ok(())
    } else {
        Err(ManifestError::InvalidName {
            field,
            value: value.to_string(),
        })
    }
}
