// Create a starter manifest for a template

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use gpgen_manifest::models::{API_VERSION, KIND, VALIDATION_MODE_ANNOTATION};
use gpgen_manifest::{
    EnvironmentConfig, Manifest, ManifestMetadata, ManifestParser, ManifestSpec, ValidationMode,
};
use gpgen_templates::builtin::{GO_SERVICE, PYTHON_APP};
use gpgen_templates::{InputMap, InputValue, TemplateCatalog};
use tracing::debug;

use super::Command;
use crate::error::{CliError, CliResult};
use crate::output::{self, OutputStyle};

const DESCRIPTION_ANNOTATION: &str = "gpgen.dev/description";
const FALLBACK_NAME: &str = "pipeline";

const MANIFEST_HEADER: &str = "\
# GPGen pipeline manifest
#
# Custom steps go under spec.customSteps, for example:
#   customSteps:
#     - name: Security Audit
#       position: after:test
#       run: npm audit
";

/// Initialize a new manifest
pub struct InitCommand {
    pub template: String,
    pub name: Option<String>,
    pub output: PathBuf,
    pub force: bool,
}

impl InitCommand {
    pub fn new(template: String) -> Self {
        Self {
            template,
            name: None,
            output: PathBuf::from(crate::router::DEFAULT_MANIFEST),
            force: false,
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = output;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Pipeline name from the flag or the current directory
    fn pipeline_name(&self) -> CliResult<String> {
        match &self.name {
            Some(name) => Ok(name.clone()),
            None => Ok(default_pipeline_name(&std::env::current_dir()?)),
        }
    }

    /// Write the manifest and return its content
    pub fn run(&self) -> CliResult<String> {
        let catalog = TemplateCatalog::builtin();
        if !catalog.contains(&self.template) {
            return Err(CliError::UnknownTemplate {
                name: self.template.clone(),
                available: catalog.list().into_iter().map(str::to_string).collect(),
            });
        }

        if !self.force && self.output.exists() {
            return Err(CliError::ManifestExists(self.output.clone()));
        }

        let manifest = starter_manifest(&self.template, &self.pipeline_name()?);
        let content = format!("{}{}", MANIFEST_HEADER, ManifestParser::to_yaml(&manifest)?);

        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.output, &content)?;
        debug!(path = %self.output.display(), template = %self.template, "Wrote manifest");

        Ok(content)
    }
}

impl Command for InitCommand {
    fn execute(&self) -> CliResult<()> {
        self.run()?;

        let style = OutputStyle::default();
        output::print_success(&format!(
            "Initialized {} manifest: {}",
            self.template,
            style.code(&self.output.display().to_string())
        ));
        output::print_line(&style.list_item("Edit the manifest to customize your pipeline"));
        output::print_line(&style.list_item(
            "Run 'gpgen generate' to create your GitHub Actions workflows",
        ));
        Ok(())
    }
}

/// Directory name lowercased with spaces replaced by dashes
pub fn default_pipeline_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().replace(' ', "-").to_lowercase())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

/// Starter manifest for a known template
///
/// Base inputs spell out the template defaults; staging and production
/// carry typical overrides and use strict validation.
pub fn starter_manifest(template: &str, name: &str) -> Manifest {
    let (description, base, staging, production) = match template {
        GO_SERVICE => (
            "Go service pipeline with security scanning",
            inputs(&[
                ("buildCommand", format!("go build -o bin/{0} ./cmd/{0}", name).into()),
                ("goVersion", "1.21".into()),
                ("platforms", "linux/amd64,darwin/amd64".into()),
                ("testCommand", "go test ./...".into()),
                ("trivyScanEnabled", true.into()),
                ("trivySeverity", "CRITICAL,HIGH".into()),
            ]),
            inputs(&[
                ("testCommand", "go test -race ./...".into()),
                ("trivySeverity", "CRITICAL,HIGH,MEDIUM".into()),
            ]),
            inputs(&[
                ("goVersion", "1.22".into()),
                ("testCommand", "go test -race -cover ./...".into()),
                ("trivySeverity", "CRITICAL".into()),
            ]),
        ),
        PYTHON_APP => (
            "Python application pipeline",
            inputs(&[
                ("lintCommand", "flake8".into()),
                ("packageManager", "pip".into()),
                ("pythonVersion", "3.11".into()),
                ("requirements", "requirements.txt".into()),
                ("testCommand", "pytest".into()),
            ]),
            inputs(&[("testCommand", "pytest --cov=. --cov-report=xml".into())]),
            inputs(&[
                ("pythonVersion", "3.12".into()),
                (
                    "testCommand",
                    "pytest --cov=. --cov-report=xml --cov-fail-under=80".into(),
                ),
            ]),
        ),
        _ => (
            "Node.js application pipeline",
            inputs(&[
                ("buildCommand", "npm run build".into()),
                ("nodeVersion", "18".into()),
                ("packageManager", "npm".into()),
                ("testCommand", "npm test".into()),
            ]),
            inputs(&[("testCommand", "npm run test:ci".into())]),
            inputs(&[
                ("nodeVersion", "20".into()),
                ("testCommand", "npm run test:all".into()),
            ]),
        ),
    };

    let mut annotations = BTreeMap::new();
    annotations.insert(
        VALIDATION_MODE_ANNOTATION.to_string(),
        ValidationMode::Relaxed.as_str().to_string(),
    );
    annotations.insert(DESCRIPTION_ANNOTATION.to_string(), description.to_string());

    let mut environments = BTreeMap::new();
    environments.insert("staging".to_string(), strict_environment(staging));
    environments.insert("production".to_string(), strict_environment(production));

    Manifest {
        api_version: API_VERSION.to_string(),
        kind: KIND.to_string(),
        metadata: Some(ManifestMetadata {
            name: name.to_string(),
            annotations,
        }),
        spec: ManifestSpec {
            template: template.to_string(),
            inputs: base,
            environments,
            ..Default::default()
        },
    }
}

fn strict_environment(inputs: InputMap) -> EnvironmentConfig {
    let mut annotations = BTreeMap::new();
    annotations.insert(
        VALIDATION_MODE_ANNOTATION.to_string(),
        ValidationMode::Strict.as_str().to_string(),
    );
    EnvironmentConfig {
        annotations,
        inputs,
        ..Default::default()
    }
}

fn inputs(entries: &[(&str, InputValue)]) -> InputMap {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}
