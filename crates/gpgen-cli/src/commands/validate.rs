// Validate a manifest without generating anything

use std::path::PathBuf;

use gpgen_manifest::{Manifest, ManifestParser, ValidationMode};
use gpgen_templates::TemplateCatalog;

use super::Command;
use crate::error::{CliError, CliResult};
use crate::output::{self, OutputStyle};

/// Validate a manifest file
pub struct ValidateCommand {
    pub manifest: PathBuf,
    pub strict: bool,
}

/// Summary of a valid manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub template: String,
    pub name: String,
    pub mode: String,
    pub environments: Vec<String>,
    pub custom_steps: usize,
    pub overrides: usize,
}

impl ValidationReport {
    fn from_manifest(manifest: &Manifest, strict: bool) -> Self {
        let mode = if strict {
            format!("{} (forced)", ValidationMode::Strict)
        } else {
            manifest.validation_mode().to_string()
        };

        let environments = &manifest.spec.environments;
        Self {
            template: manifest.spec.template.clone(),
            name: manifest.pipeline_name().to_string(),
            mode,
            environments: manifest.environment_names(),
            custom_steps: manifest.spec.custom_steps.len()
                + environments.values().map(|e| e.custom_steps.len()).sum::<usize>(),
            overrides: manifest.spec.overrides.len()
                + environments.values().map(|e| e.overrides.len()).sum::<usize>(),
        }
    }
}

impl ValidateCommand {
    pub fn new(manifest: PathBuf) -> Self {
        Self {
            manifest,
            strict: false,
        }
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Load and validate the manifest
    pub fn run(&self) -> CliResult<ValidationReport> {
        if !self.manifest.exists() {
            return Err(CliError::ManifestNotFound(self.manifest.clone()));
        }
        let manifest = ManifestParser::load_from_file(&self.manifest, &TemplateCatalog::builtin())?;
        Ok(ValidationReport::from_manifest(&manifest, self.strict))
    }
}

impl Command for ValidateCommand {
    fn execute(&self) -> CliResult<()> {
        let report = self.run()?;
        let style = OutputStyle::default();

        output::print_success(&format!("Manifest is valid: {}", self.manifest.display()));
        output::print_line(&style.key_value("Template", &report.template));
        output::print_line(&style.key_value("Name", &report.name));
        output::print_line(&style.key_value("Validation mode", &report.mode));
        output::print_line(&style.key_value("Environments", &report.environments.join(", ")));
        output::print_line(&style.key_value("Custom steps", &report.custom_steps.to_string()));
        if report.overrides > 0 {
            output::print_line(&style.key_value("Overrides", &report.overrides.to_string()));
        }
        Ok(())
    }
}
