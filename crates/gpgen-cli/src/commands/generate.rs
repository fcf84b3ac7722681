// Generate workflow files from a manifest

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use gpgen_config::GeneratorSettings;
use gpgen_generator::WorkflowGenerator;
use gpgen_manifest::models::DEFAULT_ENVIRONMENT;
use gpgen_manifest::parser::is_file_name_safe;
use gpgen_manifest::{Manifest, ManifestParser};
use gpgen_templates::TemplateCatalog;
use rayon::prelude::*;
use tracing::{debug, info};

use super::Command;
use crate::error::{CliError, CliResult};
use crate::output::{self, OutputStyle};

/// Generate GitHub Actions workflows
pub struct GenerateCommand {
    pub manifest: PathBuf,
    pub output_dir: PathBuf,
    pub environment: Option<String>,
    pub dry_run: bool,
    pub overwrite: bool,
    pub settings: GeneratorSettings,
}

/// One workflow ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedWorkflow {
    pub environment: String,
    pub path: PathBuf,
    pub content: String,
}

impl GenerateCommand {
    pub fn new(manifest: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            manifest,
            output_dir,
            environment: None,
            dry_run: false,
            overwrite: false,
            settings: GeneratorSettings::default(),
        }
    }

    pub fn with_environment(mut self, environment: Option<String>) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_settings(mut self, settings: GeneratorSettings) -> Self {
        self.settings = settings;
        self
    }

    fn load_manifest(&self, catalog: &TemplateCatalog) -> CliResult<Manifest> {
        if !self.manifest.exists() {
            return Err(CliError::ManifestNotFound(self.manifest.clone()));
        }
        Ok(ManifestParser::load_from_file(&self.manifest, catalog)?)
    }

    fn environments(&self, manifest: &Manifest) -> Vec<String> {
        match &self.environment {
            Some(environment) => vec![environment.clone()],
            None => manifest.environment_names(),
        }
    }

    /// Render every requested workflow without touching the filesystem
    pub fn plan(&self) -> CliResult<Vec<PlannedWorkflow>> {
        if let Some(environment) = &self.environment {
            if !is_file_name_safe(environment) {
                return Err(CliError::InvalidArgument {
                    message: format!(
                        "environment '{}' must not contain '/', '\\' or '..'",
                        environment
                    ),
                });
            }
        }
        let catalog = Arc::new(TemplateCatalog::builtin());
        let manifest = self.load_manifest(&catalog)?;
        let generator = WorkflowGenerator::new(catalog).with_settings(self.settings.clone());
        let name = manifest.pipeline_name().to_string();

        self.environments(&manifest)
            .into_par_iter()
            .map(|environment| {
                let content = generator
                    .generate_yaml(&manifest, &environment)
                    .map_err(|source| CliError::Generation {
                        environment: environment.clone(),
                        source,
                    })?;
                let path = self.output_dir.join(workflow_file_name(&name, &environment));
                debug!(environment = %environment, path = %path.display(), "Rendered workflow");
                Ok(PlannedWorkflow {
                    environment,
                    path,
                    content,
                })
            })
            .collect()
    }

    /// Generate and write workflows, returning the written paths
    ///
    /// Nothing is written when any environment fails or any target exists
    /// without `overwrite`. A dry run returns the paths it would write.
    pub fn run(&self) -> CliResult<Vec<PathBuf>> {
        let planned = self.plan()?;

        if self.dry_run {
            return Ok(planned.into_iter().map(|w| w.path).collect());
        }

        if !self.overwrite {
            if let Some(existing) = planned.iter().find(|w| w.path.exists()) {
                return Err(CliError::WorkflowExists(existing.path.clone()));
            }
        }

        fs::create_dir_all(&self.output_dir)?;
        for workflow in &planned {
            fs::write(&workflow.path, &workflow.content)?;
        }
        info!(count = planned.len(), dir = %self.output_dir.display(), "Wrote workflows");

        Ok(planned.into_iter().map(|w| w.path).collect())
    }

    fn print_plan(&self, planned: &[PathBuf]) {
        let style = OutputStyle::default();
        output::print_line(&style.header("Dry run"));
        for path in planned {
            output::print_line(&style.list_item(&format!("Would generate: {}", path.display())));
        }
        output::print_line(&style.tip("Run without --dry-run to write the files"));
    }
}

impl Command for GenerateCommand {
    fn execute(&self) -> CliResult<()> {
        let style = OutputStyle::default();
        output::print_info(&format!("Loading manifest: {}", self.manifest.display()));

        let written = self.run()?;
        if self.dry_run {
            self.print_plan(&written);
            return Ok(());
        }

        for path in &written {
            output::print_line(&style.list_item(&path.display().to_string()));
        }
        output::print_success(&format!(
            "Generated {} workflow(s) in {}",
            written.len(),
            self.output_dir.display()
        ));
        Ok(())
    }
}

/// `<name>.yml` for the default environment, `<name>-<env>.yml` otherwise
pub fn workflow_file_name(name: &str, environment: &str) -> String {
    if environment == DEFAULT_ENVIRONMENT {
        format!("{}.yml", name)
    } else {
        format!("{}-{}.yml", name, environment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_file_name() {
        assert_eq!(workflow_file_name("api", "default"), "api.yml");
        assert_eq!(workflow_file_name("api", "staging"), "api-staging.yml");
    }

    #[test]
    fn test_missing_manifest() {
        let cmd = GenerateCommand::new(
            PathBuf::from("/nonexistent/manifest.yaml"),
            PathBuf::from("out"),
        );
        assert!(matches!(cmd.run(), Err(CliError::ManifestNotFound(_))));
    }

    #[test]
    fn test_environment_outside_output_dir() {
        let cmd = GenerateCommand::new(PathBuf::from("m.yaml"), PathBuf::from("out"))
            .with_environment(Some("../../hooks/pre-commit".to_string()));
        let err = cmd.run().unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }));
        assert!(err.to_string().contains("must not contain"));
    }

    #[test]
    fn test_builder() {
        let cmd = GenerateCommand::new(PathBuf::from("m.yaml"), PathBuf::from("out"))
            .with_environment(Some("staging".to_string()))
            .with_dry_run(true)
            .with_overwrite(true);
        assert_eq!(cmd.environment.as_deref(), Some("staging"));
        assert!(cmd.dry_run);
        assert!(cmd.overwrite);
        assert_eq!(cmd.settings, GeneratorSettings::default());
    }
}
