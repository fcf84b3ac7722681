//! Workflow generator
//!
//! Sequences one generation: strict template load, input resolution,
//! validation, step rendering, overrides, custom step splicing and assembly.
//! Each call works on its own step list, so one generator can serve several
//! environments in parallel.

use std::sync::Arc;

use gpgen_config::GeneratorSettings;
use gpgen_manifest::{Manifest, DEFAULT_ENVIRONMENT};
use gpgen_templates::TemplateCatalog;
use tracing::{debug, info};

use crate::assembler::WorkflowAssembler;
use crate::error::{GeneratorError, GeneratorResult};
use crate::normalize::validate_normalized;
use crate::renderer::StepRenderer;
use crate::resolver::InputResolver;
use crate::splicer::StepSplicer;
use crate::workflow::GitHubWorkflow;

/// Generates GitHub Actions workflows from manifests
#[derive(Debug, Clone)]
pub struct WorkflowGenerator {
    catalog: Arc<TemplateCatalog>,
    settings: GeneratorSettings,
}

impl WorkflowGenerator {
    /// Create a generator over a shared catalog with default job settings
    pub fn new(catalog: Arc<TemplateCatalog>) -> Self {
        Self {
            catalog,
            settings: GeneratorSettings::default(),
        }
    }

    /// Use specific job settings
    pub fn with_settings(mut self, settings: GeneratorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Catalog the generator renders from
    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    /// Generate the workflow document for one environment
    pub fn generate_workflow(&self, manifest: &Manifest, environment: &str) -> GeneratorResult<GitHubWorkflow> {
        let template = self
            .catalog
            .load(&manifest.spec.template)
            .map_err(GeneratorError::TemplateLoad)?;

        let inputs = InputResolver::new(&self.catalog).resolve(manifest, environment);
        self.catalog
            .validate_inputs(&template.name, inputs.as_map())
            .map_err(GeneratorError::InputValidation)?;
        validate_normalized(&inputs).map_err(GeneratorError::InputValidation)?;

        let mut steps = StepRenderer::render_all(template, &inputs)?;

        StepRenderer::apply_overrides(template, &mut steps, &manifest.spec.overrides)?;
        if environment != DEFAULT_ENVIRONMENT {
            if let Some(config) = manifest.environment(environment) {
                StepRenderer::apply_overrides(template, &mut steps, &config.overrides)?;
            }
        }
        debug!(steps = steps.len(), "Rendered template steps");

        let steps = StepSplicer::apply_manifest(steps, manifest, environment)?;

        let workflow =
            WorkflowAssembler::new(&self.settings).assemble(manifest, environment, &inputs, steps);
        info!(
            pipeline = %manifest.pipeline_name(),
            template = %template.name,
            environment,
            "Generated workflow"
        );
        Ok(workflow)
    }

    /// Generate and serialize the workflow for one environment
    pub fn generate_yaml(&self, manifest: &Manifest, environment: &str) -> GeneratorResult<String> {
        let workflow = self.generate_workflow(manifest, environment)?;
        Ok(workflow.to_yaml()?)
    }
}

impl Default for WorkflowGenerator {
    fn default() -> Self {
        Self::new(Arc::new(TemplateCatalog::builtin()))
    }
}
