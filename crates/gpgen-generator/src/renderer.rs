//! Step rendering
//!
//! Every text field of a template step is evaluated against the effective
//! inputs, then the actor and token placeholders are substituted literally.
//! The placeholders are never seen by the expression engine.

use std::collections::BTreeMap;

use gpgen_manifest::StepOverride;
use gpgen_templates::actions;
use gpgen_templates::{ExpressionEngine, Template, TemplateStep};
use tracing::{debug, trace};

use crate::error::{GeneratorError, GeneratorResult};
use crate::inputs::EffectiveInputs;
use crate::workflow::WorkflowStep;

/// Renders template steps into workflow steps
pub struct StepRenderer;

impl StepRenderer {
    /// Render a single template step
    pub fn render(step: &TemplateStep, inputs: &EffectiveInputs) -> GeneratorResult<WorkflowStep> {
        let field = |field: &str, text: &str| Self::render_field(step, field, text, inputs);

        let mut with = BTreeMap::new();
        for (key, value) in &step.with {
            with.insert(key.clone(), field(&format!("with parameter {}", key), value)?);
        }

        let mut env = BTreeMap::new();
        for (key, value) in &step.env {
            env.insert(key.clone(), field(&format!("env variable {}", key), value)?);
        }

        let rendered = WorkflowStep {
            name: step.name.clone(),
            uses: step.uses.clone(),
            run: field("run command", &step.run)?,
            with,
            env,
            if_condition: field("if condition", &step.if_condition)?,
            timeout_minutes: step.timeout_minutes,
            continue_on_error: None,
        };
        trace!(step = %step.id, "Rendered step");
        Ok(rendered)
    }

    /// Render every step of a template, in order
    pub fn render_all(template: &Template, inputs: &EffectiveInputs) -> GeneratorResult<Vec<WorkflowStep>> {
        template
            .steps
            .iter()
            .map(|step| Self::render(step, inputs))
            .collect()
    }

    /// Apply step overrides to freshly rendered template steps
    ///
    /// `steps` must still line up with `template.steps`. Override values are
    /// taken literally.
    pub fn apply_overrides(
        template: &Template,
        steps: &mut [WorkflowStep],
        overrides: &BTreeMap<String, StepOverride>,
    ) -> GeneratorResult<()> {
        for (step_id, step_override) in overrides {
            let index = template
                .steps
                .iter()
                .position(|s| &s.id == step_id)
                .ok_or_else(|| GeneratorError::UnknownOverride {
                    step: step_id.clone(),
                })?;
            // Template steps are rendered one to one, so the index is valid.
            if let Some(step) = steps.get_mut(index) {
                Self::apply_override(step, step_override);
                debug!(step = %step_id, "Applied step override");
            }
        }
        Ok(())
    }

    fn apply_override(step: &mut WorkflowStep, step_override: &StepOverride) {
        if let Some(name) = &step_override.name {
            step.name = name.clone();
        }
        if let Some(uses) = &step_override.uses {
            step.uses = uses.clone();
        }
        if let Some(run) = &step_override.run {
            step.run = run.clone();
        }
        if let Some(condition) = &step_override.if_condition {
            step.if_condition = condition.clone();
        }
        step.with.extend(step_override.with.clone());
        step.env.extend(step_override.env.clone());
        if let Some(minutes) = step_override.timeout_minutes {
            step.timeout_minutes = u32::try_from(minutes).ok();
        }
        if step_override.continue_on_error.is_some() {
            step.continue_on_error = step_override.continue_on_error;
        }
    }

    fn render_field(
        step: &TemplateStep,
        field: &str,
        text: &str,
        inputs: &EffectiveInputs,
    ) -> GeneratorResult<String> {
        if text.is_empty() {
            return Ok(String::new());
        }
        let evaluated = ExpressionEngine::render(text, inputs.as_map()).map_err(|source| {
            GeneratorError::Render {
                step: step.id.clone(),
                field: field.to_string(),
                source,
            }
        })?;
        Ok(actions::replace_placeholders(&evaluated))
    }
}
