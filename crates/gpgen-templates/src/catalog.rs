//! Template catalog
//!
//! An immutable registry built once and shared read-only. Generators receive
//! it by reference (or `Arc`) rather than reaching for global state.

use tracing::debug;

use crate::builtin;
use crate::error::{TemplateError, TemplateResult};
use crate::models::Template;
use crate::value::InputMap;

/// Registry of known templates
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    /// Catalog holding the built-in golden-path templates
    pub fn builtin() -> Self {
        Self::from_templates(builtin::all())
    }

    /// Catalog over an explicit template list; later duplicates are ignored
    pub fn from_templates(templates: Vec<Template>) -> Self {
        let mut unique: Vec<Template> = Vec::with_capacity(templates.len());
        for template in templates {
            if !unique.iter().any(|t| t.name == template.name) {
                unique.push(template);
            }
        }
        Self { templates: unique }
    }

    /// Load a template by name
    pub fn load(&self, name: &str) -> TemplateResult<&Template> {
        let template = self
            .templates
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))?;
        debug!(template = name, steps = template.steps.len(), "Loaded template");
        Ok(template)
    }

    /// Names of all templates, in catalog order
    pub fn list(&self) -> Vec<&str> {
        self.templates.iter().map(|t| t.name.as_str()).collect()
    }

    /// Whether a template exists
    pub fn contains(&self, name: &str) -> bool {
        self.templates.iter().any(|t| t.name == name)
    }

    /// Iterate over all templates
    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    /// Validate resolved inputs against a template's definitions
    ///
    /// Definitions are checked in name order and the first failure is
    /// returned. Inputs without a definition are accepted.
    pub fn validate_inputs(&self, template_name: &str, inputs: &InputMap) -> TemplateResult<()> {
        let template = self.load(template_name)?;

        for (name, definition) in &template.inputs {
            match inputs.get(name) {
                None if definition.required => {
                    return Err(TemplateError::MissingInput { name: name.clone() });
                }
                None => {}
                Some(value) => definition.check(name, value)?,
            }
        }

        Ok(())
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
