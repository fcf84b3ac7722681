//! Template data models

use std::collections::BTreeMap;
use std::fmt;

use gpgen_config::Language;
use serde::{Deserialize, Serialize};

use crate::error::{TemplateError, TemplateResult};
use crate::value::{InputMap, InputValue};

/// Declared type of a template input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// String input
    String,
    /// Number input
    Number,
    /// Boolean input
    Boolean,
    /// Array input
    Array,
    /// Object input
    Object,
}

impl InputType {
    /// Check if a value matches this input type
    pub fn matches(&self, value: &InputValue) -> bool {
        matches!(
            (self, value),
            (InputType::String, InputValue::String(_))
                | (InputType::Number, InputValue::Integer(_) | InputValue::Float(_))
                | (InputType::Boolean, InputValue::Bool(_))
                | (InputType::Array, InputValue::Array(_))
                | (InputType::Object, InputValue::Object(_))
        )
    }

    /// Lowercase type name
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::String => "string",
            InputType::Number => "number",
            InputType::Boolean => "boolean",
            InputType::Array => "array",
            InputType::Object => "object",
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Definition of one template input
#[derive(Debug, Clone, PartialEq)]
pub struct InputDefinition {
    /// Declared type
    pub input_type: InputType,
    /// Human readable description
    pub description: String,
    /// Default value seeded before manifest inputs are applied
    pub default: Option<InputValue>,
    /// Whether a value must be present after resolution
    pub required: bool,
    /// Closed set of allowed values, compared against the value's string form
    pub options: Vec<String>,
}

impl InputDefinition {
    /// Create an optional input with no default
    pub fn new(input_type: InputType, description: impl Into<String>) -> Self {
        Self {
            input_type,
            description: description.into(),
            default: None,
            required: false,
            options: Vec::new(),
        }
    }

    /// Shorthand for a string input
    pub fn string(description: impl Into<String>) -> Self {
        Self::new(InputType::String, description)
    }

    /// Shorthand for an object input
    pub fn object(description: impl Into<String>) -> Self {
        Self::new(InputType::Object, description)
    }

    /// Set the default value
    pub fn with_default(mut self, default: impl Into<InputValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Mark the input as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Restrict the input to a closed set of values
    pub fn with_options<S: AsRef<str>>(mut self, options: &[S]) -> Self {
        self.options = options.iter().map(|o| o.as_ref().to_string()).collect();
        self
    }

    /// Check a supplied value against type and allowed values
    pub fn check(&self, name: &str, value: &InputValue) -> TemplateResult<()> {
        if !self.input_type.matches(value) {
            return Err(TemplateError::TypeMismatch {
                name: name.to_string(),
                expected: self.input_type,
            });
        }

        if !self.options.is_empty() && !self.options.contains(&value.to_string()) {
            return Err(TemplateError::NotAllowed {
                name: name.to_string(),
                allowed: self.options.clone(),
            });
        }

        Ok(())
    }
}

/// One step of a template, before expression evaluation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TemplateStep {
    /// Stable identifier (`checkout`, `test`, `build`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Action reference
    pub uses: String,
    /// Shell command
    pub run: String,
    /// Action parameters
    pub with: BTreeMap<String, String>,
    /// Environment variables
    pub env: BTreeMap<String, String>,
    /// Step condition
    pub if_condition: String,
    /// Step timeout in minutes
    pub timeout_minutes: Option<u32>,
}

impl TemplateStep {
    /// Create a step with an id and display name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the action reference
    pub fn uses(mut self, action: impl Into<String>) -> Self {
        self.uses = action.into();
        self
    }

    /// Set the shell command
    pub fn run(mut self, command: impl Into<String>) -> Self {
        self.run = command.into();
        self
    }

    /// Add an action parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with.insert(key.into(), value.into());
        self
    }

    /// Add an environment variable
    pub fn env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Gate the step on a condition
    pub fn when(mut self, condition: impl Into<String>) -> Self {
        self.if_condition = condition.into();
        self
    }

    /// Set a timeout
    pub fn timeout(mut self, minutes: u32) -> Self {
        self.timeout_minutes = Some(minutes);
        self
    }
}

/// Descriptive template metadata
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TemplateMetadata {
    /// Short description
    pub description: String,
    /// Template version
    pub version: String,
    /// Maintainer
    pub author: String,
    /// Search tags
    pub tags: Vec<String>,
}

/// A golden-path template
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// Unique name (`node-app`)
    pub name: String,
    /// Toolchain the template targets
    pub language: Option<Language>,
    /// Descriptive metadata
    pub metadata: TemplateMetadata,
    /// Ordered step list
    pub steps: Vec<TemplateStep>,
    /// Input definitions keyed by input name
    pub inputs: BTreeMap<String, InputDefinition>,
}

impl Template {
    /// Find a step by id
    pub fn step(&self, id: &str) -> Option<&TemplateStep> {
        self.steps.iter().find(|step| step.id == id)
    }

    /// Default value of every input that declares one
    pub fn default_inputs(&self) -> InputMap {
        self.inputs
            .iter()
            .filter_map(|(name, def)| def.default.clone().map(|value| (name.clone(), value)))
            .collect()
    }
}
