//! Expression evaluation

use tracing::trace;

use crate::error::{TemplateError, TemplateResult};
use crate::expression::parser::{
    Expression, Function, ParsedTemplate, TemplateNode, TemplateParser, INPUTS_NAMESPACE,
};
use crate::value::{InputMap, InputValue};

/// Renders template text against a set of inputs
pub struct ExpressionEngine;

impl ExpressionEngine {
    /// Parse and render template text
    ///
    /// Missing inputs render as empty text and are false in conditions.
    ///
    /// # Arguments
    /// * `template` - Text possibly containing `{{ }}` actions
    /// * `inputs` - Values exposed under `.Inputs`
    pub fn render(template: &str, inputs: &InputMap) -> TemplateResult<String> {
        if !template.contains("{{") {
            return Ok(template.to_string());
        }
        let parsed = TemplateParser::parse(template)?;
        Self::render_parsed(&parsed, inputs)
    }

    /// Render an already parsed template
    pub fn render_parsed(parsed: &ParsedTemplate, inputs: &InputMap) -> TemplateResult<String> {
        let mut output = String::new();
        Self::render_nodes(&parsed.nodes, inputs, &mut output)?;
        trace!(rendered = %output, "Rendered template");
        Ok(output)
    }

    fn render_nodes(nodes: &[TemplateNode], inputs: &InputMap, output: &mut String) -> TemplateResult<()> {
        for node in nodes {
            match node {
                TemplateNode::Text(text) => output.push_str(text),
                TemplateNode::Output(expression) => {
                    let value = Self::evaluate(expression, inputs)?;
                    output.push_str(&value.to_string());
                }
                TemplateNode::Conditional { branches, otherwise } => {
                    let mut taken = false;
                    for branch in branches {
                        if Self::evaluate(&branch.condition, inputs)?.is_truthy() {
                            Self::render_nodes(&branch.body, inputs, output)?;
                            taken = true;
                            break;
                        }
                    }
                    if !taken {
                        Self::render_nodes(otherwise, inputs, output)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Evaluate an expression to a value
    pub fn evaluate(expression: &Expression, inputs: &InputMap) -> TemplateResult<InputValue> {
        match expression {
            Expression::Literal(value) => Ok(value.clone()),
            Expression::Path(segments) => Self::resolve_path(segments, inputs),
            Expression::Call { function, args } => Self::call(*function, args, inputs),
        }
    }

    fn resolve_path(segments: &[String], inputs: &InputMap) -> TemplateResult<InputValue> {
        let Some((first, rest)) = segments.split_first() else {
            return Ok(InputValue::Object(inputs.clone()));
        };

        let mut current = match inputs.get(first) {
            Some(value) => value,
            None => return Ok(InputValue::Null),
        };

        for (index, segment) in rest.iter().enumerate() {
            current = match current {
                InputValue::Object(map) => match map.get(segment) {
                    Some(value) => value,
                    None => return Ok(InputValue::Null),
                },
                InputValue::Null => return Ok(InputValue::Null),
                other => {
                    let walked = segments[..=index].join(".");
                    return Err(TemplateError::Evaluation(format!(
                        "can't evaluate field {} of .{}.{}: value is a {}",
                        segment,
                        INPUTS_NAMESPACE,
                        walked,
                        other.type_name()
                    )));
                }
            };
        }

        Ok(current.clone())
    }

    fn call(function: Function, args: &[Expression], inputs: &InputMap) -> TemplateResult<InputValue> {
        match function {
            Function::Eq => {
                let first = Self::evaluate(&args[0], inputs)?;
                for arg in &args[1..] {
                    if first.loosely_equals(&Self::evaluate(arg, inputs)?) {
                        return Ok(InputValue::Bool(true));
                    }
                }
                Ok(InputValue::Bool(false))
            }
            Function::Ne => {
                let left = Self::evaluate(&args[0], inputs)?;
                let right = Self::evaluate(&args[1], inputs)?;
                Ok(InputValue::Bool(!left.loosely_equals(&right)))
            }
            Function::Not => {
                let value = Self::evaluate(&args[0], inputs)?;
                Ok(InputValue::Bool(!value.is_truthy()))
            }
            Function::And => {
                let mut last = InputValue::Null;
                for arg in args {
                    last = Self::evaluate(arg, inputs)?;
                    if !last.is_truthy() {
                        break;
                    }
                }
                Ok(last)
            }
            Function::Or => {
                let mut last = InputValue::Null;
                for arg in args {
                    last = Self::evaluate(arg, inputs)?;
                    if last.is_truthy() {
                        break;
                    }
                }
                Ok(last)
            }
        }
    }
}
