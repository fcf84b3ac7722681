//! Step expression language
//!
//! A constrained subset of Go-style template syntax: variable lookup under
//! `.Inputs`, conditional branches and a handful of comparison functions.
//! There are no loops, assignments or user-defined functions.

pub mod engine;
pub mod parser;

pub use engine::ExpressionEngine;
pub use parser::{Branch, Expression, Function, ParsedTemplate, TemplateNode, TemplateParser};
