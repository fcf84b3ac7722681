#![warn(missing_docs)]

//! GPGen workflow generation
//!
//! Turns a validated manifest into a GitHub Actions workflow for one
//! environment:
//!
//! 1. resolve and normalize the effective inputs ([`InputResolver`])
//! 2. validate them against the template
//! 3. render the template steps ([`StepRenderer`]) and apply overrides
//! 4. splice in custom steps ([`StepSplicer`])
//! 5. assemble the document ([`WorkflowAssembler`])
//!
//! [`WorkflowGenerator`] runs the whole sequence.

pub mod assembler;
pub mod error;
pub mod generator;
pub mod inputs;
pub mod normalize;
pub mod renderer;
pub mod resolver;
pub mod splicer;
pub mod workflow;

#[cfg(test)]
mod resolver_properties;

#[cfg(test)]
mod splicer_properties;

pub use assembler::WorkflowAssembler;
pub use error::{GeneratorError, GeneratorResult, SpliceError};
pub use generator::WorkflowGenerator;
pub use inputs::EffectiveInputs;
pub use renderer::StepRenderer;
pub use resolver::InputResolver;
pub use splicer::{matches_step, PositionDirective, StepSplicer};
pub use workflow::{GitHubWorkflow, Job, Trigger, WorkflowStep};
