//! Custom step splicing
//!
//! Custom steps are placed with `before:<token>`, `after:<token>` or
//! `replace:<token>`, where the token is matched against rendered step names.
//! An empty position appends.

use std::fmt;

use gpgen_manifest::{CustomStep, Manifest, DEFAULT_ENVIRONMENT};
use tracing::debug;

use crate::error::{GeneratorError, GeneratorResult, SpliceError};
use crate::workflow::WorkflowStep;

/// Step names with a fixed set of accepted tokens
const STEP_ALIASES: &[(&str, &[&str])] = &[
    ("run tests", &["test", "tests"]),
    ("build application", &["build"]),
    ("setup node.js", &["setup-node", "node"]),
    ("install dependencies", &["install", "dependencies"]),
    ("checkout code", &["checkout"]),
];

/// Shortest token allowed to match part of a word
const MIN_SUBSTRING_TOKEN: usize = 4;

/// Parsed position directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionDirective {
    /// Add at the end
    Append,
    /// Insert before the first matching step
    Before(String),
    /// Insert after the first matching step
    After(String),
    /// Overwrite the first matching step
    Replace(String),
}

impl PositionDirective {
    /// Parse a position string
    pub fn parse(position: &str) -> Result<Self, SpliceError> {
        if position.is_empty() {
            return Ok(PositionDirective::Append);
        }

        let (directive, target) = position
            .split_once(':')
            .ok_or_else(|| SpliceError::InvalidFormat(position.to_string()))?;

        match directive {
            "before" => Ok(PositionDirective::Before(target.to_string())),
            "after" => Ok(PositionDirective::After(target.to_string())),
            "replace" => Ok(PositionDirective::Replace(target.to_string())),
            _ => Err(SpliceError::UnknownDirective {
                directive: directive.to_string(),
                position: position.to_string(),
            }),
        }
    }

    /// Target token, if the directive has one
    pub fn target(&self) -> Option<&str> {
        match self {
            PositionDirective::Append => None,
            PositionDirective::Before(target)
            | PositionDirective::After(target)
            | PositionDirective::Replace(target) => Some(target),
        }
    }
}

impl fmt::Display for PositionDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionDirective::Append => write!(f, "append"),
            PositionDirective::Before(target) => write!(f, "before:{}", target),
            PositionDirective::After(target) => write!(f, "after:{}", target),
            PositionDirective::Replace(target) => write!(f, "replace:{}", target),
        }
    }
}

/// Whether a step is addressed by a position token
///
/// Names in the alias table accept only their aliases. Other names are split
/// into words with one trailing `s` removed; a word matches when it equals
/// the token or, for tokens of at least four characters, contains it.
pub fn matches_step(step_name: &str, target: &str) -> bool {
    let name = step_name.to_lowercase();
    let target = target.to_lowercase();

    if let Some((_, aliases)) = STEP_ALIASES.iter().find(|(alias_name, _)| *alias_name == name) {
        return aliases.contains(&target.as_str());
    }

    name.split_whitespace()
        .map(|word| word.strip_suffix('s').unwrap_or(word))
        .any(|word| {
            word == target || (target.len() >= MIN_SUBSTRING_TOKEN && word.contains(&target))
        })
}

/// Converts a manifest custom step into a workflow step
///
/// Custom step fields are copied as written; they are not evaluated.
pub fn custom_to_workflow_step(custom: &CustomStep) -> WorkflowStep {
    WorkflowStep {
        name: custom.name.clone(),
        uses: custom.uses.clone().unwrap_or_default(),
        run: custom.run.clone().unwrap_or_default(),
        with: custom.with.clone(),
        env: custom.env.clone(),
        if_condition: custom.if_condition.clone().unwrap_or_default(),
        timeout_minutes: custom
            .timeout_minutes
            .and_then(|minutes| u32::try_from(minutes).ok()),
        continue_on_error: custom.continue_on_error,
    }
}

/// Splices custom steps into a rendered step list
pub struct StepSplicer;

impl StepSplicer {
    /// Place one custom step
    pub fn apply(
        mut steps: Vec<WorkflowStep>,
        custom: &CustomStep,
    ) -> Result<Vec<WorkflowStep>, SpliceError> {
        let directive = PositionDirective::parse(&custom.position)?;
        let new_step = custom_to_workflow_step(custom);

        let index = match directive.target() {
            None => {
                steps.push(new_step);
                debug!(step = %custom.name, "Appended custom step");
                return Ok(steps);
            }
            Some(target) => steps
                .iter()
                .position(|step| matches_step(&step.name, target))
                .ok_or_else(|| SpliceError::TargetNotFound(target.to_string()))?,
        };

        match directive {
            PositionDirective::Before(_) => steps.insert(index, new_step),
            PositionDirective::After(_) => steps.insert(index + 1, new_step),
            PositionDirective::Replace(_) => steps[index] = new_step,
            PositionDirective::Append => {}
        }
        debug!(step = %custom.name, position = %directive, index, "Spliced custom step");
        Ok(steps)
    }

    /// Place custom steps in order, each seeing the previous result
    pub fn apply_all<'a, I>(steps: Vec<WorkflowStep>, custom_steps: I) -> GeneratorResult<Vec<WorkflowStep>>
    where
        I: IntoIterator<Item = &'a CustomStep>,
    {
        custom_steps.into_iter().try_fold(steps, |steps, custom| {
            Self::apply(steps, custom).map_err(|source| GeneratorError::CustomStep {
                name: custom.name.clone(),
                source,
            })
        })
    }

    /// Place the manifest's base custom steps, then the environment's own
    ///
    /// The `default` environment only receives the base steps.
    pub fn apply_manifest(
        steps: Vec<WorkflowStep>,
        manifest: &Manifest,
        environment: &str,
    ) -> GeneratorResult<Vec<WorkflowStep>> {
        let environment_steps = if environment == DEFAULT_ENVIRONMENT {
            None
        } else {
            manifest.environment(environment)
        };

        Self::apply_all(
            steps,
            manifest.spec.custom_steps.iter().chain(
                environment_steps
                    .map(|config| config.custom_steps.as_slice())
                    .unwrap_or_default(),
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_steps() -> Vec<WorkflowStep> {
        [
            "Checkout code",
            "Setup Node.js",
            "Install dependencies",
            "Run tests",
            "Build application",
        ]
        .into_iter()
        .map(WorkflowStep::named)
        .collect()
    }

    fn names(steps: &[WorkflowStep]) -> Vec<&str> {
        steps.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_parse_directives() {
        assert_eq!(PositionDirective::parse("").unwrap(), PositionDirective::Append);
        assert_eq!(
            PositionDirective::parse("before:test").unwrap(),
            PositionDirective::Before("test".to_string())
        );
        assert_eq!(
            PositionDirective::parse("replace:setup-node").unwrap(),
            PositionDirective::Replace("setup-node".to_string())
        );
        assert_eq!(
            PositionDirective::parse("after:a:b").unwrap(),
            PositionDirective::After("a:b".to_string())
        );
    }

    #[test]
    fn test_invalid_directives() {
        let err = PositionDirective::parse("invalid-position").unwrap_err();
        assert!(err.to_string().contains("invalid position format"));
        assert!(err.to_string().contains("invalid-position"));

        let err = PositionDirective::parse("around:test").unwrap_err();
        assert!(err.to_string().contains("invalid position format"));
        assert!(err.to_string().contains("around"));
    }

    #[test]
    fn test_alias_table() {
        assert!(matches_step("Run tests", "test"));
        assert!(matches_step("Run tests", "tests"));
        assert!(!matches_step("Run tests", "build"));
        assert!(!matches_step("Run tests", "run"));
        assert!(matches_step("Build application", "build"));
        assert!(!matches_step("Build application", "application"));
        assert!(matches_step("Setup Node.js", "setup-node"));
        assert!(matches_step("Setup Node.js", "node"));
        assert!(matches_step("Install dependencies", "dependencies"));
        assert!(matches_step("Checkout code", "checkout"));
        assert!(!matches_step("Checkout code", "code"));
    }

    #[test]
    fn test_word_fallback() {
        assert!(matches_step("Build service", "build"));
        assert!(matches_step("Run linting", "lint"));
        assert!(matches_step("Setup Go", "go"));
        assert!(matches_step("Security Scans", "scan"));
        assert!(matches_step("Upload Trivy scan results", "result"));
        assert!(!matches_step("Setup Python", "pyt"));
        assert!(matches_step("Setup Python", "pyth"));
        assert!(!matches_step("Build service", "deploy"));
    }

    #[test]
    fn test_insert_after() {
        let custom = CustomStep::uses("Security Scan", "securecodewarrior/github-action-add-sarif@v1")
            .at("after:test");
        let steps = StepSplicer::apply(node_steps(), &custom).unwrap();

        assert_eq!(steps.len(), 6);
        assert_eq!(steps[4].name, "Security Scan");
        assert_eq!(
            names(&steps),
            vec![
                "Checkout code",
                "Setup Node.js",
                "Install dependencies",
                "Run tests",
                "Security Scan",
                "Build application",
            ]
        );
    }

    #[test]
    fn test_insert_before() {
        let custom = CustomStep::run("Lint", "npm run lint").at("before:test");
        let steps = StepSplicer::apply(node_steps(), &custom).unwrap();
        assert_eq!(steps[3].name, "Lint");
        assert_eq!(steps[4].name, "Run tests");
    }

    #[test]
    fn test_replace() {
        let custom = CustomStep::run("Custom Build", "make build").at("replace:build");
        let steps = StepSplicer::apply(node_steps(), &custom).unwrap();

        assert_eq!(steps.len(), 5);
        assert_eq!(steps[4].name, "Custom Build");
        assert_eq!(steps[4].run, "make build");
        assert!(!names(&steps).contains(&"Build application"));
    }

    #[test]
    fn test_target_not_found() {
        let custom = CustomStep::run("Deploy", "./deploy.sh").at("after:nonexistent");
        let err = StepSplicer::apply(node_steps(), &custom).unwrap_err();
        assert_eq!(err, SpliceError::TargetNotFound("nonexistent".to_string()));
        assert!(err.to_string().contains("target step not found"));
    }

    #[test]
    fn test_later_steps_see_earlier_ones() {
        let custom_steps = vec![
            CustomStep::run("Integration Suite", "npm run e2e").at("after:test"),
            CustomStep::run("Publish Coverage", "npx codecov").at("after:suite"),
        ];
        let steps = StepSplicer::apply_all(node_steps(), &custom_steps).unwrap();
        assert_eq!(steps[4].name, "Integration Suite");
        assert_eq!(steps[5].name, "Publish Coverage");
    }

    #[test]
    fn test_apply_all_names_failing_step() {
        let custom_steps = vec![CustomStep::run("Deploy", "./deploy.sh").at("after:deploy")];
        let err = StepSplicer::apply_all(node_steps(), &custom_steps).unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to apply custom step Deploy: target step not found: deploy"
        );
    }

    #[test]
    fn test_custom_fields_are_copied() {
        let mut custom = CustomStep::uses("Cache", "actions/cache@v4");
        custom.with.insert("path".to_string(), "~/.npm".to_string());
        custom.if_condition = Some("github.event_name == 'push'".to_string());
        custom.timeout_minutes = Some(5);
        custom.continue_on_error = Some(true);

        let step = custom_to_workflow_step(&custom);
        assert_eq!(step.uses, "actions/cache@v4");
        assert!(step.run.is_empty());
        assert_eq!(step.with["path"], "~/.npm");
        assert_eq!(step.if_condition, "github.event_name == 'push'");
        assert_eq!(step.timeout_minutes, Some(5));
        assert_eq!(step.continue_on_error, Some(true));
    }
}
