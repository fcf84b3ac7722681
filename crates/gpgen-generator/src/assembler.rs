//! Workflow assembly: name, triggers, permissions and the job

use std::collections::BTreeMap;

use gpgen_config::GeneratorSettings;
use gpgen_manifest::{Manifest, DEFAULT_ENVIRONMENT};
use gpgen_templates::actions::{EVENT_PULL_REQUEST, EVENT_PUSH, EVENT_RELEASE};
use tracing::debug;

use crate::inputs::EffectiveInputs;
use crate::workflow::{GitHubWorkflow, Job, Trigger, WorkflowStep};

/// Boolean input that enables the SARIF upload permission
pub const TRIVY_SCAN_ENABLED: &str = "trivyScanEnabled";
/// Boolean input that enables the package publish permission
pub const CONTAINER_ENABLED: &str = "containerEnabled";

const READ: &str = "read";
const WRITE: &str = "write";

/// Builds the final workflow document
pub struct WorkflowAssembler<'a> {
    settings: &'a GeneratorSettings,
}

impl<'a> WorkflowAssembler<'a> {
    /// Create an assembler using job settings
    pub fn new(settings: &'a GeneratorSettings) -> Self {
        Self { settings }
    }

    /// Assemble the workflow for one environment
    pub fn assemble(
        &self,
        manifest: &Manifest,
        environment: &str,
        inputs: &EffectiveInputs,
        steps: Vec<WorkflowStep>,
    ) -> GitHubWorkflow {
        let job = Job {
            runs_on: self.settings.runs_on.clone(),
            permissions: permissions(inputs),
            steps,
        };
        debug!(
            job = %self.settings.job_name,
            steps = job.steps.len(),
            permissions = ?job.permissions,
            "Assembled job"
        );

        let mut jobs = BTreeMap::new();
        jobs.insert(self.settings.job_name.clone(), job);

        GitHubWorkflow {
            name: workflow_name(manifest, environment),
            on: triggers(environment),
            jobs,
        }
    }
}

/// Pipeline name, suffixed with ` (<env>)` outside the default environment
pub fn workflow_name(manifest: &Manifest, environment: &str) -> String {
    let name = manifest.pipeline_name();
    if environment == DEFAULT_ENVIRONMENT {
        name.to_string()
    } else {
        format!("{} ({})", name, environment)
    }
}

/// Trigger events for an environment
pub fn triggers(environment: &str) -> BTreeMap<String, Trigger> {
    let mut on = BTreeMap::new();
    match environment {
        "default" | "staging" => {
            on.insert(EVENT_PUSH.to_string(), Trigger::branches(&["main", "develop"]));
            on.insert(EVENT_PULL_REQUEST.to_string(), Trigger::branches(&["main"]));
        }
        "production" => {
            on.insert(EVENT_PUSH.to_string(), Trigger::tags(&["v*"]));
            on.insert(EVENT_RELEASE.to_string(), Trigger::types(&["published"]));
        }
        _ => {
            on.insert(EVENT_PUSH.to_string(), Trigger::branches(&["main"]));
        }
    }
    on
}

/// Token permissions required by the enabled features
///
/// Only boolean `true` enables a feature; the string `"true"` does not.
pub fn permissions(inputs: &EffectiveInputs) -> BTreeMap<String, String> {
    let mut permissions = BTreeMap::new();

    if inputs.get_bool(TRIVY_SCAN_ENABLED) == Some(true) {
        permissions.insert("security-events".to_string(), WRITE.to_string());
        permissions.insert("contents".to_string(), READ.to_string());
    }

    if inputs.get_bool(CONTAINER_ENABLED) == Some(true) {
        permissions.insert("packages".to_string(), WRITE.to_string());
        permissions.insert("contents".to_string(), READ.to_string());
    }

    permissions
}
