//! GitHub Actions workflow document

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A complete workflow file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubWorkflow {
    /// Workflow display name
    pub name: String,
    /// Trigger map keyed by event name
    pub on: BTreeMap<String, Trigger>,
    /// Jobs keyed by job id
    pub jobs: BTreeMap<String, Job>,
}

impl GitHubWorkflow {
    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// Filters for one trigger event
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Trigger {
    /// Branch filter
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<String>,
    /// Tag filter
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Activity types
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

impl Trigger {
    /// Trigger on pushes or pull requests to branches
    pub fn branches(branches: &[&str]) -> Self {
        Self {
            branches: to_strings(branches),
            ..Default::default()
        }
    }

    /// Trigger on tags
    pub fn tags(tags: &[&str]) -> Self {
        Self {
            tags: to_strings(tags),
            ..Default::default()
        }
    }

    /// Trigger on activity types
    pub fn types(types: &[&str]) -> Self {
        Self {
            types: to_strings(types),
            ..Default::default()
        }
    }
}

/// A single job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Runner label
    #[serde(rename = "runs-on")]
    pub runs_on: String,
    /// Token permissions
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub permissions: BTreeMap<String, String>,
    /// Ordered steps
    pub steps: Vec<WorkflowStep>,
}

/// A rendered workflow step
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// Display name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Action reference
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uses: String,
    /// Shell command
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub run: String,
    /// Action parameters
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub with: BTreeMap<String, String>,
    /// Environment variables
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
    /// Step condition
    #[serde(rename = "if", default, skip_serializing_if = "String::is_empty")]
    pub if_condition: String,
    /// Timeout in minutes
    #[serde(
        rename = "timeout-minutes",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout_minutes: Option<u32>,
    /// Keep the job running when the step fails
    #[serde(
        rename = "continue-on-error",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub continue_on_error: Option<bool>,
}

impl WorkflowStep {
    /// Step with only a display name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
