//! Pipeline configuration model.

use serde::{Deserialize, Serialize};

use crate::step::Step;

/// Version written when the document does not declare one.
pub const DEFAULT_VERSION: &str = "2";
/// Workflow version used when the document does not declare one.
pub const DEFAULT_WORKFLOW_VERSION: &str = "2";

/// A complete CI configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Configuration format version.
    pub version: String,
    /// Workflow format version.
    pub workflow_version: String,
    /// Jobs in declaration order.
    pub jobs: Vec<Job>,
    /// Workflows in declaration order.
    pub workflows: Vec<Workflow>,
}

impl Document {
    /// Fill in empty version fields with their defaults.
    pub fn apply_defaults(&mut self) {
        if self.version.is_empty() {
            self.version = DEFAULT_VERSION.to_string();
        }
        if self.workflow_version.is_empty() {
            self.workflow_version = DEFAULT_WORKFLOW_VERSION.to_string();
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            workflow_version: DEFAULT_WORKFLOW_VERSION.to_string(),
            jobs: Vec::new(),
            workflows: Vec::new(),
        }
    }
}

/// A job: an optional container image and an ordered list of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Job name (block label).
    pub name: String,
    /// Docker image the job runs in.
    pub docker: Option<DockerConfig>,
    /// Steps in declaration order.
    pub steps: Vec<Step>,
}

impl Job {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            docker: None,
            steps: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerConfig {
    /// Image reference (e.g., "golang:1.11").
    pub image: String,
}

/// A named workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,
    /// Jobs run by this workflow, in declaration order.
    pub jobs: Vec<WorkflowJob>,
}

/// A job entry inside a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowJob {
    pub name: String,
    /// Names of the workflow jobs that must finish first.
    pub requires: Vec<String>,
}
