//! Core pipeline model for hclci.
//!
//! This crate contains:
//! - The configuration document model (jobs, steps, workflows)
//! - YAML rendering of that model

pub mod pipeline;
pub mod render;
pub mod step;

pub use pipeline::{
    DEFAULT_VERSION, DEFAULT_WORKFLOW_VERSION, DockerConfig, Document, Job, Workflow, WorkflowJob,
};
pub use render::render;
pub use step::Step;
