//! Resolution of workflow job `requires` expressions.
//!
//! Every `workflow_job` block in the document is registered in a single
//! namespace, exposed to expressions as
//!
//! ```hcl
//! workflow_job.<name>.name
//! ```
//!
//! so a job can depend on another with `requires = [workflow_job.build.name]`
//! instead of a bare string. Names must be unique across all workflows.

use hcl::eval::{Context, Evaluate};
use hcl::{Expression, Map, Value};
use hclci_core::{Workflow, WorkflowJob};
use tracing::debug;

use crate::decode::{string_list, value_kind};
use crate::{ConfigError, ConfigResult};

/// Variable under which workflow jobs are addressable.
pub const WORKFLOW_JOB_NAMESPACE: &str = "workflow_job";

/// A workflow whose jobs still carry their raw `requires` expressions.
pub(crate) struct PendingWorkflow<'a> {
    pub name: String,
    pub jobs: Vec<PendingWorkflowJob<'a>>,
}

pub(crate) struct PendingWorkflowJob<'a> {
    pub name: String,
    pub requires: Option<&'a Expression>,
}

/// Evaluation context exposing every workflow job name.
pub struct SymbolTable {
    context: Context<'static>,
}

impl SymbolTable {
    /// Register every name, failing on the first one seen twice.
    pub fn build<'a>(names: impl IntoIterator<Item = &'a str>) -> ConfigResult<Self> {
        let mut members = Map::new();
        for name in names {
            if members.contains_key(name) {
                return Err(ConfigError::DuplicateSymbol(name.to_string()));
            }
            let mut symbol = Map::new();
            symbol.insert("name".to_string(), Value::String(name.to_string()));
            members.insert(name.to_string(), Value::Object(symbol));
        }

        debug!(symbols = members.len(), "Built workflow job symbol table");

        let mut context = Context::new();
        context.declare_var(WORKFLOW_JOB_NAMESPACE, Value::Object(members));

        Ok(Self { context })
    }

    /// Evaluate the `requires` expression of `workflow_job` to a list of job names.
    ///
    /// `null` counts as no requirements.
    pub fn resolve(&self, workflow_job: &str, expr: &Expression) -> ConfigResult<Vec<String>> {
        let value = expr
            .evaluate(&self.context)
            .map_err(|error| ConfigError::UnresolvedReference {
                workflow_job: workflow_job.to_string(),
                error,
            })?;

        match value {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => string_list(items).map_err(|item| ConfigError::TypeMismatch {
                workflow_job: workflow_job.to_string(),
                found: format!("list containing {}", value_kind(&item)),
            }),
            other => Err(ConfigError::TypeMismatch {
                workflow_job: workflow_job.to_string(),
                found: value_kind(&other).to_string(),
            }),
        }
    }
}

/// Resolve the `requires` of every workflow job in the document.
pub(crate) fn resolve_requires(workflows: Vec<PendingWorkflow<'_>>) -> ConfigResult<Vec<Workflow>> {
    let table = SymbolTable::build(
        workflows
            .iter()
            .flat_map(|w| w.jobs.iter().map(|j| j.name.as_str())),
    )?;

    workflows
        .into_iter()
        .map(|workflow| -> ConfigResult<Workflow> {
            let jobs = workflow
                .jobs
                .into_iter()
                .map(|job| -> ConfigResult<WorkflowJob> {
                    let requires = match job.requires {
                        Some(expr) => table.resolve(&job.name, expr)?,
                        None => Vec::new(),
                    };
                    Ok(WorkflowJob {
                        name: job.name,
                        requires,
                    })
                })
                .collect::<ConfigResult<Vec<_>>>()?;
            Ok(Workflow {
                name: workflow.name,
                jobs,
            })
        })
        .collect()
}
