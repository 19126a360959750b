//! Pipeline document assembly.

use hcl::{Block, Body};
use hclci_core::{DockerConfig, Document, Job};
use tracing::{debug, warn};

use crate::decode::{
    attribute, check_attributes, check_blocks, no_labels, optional_string, required_string,
    single_label,
};
use crate::requires::{PendingWorkflow, PendingWorkflowJob, resolve_requires};
use crate::steps::decode_steps;
use crate::{ConfigError, ConfigResult};

const DOCUMENT: &str = "document";

/// Parse a pipeline document from HCL text.
///
/// `filename` is only used in error messages.
pub fn parse_document(source: &str, filename: &str) -> ConfigResult<Document> {
    let body = hcl::parse(source).map_err(|error| ConfigError::Syntax {
        filename: filename.to_string(),
        error,
    })?;
    assemble(&body)
}

/// Decode a parsed HCL body into a [`Document`].
///
/// Workflow job references are resolved before job steps are decoded. Any
/// error aborts the whole document.
pub fn assemble(body: &Body) -> ConfigResult<Document> {
    check_attributes(body, &["version", "workflow_version"], DOCUMENT)?;
    check_blocks(body, &["job", "workflow"], DOCUMENT)?;

    let version = optional_string(body, "version", DOCUMENT)?.unwrap_or_default();
    let workflow_version = optional_string(body, "workflow_version", DOCUMENT)?.unwrap_or_default();

    let mut jobs: Vec<(Job, &Body)> = Vec::new();
    let mut workflows: Vec<PendingWorkflow<'_>> = Vec::new();

    for block in body.blocks() {
        match block.identifier() {
            "job" => {
                let (job, steps) = parse_job(block)?;
                if jobs.iter().any(|(j, _)| j.name == job.name) {
                    return Err(ConfigError::DuplicateBlock {
                        block: format!("job \"{}\"", job.name),
                        context: DOCUMENT.to_string(),
                    });
                }
                jobs.push((job, steps));
            }
            "workflow" => {
                let workflow = parse_workflow(block)?;
                if workflows.iter().any(|w| w.name == workflow.name) {
                    return Err(ConfigError::DuplicateBlock {
                        block: format!("workflow \"{}\"", workflow.name),
                        context: DOCUMENT.to_string(),
                    });
                }
                workflows.push(workflow);
            }
            _ => {} // Rejected by check_blocks
        }
    }

    let workflows = resolve_requires(workflows)?;
    for workflow_job in workflows.iter().flat_map(|w| &w.jobs) {
        if !jobs.iter().any(|(j, _)| j.name == workflow_job.name) {
            warn!(workflow_job = %workflow_job.name, "Workflow job does not name a declared job");
        }
    }

    let jobs = jobs
        .into_iter()
        .map(|(mut job, steps)| -> ConfigResult<Job> {
            decode_steps(&mut job, steps)?;
            Ok(job)
        })
        .collect::<ConfigResult<Vec<_>>>()?;

    let mut document = Document {
        version,
        workflow_version,
        jobs,
        workflows,
    };
    document.apply_defaults();

    debug!(
        version = %document.version,
        jobs = document.jobs.len(),
        workflows = document.workflows.len(),
        "Assembled document"
    );
    Ok(document)
}

/// Decode a `job` block. The returned body holds the job's undecoded steps.
fn parse_job(block: &Block) -> ConfigResult<(Job, &Body)> {
    let mut job = Job::new(single_label(block)?);
    let context = format!("job \"{}\"", job.name);
    let body = block.body();

    check_attributes(body, &[], &context)?;

    let mut dockers = body.blocks().filter(|b| b.identifier() == "docker");
    if let Some(docker) = dockers.next() {
        job.docker = Some(parse_docker(docker, &context)?);
    }
    if dockers.next().is_some() {
        return Err(ConfigError::DuplicateBlock {
            block: "docker".to_string(),
            context,
        });
    }

    Ok((job, body))
}

fn parse_docker(block: &Block, job_context: &str) -> ConfigResult<DockerConfig> {
    let context = format!("docker block of {}", job_context);
    no_labels(block)?;
    check_attributes(block.body(), &["image"], &context)?;
    check_blocks(block.body(), &[], &context)?;

    Ok(DockerConfig {
        image: required_string(block.body(), "image", &context)?,
    })
}

fn parse_workflow(block: &Block) -> ConfigResult<PendingWorkflow<'_>> {
    let name = single_label(block)?;
    let context = format!("workflow \"{}\"", name);
    let body = block.body();

    check_attributes(body, &[], &context)?;
    check_blocks(body, &["workflow_job"], &context)?;

    let jobs = body
        .blocks()
        .map(parse_workflow_job)
        .collect::<ConfigResult<Vec<_>>>()?;

    Ok(PendingWorkflow { name, jobs })
}

fn parse_workflow_job(block: &Block) -> ConfigResult<PendingWorkflowJob<'_>> {
    let name = single_label(block)?;
    let context = format!("workflow_job \"{}\"", name);

    check_attributes(block.body(), &["requires"], &context)?;
    check_blocks(block.body(), &[], &context)?;

    Ok(PendingWorkflowJob {
        requires: attribute(block.body(), "requires").map(|a| a.expr()),
        name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hclci_core::{DEFAULT_VERSION, Step, WorkflowJob};

    fn parse(src: &str) -> ConfigResult<Document> {
        parse_document(src, "test.hcl")
    }

    #[test]
    fn test_parse_simple_document() {
        let doc = parse(
            r#"
            version = "2.1"

            job "build" {
                docker {
                    image = "golang:1.11"
                }
                checkout {}
                run {
                    command = "go test"
                }
            }
            "#,
        )
        .unwrap();

        assert_eq!(doc.version, "2.1");
        assert_eq!(doc.jobs.len(), 1);
        let job = &doc.jobs[0];
        assert_eq!(job.name, "build");
        assert_eq!(job.docker.as_ref().unwrap().image, "golang:1.11");
        assert_eq!(job.steps.len(), 2);
        assert_eq!(job.steps[0], Step::Checkout);
    }

    #[test]
    fn test_default_versions() {
        let doc = parse("").unwrap();
        assert_eq!(doc.version, DEFAULT_VERSION);
        assert_eq!(doc.workflow_version, "2");
        assert!(doc.jobs.is_empty());
        assert!(doc.workflows.is_empty());

        let doc = parse(r#"version = """#).unwrap();
        assert_eq!(doc.version, DEFAULT_VERSION);
    }

    #[test]
    fn test_declaration_order_preserved() {
        let doc = parse(
            r#"
            job "c" {}
            workflow "w" {
                workflow_job "c" {}
            }
            job "a" {}
            job "b" {}
            "#,
        )
        .unwrap();
        let names: Vec<&str> = doc.jobs.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_workflow_requires() {
        let doc = parse(
            r#"
            job "build" {}
            job "test" {}

            workflow "build_and_test" {
                workflow_job "build" {
                    requires = []
                }
                workflow_job "test" {
                    requires = [workflow_job.build.name]
                }
            }
            "#,
        )
        .unwrap();

        assert_eq!(doc.workflows.len(), 1);
        assert_eq!(
            doc.workflows[0].jobs,
            vec![
                WorkflowJob {
                    name: "build".to_string(),
                    requires: Vec::new(),
                },
                WorkflowJob {
                    name: "test".to_string(),
                    requires: vec!["build".to_string()],
                },
            ]
        );
    }

    #[test]
    fn test_requires_across_workflows() {
        let doc = parse(
            r#"
            workflow "one" {
                workflow_job "build" {}
            }
            workflow "two" {
                workflow_job "deploy" {
                    requires = [workflow_job.build.name]
                }
            }
            "#,
        )
        .unwrap();
        assert_eq!(doc.workflows[1].jobs[0].requires, vec!["build"]);
    }

    #[test]
    fn test_duplicate_workflow_job_across_workflows() {
        let result = parse(
            r#"
            workflow "one" {
                workflow_job "deploy" {}
            }
            workflow "two" {
                workflow_job "deploy" {}
            }
            "#,
        );
        assert!(matches!(result, Err(ConfigError::DuplicateSymbol(ref name)) if name == "deploy"));
    }

    #[test]
    fn test_unresolved_requires() {
        let result = parse(
            r#"
            workflow "main" {
                workflow_job "test" {
                    requires = [workflow_job.build.name]
                }
            }
            "#,
        );
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::UnresolvedReference { .. }
        ));
    }

    #[test]
    fn test_syntax_error_names_file() {
        let err = parse("job \"build\" {").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { .. }));
        assert!(err.to_string().contains("test.hcl"));
    }

    #[test]
    fn test_duplicate_attribute_is_syntax_error() {
        let err = parse("version = \"2\"\nversion = \"2.1\"").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { .. }));

        let err = parse("job \"build\" {\n attach_workspace {\n at = \"/a\"\n at = \"/b\"\n }\n}")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { .. }));
    }

    #[test]
    fn test_null_requires_is_empty() {
        let doc = parse(
            r#"
            workflow "main" {
                workflow_job "build" {
                    requires = null
                }
            }
            "#,
        )
        .unwrap();
        assert!(doc.workflows[0].jobs[0].requires.is_empty());
    }

    #[test]
    fn test_unexpected_top_level_attribute() {
        let err = parse(r#"name = "x""#).unwrap_err();
        assert!(matches!(err, ConfigError::UnexpectedAttribute { ref attribute, .. } if attribute == "name"));
    }

    #[test]
    fn test_unexpected_top_level_block() {
        let err = parse(r#"pipeline "x" {}"#).unwrap_err();
        assert!(matches!(err, ConfigError::UnexpectedBlock { ref block, .. } if block == "pipeline"));
    }

    #[test]
    fn test_job_requires_label() {
        let err = parse("job {}").unwrap_err();
        assert!(matches!(err, ConfigError::LabelCount { expected: 1, found: 0, .. }));
    }

    #[test]
    fn test_duplicate_job() {
        let err = parse("job \"a\" {}\njob \"a\" {}").unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateBlock { .. }));
    }

    #[test]
    fn test_duplicate_docker() {
        let err = parse(
            r#"
            job "build" {
                docker {
                    image = "a"
                }
                docker {
                    image = "b"
                }
            }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateBlock { ref block, .. } if block == "docker"));
    }

    #[test]
    fn test_docker_missing_image() {
        let err = parse("job \"build\" {\n docker {}\n}").unwrap_err();
        assert!(matches!(err, ConfigError::MissingAttribute { ref attribute, .. } if attribute == "image"));
    }

    #[test]
    fn test_job_attribute_rejected() {
        let err = parse("job \"build\" {\n image = \"x\"\n}").unwrap_err();
        assert!(matches!(err, ConfigError::UnexpectedAttribute { .. }));
    }

    #[test]
    fn test_step_error_aborts_document() {
        let err = parse(
            r#"
            job "ok" {
                checkout {}
            }
            job "broken" {
                run {}
            }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Step { ref job, .. } if job == "broken"));
    }

    #[test]
    fn test_workflow_rejects_other_blocks() {
        let err = parse(
            r#"
            workflow "main" {
                job "build" {}
            }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnexpectedBlock { .. }));
    }
}
