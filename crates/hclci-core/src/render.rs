//! YAML rendering of a pipeline document.
//!
//! The output layout is fixed: a `---` marker, the version, then the `jobs`
//! and `workflows` sections when they have content. Lines are joined with
//! `\n` and the text has no trailing newline.

use crate::pipeline::{Document, Job, Workflow};

/// Indentation of step list items under `steps:`.
const STEP_INDENT: usize = 6;

/// Render a document as YAML.
pub fn render(doc: &Document) -> String {
    let mut lines = vec!["---".to_string(), format!("version: {}", doc.version)];

    if !doc.jobs.is_empty() {
        lines.push("jobs:".to_string());
        for job in &doc.jobs {
            render_job(job, &mut lines);
        }
    }

    if !doc.workflows.is_empty() {
        lines.push("workflows:".to_string());
        lines.push(format!("  version: {}", doc.version));
        for workflow in &doc.workflows {
            render_workflow(workflow, &mut lines);
        }
    }

    lines.join("\n")
}

fn render_job(job: &Job, lines: &mut Vec<String>) {
    lines.push(format!("  {}:", job.name));

    if let Some(docker) = &job.docker {
        lines.push("    docker:".to_string());
        lines.push(format!("      - image: {}", docker.image));
    }

    if !job.steps.is_empty() {
        lines.push("    steps:".to_string());
        for step in &job.steps {
            let text = step.render(STEP_INDENT);
            if !text.is_empty() {
                lines.push(text);
            }
        }
    }
}

fn render_workflow(workflow: &Workflow, lines: &mut Vec<String>) {
    lines.push(format!("  {}:", workflow.name));
    lines.push("    jobs:".to_string());

    for job in &workflow.jobs {
        if job.requires.is_empty() {
            lines.push(format!("      - {}", job.name));
            continue;
        }
        lines.push(format!("      - {}:", job.name));
        lines.push("          requires:".to_string());
        for required in &job.requires {
            lines.push(format!("            - {}", required));
        }
    }
}
