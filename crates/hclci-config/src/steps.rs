//! Step block decoding.
//!
//! A job body mixes the `docker` block with any number of step blocks. Only
//! the block types in [`STEP_BLOCK_TYPES`] are decoded as steps, in source
//! order; everything else is left alone.

use hcl::{Block, Body};
use hclci_core::{Job, Step};
use tracing::debug;

use crate::decode::{check_attributes, no_labels, optional_string_list, required_string};
use crate::{ConfigError, ConfigResult};

/// Block types recognized as steps.
pub const STEP_BLOCK_TYPES: [&str; 4] = ["checkout", "run", "persist_to_workspace", "attach_workspace"];

/// Decode every step block in `body` and append the steps to `job`.
pub fn decode_steps(job: &mut Job, body: &Body) -> ConfigResult<()> {
    for block in step_blocks(body) {
        let step = decode_step(block).map_err(|e| ConfigError::Step {
            job: job.name.clone(),
            step: block.identifier().to_string(),
            error: Box::new(e),
        })?;
        debug!(job = %job.name, step = step.kind(), "Decoded step");
        job.steps.push(step);
    }
    Ok(())
}

/// Blocks of `body` that match the step schema, in source order.
fn step_blocks(body: &Body) -> impl Iterator<Item = &Block> {
    body.blocks().filter(|block| {
        let known = STEP_BLOCK_TYPES.contains(&block.identifier());
        if !known {
            debug!(block = block.identifier(), "Skipping non-step block");
        }
        known
    })
}

fn decode_step(block: &Block) -> ConfigResult<Step> {
    no_labels(block)?;

    match block.identifier() {
        "checkout" => Ok(Step::Checkout),
        "run" => decode_run(block.body()),
        "persist_to_workspace" => decode_persist(block.body()),
        "attach_workspace" => decode_attach(block.body()),
        other => unreachable!("step block type `{other}` is in the step schema but has no decoder"),
    }
}

fn decode_run(body: &Body) -> ConfigResult<Step> {
    const CONTEXT: &str = "run step";
    check_attributes(body, &["command"], CONTEXT)?;
    Ok(Step::Run {
        command: required_string(body, "command", CONTEXT)?,
    })
}

fn decode_persist(body: &Body) -> ConfigResult<Step> {
    const CONTEXT: &str = "persist_to_workspace step";
    check_attributes(body, &["root", "paths"], CONTEXT)?;
    Ok(Step::PersistToWorkspace {
        root: required_string(body, "root", CONTEXT)?,
        paths: optional_string_list(body, "paths", CONTEXT)?,
    })
}

fn decode_attach(body: &Body) -> ConfigResult<Step> {
    const CONTEXT: &str = "attach_workspace step";
    check_attributes(body, &["at"], CONTEXT)?;
    Ok(Step::AttachWorkspace {
        at: required_string(body, "at", CONTEXT)?,
    })
}
