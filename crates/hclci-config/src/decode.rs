//! Helpers for structurally decoding HCL bodies.
//!
//! Attribute values are evaluated against an empty context, so literal
//! strings and variable-free templates decode, while references to
//! variables are reported as invalid values.

use hcl::eval::{Context, Evaluate};
use hcl::{Attribute, Block, Body, Value};

use crate::{ConfigError, ConfigResult};

/// Reject attributes whose key is not in `allowed`.
///
/// Repeated keys never get here: `hcl::parse` already fails on them.
pub(crate) fn check_attributes(body: &Body, allowed: &[&str], context: &str) -> ConfigResult<()> {
    match body.attributes().find(|a| !allowed.contains(&a.key())) {
        Some(attr) => Err(ConfigError::UnexpectedAttribute {
            attribute: attr.key().to_string(),
            context: context.to_string(),
        }),
        None => Ok(()),
    }
}

/// Reject blocks whose type is not in `allowed`.
pub(crate) fn check_blocks(body: &Body, allowed: &[&str], context: &str) -> ConfigResult<()> {
    match body.blocks().find(|b| !allowed.contains(&b.identifier())) {
        Some(block) => Err(ConfigError::UnexpectedBlock {
            block: block.identifier().to_string(),
            context: context.to_string(),
        }),
        None => Ok(()),
    }
}

pub(crate) fn attribute<'a>(body: &'a Body, key: &str) -> Option<&'a Attribute> {
    body.attributes().find(|a| a.key() == key)
}

/// Return the only label of a block that must carry exactly one.
pub(crate) fn single_label(block: &Block) -> ConfigResult<String> {
    match block.labels() {
        [label] => Ok(label.as_str().to_string()),
        labels => Err(ConfigError::LabelCount {
            block: block.identifier().to_string(),
            expected: 1,
            found: labels.len(),
        }),
    }
}

pub(crate) fn no_labels(block: &Block) -> ConfigResult<()> {
    if block.labels().is_empty() {
        Ok(())
    } else {
        Err(ConfigError::LabelCount {
            block: block.identifier().to_string(),
            expected: 0,
            found: block.labels().len(),
        })
    }
}

pub(crate) fn required_string(body: &Body, key: &str, context: &str) -> ConfigResult<String> {
    optional_string(body, key, context)?.ok_or_else(|| ConfigError::MissingAttribute {
        attribute: key.to_string(),
        context: context.to_string(),
    })
}

/// Decode an optional string attribute. An explicit `null` counts as absent.
pub(crate) fn optional_string(body: &Body, key: &str, context: &str) -> ConfigResult<Option<String>> {
    let Some(attr) = attribute(body, key) else {
        return Ok(None);
    };
    match evaluate(attr, context)? {
        Value::Null => Ok(None),
        value => value_to_string(value).map(Some).map_err(|value| {
            invalid_value(key, context, format!("expected string, found {}", value_kind(&value)))
        }),
    }
}

/// Decode an optional list of strings. Absent or `null` yields an empty list.
pub(crate) fn optional_string_list(
    body: &Body,
    key: &str,
    context: &str,
) -> ConfigResult<Vec<String>> {
    let Some(attr) = attribute(body, key) else {
        return Ok(Vec::new());
    };
    match evaluate(attr, context)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => string_list(items).map_err(|value| {
            invalid_value(
                key,
                context,
                format!("expected list of strings, found {} element", value_kind(&value)),
            )
        }),
        value => Err(invalid_value(
            key,
            context,
            format!("expected list of strings, found {}", value_kind(&value)),
        )),
    }
}

/// Convert every element of a list to a string, returning the first element that can't be.
pub(crate) fn string_list(items: Vec<Value>) -> Result<Vec<String>, Value> {
    items.into_iter().map(value_to_string).collect()
}

/// Convert a primitive value to its string form.
pub(crate) fn value_to_string(value: Value) -> Result<String, Value> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(other),
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

fn evaluate(attr: &Attribute, context: &str) -> ConfigResult<Value> {
    attr.expr()
        .evaluate(&Context::new())
        .map_err(|e| invalid_value(attr.key(), context, e.to_string()))
}

fn invalid_value(key: &str, context: &str, message: String) -> ConfigError {
    ConfigError::InvalidValue {
        attribute: key.to_string(),
        context: context.to_string(),
        message,
    }
}
