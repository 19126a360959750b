//! Configuration decoding errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("syntax error in {filename}: {error}")]
    Syntax { filename: String, error: hcl::Error },

    #[error("missing required attribute `{attribute}` in {context}")]
    MissingAttribute { attribute: String, context: String },

    #[error("unexpected attribute `{attribute}` in {context}")]
    UnexpectedAttribute { attribute: String, context: String },

    #[error("unexpected block `{block}` in {context}")]
    UnexpectedBlock { block: String, context: String },

    #[error("duplicate `{block}` block in {context}")]
    DuplicateBlock { block: String, context: String },

    #[error("`{block}` block expects {expected} label(s), found {found}")]
    LabelCount {
        block: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid value for `{attribute}` in {context}: {message}")]
    InvalidValue {
        attribute: String,
        context: String,
        message: String,
    },

    #[error("failed to decode {step} step in job \"{job}\": {error}")]
    Step {
        job: String,
        step: String,
        error: Box<ConfigError>,
    },

    #[error("duplicate symbol: workflow_job \"{0}\" is declared more than once")]
    DuplicateSymbol(String),

    #[error("unresolved reference in requires of workflow_job \"{workflow_job}\": {error}")]
    UnresolvedReference {
        workflow_job: String,
        error: hcl::eval::Error,
    },

    #[error("requires of workflow_job \"{workflow_job}\" must be a list of strings, found {found}")]
    TypeMismatch { workflow_job: String, found: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
