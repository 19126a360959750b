//! HCL configuration decoding for hclci.
//!
//! This crate handles:
//! - Decoding pipeline documents (jobs, docker images, steps, workflows)
//! - Resolving `workflow_job` references in `requires`
//! - Converting documents to YAML

mod decode;

pub mod convert;
pub mod error;
pub mod pipeline;
pub mod requires;
pub mod steps;

pub use convert::{convert, convert_str};
pub use error::{ConfigError, ConfigResult};
pub use pipeline::{assemble, parse_document};
pub use requires::SymbolTable;
