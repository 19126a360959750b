//! HCL to YAML conversion.

use std::io::{Read, Write};

use crate::ConfigResult;
use crate::pipeline::parse_document;

/// Convert the HCL document read from `input` and write the YAML to `output`.
///
/// Nothing is written unless the whole document converts.
pub fn convert<R: Read, W: Write>(mut input: R, filename: &str, mut output: W) -> ConfigResult<()> {
    let mut source = String::new();
    input.read_to_string(&mut source)?;

    let yaml = convert_str(&source, filename)?;
    output.write_all(yaml.as_bytes())?;
    output.flush()?;
    Ok(())
}

/// Convert HCL source text to YAML text.
pub fn convert_str(source: &str, filename: &str) -> ConfigResult<String> {
    let document = parse_document(source, filename)?;
    Ok(hclci_core::render(&document))
}
