//! File conversion command.

use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Extension given to converted files.
pub const OUTPUT_EXTENSION: &str = "yaml";

/// Path the YAML for `input` is written to.
pub fn output_path(input: &Path) -> PathBuf {
    input.with_extension(OUTPUT_EXTENSION)
}

/// Convert `input_path` and write the result next to it. Returns the output path.
///
/// The YAML goes to a temporary file in the target directory first, so a
/// failed conversion never leaves a partial output file.
pub fn run(input_path: &Path) -> Result<PathBuf> {
    let output_path = output_path(input_path);
    if output_path == input_path {
        bail!(
            "refusing to overwrite {}: input already has the .{} extension",
            input_path.display(),
            OUTPUT_EXTENSION
        );
    }

    let input = File::open(input_path)
        .with_context(|| format!("unable to open {}", input_path.display()))?;

    let dir = output_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut output = NamedTempFile::new_in(dir)
        .with_context(|| format!("unable to create a temporary file in {}", dir.display()))?;

    hclci_config::convert(
        BufReader::new(input),
        &input_path.to_string_lossy(),
        &mut output,
    )
    .with_context(|| format!("unable to convert {}", input_path.display()))?;

    // Temp files are created 0600; match a plain create (umask or existing mode).
    let permissions = File::create(&output_path)
        .and_then(|f| f.metadata())
        .with_context(|| format!("unable to create {}", output_path.display()))?
        .permissions();
    output
        .as_file()
        .set_permissions(permissions)
        .with_context(|| format!("unable to set permissions on {}", output_path.display()))?;

    output
        .persist(&output_path)
        .with_context(|| format!("unable to write {}", output_path.display()))?;

    Ok(output_path)
}
