//! Command handlers

pub mod pack;
pub mod stat;
pub mod unpack;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;

use crate::OutputFormat;
use crate::output::{OutputStyle, format_error, format_success};

/// Build `(source, destination-without-extension)` pairs per the core's
/// naming convention: the codec appends the archive extension on pack and
/// the recovered original extension on unpack.
fn dest_pairs(files: &[PathBuf], out_dir: Option<&Path>) -> Result<Vec<(PathBuf, PathBuf)>> {
    files
        .iter()
        .map(|source| {
            let stem = source
                .file_stem()
                .with_context(|| format!("{} has no file name", source.display()))?;
            let dir = match out_dir {
                Some(dir) => dir.to_path_buf(),
                None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
            };
            Ok((source.clone(), dir.join(stem)))
        })
        .collect()
}

#[derive(Serialize)]
struct BatchSummary<'a> {
    requested: usize,
    succeeded: usize,
    failed: &'a [PathBuf],
}

/// Render a batch outcome and turn failures into a non-zero exit
fn report_batch(
    action: &str,
    requested: usize,
    failed: &[PathBuf],
    format: OutputFormat,
) -> Result<()> {
    let succeeded = requested - failed.len();
    match format {
        OutputFormat::Json => {
            let summary = BatchSummary {
                requested,
                succeeded,
                failed,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text => {
            let style = OutputStyle::new();
            println!(
                "{}",
                format_success(&format!("{action} {succeeded} of {requested} file(s)"), &style)
            );
            for path in failed {
                println!(
                    "{}",
                    format_error(&format!("  failed: {}", path.display()), &style)
                );
            }
        }
    }

    if !failed.is_empty() {
        bail!("{} of {} file(s) failed", failed.len(), requested);
    }
    Ok(())
}
