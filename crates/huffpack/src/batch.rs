//! Batch orchestration
//!
//! Strictly sequential: one file at a time, in the order given. A failing
//! file never aborts the batch; only cancellation does, and a cancelled
//! operation is not itself a failure.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::archive::{decode, encode};
use crate::error::{Error, Result};
use crate::freq::FrequencyTable;
use crate::paths::extension_of;
use crate::progress::{CancelToken, ProgressSink};
use crate::stats::{compression_percent, estimate_archive_size};
use crate::tree::Tree;

/// Which single-file operation a batch applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Compress,
    Decompress,
}

/// Estimate row for one file of a preview pass
#[derive(Debug, Clone, PartialEq)]
pub struct FileEstimate {
    pub path: PathBuf,
    pub original_size: u64,
    pub estimated_size: u64,
    pub compression: f64,
}

/// Aggregate of a preview pass, computed from summed sizes (never from
/// averaging per-file percentages)
#[derive(Debug, Clone, PartialEq)]
pub struct BatchTotals {
    pub original_size: u64,
    pub estimated_size: u64,
    pub compression: f64,
}

/// Outcome of a preview pass
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewReport {
    pub files: Vec<FileEstimate>,
    pub totals: BatchTotals,
    /// Sources that could not be scanned
    pub failures: Vec<PathBuf>,
}

/// Run one single-file operation per `(source, dest_base)` pair, in order.
///
/// Resets `token` at entry. Each operation runs inside a failure boundary:
/// I/O and integrity errors are recorded by source path and the batch moves
/// on. Once the token is set the batch stops after the current operation
/// and returns whatever failures accumulated; callers must treat that
/// result as possibly incomplete. `on_file_done` fires after every pair
/// that ran to completion, success or failure, but not after a cancelled
/// one.
pub fn run_many(
    direction: Direction,
    pairs: &[(PathBuf, PathBuf)],
    token: &CancelToken,
    sink: &mut dyn ProgressSink,
) -> Vec<PathBuf> {
    token.reset();
    debug!(files = pairs.len(), ?direction, "batch start");

    let mut failures = Vec::new();
    for (source, dest_base) in pairs {
        if token.is_cancelled() {
            break;
        }
        let result = match direction {
            Direction::Compress => encode(source, dest_base, token, sink).map(|_| ()),
            Direction::Decompress => decode(source, dest_base, token, sink).map(|_| ()),
        };
        match result {
            Ok(()) => {}
            Err(Error::Cancelled) => {}
            Err(err) => {
                warn!(source = %source.display(), %err, "file failed, batch continues");
                failures.push(source.clone());
            }
        }
        if token.is_cancelled() {
            break;
        }
        sink.on_file_done();
    }

    debug!(failed = failures.len(), "batch done");
    failures
}

/// Scan every source and report per-file and total size estimates without
/// writing any output.
///
/// Shares the batch contract of [`run_many`]: token reset at entry, per-file
/// failure isolation, stop after the current file on cancellation,
/// `on_file_done` per completed file. Percent events come from the
/// frequency scans.
pub fn preview(
    sources: &[PathBuf],
    token: &CancelToken,
    sink: &mut dyn ProgressSink,
) -> PreviewReport {
    token.reset();

    let mut files = Vec::new();
    let mut failures = Vec::new();
    for source in sources {
        if token.is_cancelled() {
            break;
        }
        match estimate_file(source, token, sink) {
            Ok(row) => files.push(row),
            Err(Error::Cancelled) => {}
            Err(err) => {
                warn!(source = %source.display(), %err, "file failed, preview continues");
                failures.push(source.clone());
            }
        }
        if token.is_cancelled() {
            break;
        }
        sink.on_file_done();
    }

    let original_size: u64 = files.iter().map(|f| f.original_size).sum();
    let estimated_size: u64 = files.iter().map(|f| f.estimated_size).sum();
    PreviewReport {
        files,
        totals: BatchTotals {
            original_size,
            estimated_size,
            compression: compression_percent(original_size, estimated_size),
        },
        failures,
    }
}

fn estimate_file(
    source: &Path,
    token: &CancelToken,
    sink: &mut dyn ProgressSink,
) -> Result<FileEstimate> {
    let freq = FrequencyTable::scan(source, token, sink)?;
    let tree = Tree::from_frequencies(&freq);
    let estimated_size = estimate_archive_size(&tree, &freq, &extension_of(source));
    Ok(FileEstimate {
        path: source.to_path_buf(),
        original_size: freq.total(),
        estimated_size,
        compression: compression_percent(freq.total(), estimated_size),
    })
}
