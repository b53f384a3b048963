//! Per-byte frequency analysis
//!
//! A [`FrequencyTable`] is built from exactly one sequential pass over a
//! source file. The order in which byte values are first encountered is
//! retained: it decides tie-breaks during tree construction and therefore
//! the exact bytes of the serialized archive.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::progress::{CancelToken, PercentTracker, ProgressSink};

const READ_BUF_SIZE: usize = 8 * 1024;

/// Occurrence counts for every byte value seen in one file pass.
///
/// Always holds at least two distinct values: a file with a single distinct
/// byte `b` gets a synthetic zero-count entry for `(b + 1) % 256`, and an
/// empty file gets the synthetic pair `{0, 1}`, so a binary tree with two
/// or more leaves can always be built.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    counts: [u64; 256],
    /// Byte values in the order they were first encountered
    order: Vec<u8>,
    total: u64,
}

impl FrequencyTable {
    /// Scan `path` once, counting every byte.
    ///
    /// Reports one percent event per whole percentage point of the file
    /// (nothing for a zero-byte file) and polls `token` once per byte. On
    /// cancellation the partial table is discarded and
    /// [`Error::Cancelled`] is returned.
    pub fn scan(path: &Path, token: &CancelToken, sink: &mut dyn ProgressSink) -> Result<Self> {
        let file_size = std::fs::metadata(path)?.len();
        let mut reader = BufReader::new(File::open(path)?);
        let mut tracker = PercentTracker::new(file_size);

        let mut counts = [0u64; 256];
        let mut order = Vec::new();
        let mut total = 0u64;

        let mut buf = [0u8; READ_BUF_SIZE];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            for &byte in &buf[..n] {
                if token.is_cancelled() {
                    return Err(Error::Cancelled);
                }
                if counts[byte as usize] == 0 {
                    order.push(byte);
                }
                counts[byte as usize] += 1;
                total += 1;
                tracker.advance(1, sink);
            }
        }

        let mut table = Self {
            counts,
            order,
            total,
        };
        table.fix_degenerate();
        debug!(
            bytes = table.total,
            distinct = table.order.len(),
            "frequency scan complete"
        );
        Ok(table)
    }

    /// Ensure at least two distinct values exist
    fn fix_degenerate(&mut self) {
        if self.order.is_empty() {
            self.order.push(0);
        }
        if self.order.len() == 1 {
            let synthetic = self.order[0].wrapping_add(1);
            self.order.push(synthetic);
        }
    }

    /// Total number of bytes scanned (the original file size)
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct byte values, synthetic entries included
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.order.len()
    }

    /// `(byte, count)` pairs in first-seen order
    pub fn pairs(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.order.iter().map(|&b| (b, self.counts[b as usize]))
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: &[(u8, u64)]) -> Self {
        let mut counts = [0u64; 256];
        let mut order = Vec::new();
        let mut total = 0;
        for &(byte, count) in pairs {
            counts[byte as usize] = count;
            order.push(byte);
            total += count;
        }
        let mut table = Self {
            counts,
            order,
            total,
        };
        table.fix_degenerate();
        table
    }
}
