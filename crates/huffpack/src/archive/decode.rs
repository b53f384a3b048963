//! Archive read path

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::archive::header::read_header;
use crate::error::{Error, Result};
use crate::paths::append_extension;
use crate::progress::{CancelToken, PercentTracker, ProgressSink};
use crate::tree::Node;

const READ_BUF_SIZE: usize = 8 * 1024;

/// Decompress `source` into `dest_base` plus the extension recovered from
/// the archive header; returns the path actually written.
///
/// The payload is walked bit by bit from the tree root, emitting a byte at
/// every leaf, until the declared original size is reached; trailing pad
/// bits in the final consumed byte are ignored by design of the format.
/// Input ending before the declared size is a [`Error::TruncatedPayload`].
/// Percent events count archive bytes consumed (the header counts once,
/// when parsed); `token` is polled per payload byte and cancellation leaves
/// a partial destination file in place.
pub fn decode(
    source: &Path,
    dest_base: &Path,
    token: &CancelToken,
    sink: &mut dyn ProgressSink,
) -> Result<PathBuf> {
    let archive_size = fs::metadata(source)?.len();
    let mut reader = BufReader::new(File::open(source)?);
    let header = read_header(&mut reader)?;

    let dest = append_extension(dest_base, &header.extension);
    debug!(
        source = %source.display(),
        dest = %dest.display(),
        declared = header.original_size,
        nodes = header.tree.len(),
        "unpacking"
    );

    let mut writer = BufWriter::new(File::create(&dest)?);
    let mut tracker = PercentTracker::new(archive_size);
    tracker.advance(header.byte_len, sink);

    let tree = &header.tree;
    let declared = header.original_size;
    let mut emitted = 0u64;
    let mut cursor = tree.root_id();
    let mut buf = [0u8; READ_BUF_SIZE];

    'payload: while emitted < declared {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            return Err(Error::TruncatedPayload {
                declared,
                recovered: emitted,
            });
        }
        for &byte in &buf[..n] {
            if token.is_cancelled() {
                return Err(Error::Cancelled);
            }
            tracker.advance(1, sink);
            for shift in (0..8).rev() {
                let bit = (byte >> shift) & 1;
                // The cursor is internal here: it starts at the root, which
                // a validated table never stores as a leaf, and resets after
                // every emitted byte.
                let next = tree.step(cursor, bit).ok_or(Error::RootIsLeaf)?;
                if let Node::Leaf(value) = *tree.node(next) {
                    writer.write_all(&[value])?;
                    emitted += 1;
                    if emitted == declared {
                        break 'payload;
                    }
                    cursor = tree.root_id();
                } else {
                    cursor = next;
                }
            }
        }
    }

    writer.flush()?;
    debug!(recovered = emitted, "archive unpacked");
    Ok(dest)
}
