//! Archive write path

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tracing::debug;

use crate::ARCHIVE_EXTENSION;
use crate::archive::bits::BitWriter;
use crate::archive::header::write_header;
use crate::error::{Error, Result};
use crate::freq::FrequencyTable;
use crate::paths::{append_extension, extension_of};
use crate::progress::{CancelToken, NoProgress, PercentTracker, ProgressSink};
use crate::stats::compression_percent;
use crate::tree::Tree;

const READ_BUF_SIZE: usize = 8 * 1024;

/// Outcome of a successful archive write
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeReport {
    /// Size of the source file in bytes
    pub original_size: u64,
    /// Size of the archive on disk
    pub archive_size: u64,
    /// Percentage reduction, rounded to two decimals (negative on growth)
    pub compression: f64,
}

/// Compress `source` into `<dest_base>.hpak`.
///
/// Two passes over the source: the frequency scan (silent) and the packing
/// pass, which reports one percent event per whole point and polls `token`
/// per byte. Cancellation leaves a truncated destination file in place; the
/// caller decides what to do with it.
pub fn encode(
    source: &Path,
    dest_base: &Path,
    token: &CancelToken,
    sink: &mut dyn ProgressSink,
) -> Result<EncodeReport> {
    let freq = FrequencyTable::scan(source, token, &mut NoProgress)?;
    let tree = Tree::from_frequencies(&freq);
    let codes = tree.codes();
    let original_size = freq.total();

    let dest = append_extension(dest_base, ARCHIVE_EXTENSION);
    debug!(
        source = %source.display(),
        dest = %dest.display(),
        nodes = tree.len(),
        "packing"
    );

    let mut reader = BufReader::new(File::open(source)?);
    let mut writer = BufWriter::new(File::create(&dest)?);
    write_header(&mut writer, &extension_of(source), &tree, original_size)?;

    let mut bits = BitWriter::new(writer);
    let mut tracker = PercentTracker::new(original_size);
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
            let code = codes.code(byte).ok_or(Error::CodeMissing(byte))?;
            for &bit in code {
                bits.push_bit(bit)?;
            }
            tracker.advance(1, sink);
        }
    }
    let mut writer = bits.finish()?;
    writer.flush()?;
    drop(writer);

    let archive_size = fs::metadata(&dest)?.len();
    debug!(original_size, archive_size, "archive written");
    Ok(EncodeReport {
        original_size,
        archive_size,
        compression: compression_percent(original_size, archive_size),
    })
}
