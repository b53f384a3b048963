//! Size estimation and compression arithmetic
//!
//! Lets callers preview what an archive would cost without writing any
//! payload: the header overhead is computed exactly and the payload from
//! the code lengths weighted by the frequency counts.

use crate::archive::header::decimal_digits;
use crate::freq::FrequencyTable;
use crate::tree::Tree;

/// Percentage size reduction from `old_size` to `new_size`, rounded to two
/// decimals.
///
/// A zero `old_size` reports `-100.0` (the archive is pure overhead).
#[must_use]
pub fn compression_percent(old_size: u64, new_size: u64) -> f64 {
    if old_size == 0 {
        return -100.0;
    }
    let percent = 100.0 - (new_size as f64) / (old_size as f64) * 100.0;
    (percent * 100.0).round() / 100.0
}

/// Exact size in bytes of the archive `tree` and `freq` would produce for a
/// source whose extension is `extension`.
///
/// Header: extension length byte + extension + node count + four bytes per
/// node + one byte per decimal digit of the original size + sentinel.
/// Payload: total code bits rounded up to whole bytes.
#[must_use]
pub fn estimate_archive_size(tree: &Tree, freq: &FrequencyTable, extension: &str) -> u64 {
    let codes = tree.codes();
    let payload_bits: u64 = freq
        .pairs()
        .map(|(byte, count)| codes.code_len(byte).unwrap_or(0) as u64 * count)
        .sum();

    let header = 1
        + extension.len() as u64
        + 2
        + 4 * tree.len() as u64
        + decimal_digits(freq.total()).len() as u64
        + 1;
    header + payload_bits.div_ceil(8)
}
