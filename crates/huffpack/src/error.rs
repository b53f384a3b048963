//! Error types for archive encoding and decoding

use thiserror::Error;

/// Result type for huffpack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Huffpack error types
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The operation was aborted through its cancellation token.
    ///
    /// Not a failure: batch orchestration treats it as a controlled stop
    /// and never records it in a failure list.
    #[error("operation cancelled")]
    Cancelled,

    /// Archive payload ended before the declared original size was reached
    #[error("truncated payload: declared {declared} bytes, recovered {recovered}")]
    TruncatedPayload { declared: u64, recovered: u64 },

    /// Source file extension does not fit the one-byte length field
    #[error("source extension is {0} bytes, limit is 255")]
    ExtensionTooLong(usize),

    /// Stored node table is empty
    #[error("empty node table")]
    EmptyNodeTable,

    /// Stored node table has a leaf whose value does not fit in a byte
    #[error("node {index}: leaf value {value} exceeds 255")]
    LeafValueOutOfRange { index: usize, value: u16 },

    /// Stored node table references a child at or after its parent
    #[error("node {index}: child id {child} does not precede its parent")]
    ChildOutOfOrder { index: usize, child: u16 },

    /// Stored node table ends in a leaf, so no bit can be decoded
    #[error("node table root is a leaf")]
    RootIsLeaf,

    /// Size field contains a byte that is neither a digit nor the sentinel
    #[error("invalid size field byte: {0:#04x}")]
    InvalidSizeDigit(u8),

    /// Size field declares a value that does not fit in 64 bits
    #[error("size field overflows 64 bits")]
    SizeFieldOverflow,

    /// A source byte had no code: the file changed between scan and pack
    #[error("no code for byte {0:#04x}: source changed between scan and pack")]
    CodeMissing(u8),
}
