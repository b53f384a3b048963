//! Progress reporting and cooperative cancellation
//!
//! Every long-running operation takes an explicit [`CancelToken`] and a
//! [`ProgressSink`]. Callbacks fire synchronously from inside the scanning,
//! encoding, and decoding loops, so implementations must be cheap.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable cancellation flag shared between an operation and its caller.
///
/// A single external writer calls [`CancelToken::request_cancel`]; the
/// active scan/encode/decode loop polls [`CancelToken::is_cancelled`] once
/// per byte. Cancellation is advisory: it does not roll back or delete a
/// partially written destination file.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token in the not-cancelled state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the operation holding this token
    pub fn request_cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Return to the not-cancelled state.
    ///
    /// Batch operations call this once at entry so a token left set by a
    /// previous run does not abort the new one.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}

/// Sink for progress events emitted by the core loops.
///
/// Both hooks default to no-ops so callers can implement only the one they
/// care about.
pub trait ProgressSink {
    /// Fired once per whole percentage point of the current file's bytes
    fn on_percent(&mut self) {}

    /// Fired after each file in a batch finishes, success or failure
    fn on_file_done(&mut self) {}
}

/// Sink that ignores all progress events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {}

/// Tracks whole-percentage-point boundary crossings for one file.
///
/// A zero-byte total never fires. A step that crosses several points fires
/// once per point, so a sink counting calls always lands on the integer
/// percentage regardless of read granularity.
pub(crate) struct PercentTracker {
    total: u64,
    done: u64,
    reported: u64,
}

impl PercentTracker {
    pub(crate) fn new(total: u64) -> Self {
        Self {
            total,
            done: 0,
            reported: 0,
        }
    }

    pub(crate) fn advance(&mut self, bytes: u64, sink: &mut dyn ProgressSink) {
        self.done += bytes;
        if self.total == 0 {
            return;
        }
        let points = self.done.min(self.total) * 100 / self.total;
        while self.reported < points {
            sink.on_percent();
            self.reported += 1;
        }
    }
}
