//! Terminal progress reporting
//!
//! Bridges the core's synchronous [`ProgressSink`] callbacks onto an
//! indicatif bar: one tick per percent event, re-aligned at file
//! boundaries so short files (which emit fewer than 100 events) cannot
//! leave the bar behind.

use huffpack::ProgressSink;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over a batch of files
pub struct ConsoleProgress {
    bar: ProgressBar,
    total_files: u64,
    files_done: u64,
}

impl ConsoleProgress {
    /// Bar spanning `total_files` files, 100 ticks each
    #[must_use]
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files * 100);
        let style = ProgressStyle::with_template(
            "{bar:40.cyan/blue} {percent:>3}% {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        bar.set_message(format!("0/{total_files} files"));
        Self {
            bar,
            total_files,
            files_done: 0,
        }
    }

    /// Hidden bar for `--quiet` and JSON output
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            total_files: 0,
            files_done: 0,
        }
    }

    /// Remove the bar from the terminal
    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for ConsoleProgress {
    fn on_percent(&mut self) {
        self.bar.inc(1);
    }

    fn on_file_done(&mut self) {
        self.files_done += 1;
        self.bar.set_position(self.files_done * 100);
        self.bar
            .set_message(format!("{}/{} files", self.files_done, self.total_files));
    }
}
