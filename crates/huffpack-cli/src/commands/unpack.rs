//! `huffpack unpack`

use anyhow::Result;
use huffpack::{CancelToken, Direction, run_many};
use tracing::debug;

use crate::commands::{dest_pairs, report_batch};
use crate::progress::ConsoleProgress;
use crate::{OutputFormat, UnpackArgs};

pub fn handle(args: UnpackArgs, format: OutputFormat) -> Result<()> {
    if let Some(dir) = &args.out_dir {
        std::fs::create_dir_all(dir)?;
    }
    let pairs = dest_pairs(&args.files, args.out_dir.as_deref())?;
    debug!(files = pairs.len(), "unpacking batch");

    let token = CancelToken::new();
    let mut bar = if args.quiet || format == OutputFormat::Json {
        ConsoleProgress::hidden()
    } else {
        ConsoleProgress::new(pairs.len() as u64)
    };
    let failed = run_many(Direction::Decompress, &pairs, &token, &mut bar);
    bar.finish();

    report_batch("unpacked", pairs.len(), &failed, format)
}
