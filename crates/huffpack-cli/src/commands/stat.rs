//! `huffpack stat` — dry-run size estimates

use std::path::PathBuf;

use anyhow::{Result, bail};
use huffpack::{CancelToken, PreviewReport, preview};
use serde::Serialize;
use tracing::debug;

use crate::output::{OutputStyle, format_error, header_cell, numeric_cell, regular_cell};
use crate::progress::ConsoleProgress;
use crate::{OutputFormat, StatArgs};

#[derive(Serialize)]
struct StatRow {
    path: PathBuf,
    original_size: u64,
    estimated_size: u64,
    compression: f64,
}

#[derive(Serialize)]
struct StatReport {
    files: Vec<StatRow>,
    total: StatRow,
    failed: Vec<PathBuf>,
}

pub fn handle(args: StatArgs, format: OutputFormat) -> Result<()> {
    debug!(files = args.files.len(), "stat batch");

    let token = CancelToken::new();
    let mut bar = if args.quiet || format == OutputFormat::Json {
        ConsoleProgress::hidden()
    } else {
        ConsoleProgress::new(args.files.len() as u64)
    };
    let report = preview(&args.files, &token, &mut bar);
    bar.finish();

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => print_table(&report),
    }

    if !report.failures.is_empty() {
        bail!(
            "{} of {} file(s) failed",
            report.failures.len(),
            args.files.len()
        );
    }
    Ok(())
}

fn print_json(report: &PreviewReport) -> Result<()> {
    let out = StatReport {
        files: report
            .files
            .iter()
            .map(|f| StatRow {
                path: f.path.clone(),
                original_size: f.original_size,
                estimated_size: f.estimated_size,
                compression: f.compression,
            })
            .collect(),
        total: StatRow {
            path: PathBuf::new(),
            original_size: report.totals.original_size,
            estimated_size: report.totals.estimated_size,
            compression: report.totals.compression,
        },
        failed: report.failures.clone(),
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn print_table(report: &PreviewReport) {
    let style = OutputStyle::new();
    let mut table = crate::output::create_table(&style);
    table.set_header(vec![
        header_cell("File", &style),
        header_cell("Size", &style),
        header_cell("Estimated", &style),
        header_cell("Saved %", &style),
    ]);

    for file in &report.files {
        table.add_row(vec![
            regular_cell(&file.path.display().to_string()),
            numeric_cell(&file.original_size.to_string()),
            numeric_cell(&file.estimated_size.to_string()),
            numeric_cell(&format!("{:.2}", file.compression)),
        ]);
    }
    table.add_row(vec![
        regular_cell("TOTAL"),
        numeric_cell(&report.totals.original_size.to_string()),
        numeric_cell(&report.totals.estimated_size.to_string()),
        numeric_cell(&format!("{:.2}", report.totals.compression)),
    ]);
    println!("{table}");

    for path in &report.failures {
        println!(
            "{}",
            format_error(&format!("  failed: {}", path.display()), &style)
        );
    }
}
