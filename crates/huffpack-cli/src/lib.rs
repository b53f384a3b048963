//! Huffpack CLI library
//!
//! This library provides the command surface for the `huffpack` binary.

pub mod commands;
pub mod output;
pub mod progress;

use std::path::PathBuf;

use clap::{Args, ValueEnum};

/// How command results are rendered
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables and status lines
    Text,
    /// Machine-readable JSON on stdout
    Json,
}

#[derive(Args)]
pub struct PackArgs {
    /// Files to compress, one archive per file
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Directory for the archives (defaults to each source's directory)
    #[arg(short, long, env = "HUFFPACK_OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct UnpackArgs {
    /// Archives to restore; the original extension comes from each header
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Directory for the restored files (defaults to each archive's directory)
    #[arg(short, long, env = "HUFFPACK_OUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct StatArgs {
    /// Files to analyze; nothing is written
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Disable the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}
