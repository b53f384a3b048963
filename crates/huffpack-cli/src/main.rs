use clap::{Parser, Subcommand};
use tracing::Level;

use huffpack_cli::{OutputFormat, PackArgs, StatArgs, UnpackArgs, commands};

#[derive(Parser)]
#[command(
    name = "huffpack",
    about = "Canonical Huffman file archiver",
    version,
    author,
    long_about = "Compresses single files into .hpak archives built on canonical Huffman \
coding, restores them bit-exactly, and previews archive sizes without writing anything."
)]
struct Cli {
    /// Set the logging level
    #[arg(short, long, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Output format
    #[arg(short = 'f', long, value_enum, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compress files into .hpak archives
    Pack(PackArgs),

    /// Restore files from .hpak archives
    Unpack(UnpackArgs),

    /// Estimate archive sizes without writing anything
    Stat(StatArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .init();

    match cli.command {
        Commands::Pack(args) => commands::pack::handle(args, cli.format)?,
        Commands::Unpack(args) => commands::unpack::handle(args, cli.format)?,
        Commands::Stat(args) => commands::stat::handle(args, cli.format)?,
    }

    Ok(())
}
