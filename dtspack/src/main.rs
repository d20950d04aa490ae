mod commands;
mod formatting;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "dtspack")]
#[command(about = "Bundled type-declaration builds, coordinated with a running source build")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project root containing package.json and tsconfig.json.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long, action)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the declaration build once.
    Build {
        #[command(flatten)]
        options: commands::BuildArgs,
        /// Run the build inside an isolated worker thread.
        #[arg(long, action)]
        worker: bool,
    },
    /// Rebuild declarations on every source change.
    Watch {
        #[command(flatten)]
        options: commands::BuildArgs,
        /// Debounce window for change events, in milliseconds.
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    match cli.command {
        Commands::Build { options, worker } => commands::cmd_build(cli.root, options, worker)?,
        Commands::Watch {
            options,
            debounce_ms,
        } => commands::cmd_watch(cli.root, options, debounce_ms)?,
    }

    Ok(())
}
