//! Command implementations for the CLI.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use dtspack_core::options::{DtsObject, EntrySpec, ResolveConfig};
use dtspack_core::{
    start, worker, BuildConfig, BuildOutcome, DtsConfig, PackageJsonScanner, ShellBundler,
    WorkerRequest,
};

use crate::formatting::{print_error, print_info, print_key_value, print_success, print_warning};

/// Build options shared by the `build` and `watch` subcommands.
#[derive(clap::Args)]
pub struct BuildArgs {
    /// Entry points; defaults to src/index.ts.
    pub entries: Vec<PathBuf>,

    #[arg(long, default_value = "dist")]
    pub out_dir: PathBuf,

    /// Remove prior declaration output before emitting.
    #[arg(long, action)]
    pub clean: bool,

    /// Extra module specifiers kept external to the bundle.
    #[arg(long)]
    pub external: Vec<String>,

    /// Inline every resolvable external type into the bundle.
    #[arg(long, action)]
    pub resolve: bool,

    /// Inline types only from these packages.
    #[arg(long = "resolve-only")]
    pub resolve_only: Vec<String>,

    /// Shell command that performs the bundling stages.
    #[arg(long)]
    pub bundler: String,
}

impl BuildArgs {
    fn to_config(&self, watch: bool, debounce_ms: Option<u64>) -> BuildConfig {
        let resolve = if !self.resolve_only.is_empty() {
            Some(ResolveConfig::Only(self.resolve_only.clone()))
        } else if self.resolve {
            Some(ResolveConfig::All(true))
        } else {
            None
        };
        let entry = if self.entries.is_empty() {
            None
        } else {
            Some(EntrySpec::Many(
                self.entries
                    .iter()
                    .map(|e| e.display().to_string())
                    .collect(),
            ))
        };

        BuildConfig {
            out_dir: self.out_dir.clone(),
            external: self.external.clone(),
            clean: self.clean,
            watch,
            debounce_ms,
            dts: DtsConfig::Full(DtsObject { entry, resolve }),
            ..BuildConfig::default()
        }
    }
}

pub fn cmd_build(root: PathBuf, args: BuildArgs, use_worker: bool) -> Result<()> {
    let config = args.to_config(false, None);
    let bundler = ShellBundler::new(args.bundler.as_str(), &root);

    if use_worker {
        let handle = worker::spawn(Arc::new(bundler), WorkerRequest { root, config });
        match handle.wait()? {
            BuildOutcome::Success { duration } => {
                print_success(&format!("declarations built in {}ms", duration.as_millis()));
            }
            BuildOutcome::Failure { message } => {
                print_error(&message);
                anyhow::bail!("declaration build failed");
            }
        }
        return Ok(());
    }

    let scanner = PackageJsonScanner;
    let running = AtomicBool::new(true);
    match start(&root, &config, &bundler, &scanner, None, &running)? {
        Some(summary) => {
            print_success(&format!(
                "declarations built in {}ms",
                summary.duration.as_millis()
            ));
        }
        None => print_warning("dts is not enabled, nothing to do"),
    }
    Ok(())
}

pub fn cmd_watch(root: PathBuf, args: BuildArgs, debounce_ms: Option<u64>) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .map_err(|e| anyhow::anyhow!("Failed to set signal handler: {}", e))?;

    print_key_value("Watching", &root.display().to_string());
    print_key_value("Output", &args.out_dir.display().to_string());
    print_info("Press Ctrl+C to stop");
    println!();

    let config = args.to_config(true, debounce_ms);
    let bundler = ShellBundler::new(args.bundler.as_str(), &root);
    let scanner = PackageJsonScanner;

    start(&root, &config, &bundler, &scanner, None, &running)?;

    println!();
    print_warning("Stopping watch mode...");
    Ok(())
}
