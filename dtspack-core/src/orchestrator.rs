//! Top-level entry points tying normalization, composition, and execution
//! together. The worker bridge reuses these on its own thread.

use std::path::Path;
use std::sync::atomic::AtomicBool;

use crate::build::{run_once, BuildSummary};
use crate::bundler::Bundler;
use crate::error::Result;
use crate::externals::{DependencyScanner, ExternalSet};
use crate::options::{BuildConfig, DtsOptions};
use crate::pipeline::{compose, PipelineDescription};
use crate::tsconfig::load_compiler_paths;
use crate::watch::{watch, PeerSignal};
use crate::watcher::{FileWatcher, WatcherConfig};

/// Normalizes raw options and composes the pipeline for them.
///
/// Returns `None` when the dts feature is disabled. Normalization always
/// completes before composition, and composition before any stage runs.
pub fn prepare(
    root: &Path,
    config: &BuildConfig,
    scanner: &dyn DependencyScanner,
) -> Result<Option<PipelineDescription>> {
    let Some(options) = DtsOptions::normalize(config) else {
        return Ok(None);
    };
    let externals = ExternalSet::collect(scanner, root, &options.external)?;
    let compiler_paths = load_compiler_paths(root);
    Ok(Some(compose(root, &options, externals, &compiler_paths)))
}

/// Runs the declaration build described by `config`.
///
/// One-shot mode returns the summary once the pass finishes; watch mode
/// returns `Ok(None)` after the session ends. `peer` gates the first watch
/// pass on the sibling source build; `None` means proceed immediately.
pub fn start(
    root: &Path,
    config: &BuildConfig,
    bundler: &dyn Bundler,
    scanner: &dyn DependencyScanner,
    peer: Option<PeerSignal>,
    running: &AtomicBool,
) -> Result<Option<BuildSummary>> {
    let Some(pipeline) = prepare(root, config, scanner)? else {
        return Ok(None);
    };

    if config.watch {
        let mut watcher =
            FileWatcher::new(WatcherConfig::for_pipeline(&pipeline, config.debounce_ms))?;
        watch(bundler, &pipeline, &mut watcher, peer, running, |_| true)?;
        Ok(None)
    } else {
        run_once(bundler, &pipeline).map(Some)
    }
}
