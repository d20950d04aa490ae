//! Core library for declaration-bundle orchestration.
//!
//! Normalizes the user-facing dts option into a pipeline description and
//! runs it either once or under a file watcher, optionally inside a worker
//! thread reachable only over a message channel.

pub mod build;
pub mod bundler;
pub mod error;
pub mod externals;
pub mod options;
pub mod orchestrator;
pub mod pipeline;
pub mod tsconfig;
pub mod watch;
pub mod watcher;
pub mod worker;

pub use build::{run_once, BuildOutcome, BuildSummary};
pub use bundler::{remove_files, Bundler, ShellBundler};
pub use error::{Error, Result};
pub use externals::{DependencyScanner, ExternalSet, PackageJsonScanner};
pub use options::{BuildConfig, DtsConfig, DtsOptions, ResolvePolicy};
pub use orchestrator::{prepare, start};
pub use pipeline::{compose, PipelineDescription, Stage};
pub use tsconfig::{load_compiler_paths, AliasMatcher, CompilerPaths, ResolutionHints};
pub use watch::{watch, PeerReady, PeerSignal, WatchSession, WatchStatus};
pub use watcher::{ChangeSource, FileWatcher, WatcherConfig};
pub use worker::{WorkerHandle, WorkerReply, WorkerRequest};
