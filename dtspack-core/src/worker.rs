//! Worker-hosted execution behind a message channel.
//!
//! The worker receives one request carrying the raw build options, performs
//! normalization locally, and dispatches on the watch flag. Every outcome is
//! an explicit tagged message sent before the channel closes, so the host
//! never has to infer success from channel closure alone.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::build::{run_once, BuildOutcome};
use crate::bundler::Bundler;
use crate::error::{Error, Result};
use crate::externals::PackageJsonScanner;
use crate::options::BuildConfig;
use crate::orchestrator::prepare;
use crate::watch::watch;
use crate::watcher::{FileWatcher, WatcherConfig};

/// The single inbound message: raw, unnormalized options plus the project
/// root they apply to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub root: PathBuf,
    pub config: BuildConfig,
}

/// Outbound messages from the worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WorkerReply {
    /// Final outcome of a one-shot build; the channel closes right after.
    Outcome(BuildOutcome),
    /// Outcome of one watch pass; the channel stays open for the session.
    Pass(BuildOutcome),
}

/// Host-side handle to a spawned worker.
pub struct WorkerHandle {
    pub replies: Receiver<WorkerReply>,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    /// Waits for a one-shot worker: reads the single outcome, then joins the
    /// thread. Do not call this for a watch request; the worker stays
    /// resident and the join would never return.
    pub fn wait(self) -> Result<BuildOutcome> {
        let reply = self.replies.recv().map_err(|_| Error::WorkerChannel)?;
        let _ = self.join.join();
        match reply {
            WorkerReply::Outcome(outcome) | WorkerReply::Pass(outcome) => Ok(outcome),
        }
    }

    /// Detaches the worker thread, keeping only the reply stream. Used for
    /// watch requests, where the worker lives for the rest of the process.
    pub fn into_replies(self) -> Receiver<WorkerReply> {
        self.replies
    }
}

/// Spawns the executor on a dedicated thread, reachable only through the
/// returned handle's channel.
pub fn spawn(bundler: Arc<dyn Bundler>, request: WorkerRequest) -> WorkerHandle {
    let (tx, rx) = std::sync::mpsc::channel();
    let join = std::thread::spawn(move || worker_main(bundler.as_ref(), &request, tx));
    WorkerHandle { replies: rx, join }
}

fn worker_main(bundler: &dyn Bundler, request: &WorkerRequest, tx: Sender<WorkerReply>) {
    let scanner = PackageJsonScanner;
    let pipeline = match prepare(&request.root, &request.config, &scanner) {
        Ok(Some(pipeline)) => pipeline,
        Ok(None) => {
            warn!("dts: worker received a request with dts disabled, nothing to do");
            let _ = tx.send(WorkerReply::Outcome(BuildOutcome::Success {
                duration: Duration::ZERO,
            }));
            return;
        }
        Err(err) => {
            error!("dts: {}", err);
            let _ = tx.send(WorkerReply::Outcome(BuildOutcome::Failure {
                message: err.to_string(),
            }));
            return;
        }
    };

    if request.config.watch {
        let mut watcher = match FileWatcher::new(WatcherConfig::for_pipeline(
            &pipeline,
            request.config.debounce_ms,
        )) {
            Ok(watcher) => watcher,
            Err(err) => {
                error!("dts: {}", err);
                let _ = tx.send(WorkerReply::Outcome(BuildOutcome::Failure {
                    message: err.to_string(),
                }));
                return;
            }
        };
        let running = AtomicBool::new(true);
        // Resident until the host drops its receiver; a failed send after a
        // pass is the shutdown signal.
        let result = watch(bundler, &pipeline, &mut watcher, None, &running, |outcome| {
            tx.send(WorkerReply::Pass(outcome.clone())).is_ok()
        });
        if let Err(err) = result {
            error!("dts: {}", err);
        }
    } else {
        let outcome = match run_once(bundler, &pipeline) {
            Ok(summary) => BuildOutcome::Success {
                duration: summary.duration,
            },
            Err(err) => BuildOutcome::Failure {
                message: err.to_string(),
            },
        };
        let _ = tx.send(WorkerReply::Outcome(outcome));
    }
}
