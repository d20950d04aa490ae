//! Continuous build coordination.
//!
//! The coordinator does not watch files itself; it reacts to batches from a
//! [`ChangeSource`] and, critically, gates the first pass on a readiness
//! signal from the sibling source build so declaration output is never stale
//! relative to freshly-started source compilation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::build::{run_pass, BuildOutcome};
use crate::bundler::Bundler;
use crate::error::Result;
use crate::pipeline::PipelineDescription;
use crate::watcher::ChangeSource;

/// Current run status of a watch session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchStatus {
    Idle,
    WaitingForPeer,
    Running,
    Succeeded,
    Failed,
}

/// Long-lived watch state: created when watch mode starts, gone when the
/// process exits. Only one pass is ever running at a time.
pub struct WatchSession {
    status: WatchStatus,
    pass_started: Option<Instant>,
    rerun_pending: bool,
    passes: u64,
}

impl WatchSession {
    fn new() -> Self {
        Self {
            status: WatchStatus::Idle,
            pass_started: None,
            rerun_pending: false,
            passes: 0,
        }
    }

    pub fn status(&self) -> WatchStatus {
        self.status
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    fn take_rerun_pending(&mut self) -> bool {
        std::mem::take(&mut self.rerun_pending)
    }
}

/// Sending half of the peer-ready handshake, held by the source build.
pub struct PeerReady {
    tx: Sender<()>,
}

impl PeerReady {
    /// Signals that the peer pipeline has completed its first pass.
    pub fn notify(self) {
        let _ = self.tx.send(());
    }
}

/// One-shot synchronization handle the coordinator waits on before its first
/// pass. A dropped [`PeerReady`] counts as ready so a crashed peer cannot
/// wedge the session forever.
pub struct PeerSignal {
    rx: Receiver<()>,
}

impl PeerSignal {
    /// Creates a connected handshake pair.
    pub fn pair() -> (PeerReady, PeerSignal) {
        let (tx, rx) = std::sync::mpsc::channel();
        (PeerReady { tx }, PeerSignal { rx })
    }

    fn wait(self) {
        if self.rx.recv().is_err() {
            warn!("dts: peer signal dropped without firing, starting anyway");
        }
    }
}

/// Runs the pipeline continuously until `running` clears or `on_pass`
/// returns `false`.
///
/// With a peer signal supplied the first pass strictly follows the signal;
/// subsequent passes are ungated. A pass failure is reported and does not
/// end the session. Change batches arriving while a pass is in flight are
/// coalesced into exactly one follow-up pass.
pub fn watch<F>(
    bundler: &dyn Bundler,
    pipeline: &PipelineDescription,
    changes: &mut dyn ChangeSource,
    peer: Option<PeerSignal>,
    running: &AtomicBool,
    mut on_pass: F,
) -> Result<WatchSession>
where
    F: FnMut(&BuildOutcome) -> bool,
{
    let mut session = WatchSession::new();

    if let Some(signal) = peer {
        session.status = WatchStatus::WaitingForPeer;
        info!("dts: waiting for the source build before the first pass");
        signal.wait();
    }

    let outcome = run_session_pass(bundler, pipeline, &mut session);
    if !on_pass(&outcome) {
        return Ok(session);
    }

    while running.load(Ordering::SeqCst) {
        match changes.poll() {
            Ok(Some(paths)) => {
                debug!("dts: {} changed paths, rebuilding", paths.len());
                let outcome = run_session_pass(bundler, pipeline, &mut session);
                if !on_pass(&outcome) {
                    break;
                }
                if changes.poll()?.is_some() {
                    session.rerun_pending = true;
                }
                if session.take_rerun_pending() {
                    let outcome = run_session_pass(bundler, pipeline, &mut session);
                    if !on_pass(&outcome) {
                        break;
                    }
                }
            }
            Ok(None) => thread::sleep(Duration::from_millis(50)),
            Err(err) => {
                error!("dts: watch stream failed: {}", err);
                return Err(err);
            }
        }
    }

    Ok(session)
}

fn run_session_pass(
    bundler: &dyn Bundler,
    pipeline: &PipelineDescription,
    session: &mut WatchSession,
) -> BuildOutcome {
    session.status = WatchStatus::Running;
    session.pass_started = Some(Instant::now());
    session.passes += 1;
    info!("dts: build start");

    match run_pass(bundler, pipeline) {
        Ok(()) => {
            // Duration is per pass, from this pass's own start timestamp.
            let duration = session
                .pass_started
                .map(|s| s.elapsed())
                .unwrap_or_default();
            session.status = WatchStatus::Succeeded;
            info!("dts: build success in {}ms", duration.as_millis());
            BuildOutcome::Success { duration }
        }
        Err(err) => {
            session.status = WatchStatus::Failed;
            error!("dts: build failed: {}", err);
            BuildOutcome::Failure {
                message: err.to_string(),
            }
        }
    }
}
