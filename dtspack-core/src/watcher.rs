//! File watching for continuous rebuilds.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use notify::Config as NotifyConfig;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::{Error, Result};
use crate::pipeline::PipelineDescription;

/// Stream of debounced change batches driving the watch coordinator.
///
/// Overlapping trigger events are coalesced here, not by the coordinator.
pub trait ChangeSource: Send {
    /// Returns the next batch of changed paths, or `None` when no change is
    /// ready. Must not block.
    fn poll(&mut self) -> Result<Option<Vec<PathBuf>>>;
}

pub struct WatcherConfig {
    pub debounce_ms: u64,
    pub roots: Vec<PathBuf>,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            roots: vec![PathBuf::from(".")],
        }
    }
}

impl WatcherConfig {
    /// Watches the directories containing the pipeline's entry points.
    pub fn for_pipeline(pipeline: &PipelineDescription, debounce_ms: Option<u64>) -> Self {
        let mut roots: Vec<PathBuf> = Vec::new();
        for entry in &pipeline.entries {
            let root = entry
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            if !roots.contains(&root) {
                roots.push(root);
            }
        }
        if roots.is_empty() {
            roots.push(PathBuf::from("."));
        }
        Self {
            debounce_ms: debounce_ms.unwrap_or(300),
            roots,
        }
    }
}

/// Recursive watcher over the entry points' source roots, debouncing raw
/// notify events into change batches.
pub struct FileWatcher {
    watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<Event>>,
    pending: Vec<PathBuf>,
    last_event: Instant,
    debounce: Duration,
}

impl FileWatcher {
    pub fn new(config: WatcherConfig) -> Result<Self> {
        let (tx, rx) = std::sync::mpsc::channel();
        let watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            NotifyConfig::default(),
        )
        .map_err(|e| Error::Watch(format!("failed to create watcher: {}", e)))?;

        let mut file_watcher = Self {
            watcher,
            receiver: rx,
            pending: Vec::new(),
            last_event: Instant::now(),
            debounce: Duration::from_millis(config.debounce_ms),
        };

        for root in &config.roots {
            file_watcher
                .watcher
                .watch(root, RecursiveMode::Recursive)
                .map_err(|e| {
                    Error::Watch(format!("failed to watch {}: {}", root.display(), e))
                })?;
        }

        Ok(file_watcher)
    }
}

impl ChangeSource for FileWatcher {
    fn poll(&mut self) -> Result<Option<Vec<PathBuf>>> {
        loop {
            match self.receiver.try_recv() {
                Ok(Ok(event)) => {
                    self.pending.extend(event.paths);
                    self.last_event = Instant::now();
                }
                Ok(Err(e)) => return Err(Error::Watch(format!("watcher error: {}", e))),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    return Err(Error::Watch("watcher channel disconnected".to_string()))
                }
            }
        }

        if !self.pending.is_empty() && self.last_event.elapsed() >= self.debounce {
            return Ok(Some(std::mem::take(&mut self.pending)));
        }
        Ok(None)
    }
}
