//! One-shot pipeline execution.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::bundler::{remove_files, Bundler};
use crate::error::Result;
use crate::pipeline::{PipelineDescription, Stage};

/// Result of a successful one-shot build.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub duration: Duration,
}

/// Tagged outcome of one pass, as reported over the worker channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BuildOutcome {
    Success { duration: Duration },
    Failure { message: String },
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Success { .. })
    }
}

/// Runs the pipeline exactly once.
///
/// Emits a start notification, then either a success notification carrying
/// the wall-clock duration or an error notification with full detail. The
/// error is returned after reporting so the caller can escalate; a failed
/// one-shot build is fatal to the invoking process, not silently ignored.
pub fn run_once(bundler: &dyn Bundler, pipeline: &PipelineDescription) -> Result<BuildSummary> {
    let start = Instant::now();
    info!("dts: build start");
    match run_pass(bundler, pipeline) {
        Ok(()) => {
            let duration = start.elapsed();
            info!("dts: build success in {}ms", duration.as_millis());
            Ok(BuildSummary { duration })
        }
        Err(err) => {
            error!("dts: build failed: {}", err);
            Err(err)
        }
    }
}

/// Executes one pass: the clean stage natively, everything else through the
/// bundler. Shared by the one-shot executor and the watch coordinator.
pub(crate) fn run_pass(bundler: &dyn Bundler, pipeline: &PipelineDescription) -> Result<()> {
    for stage in &pipeline.stages {
        if let Stage::Clean { globs, dir } = stage {
            remove_files(globs, dir);
        }
    }
    bundler.bundle(pipeline)
}
