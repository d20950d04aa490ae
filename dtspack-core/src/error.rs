//! Error types and result aliases.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Dependency scan failed for {path}: {message}")]
    DependencyScan { path: PathBuf, message: String },

    #[error("Bundle error in {stage} stage: {message}")]
    Bundle { stage: String, message: String },

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("Worker channel closed before an outcome was received")]
    WorkerChannel,
}

pub type Result<T> = std::result::Result<T, Error>;
