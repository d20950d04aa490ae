//! The bundling collaborator seam and output-cleaning utility.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use regex::Regex;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::pipeline::PipelineDescription;

/// The underlying module bundler.
///
/// Receives the full pipeline description and performs every stage except
/// clean-output, which the executor runs natively. Resolution, parse, and
/// write failures surface as [`Error::Bundle`].
pub trait Bundler: Send + Sync {
    fn bundle(&self, pipeline: &PipelineDescription) -> Result<()>;
}

/// Bundler that delegates to an external command via `sh -c`.
///
/// The pipeline description is passed as JSON in `DTSPACK_PIPELINE`, with
/// `DTSPACK_OUT_DIR` and newline-joined `DTSPACK_ENTRIES` alongside for
/// commands that do not want to parse JSON. A non-zero exit is a bundle
/// failure carrying the command's stderr.
pub struct ShellBundler {
    command: String,
    working_dir: PathBuf,
}

impl ShellBundler {
    pub fn new(command: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            working_dir: working_dir.into(),
        }
    }
}

impl Bundler for ShellBundler {
    fn bundle(&self, pipeline: &PipelineDescription) -> Result<()> {
        let payload = serde_json::to_string(pipeline).map_err(|e| Error::Bundle {
            stage: "dts-emit".to_string(),
            message: format!("failed to encode pipeline: {}", e),
        })?;
        let entries = pipeline
            .entries
            .iter()
            .map(|e| e.display().to_string())
            .collect::<Vec<_>>()
            .join("\n");

        debug!("dts: running bundler command: {}", self.command);
        let output = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .current_dir(&self.working_dir)
            .env("DTSPACK_PIPELINE", payload)
            .env("DTSPACK_OUT_DIR", &pipeline.out_dir)
            .env("DTSPACK_ENTRIES", entries)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| Error::Bundle {
                stage: "dts-emit".to_string(),
                message: format!("failed to launch bundler: {}", e),
            })?;

        if !output.status.success() {
            return Err(Error::Bundle {
                stage: "dts-emit".to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Removes files under `dir` matching any of the glob patterns.
///
/// Best effort: unreadable directory entries and failed removals are skipped,
/// a missing directory is a no-op.
pub fn remove_files(globs: &[String], dir: &Path) {
    let matchers: Vec<Regex> = globs.iter().filter_map(|g| glob_to_regex(g)).collect();
    for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let relative = relative.to_string_lossy().replace('\\', "/");
        if matchers.iter().any(|m| m.is_match(&relative)) {
            let _ = fs::remove_file(entry.path());
        }
    }
}

/// Compiles a glob into an anchored regex over `/`-separated paths.
///
/// `**/` matches any directory prefix including none, `*` stays within one
/// path component.
fn glob_to_regex(pattern: &str) -> Option<Regex> {
    let mut source = String::from("^");
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    if chars.get(i + 2) == Some(&'/') {
                        source.push_str("(?:.*/)?");
                        i += 3;
                    } else {
                        source.push_str(".*");
                        i += 2;
                    }
                } else {
                    source.push_str("[^/]*");
                    i += 1;
                }
            }
            '?' => {
                source.push_str("[^/]");
                i += 1;
            }
            c => {
                if r"\.+()|[]{}^$#&-~".contains(c) {
                    source.push('\\');
                }
                source.push(c);
                i += 1;
            }
        }
    }
    source.push('$');
    Regex::new(&source).ok()
}
