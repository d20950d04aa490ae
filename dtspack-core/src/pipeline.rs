//! Assembly of the declaration-build pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::externals::ExternalSet;
use crate::options::DtsOptions;
use crate::tsconfig::{CompilerPaths, ResolutionHints};

/// Glob cleaned out of the output directory before a pass emits.
pub const CLEAN_GLOBS: &[&str] = &["**/*.d.ts"];

/// One enabled transformation stage.
///
/// Stages are handles: configuration for externally-supplied transformation
/// steps, not the steps themselves. The clean stage is the one exception the
/// executor runs natively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stage {
    /// Removes prior declaration output. Must come first so it never deletes
    /// freshly-written files.
    Clean { globs: Vec<String>, dir: PathBuf },
    /// Alias-aware module resolution.
    AliasResolve(ResolutionHints),
    /// Strips interpreter directives that are invalid as bundlable syntax.
    Hashbang,
    /// Lets entries and their dependencies import structured-data files.
    Json,
    /// Collapses the declaration files reachable from each entry into one
    /// output, honoring the compiler's alias map when configured.
    DtsEmit {
        compiler_paths: Option<CompilerPaths>,
    },
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Clean { .. } => "clean",
            Stage::AliasResolve(_) => "alias-resolve",
            Stage::Hashbang => "hashbang",
            Stage::Json => "json",
            Stage::DtsEmit { .. } => "dts-emit",
        }
    }
}

/// Immutable description of one build: ordered stages, entry set, and the
/// external-membership predicate. The sole unit of work handed to an
/// executor, and the JSON payload a shell bundler receives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDescription {
    pub entries: Vec<PathBuf>,
    pub stages: Vec<Stage>,
    pub externals: ExternalSet,
    pub out_dir: PathBuf,
}

impl PipelineDescription {
    /// Whether a specifier stays external to the bundle.
    ///
    /// Entry points are always bundled, never external, no matter what the
    /// external set says; misclassifying one would silently produce an empty
    /// output bundle.
    pub fn is_external(&self, specifier: &str) -> bool {
        if self.entries.iter().any(|e| e == Path::new(specifier)) {
            return false;
        }
        self.externals.contains(specifier)
    }

    pub fn has_stage(&self, name: &str) -> bool {
        self.stages.iter().any(|s| s.name() == name)
    }
}

/// Composes a pipeline description from normalized options.
///
/// Pure assembly: only enabled stages are appended, in a fixed order that is
/// semantically load-bearing (clean before anything emits, resolution before
/// emission). Relative entry and output paths are resolved against `root`.
pub fn compose(
    root: &Path,
    options: &DtsOptions,
    externals: ExternalSet,
    compiler_paths: &CompilerPaths,
) -> PipelineDescription {
    let out_dir = resolve_against(root, &options.out_dir);
    let entries: Vec<PathBuf> = options
        .entries
        .iter()
        .map(|e| resolve_against(root, e))
        .collect();

    let mut stages = Vec::new();

    if options.clean {
        stages.push(Stage::Clean {
            globs: CLEAN_GLOBS.iter().map(|g| g.to_string()).collect(),
            dir: out_dir.clone(),
        });
    }

    if let Some(hints) = ResolutionHints::derive(&options.resolve, compiler_paths) {
        stages.push(Stage::AliasResolve(hints));
    }

    stages.push(Stage::Hashbang);
    stages.push(Stage::Json);
    stages.push(Stage::DtsEmit {
        compiler_paths: if compiler_paths.is_configured() {
            Some(compiler_paths.clone())
        } else {
            None
        },
    });

    PipelineDescription {
        entries,
        stages,
        externals,
        out_dir,
    }
}

fn resolve_against(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
