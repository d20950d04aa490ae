//! Path-alias extraction from the project's TypeScript configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::options::ResolvePolicy;

/// `compilerOptions` fields relevant to declaration emission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerPaths {
    pub base_url: Option<String>,
    pub paths: BTreeMap<String, Vec<String>>,
}

impl CompilerPaths {
    /// The emission stage needs both a base URL and at least one mapping;
    /// anything less is treated as no alias configuration.
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some() && !self.paths.is_empty()
    }
}

#[derive(Debug, Default, Deserialize)]
struct TsConfigFile {
    #[serde(default, rename = "compilerOptions")]
    compiler_options: CompilerPaths,
}

/// Reads `tsconfig.json` under `root`.
///
/// Absence of the file or malformed JSON is not an error; both mean "no
/// configuration" and yield the empty default.
pub fn load_compiler_paths(root: &Path) -> CompilerPaths {
    let path = root.join("tsconfig.json");
    let Ok(content) = fs::read_to_string(&path) else {
        return CompilerPaths::default();
    };
    match serde_json::from_str::<TsConfigFile>(&content) {
        Ok(file) => file.compiler_options,
        Err(err) => {
            warn!("dts: ignoring unreadable tsconfig.json: {}", err);
            CompilerPaths::default()
        }
    }
}

/// Resolution hints for the alias-aware resolver stage.
///
/// Alias-claimed specifiers are excluded from generic resolution because the
/// declaration-emission stage understands aliases natively and must not have
/// them double-resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionHints {
    /// Allow-list when the resolve policy is `Only`; `None` resolves all.
    pub resolve_only: Option<Vec<String>>,
    /// Raw alias patterns from `compilerOptions.paths`, e.g. `@app/*`.
    pub alias_patterns: Vec<String>,
}

impl ResolutionHints {
    /// Derives hints for a resolve policy, or `None` when resolution is
    /// disabled and the stage is omitted altogether.
    pub fn derive(policy: &ResolvePolicy, compiler_paths: &CompilerPaths) -> Option<Self> {
        match policy {
            ResolvePolicy::Disabled => None,
            ResolvePolicy::All => Some(Self {
                resolve_only: None,
                alias_patterns: compiler_paths.paths.keys().cloned().collect(),
            }),
            ResolvePolicy::Only(packages) => Some(Self {
                resolve_only: Some(packages.clone()),
                alias_patterns: compiler_paths.paths.keys().cloned().collect(),
            }),
        }
    }

    /// Compiles the alias patterns into a matcher.
    pub fn matcher(&self) -> AliasMatcher {
        AliasMatcher::new(self)
    }
}

/// Compiled form of [`ResolutionHints`], used as the resolver's predicate.
pub struct AliasMatcher {
    regexes: Vec<Regex>,
    resolve_only: Option<Vec<String>>,
}

impl AliasMatcher {
    fn new(hints: &ResolutionHints) -> Self {
        // A `*` wildcard stands for one or more characters.
        let regexes = hints
            .alias_patterns
            .iter()
            .filter_map(|pattern| {
                let source = format!("^{}$", regex::escape(pattern).replace(r"\*", ".+"));
                match Regex::new(&source) {
                    Ok(re) => Some(re),
                    Err(err) => {
                        warn!("dts: skipping unusable alias pattern {}: {}", pattern, err);
                        None
                    }
                }
            })
            .collect();
        Self {
            regexes,
            resolve_only: hints.resolve_only.clone(),
        }
    }

    /// Whether any alias pattern claims the specifier.
    pub fn is_alias_claimed(&self, specifier: &str) -> bool {
        self.regexes.iter().any(|re| re.is_match(specifier))
    }

    /// Whether the generic resolver may handle the specifier.
    ///
    /// Both restrictions compose by intersection: not alias-claimed, and on
    /// the allow-list when one is configured.
    pub fn should_resolve(&self, specifier: &str) -> bool {
        if self.is_alias_claimed(specifier) {
            return false;
        }
        match &self.resolve_only {
            Some(allowed) => allowed.iter().any(|a| a == specifier),
            None => true,
        }
    }
}
