//! Normalization of the user-facing dts option.
//!
//! The raw option is boolean | string | object shaped. Everything downstream
//! works from the canonical [`DtsOptions`] record; nothing branches on the
//! raw shape after [`DtsOptions::normalize`] has run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Raw dts option as it appears in user configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DtsConfig {
    /// `true` enables the feature with the build's default entry points,
    /// `false` disables it entirely.
    Enabled(bool),
    /// A single custom entry file.
    Entry(String),
    /// Structured form with its own entry override and feature flags.
    Full(DtsObject),
}

impl Default for DtsConfig {
    fn default() -> Self {
        DtsConfig::Enabled(false)
    }
}

/// Entry override inside the structured dts option.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntrySpec {
    One(String),
    Many(Vec<String>),
}

/// Resolve flag inside the structured dts option.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolveConfig {
    /// `true` resolves every external type reachable from the entries.
    All(bool),
    /// Resolve only these named packages, leave the rest external.
    Only(Vec<String>),
}

/// Structured dts option.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DtsObject {
    #[serde(default)]
    pub entry: Option<EntrySpec>,
    #[serde(default)]
    pub resolve: Option<ResolveConfig>,
}

/// Options of the surrounding build, as handed to this subsystem.
///
/// This is also the payload of a worker request, so it deserializes from the
/// raw JSON shape the host sends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "default_entry_points")]
    pub entry_points: Vec<PathBuf>,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default)]
    pub external: Vec<String>,
    #[serde(default)]
    pub clean: bool,
    #[serde(default)]
    pub watch: bool,
    #[serde(default)]
    pub debounce_ms: Option<u64>,
    #[serde(default)]
    pub dts: DtsConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            entry_points: default_entry_points(),
            out_dir: default_out_dir(),
            external: Vec::new(),
            clean: false,
            watch: false,
            debounce_ms: None,
            dts: DtsConfig::default(),
        }
    }
}

fn default_entry_points() -> Vec<PathBuf> {
    vec![PathBuf::from("src/index.ts")]
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("dist")
}

/// Which external types the resolver stage should inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolvePolicy {
    Disabled,
    All,
    Only(Vec<String>),
}

impl ResolvePolicy {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, ResolvePolicy::Disabled)
    }
}

/// Canonical declaration-build options, immutable after construction.
#[derive(Debug, Clone)]
pub struct DtsOptions {
    /// Ordered, non-empty entry set.
    pub entries: Vec<PathBuf>,
    pub resolve: ResolvePolicy,
    pub clean: bool,
    pub out_dir: PathBuf,
    /// User-declared externals, merged with scanned dependencies later.
    pub external: Vec<String>,
}

impl DtsOptions {
    /// Normalizes the raw option against the surrounding build's options.
    ///
    /// Returns `None` when the feature is disabled. Entry resolution failures
    /// are not detected here; they surface during pipeline execution.
    pub fn normalize(config: &BuildConfig) -> Option<Self> {
        let (entries, resolve) = match &config.dts {
            DtsConfig::Enabled(false) => return None,
            DtsConfig::Enabled(true) => (config.entry_points.clone(), ResolvePolicy::Disabled),
            DtsConfig::Entry(entry) => (vec![PathBuf::from(entry)], ResolvePolicy::Disabled),
            DtsConfig::Full(object) => {
                let entries = match &object.entry {
                    Some(EntrySpec::One(entry)) => vec![PathBuf::from(entry)],
                    Some(EntrySpec::Many(entries)) => {
                        entries.iter().map(PathBuf::from).collect()
                    }
                    None => config.entry_points.clone(),
                };
                let resolve = match &object.resolve {
                    None | Some(ResolveConfig::All(false)) => ResolvePolicy::Disabled,
                    Some(ResolveConfig::All(true)) => ResolvePolicy::All,
                    Some(ResolveConfig::Only(packages)) => {
                        ResolvePolicy::Only(packages.clone())
                    }
                };
                (entries, resolve)
            }
        };

        // An explicit empty entry list falls back to the build defaults so
        // the entry set is never empty.
        let entries = if entries.is_empty() {
            default_entry_points()
        } else {
            entries
        };

        Some(Self {
            entries,
            resolve,
            clean: config.clean,
            out_dir: config.out_dir.clone(),
            external: config.external.clone(),
        })
    }
}
