//! Classification of module specifiers that stay external to the bundle.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Collaborator that reports a project's declared runtime dependencies.
///
/// Implementations may read manifest files and can therefore fail with an
/// I/O error, which callers must propagate rather than swallow.
pub trait DependencyScanner: Send + Sync {
    fn scan(&self, root: &Path) -> Result<BTreeSet<String>>;
}

/// Default scanner reading `package.json` at the project root.
///
/// Both `dependencies` and `peerDependencies` count: either way the package
/// is installed next to the output and its types must not be inlined.
pub struct PackageJsonScanner;

impl DependencyScanner for PackageJsonScanner {
    fn scan(&self, root: &Path) -> Result<BTreeSet<String>> {
        let manifest = root.join("package.json");
        let content = fs::read_to_string(&manifest).map_err(|e| Error::DependencyScan {
            path: manifest.clone(),
            message: e.to_string(),
        })?;
        let json: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| Error::DependencyScan {
                path: manifest,
                message: format!("invalid package.json: {}", e),
            })?;

        let mut deps = BTreeSet::new();
        for section in ["dependencies", "peerDependencies"] {
            if let Some(map) = json.get(section).and_then(|v| v.as_object()) {
                deps.extend(map.keys().cloned());
            }
        }
        Ok(deps)
    }
}

/// Module specifiers left unbundled.
///
/// Plain concatenation of scanned dependencies and user externals; duplicates
/// are harmless because this is only ever used as a membership predicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalSet {
    specifiers: Vec<String>,
}

impl ExternalSet {
    /// Scans the project root and merges in the user-declared externals.
    ///
    /// No caching across invocations: each build re-scans, so manifest edits
    /// take effect without a restart.
    pub fn collect(
        scanner: &dyn DependencyScanner,
        root: &Path,
        user_externals: &[String],
    ) -> Result<Self> {
        let deps = scanner.scan(root)?;
        let mut specifiers: Vec<String> = deps.into_iter().collect();
        specifiers.extend(user_externals.iter().cloned());
        Ok(Self { specifiers })
    }

    pub fn from_specifiers(specifiers: Vec<String>) -> Self {
        Self { specifiers }
    }

    pub fn contains(&self, specifier: &str) -> bool {
        self.specifiers.iter().any(|s| s == specifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.specifiers.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.specifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specifiers.is_empty()
    }
}
