use std::fs;

use tempfile::TempDir;

use dtspack_core::options::ResolvePolicy;
use dtspack_core::tsconfig::{load_compiler_paths, CompilerPaths, ResolutionHints};

#[test]
fn missing_tsconfig_is_not_an_error() {
    let temp = TempDir::new().unwrap();
    let paths = load_compiler_paths(temp.path());
    assert_eq!(paths, CompilerPaths::default());
    assert!(!paths.is_configured());
}

#[test]
fn malformed_tsconfig_is_treated_as_absent() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("tsconfig.json"), "{ oops").unwrap();
    assert_eq!(load_compiler_paths(temp.path()), CompilerPaths::default());
}

#[test]
fn reads_base_url_and_paths() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("tsconfig.json"),
        r#"{
            "compilerOptions": {
                "baseUrl": ".",
                "paths": { "@app/*": ["src/app/*"], "@shared": ["src/shared/index.ts"] },
                "strict": true
            }
        }"#,
    )
    .unwrap();

    let paths = load_compiler_paths(temp.path());
    assert_eq!(paths.base_url.as_deref(), Some("."));
    assert_eq!(paths.paths.len(), 2);
    assert!(paths.is_configured());
}

fn alias_paths(patterns: &[&str]) -> CompilerPaths {
    CompilerPaths {
        base_url: Some(".".to_string()),
        paths: patterns
            .iter()
            .map(|p| (p.to_string(), vec!["src/*".to_string()]))
            .collect(),
    }
}

#[test]
fn disabled_policy_yields_no_hints() {
    let hints = ResolutionHints::derive(&ResolvePolicy::Disabled, &alias_paths(&["@app/*"]));
    assert!(hints.is_none());
}

#[test]
fn alias_patterns_claim_matching_specifiers_only() {
    let hints = ResolutionHints::derive(&ResolvePolicy::All, &alias_paths(&["@app/*"])).unwrap();
    let matcher = hints.matcher();

    assert!(matcher.is_alias_claimed("@app/foo"));
    assert!(matcher.is_alias_claimed("@app/deep/nested"));
    assert!(!matcher.is_alias_claimed("@lib/foo"));
    // The wildcard stands for one or more characters.
    assert!(!matcher.is_alias_claimed("@app/"));
    assert!(!matcher.is_alias_claimed("prefix@app/foo"));
}

#[test]
fn exact_alias_without_wildcard_matches_exactly() {
    let hints = ResolutionHints::derive(&ResolvePolicy::All, &alias_paths(&["@shared"])).unwrap();
    let matcher = hints.matcher();

    assert!(matcher.is_alias_claimed("@shared"));
    assert!(!matcher.is_alias_claimed("@shared/extra"));
}

#[test]
fn allow_list_and_alias_ignore_compose_by_intersection() {
    let policy = ResolvePolicy::Only(vec!["node".to_string(), "@app/types".to_string()]);
    let hints = ResolutionHints::derive(&policy, &alias_paths(&["@app/*"])).unwrap();
    let matcher = hints.matcher();

    // Allow-listed and not alias-claimed.
    assert!(matcher.should_resolve("node"));
    // Not allow-listed.
    assert!(!matcher.should_resolve("react"));
    // Allow-listed but alias-claimed: aliases win.
    assert!(!matcher.should_resolve("@app/types"));
}

#[test]
fn resolve_all_without_aliases_resolves_everything() {
    let hints = ResolutionHints::derive(&ResolvePolicy::All, &CompilerPaths::default()).unwrap();
    let matcher = hints.matcher();

    assert!(matcher.should_resolve("react"));
    assert!(matcher.should_resolve("@app/foo"));
}
