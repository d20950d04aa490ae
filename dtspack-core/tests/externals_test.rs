use std::fs;

use tempfile::TempDir;

use dtspack_core::externals::{DependencyScanner, ExternalSet, PackageJsonScanner};

fn write_manifest(dir: &std::path::Path, content: &str) {
    fs::write(dir.join("package.json"), content).unwrap();
}

#[test]
fn scans_dependencies_and_peer_dependencies() {
    let temp = TempDir::new().unwrap();
    write_manifest(
        temp.path(),
        r#"{
            "name": "lib",
            "dependencies": { "react": "^18.0.0", "colorette": "^2.0.0" },
            "peerDependencies": { "typescript": ">=4.0.0" },
            "devDependencies": { "vitest": "^1.0.0" }
        }"#,
    );

    let deps = PackageJsonScanner.scan(temp.path()).unwrap();
    assert!(deps.contains("react"));
    assert!(deps.contains("colorette"));
    assert!(deps.contains("typescript"));
    // Dev dependencies are build-time only and may be inlined.
    assert!(!deps.contains("vitest"));
}

#[test]
fn external_set_is_a_superset_of_scanned_dependencies() {
    let temp = TempDir::new().unwrap();
    write_manifest(
        temp.path(),
        r#"{ "dependencies": { "react": "^18.0.0", "vue": "^3.0.0" } }"#,
    );

    let user = vec!["lodash".to_string()];
    let set = ExternalSet::collect(&PackageJsonScanner, temp.path(), &user).unwrap();

    for dep in PackageJsonScanner.scan(temp.path()).unwrap() {
        assert!(set.contains(&dep));
    }
    assert!(set.contains("lodash"));
    assert!(!set.contains("svelte"));
}

#[test]
fn duplicate_user_externals_are_harmless() {
    let temp = TempDir::new().unwrap();
    write_manifest(temp.path(), r#"{ "dependencies": { "react": "^18.0.0" } }"#);

    let user = vec!["react".to_string()];
    let set = ExternalSet::collect(&PackageJsonScanner, temp.path(), &user).unwrap();
    assert!(set.contains("react"));
    assert_eq!(set.len(), 2);
}

#[test]
fn missing_manifest_propagates_an_error() {
    let temp = TempDir::new().unwrap();
    assert!(PackageJsonScanner.scan(temp.path()).is_err());
}

#[test]
fn malformed_manifest_propagates_an_error() {
    let temp = TempDir::new().unwrap();
    write_manifest(temp.path(), "{ not json");
    assert!(PackageJsonScanner.scan(temp.path()).is_err());
}
