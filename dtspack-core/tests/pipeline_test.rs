use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use dtspack_core::externals::ExternalSet;
use dtspack_core::options::{DtsOptions, ResolvePolicy};
use dtspack_core::pipeline::{compose, Stage};
use dtspack_core::tsconfig::CompilerPaths;

fn options(clean: bool, resolve: ResolvePolicy) -> DtsOptions {
    DtsOptions {
        entries: vec![PathBuf::from("src/index.ts")],
        resolve,
        clean,
        out_dir: PathBuf::from("dist"),
        external: Vec::new(),
    }
}

fn externals(specifiers: &[&str]) -> ExternalSet {
    ExternalSet::from_specifiers(specifiers.iter().map(|s| s.to_string()).collect())
}

fn stage_names(stages: &[Stage]) -> Vec<&'static str> {
    stages.iter().map(|s| s.name()).collect()
}

#[test]
fn full_pipeline_keeps_the_fixed_stage_order() {
    let compiler_paths = CompilerPaths {
        base_url: Some(".".to_string()),
        paths: BTreeMap::from([("@app/*".to_string(), vec!["src/app/*".to_string()])]),
    };
    let pipeline = compose(
        Path::new("/project"),
        &options(true, ResolvePolicy::All),
        externals(&[]),
        &compiler_paths,
    );

    assert_eq!(
        stage_names(&pipeline.stages),
        vec!["clean", "alias-resolve", "hashbang", "json", "dts-emit"]
    );
}

#[test]
fn clean_stage_is_omitted_without_the_flag() {
    let pipeline = compose(
        Path::new("/project"),
        &options(false, ResolvePolicy::Disabled),
        externals(&[]),
        &CompilerPaths::default(),
    );

    assert!(!pipeline.has_stage("clean"));
    assert!(!pipeline.has_stage("alias-resolve"));
    // Hashbang and JSON handling are unconditional.
    assert!(pipeline.has_stage("hashbang"));
    assert!(pipeline.has_stage("json"));
    assert!(pipeline.has_stage("dts-emit"));
}

#[test]
fn clean_stage_targets_the_resolved_output_directory() {
    let pipeline = compose(
        Path::new("/project"),
        &options(true, ResolvePolicy::Disabled),
        externals(&[]),
        &CompilerPaths::default(),
    );

    match &pipeline.stages[0] {
        Stage::Clean { globs, dir } => {
            assert_eq!(globs, &vec!["**/*.d.ts".to_string()]);
            assert_eq!(dir, &PathBuf::from("/project/dist"));
        }
        other => panic!("expected clean first, got {:?}", other),
    }
}

#[test]
fn emission_gets_compiler_paths_only_when_fully_configured() {
    let base_only = CompilerPaths {
        base_url: Some(".".to_string()),
        paths: BTreeMap::new(),
    };
    let pipeline = compose(
        Path::new("/project"),
        &options(false, ResolvePolicy::Disabled),
        externals(&[]),
        &base_only,
    );
    let emit = pipeline.stages.last().unwrap();
    assert!(matches!(
        emit,
        Stage::DtsEmit {
            compiler_paths: None
        }
    ));

    let full = CompilerPaths {
        base_url: Some(".".to_string()),
        paths: BTreeMap::from([("@app/*".to_string(), vec!["src/app/*".to_string()])]),
    };
    let pipeline = compose(
        Path::new("/project"),
        &options(false, ResolvePolicy::Disabled),
        externals(&[]),
        &full,
    );
    match pipeline.stages.last().unwrap() {
        Stage::DtsEmit {
            compiler_paths: Some(paths),
        } => assert_eq!(paths, &full),
        other => panic!("expected configured emission, got {:?}", other),
    }
}

#[test]
fn resolve_only_list_is_carried_into_the_resolver_stage() {
    let pipeline = compose(
        Path::new("/project"),
        &options(false, ResolvePolicy::Only(vec!["node".to_string()])),
        externals(&["react"]),
        &CompilerPaths::default(),
    );

    let resolver = pipeline
        .stages
        .iter()
        .find_map(|s| match s {
            Stage::AliasResolve(hints) => Some(hints),
            _ => None,
        })
        .expect("resolver stage present");
    assert_eq!(resolver.resolve_only, Some(vec!["node".to_string()]));

    // Unlisted packages stay external; the resolver only inlines "node".
    assert!(pipeline.is_external("react"));
    assert!(!pipeline.is_external("node"));
}

#[test]
fn entry_points_are_never_classified_external() {
    let entry = "/project/src/index.ts";
    let pipeline = compose(
        Path::new("/project"),
        &options(false, ResolvePolicy::Disabled),
        // Pathological external set that names the entry itself.
        externals(&[entry, "react"]),
        &CompilerPaths::default(),
    );

    assert!(!pipeline.is_external(entry));
    assert!(pipeline.is_external("react"));
}
