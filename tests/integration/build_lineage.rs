// Integration tests for lineage assembly and the finishing pipeline
//
// These exercise the full build entry points against real descriptor
// files, a real store, and local repository directories.

use anyhow::Result;
use strata::core::Coordinate;
use strata::core::error::StrataError;

use crate::common::TestProject;

/// Test that a descriptor without a parent builds standalone with aligned
/// default layout and the built-in central repository inherited.
#[test]
fn test_single_descriptor_builds_standalone() -> Result<()> {
    strata::test_utils::init_test_logging(None);
    let project = TestProject::new()?;
    let path = project.write_descriptor(
        r#"
[project]
group = "com.example"
artifact = "app"
version = "1.0"
"#,
    )?;

    let built = project.builder()?.build_from_descriptor(&path, &project.store(), false)?;

    assert_eq!(built.display_name(), "com.example:app:1.0");
    assert_eq!(built.lineage_depth(), 1);

    let main = built.source_roots.main.as_deref().expect("main source root");
    assert!(main.is_absolute());
    assert_eq!(main, project.project_path().join("src/main"));

    // The super descriptor's repository declaration flowed into the model.
    assert!(built.effective.repositories.iter().any(|r| r.id == "central"));
    Ok(())
}

/// Test that layout alignment anchors at the descriptor's own directory,
/// not the working directory of the process.
#[test]
fn test_layout_aligns_to_descriptor_directory() -> Result<()> {
    let project = TestProject::new()?;
    let path = project.write_descriptor_at(
        "nested/module/strata.toml",
        r#"
[project]
group = "com.example"
artifact = "module"
version = "0.1"

[layout]
source-dir = "code"
"#,
    )?;

    let built = project.builder()?.build_from_descriptor(&path, &project.store(), false)?;

    assert_eq!(
        built.source_roots.main.as_deref(),
        Some(project.root().join("nested/module/code").as_path())
    );
    assert_eq!(built.basedir(), Some(project.root().join("nested/module").as_path()));
    Ok(())
}

/// Test resolving a parent through the store, with the ancestor chain
/// exposed on the built project.
#[test]
fn test_parent_chain_resolves_through_store() -> Result<()> {
    let project = TestProject::new()?;
    project.install_in_store("com.example", "base", "1.0", "")?;
    let path = project.write_descriptor(
        r#"
[project]
artifact = "app"

[parent]
group = "com.example"
artifact = "base"
version = "1.0"
"#,
    )?;

    let built = project.builder()?.build_from_descriptor(&path, &project.store(), false)?;

    assert_eq!(built.coordinate(), Some(Coordinate::new("com.example", "app", "1.0")));
    assert_eq!(built.lineage_depth(), 2);

    let parent = built.parent().expect("parent project");
    assert_eq!(parent.display_name(), "com.example:base:1.0");
    let parent_file = parent.file.as_deref().expect("parent origin file");
    assert!(parent_file.starts_with(project.store_path()));
    Ok(())
}

/// Test that a parent absent from the store is fetched from a declared
/// local repository and installed into the store.
#[test]
fn test_parent_fetched_from_repository_lands_in_store() -> Result<()> {
    let project = TestProject::new()?;
    let central = project.create_repo("central")?;
    project.publish(&central, "com.example", "base", "2.0", "")?;
    let path = project.write_descriptor(
        r#"
[project]
artifact = "app"

[parent]
group = "com.example"
artifact = "base"
version = "2.0"
"#,
    )?;

    let store = project.store();
    let coordinate = Coordinate::new("com.example", "base", "2.0");
    assert!(!store.contains_descriptor(&coordinate));

    let built = project.builder()?.build_from_descriptor(&path, &store, false)?;

    assert_eq!(built.lineage_depth(), 2);
    assert!(store.contains_descriptor(&coordinate), "fetched parent must be installed");
    Ok(())
}

/// Test that an incomplete [parent] section fails before any lookup.
#[test]
fn test_missing_parent_version_is_a_structural_error() -> Result<()> {
    let project = TestProject::new()?;
    let path = project.write_descriptor(
        r#"
[project]
artifact = "app"

[parent]
group = "com.example"
artifact = "base"
"#,
    )?;

    let err = project
        .builder()?
        .build_from_descriptor(&path, &project.store(), false)
        .unwrap_err();

    match err.downcast_ref::<StrataError>() {
        Some(StrataError::MissingParentCoordinate { field, descriptor }) => {
            assert_eq!(field, "version");
            assert!(descriptor.ends_with("strata.toml"), "descriptor: {descriptor}");
        }
        other => panic!("expected MissingParentCoordinate, got {other:?}"),
    }
    Ok(())
}

/// Test that an unresolvable parent carries the lookup failure as its
/// cause, naming the repositories that were searched.
#[test]
fn test_unknown_parent_names_searched_repositories() -> Result<()> {
    let project = TestProject::new()?;
    let path = project.write_descriptor(
        r#"
[project]
artifact = "app"

[parent]
group = "com.example"
artifact = "ghost"
version = "1.0"
"#,
    )?;

    let err = project
        .builder()?
        .build_from_descriptor(&path, &project.store(), false)
        .unwrap_err();

    match err.downcast_ref::<StrataError>() {
        Some(StrataError::ParentNotFound { coordinate, source }) => {
            assert_eq!(coordinate, "com.example:ghost:1.0");
            match &**source {
                StrataError::ArtifactNotFound { repositories, .. } => {
                    assert!(
                        repositories.iter().any(|r| r.starts_with("central (")),
                        "searched: {repositories:?}"
                    );
                }
                other => panic!("expected ArtifactNotFound cause, got {other:?}"),
            }
        }
        other => panic!("expected ParentNotFound, got {other:?}"),
    }
    Ok(())
}

/// Test that a cyclic parent chain is reported with the full chain walked.
#[test]
fn test_cyclic_parent_chain_reports_the_walk() -> Result<()> {
    let project = TestProject::new()?;
    project.install_in_store(
        "com.example",
        "a",
        "1.0",
        "\n[parent]\ngroup = \"com.example\"\nartifact = \"b\"\nversion = \"1.0\"\n",
    )?;
    project.install_in_store(
        "com.example",
        "b",
        "1.0",
        "\n[parent]\ngroup = \"com.example\"\nartifact = \"a\"\nversion = \"1.0\"\n",
    )?;
    let path = project.write_descriptor(
        r#"
[project]
artifact = "app"

[parent]
group = "com.example"
artifact = "a"
version = "1.0"
"#,
    )?;

    let err = project
        .builder()?
        .build_from_descriptor(&path, &project.store(), false)
        .unwrap_err();

    match err.downcast_ref::<StrataError>() {
        Some(StrataError::CyclicParentChain { chain }) => {
            assert_eq!(chain, "com.example:a:1.0 -> com.example:b:1.0 -> com.example:a:1.0");
        }
        other => panic!("expected CyclicParentChain, got {other:?}"),
    }
    Ok(())
}

/// Test building a published coordinate directly: layout stays relative
/// and the origin file lives in the store.
#[test]
fn test_build_from_artifact_keeps_declared_layout() -> Result<()> {
    let project = TestProject::new()?;
    project.install_in_store(
        "com.example",
        "lib",
        "1.0",
        "\n[layout]\nsource-dir = \"src/main\"\n",
    )?;

    let store = project.store();
    let built = project
        .builder()?
        .build_from_artifact(&Coordinate::new("com.example", "lib", "1.0"), &store)?;

    assert_eq!(built.display_name(), "com.example:lib:1.0");
    assert_eq!(built.effective.layout.source_dir.as_deref(), Some("src/main"));
    assert!(built.file.as_deref().expect("origin file").starts_with(store.root()));
    Ok(())
}

/// Test the built-in defaults as a standalone project.
#[test]
fn test_super_project_carries_stub_identity() -> Result<()> {
    let project = TestProject::new()?;

    let built = project.builder()?.build_super_project(&project.store())?;

    assert_eq!(
        built.coordinate(),
        Some(Coordinate::new("io.strata.internal", "standalone", "0"))
    );
    assert!(built.parent().is_none());
    assert!(built.effective.repositories.iter().any(|r| r.id == "central"));
    Ok(())
}
