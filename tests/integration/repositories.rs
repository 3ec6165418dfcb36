// Integration tests for repository accumulation, overrides, and checksums
//
// Repositories here are local directories sharing the store's coordinate
// layout, so everything runs offline.

use anyhow::Result;
use std::fs;
use strata::core::Coordinate;
use strata::core::error::StrataError;
use strata::store::checksum_sibling;

use crate::common::{TestProject, toml_path};

/// Test the descent-order accumulation guarantee: an ancestor is
/// discoverable through repositories declared by any level below it.
///
/// The leaf declares only `near`; the parent lives in `near` and declares
/// `deep`; the grandparent lives only in `deep`.
#[test]
fn test_repositories_accumulate_while_descending() -> Result<()> {
    strata::test_utils::init_test_logging(None);
    let project = TestProject::new()?;
    let near = project.create_repo("near")?;
    let deep = project.create_repo("deep")?;

    project.publish(&deep, "com.example", "org", "1.0", "")?;
    project.publish(
        &near,
        "com.example",
        "platform",
        "1.0",
        &format!(
            "\n[[repositories]]\nid = \"deep\"\nurl = \"{}\"\n\n\
             [parent]\ngroup = \"com.example\"\nartifact = \"org\"\nversion = \"1.0\"\n",
            toml_path(&deep)
        ),
    )?;
    let path = project.write_descriptor(&format!(
        r#"
[project]
artifact = "app"

[[repositories]]
id = "near"
url = "{}"

[parent]
group = "com.example"
artifact = "platform"
version = "1.0"
"#,
        toml_path(&near)
    ))?;

    let store = project.store();
    let built = project.builder()?.build_from_descriptor(&path, &store, false)?;

    assert_eq!(built.lineage_depth(), 3);
    assert_eq!(
        built.parent().and_then(|p| p.parent()).map(|root| root.display_name()),
        Some("com.example:org:1.0".to_string())
    );

    // Both ancestors were fetched and installed.
    assert!(store.contains_descriptor(&Coordinate::new("com.example", "platform", "1.0")));
    assert!(store.contains_descriptor(&Coordinate::new("com.example", "org", "1.0")));
    Ok(())
}

/// Test the converse: a repository first declared by the ancestor that
/// needs it is declared too late to find that ancestor.
#[test]
fn test_repository_declared_by_the_missing_level_is_too_late() -> Result<()> {
    let project = TestProject::new()?;
    let deep = project.create_repo("deep")?;

    // The grandparent names its own repository, but nothing below does.
    project.publish(
        &deep,
        "com.example",
        "org",
        "1.0",
        &format!("\n[[repositories]]\nid = \"deep\"\nurl = \"{}\"\n", toml_path(&deep)),
    )?;
    project.install_in_store(
        "com.example",
        "platform",
        "1.0",
        "\n[parent]\ngroup = \"com.example\"\nartifact = \"org\"\nversion = \"1.0\"\n",
    )?;
    let path = project.write_descriptor(
        r#"
[project]
artifact = "app"

[parent]
group = "com.example"
artifact = "platform"
version = "1.0"
"#,
    )?;

    let err = project
        .builder()?
        .build_from_descriptor(&path, &project.store(), false)
        .unwrap_err();

    match err.downcast_ref::<StrataError>() {
        Some(StrataError::ParentNotFound { coordinate, source }) => {
            assert_eq!(coordinate, "com.example:org:1.0");
            match &**source {
                StrataError::ArtifactNotFound { repositories, .. } => {
                    assert!(
                        !repositories.iter().any(|r| r.starts_with("deep")),
                        "deep must not have been searched: {repositories:?}"
                    );
                }
                other => panic!("expected ArtifactNotFound cause, got {other:?}"),
            }
        }
        other => panic!("expected ParentNotFound, got {other:?}"),
    }
    Ok(())
}

/// Test that a settings override redirects a declared repository by id,
/// regardless of the URL in the descriptor.
#[test]
fn test_settings_override_redirects_by_id() -> Result<()> {
    let project = TestProject::new()?;
    let mirror = project.create_repo("corp-mirror")?;
    project.publish(&mirror, "com.example", "base", "1.0", "")?;
    project.set_overrides(&[("corp", &mirror)])?;

    let path = project.write_descriptor(
        r#"
[project]
artifact = "app"

[[repositories]]
id = "corp"
url = "https://corp.example/store"

[parent]
group = "com.example"
artifact = "base"
version = "1.0"
"#,
    )?;

    let built = project.builder()?.build_from_descriptor(&path, &project.store(), false)?;
    assert_eq!(built.lineage_depth(), 2);
    Ok(())
}

/// Test that a store copy wins over anything a repository publishes.
#[test]
fn test_store_copy_shadows_repository_copy() -> Result<()> {
    let project = TestProject::new()?;
    let central = project.create_repo("central")?;

    project.install_in_store(
        "com.example",
        "base",
        "1.0",
        "\n[properties]\norigin = \"store\"\n",
    )?;
    project.publish(
        &central,
        "com.example",
        "base",
        "1.0",
        "\n[properties]\norigin = \"repository\"\n",
    )?;

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
    assert_eq!(
        built.effective.properties.get("origin").map(String::as_str),
        Some("store")
    );
    Ok(())
}

/// Test that a descriptor failing checksum verification aborts the build
/// instead of being treated as a miss.
#[test]
fn test_tampered_descriptor_fails_checksum_verification() -> Result<()> {
    let project = TestProject::new()?;
    let central = project.create_repo("central")?;
    let published = project.publish(&central, "com.example", "base", "1.0", "")?;

    // Rewrite the published file; the recorded checksum no longer matches.
    fs::write(
        &published,
        "[project]\ngroup = \"com.example\"\nartifact = \"base\"\nversion = \"1.0\"\ntampered = true\n",
    )?;
    assert!(checksum_sibling(&published).is_file());

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

    let err = project
        .builder()?
        .build_from_descriptor(&path, &project.store(), false)
        .unwrap_err();

    match err.downcast_ref::<StrataError>() {
        Some(StrataError::ParentNotFound { source, .. }) => match &**source {
            StrataError::ChecksumMismatch { coordinate, expected, actual } => {
                assert_eq!(coordinate, "com.example:base:1.0");
                assert_ne!(expected, actual);
            }
            other => panic!("expected ChecksumMismatch cause, got {other:?}"),
        },
        other => panic!("expected ParentNotFound, got {other:?}"),
    }
    Ok(())
}
