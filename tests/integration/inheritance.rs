// Integration tests for model inheritance across real descriptor chains
//
// The merge rules themselves are covered at the unit level; these tests
// check that they hold end to end when ancestors come out of the store.

use anyhow::Result;
use strata::core::Coordinate;
use strata::core::error::StrataError;

use crate::common::TestProject;

/// Test that group and version flow down while the artifact stays the
/// child's own.
#[test]
fn test_identity_inherited_except_artifact() -> Result<()> {
    let project = TestProject::new()?;
    project.install_in_store("com.example", "base", "3.1", "")?;
    let path = project.write_descriptor(
        r#"
[project]
artifact = "billing"

[parent]
group = "com.example"
artifact = "base"
version = "3.1"
"#,
    )?;

    let built = project.builder()?.build_from_descriptor(&path, &project.store(), false)?;
    assert_eq!(built.coordinate(), Some(Coordinate::new("com.example", "billing", "3.1")));
    Ok(())
}

/// Test that a child's own values beat everything inherited.
#[test]
fn test_child_declarations_override_inherited() -> Result<()> {
    let project = TestProject::new()?;
    project.install_in_store(
        "com.example",
        "base",
        "1.0",
        "\n[layout]\nsource-dir = \"base/src\"\n\n[properties]\nflavor = \"vanilla\"\n",
    )?;
    let path = project.write_descriptor(
        r#"
[project]
artifact = "app"
version = "9.9"

[layout]
source-dir = "own/src"

[properties]
flavor = "custom"

[parent]
group = "com.example"
artifact = "base"
version = "1.0"
"#,
    )?;

    let built = project.builder()?.build_from_descriptor(&path, &project.store(), false)?;

    assert_eq!(built.effective.project.version.as_deref(), Some("9.9"));
    assert_eq!(
        built.effective.properties.get("flavor").map(String::as_str),
        Some("custom")
    );
    let main = built.source_roots.main.as_deref().expect("main source root");
    assert!(main.ends_with("own/src"), "got {}", main.display());
    Ok(())
}

/// Test that a module omitting its artifact fails validation even with a
/// fully specified parent: the name is never inherited.
#[test]
fn test_artifact_name_is_never_inherited() -> Result<()> {
    let project = TestProject::new()?;
    project.install_in_store("com.example", "base", "1.0", "")?;
    let path = project.write_descriptor(
        r#"
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
        Some(StrataError::Validation(report)) => {
            assert_eq!(report.violations().len(), 1, "report: {report}");
            assert!(report.violations()[0].contains("'project.artifact'"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    Ok(())
}

/// Test dependency union: the child's redeclaration wins by
/// (group, artifact) key and the parent's remaining entries follow.
#[test]
fn test_dependencies_union_child_first() -> Result<()> {
    let project = TestProject::new()?;
    project.install_in_store(
        "com.example",
        "base",
        "1.0",
        "\n[[dependencies]]\ngroup = \"com.example\"\nartifact = \"shared\"\nversion = \"1.0\"\n\n\
         [[dependencies]]\ngroup = \"com.example\"\nartifact = \"extra\"\nversion = \"2.0\"\n",
    )?;
    let path = project.write_descriptor(
        r#"
[project]
artifact = "app"

[[dependencies]]
group = "com.example"
artifact = "shared"
version = "5.0"

[parent]
group = "com.example"
artifact = "base"
version = "1.0"
"#,
    )?;

    let built = project.builder()?.build_from_descriptor(&path, &project.store(), false)?;

    let summary: Vec<(String, String)> = built
        .effective
        .dependencies
        .iter()
        .map(|d| (d.artifact.clone(), d.version.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("shared".to_string(), "5.0".to_string()),
            ("extra".to_string(), "2.0".to_string()),
        ]
    );

    // Materialized artifacts follow the same effective order.
    let names: Vec<&str> = built.artifacts.iter().map(|a| a.coordinate.artifact.as_str()).collect();
    assert_eq!(names, vec!["shared", "extra"]);
    Ok(())
}

/// Test that repositories merge by id, preferring the child's URL.
#[test]
fn test_repositories_merge_by_id() -> Result<()> {
    let project = TestProject::new()?;
    project.install_in_store(
        "com.example",
        "base",
        "1.0",
        "\n[[repositories]]\nid = \"shared\"\nurl = \"https://parent.example/store\"\n",
    )?;
    let path = project.write_descriptor(
        r#"
[project]
artifact = "app"

[[repositories]]
id = "shared"
url = "https://child.example/store"

[parent]
group = "com.example"
artifact = "base"
version = "1.0"
"#,
    )?;

    let built = project.builder()?.build_from_descriptor(&path, &project.store(), false)?;

    let shared: Vec<&str> = built
        .effective
        .repositories
        .iter()
        .filter(|r| r.id == "shared")
        .map(|r| r.url.as_str())
        .collect();
    assert_eq!(shared, vec!["https://child.example/store"]);
    Ok(())
}

/// Test that values declared only on the grandparent survive an entirely
/// silent middle level.
#[test]
fn test_grandparent_values_cross_a_silent_middle() -> Result<()> {
    let project = TestProject::new()?;
    project.install_in_store(
        "com.example",
        "org",
        "7.0",
        "\n[properties]\n\"product.line\" = \"alpha\"\n",
    )?;
    project.install_in_store(
        "com.example",
        "platform",
        "7.0",
        "\n[parent]\ngroup = \"com.example\"\nartifact = \"org\"\nversion = \"7.0\"\n",
    )?;
    let path = project.write_descriptor(
        r#"
[project]
artifact = "app"

[parent]
group = "com.example"
artifact = "platform"
version = "7.0"
"#,
    )?;

    let built = project.builder()?.build_from_descriptor(&path, &project.store(), false)?;

    assert_eq!(built.coordinate(), Some(Coordinate::new("com.example", "app", "7.0")));
    assert_eq!(built.lineage_depth(), 3);
    assert_eq!(
        built.effective.properties.get("product.line").map(String::as_str),
        Some("alpha")
    );

    // Each ancestor keeps its own effective identity.
    let middle = built.parent().expect("middle ancestor");
    assert_eq!(middle.display_name(), "com.example:platform:7.0");
    assert_eq!(
        middle.parent().expect("root ancestor").display_name(),
        "com.example:org:7.0"
    );
    Ok(())
}
