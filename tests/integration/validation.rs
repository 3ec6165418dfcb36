// Integration tests for aggregate validation of finished models

use anyhow::Result;
use strata::core::error::StrataError;

use crate::common::TestProject;

/// Test that every violation is collected in one pass rather than the
/// build stopping at the first problem.
#[test]
fn test_all_violations_reported_together() -> Result<()> {
    let project = TestProject::new()?;
    let path = project.write_descriptor(
        r#"
[project]
artifact = "app"

[layout]
source-dir = "../outside/src"

[[dependencies]]
group = "com.example"
artifact = "commons"
version = ""
"#,
    )?;

    let err = project
        .builder()?
        .build_from_descriptor(&path, &project.store(), false)
        .unwrap_err();

    match err.downcast_ref::<StrataError>() {
        Some(StrataError::Validation(report)) => {
            assert_eq!(report.violations().len(), 4, "report: {report}");
            let rendered = report.to_string();
            assert!(rendered.contains("'project.group' is missing"));
            assert!(rendered.contains("'project.version' is missing"));
            assert!(rendered.contains("'dependencies[0].version' is missing"));
            assert!(rendered.contains("parent-directory traversal"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    Ok(())
}

/// Test that fields supplied by an ancestor satisfy the identity rules.
#[test]
fn test_inherited_identity_passes_validation() -> Result<()> {
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
    assert_eq!(built.display_name(), "com.example:app:1.0");
    Ok(())
}

/// Test that layout traversal is still caught after alignment anchors the
/// directory at the descriptor's location.
#[test]
fn test_layout_traversal_rejected_after_alignment() -> Result<()> {
    let project = TestProject::new()?;
    let path = project.write_descriptor(
        r#"
[project]
group = "com.example"
artifact = "app"
version = "1.0"

[layout]
test-source-dir = "../sibling/tests"
"#,
    )?;

    let err = project
        .builder()?
        .build_from_descriptor(&path, &project.store(), false)
        .unwrap_err();

    match err.downcast_ref::<StrataError>() {
        Some(StrataError::Validation(report)) => {
            assert_eq!(report.violations().len(), 1, "report: {report}");
            assert!(report.violations()[0].contains("layout.test-source-dir"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    Ok(())
}

/// Test that an unsupported repository scheme is a violation while plain
/// paths and file URLs pass.
#[test]
fn test_repository_scheme_rules() -> Result<()> {
    let project = TestProject::new()?;
    let path = project.write_descriptor(
        r#"
[project]
group = "com.example"
artifact = "app"
version = "1.0"

[[repositories]]
id = "ok-file"
url = "file:///var/repo"

[[repositories]]
id = "ok-path"
url = "/var/repo"

[[repositories]]
id = "bad"
url = "ssh://repo.example.io/store"
"#,
    )?;

    let err = project
        .builder()?
        .build_from_descriptor(&path, &project.store(), false)
        .unwrap_err();

    match err.downcast_ref::<StrataError>() {
        Some(StrataError::Validation(report)) => {
            assert_eq!(report.violations().len(), 1, "report: {report}");
            assert!(report.violations()[0].contains("unsupported scheme 'ssh'"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }
    Ok(())
}
