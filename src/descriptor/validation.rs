//! Structural validation of finished descriptors.
//!
//! Validation runs at the end of the finishing pipeline, after inheritance,
//! interpolation, and default injection, so a field counts as missing only
//! when no level of the lineage supplied it. Every rule is checked and every
//! violation collected before the build fails; callers get the complete
//! report in one pass.

use crate::core::error::StrataError;
use crate::descriptor::Descriptor;
use std::fmt;

/// The aggregate result of validating one descriptor.
///
/// Carried by [`StrataError::Validation`] when any violation was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    project: String,
    violations: Vec<String>,
}

impl ValidationReport {
    /// Start an empty report for the named project.
    #[must_use]
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            violations: Vec::new(),
        }
    }

    /// Record one violation.
    pub fn record(&mut self, violation: impl Into<String>) {
        self.violations.push(violation.into());
    }

    /// True when no violation was recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// All recorded violations, in check order.
    #[must_use]
    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// The display name of the validated project.
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Convert into a build result: `Ok` when clean, otherwise
    /// [`StrataError::Validation`] carrying this report.
    pub fn into_result(self) -> Result<(), StrataError> {
        if self.is_clean() { Ok(()) } else { Err(StrataError::Validation(self)) }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "validation of {} failed with {} problem(s):",
            self.project,
            self.violations.len()
        )?;
        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

/// Check the resolved model against the structural rules.
///
/// Expects a finished descriptor. Rules, in order:
/// - `project.group`, `project.artifact`, and `project.version` present and
///   non-blank (the artifact is never inherited, so a module without one is
///   always a violation);
/// - each dependency carries non-blank `group`, `artifact`, and `version`;
/// - layout directories are non-blank and contain no parent-directory
///   traversal;
/// - each repository carries a non-blank `id` and a non-blank, supported
///   `url`.
#[must_use]
pub fn validate(descriptor: &Descriptor) -> ValidationReport {
    let mut report = ValidationReport::new(descriptor.display_name());

    check_identity_field(&mut report, "project.group", descriptor.project.group.as_deref());
    check_identity_field(&mut report, "project.artifact", descriptor.project.artifact.as_deref());
    check_identity_field(&mut report, "project.version", descriptor.project.version.as_deref());

    for (index, dependency) in descriptor.dependencies.iter().enumerate() {
        let label = format!("{}:{}", dependency.group, dependency.artifact);
        if dependency.group.trim().is_empty() {
            report.record(format!("'dependencies[{index}].group' is missing"));
        }
        if dependency.artifact.trim().is_empty() {
            report.record(format!("'dependencies[{index}].artifact' is missing"));
        }
        if dependency.version.trim().is_empty() {
            report.record(format!("'dependencies[{index}].version' is missing for {label}"));
        }
    }

    check_layout_dir(&mut report, "layout.source-dir", descriptor.layout.source_dir.as_deref());
    check_layout_dir(
        &mut report,
        "layout.test-source-dir",
        descriptor.layout.test_source_dir.as_deref(),
    );
    check_layout_dir(
        &mut report,
        "layout.script-source-dir",
        descriptor.layout.script_source_dir.as_deref(),
    );

    for (index, repository) in descriptor.repositories.iter().enumerate() {
        if repository.id.trim().is_empty() {
            report.record(format!("'repositories[{index}].id' is missing"));
        }
        if repository.url.trim().is_empty() {
            report.record(format!(
                "'repositories[{index}].url' is missing for repository '{}'",
                repository.id
            ));
        } else if let Some(scheme) = unsupported_scheme(&repository.url) {
            report.record(format!(
                "'repositories[{index}].url' uses unsupported scheme '{scheme}' (supported: https, http, file, local paths)"
            ));
        }
    }

    report
}

fn check_identity_field(report: &mut ValidationReport, field: &str, value: Option<&str>) {
    match value {
        None => report.record(format!("'{field}' is missing")),
        Some(v) if v.trim().is_empty() => report.record(format!("'{field}' is blank")),
        Some(_) => {}
    }
}

fn check_layout_dir(report: &mut ValidationReport, field: &str, value: Option<&str>) {
    // None only occurs on raw models; default injection fills these before
    // validation runs in a build.
    let Some(dir) = value else { return };
    if dir.trim().is_empty() {
        report.record(format!("'{field}' is blank"));
    } else if std::path::Path::new(dir)
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        report.record(format!("'{field}' must not contain parent-directory traversal: {dir}"));
    }
}

/// The scheme of `url` when it is one strata cannot serve, `None` when the
/// URL is usable. Bare filesystem paths have no scheme and are usable.
fn unsupported_scheme(url: &str) -> Option<&str> {
    let (scheme, _) = url.split_once("://")?;
    match scheme {
        "https" | "http" | "file" => None,
        other => Some(other),
    }
}
