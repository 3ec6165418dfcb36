//! Variable interpolation over effective descriptors.
//!
//! Resolves `${...}` expressions embedded in string fields against the
//! descriptor's own resolved state: the reserved `project.group`,
//! `project.artifact`, and `project.version` expressions plus the merged
//! `[properties]` table. Property values may themselves contain references;
//! chains resolve up to [`MAX_INTERPOLATION_DEPTH`] levels, which is how a
//! self-referential property surfaces as an error instead of a hang.
//!
//! Interpolation runs before default injection, so injected defaults are
//! always literal and never re-scanned.
//!
//! An unresolvable expression is a hard [`StrataError::Interpolation`];
//! descriptors never flow downstream with `${...}` fragments left in place.

use crate::constants::MAX_INTERPOLATION_DEPTH;
use crate::core::error::StrataError;
use crate::descriptor::Descriptor;
use regex::Regex;
use std::sync::OnceLock;

fn expression_regex() -> &'static Regex {
    static EXPRESSION: OnceLock<Regex> = OnceLock::new();
    EXPRESSION.get_or_init(|| Regex::new(r"\$\{[^}]*\}").unwrap())
}

/// Substitute every `${...}` expression in the descriptor's string fields.
///
/// The lookup context is captured from `descriptor` itself before any
/// substitution, so a field referencing `${project.version}` sees the
/// inherited value even while identity fields are themselves rewritten.
///
/// # Errors
///
/// Returns [`StrataError::Interpolation`] for an unknown expression, a
/// reference to an unset identity field, or a reference chain deeper than
/// [`MAX_INTERPOLATION_DEPTH`].
pub fn interpolate(descriptor: &Descriptor) -> Result<Descriptor, StrataError> {
    let context = Context::from(descriptor);
    let mut out = descriptor.clone();

    out.project.group = context.apply_opt(&descriptor.project.group)?;
    out.project.artifact = context.apply_opt(&descriptor.project.artifact)?;
    out.project.version = context.apply_opt(&descriptor.project.version)?;

    if let Some(parent) = &mut out.parent {
        parent.group = context.apply(&parent.group)?;
        parent.artifact = context.apply(&parent.artifact)?;
        parent.version = context.apply(&parent.version)?;
    }

    out.layout.source_dir = context.apply_opt(&descriptor.layout.source_dir)?;
    out.layout.test_source_dir = context.apply_opt(&descriptor.layout.test_source_dir)?;
    out.layout.script_source_dir = context.apply_opt(&descriptor.layout.script_source_dir)?;

    for dependency in &mut out.dependencies {
        dependency.group = context.apply(&dependency.group)?;
        dependency.artifact = context.apply(&dependency.artifact)?;
        dependency.version = context.apply(&dependency.version)?;
        dependency.kind = context.apply_opt(&dependency.kind)?;
        dependency.scope = context.apply_opt(&dependency.scope)?;
    }

    for repository in &mut out.repositories {
        repository.id = context.apply(&repository.id)?;
        repository.url = context.apply(&repository.url)?;
    }

    for value in out.properties.values_mut() {
        *value = context.apply(value)?;
    }

    Ok(out)
}

/// Lookup context snapshotted from the pre-interpolation descriptor.
struct Context<'a> {
    descriptor: &'a Descriptor,
}

impl<'a> Context<'a> {
    fn from(descriptor: &'a Descriptor) -> Self {
        Self {
            descriptor,
        }
    }

    fn apply(&self, input: &str) -> Result<String, StrataError> {
        self.substitute(input, 0)
    }

    fn apply_opt(&self, input: &Option<String>) -> Result<Option<String>, StrataError> {
        input.as_deref().map(|s| self.substitute(s, 0)).transpose()
    }

    /// Replace every expression in `input`, resolving recursively.
    fn substitute(&self, input: &str, depth: usize) -> Result<String, StrataError> {
        // Fast path: most fields carry no expression at all.
        if !input.contains("${") {
            return Ok(input.to_string());
        }

        let mut out = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(found) = expression_regex().find(rest) {
            out.push_str(&rest[..found.start()]);
            let matched = found.as_str();
            let expression = &matched[2..matched.len() - 1];
            out.push_str(&self.resolve(expression, depth)?);
            rest = &rest[found.end()..];
        }
        out.push_str(rest);
        Ok(out)
    }

    fn resolve(&self, expression: &str, depth: usize) -> Result<String, StrataError> {
        if depth >= MAX_INTERPOLATION_DEPTH {
            return Err(StrataError::Interpolation {
                expression: expression.to_string(),
                reason: format!(
                    "reference chain exceeds {MAX_INTERPOLATION_DEPTH} levels (possible self-reference)"
                ),
            });
        }

        let identity = &self.descriptor.project;
        let resolved = match expression {
            "project.group" => identity.group.clone(),
            "project.artifact" => identity.artifact.clone(),
            "project.version" => identity.version.clone(),
            other => self.descriptor.properties.get(other).cloned(),
        };

        match resolved {
            // A property value may itself contain references.
            Some(value) => self.substitute(&value, depth + 1),
            None if expression.starts_with("project.") => Err(StrataError::Interpolation {
                expression: expression.to_string(),
                reason: "that project field is not set on the resolved model".to_string(),
            }),
            None => Err(StrataError::Interpolation {
                expression: expression.to_string(),
                reason: "no such property".to_string(),
            }),
        }
    }
}
