//! Validate a project descriptor.
//!
//! Runs the full build so the checks apply to the finished model: a field
//! counts as missing only when no level of the lineage supplied it. Every
//! violation is collected and reported in one pass rather than failing at
//! the first problem.
//!
//! Failures other than validation violations (unreadable descriptors,
//! missing parents, unresolvable dependencies) surface as ordinary errors.
//!
//! # Examples
//!
//! ```bash
//! strata validate
//! strata validate path/to/strata.toml --resolve-deps
//! strata validate --format json
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::constants::DESCRIPTOR_FILE;
use crate::core::error::StrataError;
use crate::descriptor::validation::ValidationReport;
use crate::project::Project;

/// Command to validate a descriptor against the structural rules.
#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Path to the project descriptor.
    #[arg(default_value = DESCRIPTOR_FILE, value_name = "DESCRIPTOR")]
    file: PathBuf,

    /// Also resolve the transitive dependency closure.
    ///
    /// Catches unresolvable or cyclic dependencies that structural checks
    /// alone cannot see.
    #[arg(long)]
    resolve_deps: bool,

    /// Output format for the validation result.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

/// Output format options for validation results.
#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with symbols and colors.
    Text,
    /// One JSON object: `{"project", "valid", "violations"}`.
    Json,
}

impl ValidateCommand {
    /// Execute the validate command.
    ///
    /// Returns an error when the build fails for any reason; validation
    /// violations are printed in the requested format first.
    pub fn execute(self) -> Result<()> {
        let (builder, store) = super::build_session()?;

        match builder.build_from_descriptor(&self.file, &store, self.resolve_deps) {
            Ok(project) => {
                self.report_valid(&project)?;
                Ok(())
            }
            Err(err) => match err.downcast_ref::<StrataError>() {
                Some(StrataError::Validation(report)) => {
                    self.report_violations(report)?;
                    Err(anyhow::anyhow!("descriptor validation failed"))
                }
                _ => Err(err),
            },
        }
    }

    fn report_valid(&self, project: &Project) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                println!("{} {} is valid", "✓".green(), project.display_name().bold());
                println!("  dependencies: {}", project.effective.dependencies.len());
                println!("  repositories: {}", project.effective.repositories.len());
            }
            OutputFormat::Json => {
                let document = serde_json::json!({
                    "project": project.display_name(),
                    "valid": true,
                    "violations": [],
                });
                println!("{}", serde_json::to_string_pretty(&document)?);
            }
        }
        Ok(())
    }

    fn report_violations(&self, report: &ValidationReport) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                println!("{} {report}", "✗".red());
            }
            OutputFormat::Json => {
                let document = serde_json::json!({
                    "project": report.project(),
                    "valid": false,
                    "violations": report.violations(),
                });
                println!("{}", serde_json::to_string_pretty(&document)?);
            }
        }
        Ok(())
    }
}
