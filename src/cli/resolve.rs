//! Build and print the effective project model.
//!
//! This is the workhorse command: it assembles the lineage, folds it, runs
//! the finishing pipeline, and prints the resulting model. The output is a
//! complete descriptor document with every inherited value already filled
//! in; the parent reference itself stays as declared.
//!
//! # Examples
//!
//! ```bash
//! # Effective model of ./strata.toml as TOML
//! strata resolve
//!
//! # As JSON, with the transitive dependency closure resolved
//! strata resolve --resolve-deps --format json
//!
//! # Effective model of a published descriptor
//! strata resolve --coordinate com.example:core:1.2.0
//! ```

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::constants::DESCRIPTOR_FILE;
use crate::core::Coordinate;
use crate::project::Project;

/// Command to resolve a project to its effective model.
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Path to the project descriptor.
    #[arg(default_value = DESCRIPTOR_FILE, value_name = "DESCRIPTOR")]
    file: PathBuf,

    /// Resolve a published coordinate instead of a local file.
    ///
    /// The descriptor is located through the configured repositories and
    /// built without treating it as a working-copy project: layout paths
    /// stay relative and nothing is registered for the current directory.
    #[arg(
        short = 'c',
        long,
        value_name = "GROUP:ARTIFACT:VERSION",
        conflicts_with = "file"
    )]
    coordinate: Option<Coordinate>,

    /// Resolve the transitive dependency closure as well.
    ///
    /// Walks dependency metadata breadth-first, pins the first version
    /// seen per group:artifact pair, and fails the build when a required
    /// artifact cannot be located.
    #[arg(long, conflicts_with = "coordinate")]
    resolve_deps: bool,

    /// Output format for the effective model.
    #[arg(long, value_enum, default_value = "toml")]
    format: OutputFormat,
}

/// Output format options for the resolved model.
#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// The model as a TOML descriptor document.
    Toml,
    /// The model as pretty-printed JSON.
    Json,
}

impl ResolveCommand {
    /// Execute the resolve command.
    pub fn execute(self) -> Result<()> {
        let (builder, store) = super::build_session()?;

        let project = match &self.coordinate {
            Some(coordinate) => builder.build_from_artifact(coordinate, &store)?,
            None => builder.build_from_descriptor(&self.file, &store, self.resolve_deps)?,
        };

        match self.format {
            OutputFormat::Toml => self.print_toml(&project)?,
            OutputFormat::Json => self.print_json(&project)?,
        }
        Ok(())
    }

    /// Print the model as TOML, with resolved artifacts as trailing
    /// comments so stdout stays a parseable document.
    fn print_toml(&self, project: &Project) -> Result<()> {
        print!("{}", project.effective.to_toml_string()?);

        if self.resolve_deps && !project.artifacts.is_empty() {
            println!();
            println!("# resolved artifacts ({})", project.artifacts.len());
            for artifact in &project.artifacts {
                println!("# {artifact}");
            }
        }
        Ok(())
    }

    fn print_json(&self, project: &Project) -> Result<()> {
        if self.resolve_deps {
            let artifacts: Vec<serde_json::Value> = project
                .artifacts
                .iter()
                .map(|artifact| {
                    serde_json::json!({
                        "coordinate": artifact.coordinate.to_string(),
                        "kind": artifact.kind,
                        "scope": artifact.scope,
                        "path": artifact.path.display().to_string(),
                    })
                })
                .collect();

            let document = serde_json::json!({
                "project": serde_json::to_value(&project.effective)?,
                "artifacts": artifacts,
            });
            println!("{}", serde_json::to_string_pretty(&document)?);
        } else {
            println!("{}", project.effective.to_json_string()?);
        }
        Ok(())
    }
}
