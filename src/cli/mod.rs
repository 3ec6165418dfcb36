//! Command-line interface for strata.
//!
//! Each subcommand lives in its own module with its own argument struct and
//! execution logic. All of them drive the same [`ProjectBuilder`] session
//! that library consumers use; the CLI adds argument parsing, output
//! formatting, and process exit codes, nothing more.
//!
//! # Available Commands
//!
//! - `resolve` - build and print the effective project model
//! - `lineage` - display the parent chain of a project
//! - `validate` - check a descriptor and report every violation
//!
//! # Global Options
//!
//! All commands support these global options:
//! - `--verbose` - enable debug output
//! - `--quiet` - suppress everything except errors
//! - `--settings` - path to an alternate settings file
//! - `--store` - path to an alternate local store
//!
//! # Example
//!
//! ```bash
//! # Print the effective model of the descriptor in the current directory
//! strata resolve
//!
//! # Resolve a published coordinate, with the dependency closure
//! strata resolve --coordinate com.example:core:1.2.0
//! strata resolve --resolve-deps --format json
//!
//! # Inspect inheritance
//! strata lineage path/to/strata.toml
//!
//! # Validate before publishing
//! strata validate --format json
//! ```

mod lineage;
mod resolve;
pub mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::builder::ProjectBuilder;
use crate::constants::{SETTINGS_PATH_ENV, STORE_PATH_ENV};
use crate::store::LocalStore;

/// Runtime configuration derived from the global CLI flags.
///
/// Holds the values that are injected through environment variables rather
/// than threaded through every command, so tests and programmatic callers
/// can control CLI behavior without re-parsing arguments.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log level for the tracing subscriber.
    ///
    /// `None` means no subscriber is installed at all, which is how
    /// `--quiet` suppresses engine output. An existing `RUST_LOG` value
    /// always wins over this field.
    pub log_level: Option<String>,

    /// Custom path to the settings file.
    ///
    /// When set, exported as `STRATA_SETTINGS_PATH` so that
    /// [`Settings::load`](crate::settings::Settings::load) picks it up.
    pub settings_path: Option<String>,

    /// Custom local store root.
    ///
    /// When set, exported as `STRATA_STORE_PATH`, which overrides both the
    /// settings file and the built-in default.
    pub store_path: Option<String>,
}

impl CliConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Export the path overrides into the process environment.
    ///
    /// Runs on the main thread before any other threads exist; that is the
    /// safety requirement of `set_var` on this edition.
    pub fn apply_to_env(&self) {
        if let Some(ref path) = self.settings_path {
            unsafe { std::env::set_var(SETTINGS_PATH_ENV, path) };
        }

        if let Some(ref path) = self.store_path {
            unsafe { std::env::set_var(STORE_PATH_ENV, path) };
        }
    }

    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` takes precedence when set; otherwise `log_level` selects
    /// the filter. With neither, no subscriber is installed and engine
    /// diagnostics are dropped. Logs go to stderr so `--format json`
    /// output on stdout stays machine-parseable.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if let Some(ref level) = self.log_level {
            EnvFilter::new(level.clone())
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// Top-level CLI definition.
///
/// Global flags apply to every subcommand. Verbosity is resolved once here
/// and handed to the subscriber; subcommands never touch logging setup.
#[derive(Parser)]
#[command(
    name = "strata",
    about = "Project descriptor resolution - lineage assembly and effective models",
    version,
    author,
    long_about = "strata assembles a project's parent lineage, folds it into one \
                  effective model, and resolves the declared dependencies against \
                  local and remote repositories."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output.
    ///
    /// Shows lineage steps, cache hits, and repository lookups. Equivalent
    /// to `RUST_LOG=debug`. Mutually exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all output except errors and the command result.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to an alternate settings file.
    ///
    /// Overrides the default location (`~/.strata/settings.toml`). Useful
    /// for CI sandboxes and for pointing a single invocation at a mirror
    /// configuration.
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Path to an alternate local store root.
    ///
    /// Overrides both the settings file and the default `~/.strata/store`.
    #[arg(long, global = true, value_name = "DIR")]
    store: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Build and print the effective project model.
    ///
    /// See [`resolve::ResolveCommand`] for options and output formats.
    Resolve(resolve::ResolveCommand),

    /// Display the parent lineage of a project.
    ///
    /// See [`lineage::LineageCommand`].
    Lineage(lineage::LineageCommand),

    /// Validate a descriptor and report every violation at once.
    ///
    /// See [`validate::ValidateCommand`].
    Validate(validate::ValidateCommand),
}

impl Cli {
    /// Execute the parsed command line.
    ///
    /// Builds a [`CliConfig`] from the global flags and delegates to
    /// [`execute_with_config`](Self::execute_with_config).
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config)
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None // no subscriber when quiet
        } else {
            Some("info".to_string())
        };

        CliConfig {
            log_level,
            settings_path: self.settings.as_ref().map(|p| p.display().to_string()),
            store_path: self.store.as_ref().map(|p| p.display().to_string()),
        }
    }

    /// Execute with an injected configuration.
    ///
    /// Applies the configuration exactly once, installs the subscriber,
    /// then dispatches to the subcommand.
    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.apply_to_env();
        config.init_logging();

        match self.command {
            Commands::Resolve(cmd) => cmd.execute(),
            Commands::Lineage(cmd) => cmd.execute(),
            Commands::Validate(cmd) => cmd.execute(),
        }
    }
}

/// Open the build session every subcommand runs against.
///
/// Settings come from the environment (after [`CliConfig::apply_to_env`]),
/// and the store root follows the settings' precedence chain.
pub(crate) fn build_session() -> Result<(ProjectBuilder, LocalStore)> {
    let builder = ProjectBuilder::new()?;
    let store_root = builder.settings().store_root()?;
    Ok((builder, LocalStore::at(store_root)))
}
