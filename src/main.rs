//! strata CLI entry point.
//!
//! Parses arguments, executes the selected command, and renders failures
//! as user-friendly errors with suggestions before exiting non-zero.
//!
//! Commands:
//! - `resolve` - build and print the effective project model
//! - `lineage` - display the parent chain of a project
//! - `validate` - check a descriptor and report every violation

use anyhow::Result;
use clap::Parser;
use strata::cli;
use strata::core::error::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
