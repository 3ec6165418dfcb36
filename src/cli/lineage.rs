//! Display the parent lineage of a project.
//!
//! Shows the chain of ancestors that contributed to the effective model,
//! root first, in the same order inheritance is folded. Each line carries
//! the member's effective coordinate and where its descriptor came from.
//!
//! ```text
//! lineage (3 levels)
//! com.example:platform:2.1  /home/u/.strata/store/com/example/platform/2.1/platform-2.1.toml
//!   └─ com.example:services:2.1  /home/u/.strata/store/com/example/services/2.1/services-2.1.toml
//!     └─ com.example:billing:1.0  /work/billing/strata.toml
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::constants::DESCRIPTOR_FILE;

/// Command to display a project's ancestor chain.
#[derive(Args, Debug)]
pub struct LineageCommand {
    /// Path to the project descriptor.
    #[arg(default_value = DESCRIPTOR_FILE, value_name = "DESCRIPTOR")]
    file: PathBuf,
}

impl LineageCommand {
    /// Execute the lineage command.
    pub fn execute(self) -> Result<()> {
        let (builder, store) = super::build_session()?;
        let project = builder.build_from_descriptor(&self.file, &store, false)?;

        // Walk leaf to root, display root first to match fold order.
        let mut chain = Vec::new();
        let mut current = Some(&project);
        while let Some(member) = current {
            chain.push(member);
            current = member.parent();
        }
        chain.reverse();

        let levels = chain.len();
        println!("{} ({levels} level{})", "lineage".bold(), if levels == 1 { "" } else { "s" });

        for (depth, member) in chain.iter().enumerate() {
            let indent = "  ".repeat(depth);
            let connector = if depth == 0 { "" } else { "└─ " };
            let origin = member
                .file
                .as_deref()
                .map_or_else(|| "(cached)".to_string(), |path| path.display().to_string());

            println!("{indent}{connector}{}  {}", member.display_name().cyan(), origin.dimmed());
        }
        Ok(())
    }
}
