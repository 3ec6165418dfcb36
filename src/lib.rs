//! strata - project descriptor resolution
//!
//! A build-model engine that turns a project descriptor (`strata.toml`)
//! into its effective model: the parent lineage is assembled across local
//! files, a coordinate-addressed store, and remote repositories, then
//! folded root-to-leaf into one resolved descriptor with interpolation,
//! defaults, validation, and optional transitive dependency resolution
//! applied on top.
//!
//! # Architecture Overview
//!
//! strata follows a two-phase build model:
//! - Lineage assembly walks the `[parent]` chain and collects the raw
//!   descriptors root-first, accumulating repository definitions in
//!   descent order as it goes
//! - The finishing pipeline folds the lineage into one effective model,
//!   interpolates `${...}` expressions, injects layout defaults,
//!   materializes dependency artifacts, and validates the result in a
//!   single pass
//!
//! ## Key Features
//!
//! - **Inheritance**: A descriptor names its parent by coordinate; every
//!   unset field is filled from the nearest ancestor that sets it
//! - **Repository accumulation**: Repositories declared mid-lineage are
//!   visible to the parent lookups that follow them
//! - **Session caching**: Finished descriptors are cached by coordinate
//!   for the lifetime of one [`builder::ProjectBuilder`]
//! - **Complete validation**: Every structural violation is collected and
//!   reported at once, never one failure at a time
//! - **Transitive resolution**: Breadth-first closure with first-seen
//!   version pinning and cycle detection
//!
//! # Core Modules
//!
//! ## Build Engine
//! - [`builder`] - build sessions, lineage assembly, and the finishing pipeline
//! - [`inherit`] - the per-field inheritance fold
//! - [`interpolate`] - `${property}` expression expansion
//! - [`descriptor`] - descriptor model, parsing, and validation
//!
//! ## Resolution
//! - [`repository`] - repository definitions and the descriptor locator
//! - [`store`] - the coordinate-addressed local store
//! - [`cache`] - session-scoped descriptor cache
//! - [`artifact`] - materialized dependencies and the transitive resolver
//!
//! ## Supporting Modules
//! - [`core`] - coordinates and the error taxonomy
//! - [`project`] - the resolved project model handed to consumers
//! - [`settings`] - user settings and environment overrides
//! - [`cli`] - the `strata` command-line interface
//!
//! # Descriptor Format (strata.toml)
//!
//! ```toml
//! [project]
//! group = "com.example"
//! artifact = "billing"
//! version = "1.0"
//!
//! [parent]
//! group = "com.example"
//! artifact = "platform"
//! version = "2.1"
//!
//! [properties]
//! flavor = "dev"
//!
//! [[dependencies]]
//! group = "com.example"
//! artifact = "commons"
//! version = "3.2"
//!
//! [[repositories]]
//! id = "internal"
//! url = "https://repo.internal.example/store"
//! ```
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use strata::builder::ProjectBuilder;
//! use strata::store::LocalStore;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let builder = ProjectBuilder::new()?;
//! let store = LocalStore::at(builder.settings().store_root()?);
//!
//! let project = builder.build_from_descriptor(Path::new("strata.toml"), &store, false)?;
//! println!("{}", project.display_name());
//! # Ok(())
//! # }
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Print the effective model
//! strata resolve
//! strata resolve --resolve-deps --format json
//!
//! # Inspect inheritance
//! strata lineage
//!
//! # Validate before publishing
//! strata validate
//! ```

// Build engine
pub mod builder;
pub mod descriptor;
pub mod inherit;
pub mod interpolate;

// Resolution
pub mod artifact;
pub mod cache;
pub mod repository;
pub mod store;

// Supporting modules
pub mod cli;
pub mod constants;
pub mod core;
pub mod project;
pub mod settings;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
