//! Common test utilities and fixtures for strata integration tests
//!
//! Every test runs inside an isolated [`TestProject`]: its own project
//! directory, store, settings file, and local repository directories. The
//! settings always override the built-in `central` repository with a local
//! path, so no test can reach the network.

// Allow dead code because these utilities are shared across test files and
// not every file uses every helper
#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use strata::builder::ProjectBuilder;
use strata::core::Coordinate;
use strata::settings::Settings;
use strata::store::LocalStore;

/// Isolated environment for one build scenario.
pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    project_dir: PathBuf,
    store_dir: PathBuf,
    repos_dir: PathBuf,
    settings_path: PathBuf,
}

impl TestProject {
    /// Create a new environment with offline settings.
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        let store_dir = temp_dir.path().join("store");
        let repos_dir = temp_dir.path().join("repos");

        fs::create_dir_all(&project_dir)?;
        fs::create_dir_all(&store_dir)?;
        fs::create_dir_all(repos_dir.join("central"))?;

        let settings_path = temp_dir.path().join("settings.toml");
        let project = Self {
            _temp_dir: temp_dir,
            project_dir,
            store_dir,
            repos_dir,
            settings_path,
        };
        project.set_overrides(&[])?;
        Ok(project)
    }

    /// The environment root directory.
    pub fn root(&self) -> &Path {
        self._temp_dir.path()
    }

    /// The project directory the descriptor lives in.
    pub fn project_path(&self) -> &Path {
        &self.project_dir
    }

    /// The store root for this environment.
    pub fn store_path(&self) -> &Path {
        &self.store_dir
    }

    /// The settings file for this environment.
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Handle to this environment's store.
    pub fn store(&self) -> LocalStore {
        LocalStore::at(&self.store_dir)
    }

    /// A build session configured from this environment's settings.
    pub fn builder(&self) -> Result<ProjectBuilder> {
        let settings = Settings::load_from(&self.settings_path)?;
        Ok(ProjectBuilder::with_settings(settings))
    }

    /// Rewrite the settings file with the given repository overrides.
    ///
    /// `central` always ends up overridden to a local directory unless the
    /// caller redirects it explicitly; tests must stay offline.
    pub fn set_overrides(&self, overrides: &[(&str, &Path)]) -> Result<()> {
        let mut content =
            format!("store-path = \"{}\"\n\n[overrides]\n", toml_path(&self.store_dir));
        let mut saw_central = false;
        for (id, target) in overrides {
            if *id == "central" {
                saw_central = true;
            }
            content.push_str(&format!("{id} = \"{}\"\n", toml_path(target)));
        }
        if !saw_central {
            content.push_str(&format!(
                "central = \"{}\"\n",
                toml_path(&self.repos_dir.join("central"))
            ));
        }
        fs::write(&self.settings_path, content)
            .with_context(|| format!("failed to write {}", self.settings_path.display()))?;
        Ok(())
    }

    /// Write the project's own descriptor, returning its path.
    pub fn write_descriptor(&self, content: &str) -> Result<PathBuf> {
        let path = self.project_dir.join("strata.toml");
        fs::write(&path, content)
            .with_context(|| format!("failed to write descriptor to {}", path.display()))?;
        Ok(path)
    }

    /// Write a descriptor at a path relative to the environment root.
    pub fn write_descriptor_at(&self, relative: &str, content: &str) -> Result<PathBuf> {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Install a descriptor into the store, identity generated from the
    /// coordinate, `body` appended verbatim.
    pub fn install_in_store(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
        body: &str,
    ) -> Result<PathBuf> {
        let coordinate = Coordinate::new(group, artifact, version);
        let content = descriptor_source(group, artifact, version, body);
        Ok(self.store().install_descriptor(&coordinate, &content)?)
    }

    /// Create a local repository directory under this environment.
    pub fn create_repo(&self, name: &str) -> Result<PathBuf> {
        let dir = self.repos_dir.join(name);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Publish a descriptor into a local repository.
    ///
    /// Repositories share the store's coordinate layout, so the fixture
    /// goes through [`LocalStore`], which also writes the checksum sibling
    /// the locator verifies.
    pub fn publish(
        &self,
        repo_dir: &Path,
        group: &str,
        artifact: &str,
        version: &str,
        body: &str,
    ) -> Result<PathBuf> {
        let coordinate = Coordinate::new(group, artifact, version);
        let content = descriptor_source(group, artifact, version, body);
        Ok(LocalStore::at(repo_dir).install_descriptor(&coordinate, &content)?)
    }

    /// Command for the strata binary, wired to this environment.
    pub fn run(&self, args: &[&str]) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("strata").expect("strata binary exists");
        cmd.current_dir(&self.project_dir)
            .env("STRATA_SETTINGS_PATH", &self.settings_path)
            .env("STRATA_STORE_PATH", &self.store_dir)
            .env_remove("RUST_LOG")
            .args(args);
        cmd
    }
}

/// Render a complete descriptor: identity header plus extra TOML.
pub fn descriptor_source(group: &str, artifact: &str, version: &str, body: &str) -> String {
    format!(
        "[project]\ngroup = \"{group}\"\nartifact = \"{artifact}\"\nversion = \"{version}\"\n{body}"
    )
}

/// Escape a path for embedding in a double-quoted TOML string.
pub fn toml_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "\\\\")
}
