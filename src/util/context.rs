//! Global context for modgraph operations.
//!
//! Provides centralized access to the working directory, the user-wide
//! configuration directory and output settings.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::manifest::{find_manifest, ManifestError};
use crate::util::config::{self, load_config, Config, CONFIG_DIR};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// User-wide modgraph directory (~/.modgraph/ or $MODGRAPH_HOME)
    home: PathBuf,

    /// Debug logging requested
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext rooted at the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let home = config::global_config_dir().unwrap_or_else(|| PathBuf::from(CONFIG_DIR));
        Ok(Self::with_home(cwd, home))
    }

    /// Create a GlobalContext with explicit working and user directories.
    pub fn with_home(cwd: PathBuf, home: PathBuf) -> Self {
        GlobalContext {
            cwd,
            home,
            verbose: false,
            color: true,
        }
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn color(&self) -> bool {
        self.color
    }

    /// Find Modules.toml starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Result<PathBuf, ManifestError> {
        find_manifest(&self.cwd)
    }

    /// Merged global and project configuration for the project rooted at
    /// `project_root`.
    pub fn load_config(&self, project_root: &Path) -> Config {
        load_config(
            &self.config_path(),
            &config::project_config_path(project_root),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::flags::IncludeHygiene;
    use crate::test_support::{write_manifest, SAMPLE_MANIFEST};
    use tempfile::TempDir;

    #[test]
    fn test_context_paths() {
        let ctx = GlobalContext::new().unwrap();
        assert!(ctx.cwd().is_absolute());
        assert!(ctx.config_path().ends_with("config.toml"));

        let tmp = TempDir::new().unwrap();
        let mut ctx = GlobalContext::with_home(tmp.path().to_path_buf(), tmp.path().join("home"));
        assert_eq!(ctx.config_path(), tmp.path().join("home").join("config.toml"));
        assert!(ctx.color() && !ctx.is_verbose());

        ctx.set_verbose(true);
        ctx.set_color(false);
        assert!(!ctx.color() && ctx.is_verbose());
    }

    #[test]
    fn test_global_config_under_home() {
        let tmp = TempDir::new().unwrap();
        let home = tmp.path().join("home");
        std::fs::create_dir_all(&home).unwrap();
        std::fs::write(home.join("config.toml"), "[build]\neditor = true\n").unwrap();

        let ctx = GlobalContext::with_home(tmp.path().to_path_buf(), home);
        assert_eq!(ctx.load_config(tmp.path()).build.editor, Some(true));

        let empty = GlobalContext::with_home(tmp.path().to_path_buf(), tmp.path().join("none"));
        assert_eq!(empty.load_config(tmp.path()), Config::default());
    }

    #[test]
    fn test_find_manifest_from_subdir() {
        let tmp = TempDir::new().unwrap();
        let manifest = write_manifest(tmp.path(), SAMPLE_MANIFEST);
        let sub = tmp.path().join("Source");
        std::fs::create_dir_all(&sub).unwrap();

        let ctx = GlobalContext::with_home(sub, tmp.path().join("home"));
        assert_eq!(ctx.find_manifest().ok(), Some(manifest));
    }

    #[test]
    fn test_project_config() {
        let tmp = TempDir::new().unwrap();
        let path = config::project_config_path(tmp.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[build]\nhygiene = \"iwyu\"\n").unwrap();

        let ctx = GlobalContext::with_home(tmp.path().to_path_buf(), tmp.path().join("home"));
        let config = ctx.load_config(tmp.path());
        assert_eq!(config.build.hygiene, Some(IncludeHygiene::Iwyu));
    }
}
