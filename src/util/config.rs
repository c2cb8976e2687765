//! Configuration file support.
//!
//! Two locations are read:
//! - Global: `~/.modgraph/config.toml` (or `$MODGRAPH_HOME/config.toml`) - user-wide defaults
//! - Project: `.modgraph/config.toml` next to Modules.toml - overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::flags::{BuildFlags, Configuration, IncludeHygiene};
use crate::core::module_id::ModuleId;

/// Name of the per-project and per-user configuration directory.
pub const CONFIG_DIR: &str = ".modgraph";

/// Overrides the user-wide configuration directory.
pub const HOME_ENV: &str = "MODGRAPH_HOME";

/// modgraph configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default build flags
    pub build: BuildConfig,

    /// Resolution defaults
    pub resolve: ResolveConfig,
}

/// `[build]`: flags used when the command line does not say otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Plan editor builds by default
    pub editor: Option<bool>,

    pub hygiene: Option<IncludeHygiene>,

    pub configuration: Option<Configuration>,
}

/// `[resolve]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Entry modules used when none are given
    pub entries: Vec<ModuleId>,

    /// Extra host built-ins, added before the manifest's own
    pub externals: Vec<ModuleId>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing
    /// or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.build.editor.is_some() {
            self.build.editor = other.build.editor;
        }
        if other.build.hygiene.is_some() {
            self.build.hygiene = other.build.hygiene;
        }
        if other.build.configuration.is_some() {
            self.build.configuration = other.build.configuration;
        }

        if !other.resolve.entries.is_empty() {
            self.resolve.entries = other.resolve.entries;
        }
        // Built-ins accumulate
        for name in other.resolve.externals {
            if !self.resolve.externals.contains(&name) {
                self.resolve.externals.push(name);
            }
        }
    }

    /// Build flags described by this config, defaults elsewhere.
    pub fn flags(&self) -> BuildFlags {
        let defaults = BuildFlags::default();
        BuildFlags {
            editor: self.build.editor.unwrap_or(defaults.editor),
            hygiene: self.build.hygiene.unwrap_or(defaults.hygiene),
            configuration: self.build.configuration.unwrap_or(defaults.configuration),
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.modgraph/config.toml)
/// 2. Global config (~/.modgraph/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global config directory: `$MODGRAPH_HOME`, else ~/.modgraph.
pub fn global_config_dir() -> Option<PathBuf> {
    std::env::var_os(HOME_ENV)
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .or_else(|| directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR)))
}

/// Get the project config path (.modgraph/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR).join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.build.editor.is_none());
        assert!(config.resolve.entries.is_empty());
        assert_eq!(config.flags(), BuildFlags::default());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[build]
editor = true
hygiene = "iwyu"
configuration = "shipping"

[resolve]
entries = ["VoxelGraphCore"]
externals = ["Niagara"]
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.build.editor, Some(true));
        assert_eq!(config.build.hygiene, Some(IncludeHygiene::Iwyu));
        assert_eq!(config.resolve.entries, vec![ModuleId::new("VoxelGraphCore")]);

        let flags = config.flags();
        assert!(flags.editor);
        assert_eq!(flags.configuration, Configuration::Shipping);
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.build.editor = Some(true);
        base.build.hygiene = Some(IncludeHygiene::Iwyu);
        base.resolve.externals = vec![ModuleId::new("Niagara")];

        let mut project = Config::default();
        project.build.editor = Some(false);
        project.resolve.entries = vec![ModuleId::new("VoxelCore")];
        project.resolve.externals = vec![ModuleId::new("Niagara"), ModuleId::new("Water")];

        base.merge(project);
        assert_eq!(base.build.editor, Some(false));
        assert_eq!(base.build.hygiene, Some(IncludeHygiene::Iwyu));
        assert_eq!(base.resolve.entries, vec![ModuleId::new("VoxelCore")]);
        assert_eq!(
            base.resolve.externals,
            vec![ModuleId::new("Niagara"), ModuleId::new("Water")]
        );
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = project_config_path(tmp.path());
        std::fs::create_dir_all(project.parent().unwrap()).unwrap();

        std::fs::write(&global, "[build]\neditor = true\nhygiene = \"iwyu\"\n").unwrap();
        std::fs::write(&project, "[build]\nhygiene = \"unity\"\n").unwrap();

        let config = load_config(&global, &project);
        assert_eq!(config.build.editor, Some(true));
        assert_eq!(config.build.hygiene, Some(IncludeHygiene::Unity));
    }

    #[test]
    fn test_malformed_config_falls_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[build]\nhygiene = \"sometimes\"\n").unwrap();

        assert!(Config::load(&path).is_err());
        assert_eq!(Config::load_or_default(&path), Config::default());
    }
}
