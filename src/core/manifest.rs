//! Modules.toml manifest parsing and schema.
//!
//! The manifest declares a plugin's host built-ins and every module it
//! ships. Modules are listed as `[[module]]` tables; their order in the
//! file is the declaration order used to break ties during resolution.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::descriptor::ModuleDescriptor;
use crate::core::module_id::ModuleId;
use crate::core::registry::ModuleRegistry;
use crate::resolver::errors::ConfigError;

/// Manifest file name.
pub const MANIFEST_NAME: &str = "Modules.toml";

/// Error locating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not find Modules.toml in {} or any parent directory", .dir.display())]
    NotFound { dir: PathBuf },
}

/// The `[plugin]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSection {
    /// Plugin name, informational only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Host-provided modules the plugin may depend on
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub externals: Vec<ModuleId>,
}

/// A parsed Modules.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub plugin: PluginSection,

    #[serde(default, rename = "module")]
    pub modules: Vec<ModuleDescriptor>,
}

impl Manifest {
    /// Load a manifest from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    /// Parse manifest text.
    pub fn parse(contents: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(contents)?;
        Ok(manifest)
    }

    /// Render back to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize manifest")
    }

    /// Register every built-in and module, in file order.
    ///
    /// `extra_externals` come from configuration and are added before the
    /// manifest's own list.
    pub fn to_registry(&self, extra_externals: &[ModuleId]) -> Result<ModuleRegistry, ConfigError> {
        let mut registry = ModuleRegistry::new();

        for &name in extra_externals.iter().chain(self.plugin.externals.iter()) {
            registry.add_external(name)?;
        }

        for module in &self.modules {
            registry.register(module.clone())?;
        }

        tracing::debug!(
            plugin = self.plugin.name.as_deref().unwrap_or("<unnamed>"),
            modules = registry.len(),
            "loaded manifest"
        );

        Ok(registry)
    }
}

/// Find the manifest in `dir` or any of its parents.
pub fn find_manifest(dir: &Path) -> Result<PathBuf, ManifestError> {
    let mut current = dir.to_path_buf();
    loop {
        let candidate = current.join(MANIFEST_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(ManifestError::NotFound {
                dir: dir.to_path_buf(),
            });
        }
    }
}
