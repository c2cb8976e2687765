//! Module registry.
//!
//! The registry owns every descriptor for one build invocation plus the set
//! of host-provided built-in modules. It is constructed explicitly and passed
//! by reference to the resolver; there is no global registry.

use std::collections::{HashMap, HashSet};

use crate::core::descriptor::ModuleDescriptor;
use crate::core::flags::BuildFlags;
use crate::core::module_id::ModuleId;
use crate::resolver::errors::{ConfigError, MissingDependency};

/// All known modules, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: Vec<ModuleDescriptor>,

    /// Map from module name to its position in `modules`
    index: HashMap<ModuleId, usize>,

    /// Host-provided modules, in the order they were added
    externals: Vec<ModuleId>,
    external_set: HashSet<ModuleId>,
}

impl ModuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that already knows the given built-ins.
    pub fn with_externals<I, S>(externals: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<ModuleId>,
    {
        let mut registry = Self::new();
        for name in externals {
            registry.add_external(name)?;
        }
        Ok(registry)
    }

    /// Register a module.
    ///
    /// Fails if the name is already registered (as a module or a built-in)
    /// or if the module's build options are contradictory.
    pub fn register(&mut self, descriptor: ModuleDescriptor) -> Result<(), ConfigError> {
        let name = descriptor.name;

        if self.index.contains_key(&name) || self.external_set.contains(&name) {
            return Err(ConfigError::DuplicateModule {
                name: name.to_string(),
            });
        }

        descriptor
            .build_options
            .validate()
            .map_err(|e| ConfigError::InvalidBuildOption {
                module: name.to_string(),
                option: e.option.to_string(),
                reason: e.reason,
            })?;

        tracing::debug!(module = %name, kind = ?descriptor.kind, "registered module");

        self.index.insert(name, self.modules.len());
        self.modules.push(descriptor);
        Ok(())
    }

    /// Declare a host-provided module. Adding the same built-in twice is a no-op.
    pub fn add_external(&mut self, name: impl Into<ModuleId>) -> Result<(), ConfigError> {
        let name = name.into();

        if self.index.contains_key(&name) {
            return Err(ConfigError::DuplicateModule {
                name: name.to_string(),
            });
        }

        if self.external_set.insert(name) {
            self.externals.push(name);
        }
        Ok(())
    }

    /// Get a registered module.
    pub fn get(&self, name: ModuleId) -> Option<&ModuleDescriptor> {
        self.index.get(&name).map(|&i| &self.modules[i])
    }

    /// Check whether a module is registered.
    pub fn contains(&self, name: ModuleId) -> bool {
        self.index.contains_key(&name)
    }

    /// Check whether a name is a host built-in.
    pub fn is_external(&self, name: ModuleId) -> bool {
        self.external_set.contains(&name)
    }

    /// Iterate over modules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.iter()
    }

    /// Iterate over built-ins in the order they were added.
    pub fn externals(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.externals.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Modules built by default under `flags`: everything, minus editor-only
    /// modules when the editor is off.
    pub fn default_entries(&self, flags: &BuildFlags) -> Vec<ModuleId> {
        self.modules
            .iter()
            .filter(|m| flags.editor || !m.kind.requires_editor())
            .map(|m| m.name)
            .collect()
    }

    /// Check every active edge in the registry and report all unresolved
    /// references at once.
    pub fn validate(&self, flags: &BuildFlags) -> Result<(), ConfigError> {
        let caps = flags.capabilities();

        let missing: Vec<MissingDependency> = self
            .modules
            .iter()
            .flat_map(|module| {
                module
                    .dependencies(&caps)
                    .into_iter()
                    .filter(|dep| !self.is_known(dep.name))
                    .map(move |dep| self.missing(module.name, dep.name))
            })
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::UnresolvedDependency { missing })
        }
    }

    /// Registered or built-in.
    pub fn is_known(&self, name: ModuleId) -> bool {
        self.contains(name) || self.is_external(name)
    }

    pub(crate) fn missing(&self, module: ModuleId, name: ModuleId) -> MissingDependency {
        let suggestion = self
            .modules
            .iter()
            .map(|m| m.name)
            .chain(self.externals.iter().copied())
            .find(|known| known.eq_ignore_case(&name))
            .map(|known| known.to_string());

        MissingDependency {
            module: module.to_string(),
            missing_name: name.to_string(),
            suggestion,
        }
    }
}
