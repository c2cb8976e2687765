//! Module descriptors - what a module declares about itself.
//!
//! A descriptor names the module's dependencies and build options. It is
//! plain data: built once from the manifest (or the bundled catalog) and
//! never mutated after registration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::build_options::BuildOptions;
use crate::core::flags::CapabilitySet;
use crate::core::module_id::ModuleId;
use crate::core::predicate::Predicate;

/// How a dependency's interface propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Re-exported to anything depending on this module.
    Public,
    /// Visible only inside this module.
    #[default]
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => f.write_str("public"),
            Visibility::Private => f.write_str("private"),
        }
    }
}

/// Where the module is loaded, as in the plugin descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleKind {
    #[default]
    Runtime,
    Editor,
    UncookedOnly,
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleKind::Runtime => f.write_str("runtime"),
            ModuleKind::Editor => f.write_str("editor"),
            ModuleKind::UncookedOnly => f.write_str("uncooked-only"),
        }
    }
}

impl ModuleKind {
    /// Whether this module only exists in editor builds.
    pub fn requires_editor(&self) -> bool {
        matches!(self, ModuleKind::Editor | ModuleKind::UncookedOnly)
    }
}

/// Dependencies enabled only when a predicate holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalDependencies {
    pub when: Predicate,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub public: Vec<ModuleId>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub private: Vec<ModuleId>,
}

/// One outgoing dependency edge of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyRef {
    pub name: ModuleId,
    pub visibility: Visibility,
    /// Came from a conditional block.
    pub conditional: bool,
}

/// A module and everything it declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub name: ModuleId,

    #[serde(default)]
    pub kind: ModuleKind,

    #[serde(default, rename = "public", skip_serializing_if = "Vec::is_empty")]
    pub public_dependencies: Vec<ModuleId>,

    #[serde(default, rename = "private", skip_serializing_if = "Vec::is_empty")]
    pub private_dependencies: Vec<ModuleId>,

    /// Printed while the module is configured.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,

    #[serde(default, rename = "conditional", skip_serializing_if = "Vec::is_empty")]
    pub conditional_dependencies: Vec<ConditionalDependencies>,

    #[serde(default, rename = "build")]
    pub build_options: BuildOptions,
}

impl ModuleDescriptor {
    /// Create a runtime module with no dependencies.
    pub fn new(name: impl Into<ModuleId>) -> Self {
        ModuleDescriptor {
            name: name.into(),
            kind: ModuleKind::Runtime,
            public_dependencies: Vec::new(),
            private_dependencies: Vec::new(),
            conditional_dependencies: Vec::new(),
            messages: Vec::new(),
            build_options: BuildOptions::default(),
        }
    }

    pub fn with_kind(mut self, kind: ModuleKind) -> Self {
        self.kind = kind;
        self
    }

    /// Append public dependencies.
    pub fn public<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ModuleId>,
    {
        self.public_dependencies
            .extend(deps.into_iter().map(Into::into));
        self
    }

    /// Append private dependencies.
    pub fn private<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ModuleId>,
    {
        self.private_dependencies
            .extend(deps.into_iter().map(Into::into));
        self
    }

    /// Add a conditional block.
    pub fn when<I, S>(mut self, when: Predicate, visibility: Visibility, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ModuleId>,
    {
        let deps: Vec<ModuleId> = deps.into_iter().map(Into::into).collect();
        let (public, private) = match visibility {
            Visibility::Public => (deps, Vec::new()),
            Visibility::Private => (Vec::new(), deps),
        };
        self.conditional_dependencies.push(ConditionalDependencies {
            when,
            public,
            private,
        });
        self
    }

    pub fn with_build_options(mut self, options: BuildOptions) -> Self {
        self.build_options = options;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.messages.push(message.into());
        self
    }

    /// Every edge active under `caps`, in declaration order: public,
    /// private, then enabled conditional blocks (public before private
    /// within a block). A name listed twice keeps its first edge.
    pub fn dependencies(&self, caps: &CapabilitySet) -> Vec<DependencyRef> {
        let mut edges: Vec<DependencyRef> = Vec::new();

        let mut push = |name: ModuleId, visibility: Visibility, conditional: bool| {
            if !edges.iter().any(|e| e.name == name) {
                edges.push(DependencyRef {
                    name,
                    visibility,
                    conditional,
                });
            }
        };

        for &name in &self.public_dependencies {
            push(name, Visibility::Public, false);
        }
        for &name in &self.private_dependencies {
            push(name, Visibility::Private, false);
        }
        for block in &self.conditional_dependencies {
            if !block.when.matches(caps) {
                continue;
            }
            for &name in &block.public {
                push(name, Visibility::Public, true);
            }
            for &name in &block.private {
                push(name, Visibility::Private, true);
            }
        }

        edges
    }

    /// Every name this module could ever reference, regardless of flags.
    pub fn all_referenced(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.public_dependencies
            .iter()
            .chain(self.private_dependencies.iter())
            .chain(
                self.conditional_dependencies
                    .iter()
                    .flat_map(|b| b.public.iter().chain(b.private.iter())),
            )
            .copied()
    }
}
