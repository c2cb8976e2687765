//! Core data structures.
//!
//! - Interned module names ([`ModuleId`])
//! - Build flags, capabilities and the predicates that test them
//! - Module descriptors, build options and the registry that owns them
//! - The Modules.toml manifest and the bundled Voxel catalog

pub mod build_options;
pub mod catalog;
pub mod descriptor;
pub mod flags;
pub mod manifest;
pub mod module_id;
pub mod predicate;
pub mod registry;

pub use build_options::{BuildOptions, EffectiveSettings, IwyuSupport, PchUsage};
pub use descriptor::{ConditionalDependencies, DependencyRef, ModuleDescriptor, ModuleKind, Visibility};
pub use flags::{BuildFlags, Capability, CapabilitySet, Configuration, IncludeHygiene};
pub use manifest::{find_manifest, Manifest, ManifestError, PluginSection, MANIFEST_NAME};
pub use module_id::ModuleId;
pub use predicate::Predicate;
pub use registry::ModuleRegistry;
