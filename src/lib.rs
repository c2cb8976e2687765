//! modgraph - module registry and dependency planner for plugin builds
//!
//! This crate provides the library side of modgraph: module descriptors,
//! the registry that owns them, conditional dependency evaluation and the
//! resolver that turns entry modules into an ordered compilation plan.

pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

/// Test utilities for modgraph unit tests.
///
/// Only available when compiling tests. Provides registry builders and
/// manifest fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    BuildFlags, BuildOptions, Manifest, ModuleDescriptor, ModuleId, ModuleRegistry, Predicate,
    Visibility,
};

pub use crate::resolver::{resolve, ConfigError, ModulePlan};
pub use crate::util::context::GlobalContext;
