//! High-level operations.
//!
//! This module contains the implementation of modgraph commands.

pub mod resolve;

pub use resolve::{
    check_project, effective_flags, load_project, resolve_project, ManifestSource, Project,
    ResolveOptions,
};
