//! Project loading and plan resolution.
//!
//! Glues the manifest, the merged configuration and command-line overrides
//! together before handing a registry to the resolver.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::catalog;
use crate::core::flags::{BuildFlags, Configuration, IncludeHygiene};
use crate::core::manifest::Manifest;
use crate::core::module_id::ModuleId;
use crate::core::registry::ModuleRegistry;
use crate::resolver::{self, ModulePlan};
use crate::util::{Config, GlobalContext};

/// Options for loading and resolving a project.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Explicit manifest path; searched upward from cwd otherwise
    pub manifest_path: Option<PathBuf>,

    /// Use the bundled Voxel catalog instead of a manifest
    pub catalog: bool,

    /// Entry modules; empty means the configured or default entries
    pub entries: Vec<ModuleId>,

    pub editor: Option<bool>,
    pub hygiene: Option<IncludeHygiene>,
    pub configuration: Option<Configuration>,
}

/// Everything needed to resolve: the manifest, its registry and the
/// flags in effect.
#[derive(Debug)]
pub struct Project {
    /// None when using the bundled catalog
    pub manifest_path: Option<PathBuf>,
    pub manifest: Manifest,
    pub registry: ModuleRegistry,
    pub config: Config,
    pub flags: BuildFlags,
}

impl Project {
    /// Entry modules to resolve from: explicit, configured, or every module
    /// allowed under the flags.
    pub fn entries(&self, explicit: &[ModuleId]) -> Vec<ModuleId> {
        if !explicit.is_empty() {
            explicit.to_vec()
        } else if !self.config.resolve.entries.is_empty() {
            self.config.resolve.entries.clone()
        } else {
            self.registry.default_entries(&self.flags)
        }
    }
}

/// Error context naming where a project's modules were declared.
///
/// Attached to registration and resolution errors so the CLI can point
/// at the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSource {
    /// None for the bundled catalog
    pub path: Option<PathBuf>,
}

impl fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "in {}", path.display()),
            None => f.write_str("in the bundled catalog"),
        }
    }
}

impl Project {
    pub fn source(&self) -> ManifestSource {
        ManifestSource {
            path: self.manifest_path.clone(),
        }
    }
}

/// Apply command-line overrides on top of configured flags.
pub fn effective_flags(config: &Config, opts: &ResolveOptions) -> BuildFlags {
    let mut flags = config.flags();
    if let Some(editor) = opts.editor {
        flags.editor = editor;
    }
    if let Some(hygiene) = opts.hygiene {
        flags.hygiene = hygiene;
    }
    if let Some(configuration) = opts.configuration {
        flags.configuration = configuration;
    }
    flags
}

/// Load the manifest and configuration and build the registry.
pub fn load_project(ctx: &GlobalContext, opts: &ResolveOptions) -> Result<Project> {
    let (manifest_path, manifest, project_root) = if opts.catalog {
        (None, catalog::voxel_plugin(), ctx.cwd().to_path_buf())
    } else {
        let path = match &opts.manifest_path {
            Some(path) => path.clone(),
            None => ctx.find_manifest()?,
        };
        let manifest = Manifest::load(&path)?;
        let root = project_root(&path);
        (Some(path), manifest, root)
    };

    let config = ctx.load_config(&project_root);
    let flags = effective_flags(&config, opts);

    let registry = manifest
        .to_registry(&config.resolve.externals)
        .with_context(|| ManifestSource {
            path: manifest_path.clone(),
        })?;

    tracing::debug!(
        editor = flags.editor,
        hygiene = %flags.hygiene,
        configuration = %flags.configuration,
        "build flags"
    );

    Ok(Project {
        manifest_path,
        manifest,
        registry,
        config,
        flags,
    })
}

fn project_root(manifest_path: &Path) -> PathBuf {
    manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Resolve a plan for the project described by `opts`.
pub fn resolve_project(ctx: &GlobalContext, opts: &ResolveOptions) -> Result<(Project, ModulePlan)> {
    let project = load_project(ctx, opts)?;
    let entries = project.entries(&opts.entries);

    tracing::debug!(entries = entries.len(), "resolving");
    let plan = resolver::resolve(&project.registry, &entries, &project.flags)
        .with_context(|| project.source())?;

    tracing::info!(
        "Planned {} modules ({} built-ins)",
        plan.len(),
        plan.externals().len()
    );
    Ok((project, plan))
}

/// Validate every module in the project under the requested flags.
///
/// Every registered module is resolved, editor-only ones included, so a
/// cycle is reported even when a game build would never plan it.
pub fn check_project(ctx: &GlobalContext, opts: &ResolveOptions) -> Result<Project> {
    let project = load_project(ctx, opts)?;
    project
        .registry
        .validate(&project.flags)
        .with_context(|| project.source())?;

    // Whole-registry validation passes; cycles only show up on resolution
    let entries: Vec<ModuleId> = project.registry.iter().map(|m| m.name).collect();
    resolver::resolve(&project.registry, &entries, &project.flags)
        .with_context(|| project.source())?;

    Ok(project)
}
