//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use modgraph::core::{Configuration, IncludeHygiene, ModuleId};
use modgraph::ops::ResolveOptions;

/// modgraph - module registry and dependency planner for plugin builds
#[derive(Parser)]
#[command(name = "modgraph")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve entry modules into an ordered compilation plan
    Plan(PlanArgs),

    /// Validate every module declaration
    Check(CheckArgs),

    /// Display the dependency tree of a module
    Tree(TreeArgs),

    /// Explain why a module is in the plan and what it can see
    Explain(ExplainArgs),

    /// Print the bundled Voxel plugin manifest
    Catalog,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Where modules come from and which build is being configured.
#[derive(Args, Clone)]
pub struct ProjectArgs {
    /// Path to Modules.toml (searched upward from the current directory by default)
    #[arg(long, value_name = "PATH", conflicts_with = "catalog")]
    pub manifest: Option<PathBuf>,

    /// Use the bundled Voxel catalog instead of a manifest
    #[arg(long)]
    pub catalog: bool,

    /// Configure an editor build
    #[arg(long, overrides_with = "no_editor")]
    pub editor: bool,

    /// Configure a non-editor build, overriding config
    #[arg(long)]
    pub no_editor: bool,

    /// Include-hygiene mode (unity, iwyu)
    #[arg(long, value_name = "MODE")]
    pub hygiene: Option<IncludeHygiene>,

    /// Build configuration (debug, development, shipping)
    #[arg(long, value_name = "CONFIG")]
    pub configuration: Option<Configuration>,
}

impl ProjectArgs {
    pub fn to_options(&self, entries: &[String]) -> ResolveOptions {
        let editor = if self.editor {
            Some(true)
        } else if self.no_editor {
            Some(false)
        } else {
            None
        };

        ResolveOptions {
            manifest_path: self.manifest.clone(),
            catalog: self.catalog,
            entries: entries.iter().map(ModuleId::new).collect(),
            editor,
            hygiene: self.hygiene,
            configuration: self.configuration,
        }
    }
}

#[derive(Args)]
pub struct PlanArgs {
    /// Entry modules (defaults to configured entries, then every module)
    pub entries: Vec<String>,

    #[command(flatten)]
    pub project: ProjectArgs,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args)]
pub struct TreeArgs {
    /// Module to show the tree for
    pub module: String,

    /// Maximum depth to display
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Hide built-in modules
    #[arg(long)]
    pub no_builtins: bool,

    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args)]
pub struct ExplainArgs {
    /// Module to explain
    pub module: String,

    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
