//! `modgraph plan` command

use anyhow::{Context, Result};

use crate::cli::PlanArgs;
use modgraph::ops::resolve_project;
use modgraph::util::diagnostic::{emit, Diagnostic};
use modgraph::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: PlanArgs) -> Result<()> {
    let opts = args.project.to_options(&args.entries);

    let (project, plan) = resolve_project(ctx, &opts)?;

    if args.json {
        let json = serde_json::to_string_pretty(&plan.to_report())
            .context("failed to serialize plan")?;
        println!("{}", json);
        return Ok(());
    }

    if plan.is_empty() {
        let diag = Diagnostic::warning("no modules to plan")
            .with_suggestion("Pass --editor if every module is editor-only");
        emit(&diag, ctx.color());
        return Ok(());
    }

    let flags = plan.flags();
    println!(
        "{} ({}, {}, {})",
        project.manifest.plugin.name.as_deref().unwrap_or("modules"),
        if flags.editor { "editor" } else { "game" },
        flags.hygiene,
        flags.configuration
    );

    let width = plan.len().to_string().len();
    for (i, module) in plan.modules().iter().enumerate() {
        println!("  {:>width$}. {} ({})", i + 1, module.name, module.kind, width = width);
    }

    if !plan.externals().is_empty() {
        let builtins: Vec<&str> = plan.externals().iter().map(|m| m.as_str()).collect();
        println!();
        println!("Built-ins: {}", builtins.join(", "));
    }

    Ok(())
}
