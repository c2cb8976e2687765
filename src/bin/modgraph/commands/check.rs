//! `modgraph check` command

use anyhow::Result;

use crate::cli::CheckArgs;
use modgraph::ops::check_project;
use modgraph::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: CheckArgs) -> Result<()> {
    let project = check_project(ctx, &args.project.to_options(&[]))?;

    let externals = project.registry.externals().count();
    println!(
        "ok: {} modules, {} built-ins ({} build)",
        project.registry.len(),
        externals,
        if project.flags.editor { "editor" } else { "game" }
    );

    Ok(())
}
