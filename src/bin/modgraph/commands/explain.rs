//! `modgraph explain` command

use anyhow::Result;

use crate::cli::ExplainArgs;
use modgraph::core::ModuleId;
use modgraph::ops::resolve_project;
use modgraph::util::diagnostic::{suggestions, Diagnostic};
use modgraph::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: ExplainArgs) -> Result<()> {
    let (project, plan) = resolve_project(ctx, &args.project.to_options(&[]))?;
    let id = ModuleId::new(&args.module);

    let Some(chain) = plan.why(id) else {
        let mut diag = Diagnostic::error(format!("module `{}` is not in the plan", id));
        if let Some(path) = &project.manifest_path {
            diag = diag.with_location(path);
        }
        if let Some(desc) = project.registry.get(id) {
            if desc.kind.requires_editor() && !plan.flags().editor {
                diag = diag
                    .with_context(format!("`{}` is a {} module", id, desc.kind))
                    .with_suggestion("Pass --editor to plan an editor build");
            }
        }
        return Err(diag.with_suggestion(suggestions::MODULE_NOT_IN_PLAN).into());
    };

    let required_by = if chain.len() == 1 {
        "  entry module".to_string()
    } else {
        let chain: Vec<&str> = chain.iter().map(|m| m.as_str()).collect();
        format!("  required by: {}", chain.join(" -> "))
    };

    let Some(desc) = plan.get(id) else {
        println!("{} (built-in)", id);
        println!("{}", required_by);
        println!("  dependents: {}", join(&plan.dependents(id)));
        return Ok(());
    };

    println!("{} ({} module)", id, desc.kind);
    println!("{}", required_by);

    let deps = plan.dependencies(id);
    if !deps.is_empty() {
        println!("  dependencies:");
        for dep in deps {
            let builtin = if plan.contains(dep.name) { "" } else { " (built-in)" };
            let conditional = if dep.conditional { ", conditional" } else { "" };
            println!("    {}{} [{}{}]", dep.name, builtin, dep.visibility, conditional);
        }
    }

    println!("  dependents: {}", join(&plan.dependents(id)));
    println!("  public interface: {}", join(&plan.public_interface(id)));

    let paths = plan.include_paths(id);
    if !paths.is_empty() {
        println!("  include paths:");
        for path in paths {
            println!("    {}", path.display());
        }
    }

    if let Some(settings) = plan.settings(id) {
        println!(
            "  settings: pch {}, unity {}, iwyu {}",
            settings.pch,
            if settings.unity { "on" } else { "off" },
            settings.iwyu
        );
        if let Some(header) = settings.private_pch_header {
            println!("    private pch: {}", header.display());
        }
        if let Some(header) = settings.shared_pch_header {
            println!("    shared pch: {}", header.display());
        }
    }

    for message in &desc.messages {
        println!("  note: {}", message);
    }

    Ok(())
}

fn join(ids: &[ModuleId]) -> String {
    if ids.is_empty() {
        return "(none)".to_string();
    }
    ids.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ")
}
