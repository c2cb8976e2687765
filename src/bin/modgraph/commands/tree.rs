//! `modgraph tree` command

use std::collections::HashSet;

use anyhow::Result;

use crate::cli::TreeArgs;
use modgraph::core::ModuleId;
use modgraph::ops::resolve_project;
use modgraph::resolver::ModulePlan;
use modgraph::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: TreeArgs) -> Result<()> {
    let root = ModuleId::new(&args.module);
    let opts = args.project.to_options(std::slice::from_ref(&args.module));

    let (_, plan) = resolve_project(ctx, &opts)?;

    let printer = TreePrinter {
        plan: &plan,
        max_depth: args.depth.unwrap_or(usize::MAX),
        show_builtins: !args.no_builtins,
    };
    let mut seen = HashSet::new();
    printer.print(root, None, 0, &mut seen);

    Ok(())
}

struct TreePrinter<'a> {
    plan: &'a ModulePlan,
    max_depth: usize,
    show_builtins: bool,
}

impl TreePrinter<'_> {
    fn print(&self, id: ModuleId, edge: Option<String>, depth: usize, seen: &mut HashSet<ModuleId>) {
        if depth > self.max_depth {
            return;
        }

        let is_builtin = !self.plan.contains(id);
        let is_duplicate = !seen.insert(id);

        let prefix = if depth == 0 {
            String::new()
        } else {
            format!("{}├── ", "│   ".repeat(depth - 1))
        };

        let mut line = format!("{}{}", prefix, id);
        if is_builtin {
            line.push_str(" (built-in)");
        }
        if let Some(edge) = edge {
            line.push_str(&format!(" [{}]", edge));
        }
        if is_duplicate && !is_builtin {
            line.push_str(" (*)");
        }
        println!("{}", line);

        if is_duplicate {
            return;
        }

        for dep in self.plan.dependencies(id) {
            if !self.show_builtins && !self.plan.contains(dep.name) {
                continue;
            }
            let edge = if dep.conditional {
                format!("{}, conditional", dep.visibility)
            } else {
                dep.visibility.to_string()
            };
            self.print(dep.name, Some(edge), depth + 1, seen);
        }
    }
}
