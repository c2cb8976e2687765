//! Test utilities for modgraph unit tests.
//!
//! Builders for small registries and helpers for comparing resolved orders
//! against plain string lists.

pub mod fixtures;

pub use fixtures::*;

use crate::core::descriptor::ModuleDescriptor;
use crate::core::module_id::ModuleId;
use crate::core::registry::ModuleRegistry;
use crate::resolver::ModulePlan;

/// Build a registry from `(name, public, private)` triples, in order.
///
/// Panics on registration errors; use `ModuleRegistry::register` directly
/// when testing those.
pub fn registry(specs: &[(&str, &[&str], &[&str])]) -> ModuleRegistry {
    let mut reg = ModuleRegistry::new();
    for (name, public, private) in specs {
        let desc = ModuleDescriptor::new(*name)
            .public(public.iter().copied())
            .private(private.iter().copied());
        reg.register(desc)
            .unwrap_or_else(|e| panic!("failed to register `{}`: {}", name, e));
    }
    reg
}

/// Intern a list of names.
pub fn ids(names: &[&str]) -> Vec<ModuleId> {
    names.iter().map(|n| ModuleId::new(n)).collect()
}

/// Names of a list of ids.
pub fn names(ids: &[ModuleId]) -> Vec<&'static str> {
    ids.iter().map(|id| id.as_str()).collect()
}

/// Module names of a plan, in compilation order.
pub fn order_names(plan: &ModulePlan) -> Vec<&'static str> {
    plan.modules().iter().map(|m| m.name.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_builder() {
        let reg = registry(&[("A", &["B"], &[]), ("B", &[], &["C"])]);

        assert_eq!(reg.len(), 2);
        let a = reg.get(ModuleId::new("A")).unwrap();
        assert_eq!(names(&a.public_dependencies), vec!["B"]);
        let b = reg.get(ModuleId::new("B")).unwrap();
        assert_eq!(names(&b.private_dependencies), vec!["C"]);
    }
}
