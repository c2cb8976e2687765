//! Resolution - from entry modules to an ordered compilation plan.
//!
//! Resolution runs in three passes over the active edges:
//!
//! 1. Walk the closure of the entry modules and collect every unresolved
//!    reference, so all of them are reported together.
//! 2. Depth-first search with three-color marking. A grey (in-progress)
//!    module reached again is a back-edge, i.e. a cycle. Modules are
//!    emitted in post-order, which puts dependencies first.
//! 3. Build the [`ModulePlan`] graph used for visibility queries.
//!
//! Conditional blocks are evaluated once, against the capability set derived
//! from the flags at the start of resolution.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::core::descriptor::DependencyRef;
use crate::core::flags::{BuildFlags, CapabilitySet};
use crate::core::module_id::ModuleId;
use crate::core::registry::ModuleRegistry;
use crate::resolver::errors::{ConfigError, MissingDependency};
use crate::resolver::plan::ModulePlan;

/// Active edges of every module reached from the entries.
pub(crate) type EdgeMap = HashMap<ModuleId, Vec<DependencyRef>>;

/// Resolve `entries` against `registry` under `flags`.
///
/// Entries are deduplicated, keeping their first position. The returned plan
/// lists each reachable module exactly once, after all of its dependencies.
/// Modules with no ordering constraint between them keep declaration order:
/// entries in the order given, dependencies in the order each module lists
/// them.
pub fn resolve(
    registry: &ModuleRegistry,
    entries: &[ModuleId],
    flags: &BuildFlags,
) -> Result<ModulePlan, ConfigError> {
    let caps = flags.capabilities();
    tracing::debug!(?caps, entries = entries.len(), "resolving module graph");

    let mut roots: Vec<ModuleId> = Vec::with_capacity(entries.len());
    for &entry in entries {
        if !registry.contains(entry) {
            return Err(ConfigError::UnknownEntryModule {
                name: entry.to_string(),
            });
        }
        if !roots.contains(&entry) {
            roots.push(entry);
        }
    }

    let (edges, externals) = collect_closure(registry, &roots, &caps)?;

    let mut sorter = TopoSort::new(&edges);
    for &root in &roots {
        sorter.visit(root).map_err(|cycle| ConfigError::CyclicDependency {
            cycle: cycle.iter().map(|id| id.to_string()).collect(),
        })?;
    }
    let order = sorter.finish();

    for &id in &order {
        if let Some(desc) = registry.get(id) {
            for message in &desc.messages {
                tracing::info!(module = %id, "{}", message);
            }
        }
    }

    tracing::debug!(
        modules = order.len(),
        externals = externals.len(),
        "module graph resolved"
    );

    Ok(ModulePlan::build(registry, *flags, roots, order, edges, externals))
}

/// Breadth-first walk over active edges. Built-ins end the walk; anything
/// neither registered nor built-in is collected as missing.
fn collect_closure(
    registry: &ModuleRegistry,
    roots: &[ModuleId],
    caps: &CapabilitySet,
) -> Result<(EdgeMap, Vec<ModuleId>), ConfigError> {
    let mut edges = EdgeMap::new();
    let mut externals: Vec<ModuleId> = Vec::new();
    let mut missing: Vec<MissingDependency> = Vec::new();
    let mut reported: HashSet<(ModuleId, ModuleId)> = HashSet::new();

    let mut queue: VecDeque<ModuleId> = roots.iter().copied().collect();
    let mut seen: HashSet<ModuleId> = roots.iter().copied().collect();

    while let Some(id) = queue.pop_front() {
        let Some(desc) = registry.get(id) else {
            continue;
        };

        let deps = desc.dependencies(caps);
        for dep in &deps {
            if registry.contains(dep.name) {
                if seen.insert(dep.name) {
                    queue.push_back(dep.name);
                }
            } else if registry.is_external(dep.name) {
                if !externals.contains(&dep.name) {
                    externals.push(dep.name);
                }
            } else if reported.insert((id, dep.name)) {
                tracing::debug!(module = %id, missing = %dep.name, "unresolved dependency");
                missing.push(registry.missing(id, dep.name));
            }
        }
        edges.insert(id, deps);
    }

    if !missing.is_empty() {
        return Err(ConfigError::UnresolvedDependency { missing });
    }

    externals.sort();
    Ok((edges, externals))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Three-color DFS. Unmarked modules are white.
///
/// The walk keeps its own stack of `(module, next edge)` frames, so graph
/// depth is bounded by the heap rather than the thread stack.
struct TopoSort<'a> {
    edges: &'a EdgeMap,
    marks: HashMap<ModuleId, Mark>,
    stack: Vec<(ModuleId, usize)>,
    order: Vec<ModuleId>,
}

impl<'a> TopoSort<'a> {
    fn new(edges: &'a EdgeMap) -> Self {
        TopoSort {
            edges,
            marks: HashMap::with_capacity(edges.len()),
            stack: Vec::new(),
            order: Vec::with_capacity(edges.len()),
        }
    }

    /// Visit `id`; on a back-edge return the cycle, starting and ending at
    /// the re-entered module.
    fn visit(&mut self, id: ModuleId) -> Result<(), Vec<ModuleId>> {
        if self.marks.contains_key(&id) {
            return Ok(());
        }
        self.enter(id);

        let edges = self.edges;
        while let Some(&(current, next)) = self.stack.last() {
            // Externals have no entry in the edge map
            let deps = edges.get(&current).map(Vec::as_slice).unwrap_or(&[]);
            let Some(offset) = deps[next..]
                .iter()
                .position(|d| edges.contains_key(&d.name))
            else {
                self.stack.pop();
                self.marks.insert(current, Mark::Done);
                self.order.push(current);
                continue;
            };

            let dep = deps[next + offset].name;
            if let Some(frame) = self.stack.last_mut() {
                frame.1 = next + offset + 1;
            }

            match self.marks.get(&dep) {
                Some(Mark::Done) => {}
                Some(Mark::InProgress) => return Err(self.cycle_through(dep)),
                None => self.enter(dep),
            }
        }
        Ok(())
    }

    fn enter(&mut self, id: ModuleId) {
        self.marks.insert(id, Mark::InProgress);
        self.stack.push((id, 0));
    }

    fn cycle_through(&self, id: ModuleId) -> Vec<ModuleId> {
        let start = self.stack.iter().position(|&(m, _)| m == id).unwrap_or(0);
        let mut cycle: Vec<ModuleId> = self.stack[start..].iter().map(|&(m, _)| m).collect();
        cycle.push(id);
        cycle
    }

    fn finish(self) -> Vec<ModuleId> {
        self.order
    }
}
