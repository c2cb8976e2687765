//! ModulePlan - the immutable result of a resolution.
//!
//! The plan holds the compilation order and a graph over every module it
//! touches (built-ins included). Edges remember their visibility, so the
//! interface a module re-exports can be computed by walking public edges
//! only.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, EdgeFiltered};
use petgraph::Direction;
use serde::Serialize;

use crate::core::build_options::EffectiveSettings;
use crate::core::descriptor::{DependencyRef, ModuleDescriptor, ModuleKind, Visibility};
use crate::core::flags::BuildFlags;
use crate::core::module_id::ModuleId;
use crate::core::registry::ModuleRegistry;
use crate::resolver::resolve::EdgeMap;

/// Edge weight in the plan graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanEdge {
    pub visibility: Visibility,
    pub conditional: bool,
}

/// Ordered compilation plan for one set of entry modules and flags.
#[derive(Debug, Clone)]
pub struct ModulePlan {
    flags: BuildFlags,

    /// Entry modules, deduplicated, in the order requested
    entries: Vec<ModuleId>,

    /// Registered modules, dependencies before dependents
    modules: Vec<ModuleDescriptor>,

    /// Built-ins reached, sorted
    externals: Vec<ModuleId>,

    /// Active edges per module, in declaration order
    edges: EdgeMap,

    graph: DiGraph<ModuleId, PlanEdge>,
    nodes: HashMap<ModuleId, NodeIndex>,

    /// Position in `modules`, then externals after them
    rank: HashMap<ModuleId, usize>,
}

impl ModulePlan {
    pub(crate) fn build(
        registry: &ModuleRegistry,
        flags: BuildFlags,
        entries: Vec<ModuleId>,
        order: Vec<ModuleId>,
        edges: EdgeMap,
        externals: Vec<ModuleId>,
    ) -> Self {
        let modules: Vec<ModuleDescriptor> = order
            .iter()
            .filter_map(|&id| registry.get(id).cloned())
            .collect();

        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();
        let mut rank = HashMap::new();

        for (i, &id) in order.iter().chain(externals.iter()).enumerate() {
            nodes.insert(id, graph.add_node(id));
            rank.insert(id, i);
        }

        for &id in &order {
            let Some(deps) = edges.get(&id) else {
                continue;
            };
            for dep in deps {
                if let (Some(&from), Some(&to)) = (nodes.get(&id), nodes.get(&dep.name)) {
                    graph.add_edge(
                        from,
                        to,
                        PlanEdge {
                            visibility: dep.visibility,
                            conditional: dep.conditional,
                        },
                    );
                }
            }
        }

        ModulePlan {
            flags,
            entries,
            modules,
            externals,
            edges,
            graph,
            nodes,
            rank,
        }
    }

    /// Flags the plan was resolved with.
    pub fn flags(&self) -> &BuildFlags {
        &self.flags
    }

    pub fn entries(&self) -> &[ModuleId] {
        &self.entries
    }

    /// Modules in compilation order.
    pub fn modules(&self) -> &[ModuleDescriptor] {
        &self.modules
    }

    /// Module names in compilation order.
    pub fn order(&self) -> Vec<ModuleId> {
        self.modules.iter().map(|m| m.name).collect()
    }

    /// Built-in modules the plan relies on.
    pub fn externals(&self) -> &[ModuleId] {
        &self.externals
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Whether `id` is a compilation unit in this plan.
    pub fn contains(&self, id: ModuleId) -> bool {
        self.edges.contains_key(&id)
    }

    pub fn get(&self, id: ModuleId) -> Option<&ModuleDescriptor> {
        self.rank
            .get(&id)
            .and_then(|&i| self.modules.get(i))
            .filter(|m| m.name == id)
    }

    /// Direct dependencies of `id`, in declaration order.
    pub fn dependencies(&self, id: ModuleId) -> &[DependencyRef] {
        self.edges.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Modules in the plan that depend directly on `id`, in plan order.
    pub fn dependents(&self, id: ModuleId) -> Vec<ModuleId> {
        let Some(&node) = self.nodes.get(&id) else {
            return Vec::new();
        };

        let mut dependents: Vec<ModuleId> = self
            .graph
            .neighbors_directed(node, Direction::Incoming)
            .map(|n| self.graph[n])
            .collect();
        self.sort_by_rank(&mut dependents);
        dependents.dedup();
        dependents
    }

    /// Modules whose interfaces anything depending on `id` can see: the
    /// closure of `id` over public edges, excluding `id` itself.
    pub fn public_interface(&self, id: ModuleId) -> Vec<ModuleId> {
        let Some(&start) = self.nodes.get(&id) else {
            return Vec::new();
        };

        let public_only =
            EdgeFiltered::from_fn(&self.graph, |e| e.weight().visibility == Visibility::Public);

        let mut reached = Vec::new();
        let mut dfs = Dfs::new(&public_only, start);
        while let Some(node) = dfs.next(&public_only) {
            if node != start {
                reached.push(self.graph[node]);
            }
        }

        self.sort_by_rank(&mut reached);
        reached
    }

    /// Modules whose interfaces `id` can see while compiling: every direct
    /// dependency plus what each of them re-exports.
    pub fn visible_modules(&self, id: ModuleId) -> Vec<ModuleId> {
        let mut seen = HashSet::new();
        let mut visible = Vec::new();

        for dep in self.dependencies(id) {
            for m in std::iter::once(dep.name).chain(self.public_interface(dep.name)) {
                if m != id && seen.insert(m) {
                    visible.push(m);
                }
            }
        }

        self.sort_by_rank(&mut visible);
        visible
    }

    /// Include paths for compiling `id`: its own paths, then the public
    /// paths of every visible module in plan order. Duplicates are dropped.
    pub fn include_paths(&self, id: ModuleId) -> Vec<PathBuf> {
        let Some(own) = self.get(id) else {
            return Vec::new();
        };

        let mut paths: Vec<PathBuf> = Vec::new();
        let mut push = |p: &PathBuf| {
            if !paths.contains(p) {
                paths.push(p.clone());
            }
        };

        own.build_options
            .public_include_paths
            .iter()
            .chain(own.build_options.private_include_paths.iter())
            .for_each(&mut push);

        for m in self.visible_modules(id) {
            if let Some(desc) = self.get(m) {
                desc.build_options
                    .public_include_paths
                    .iter()
                    .for_each(&mut push);
            }
        }

        paths
    }

    /// Effective compile settings for `id` under the plan's flags.
    pub fn settings(&self, id: ModuleId) -> Option<EffectiveSettings> {
        self.get(id)
            .map(|desc| desc.build_options.effective(&self.flags))
    }

    /// One dependency chain from an entry module down to `id`, shortest
    /// first. `None` if `id` is not in the plan.
    pub fn why(&self, id: ModuleId) -> Option<Vec<ModuleId>> {
        if !self.nodes.contains_key(&id) {
            return None;
        }

        let mut parent: HashMap<ModuleId, ModuleId> = HashMap::new();
        let mut queue: VecDeque<ModuleId> = self.entries.iter().copied().collect();
        let mut seen: HashSet<ModuleId> = queue.iter().copied().collect();

        while let Some(current) = queue.pop_front() {
            if current == id {
                let mut chain = vec![current];
                let mut cursor = current;
                while let Some(&p) = parent.get(&cursor) {
                    chain.push(p);
                    cursor = p;
                }
                chain.reverse();
                return Some(chain);
            }

            for dep in self.dependencies(current) {
                if seen.insert(dep.name) {
                    parent.insert(dep.name, current);
                    queue.push_back(dep.name);
                }
            }
        }

        None
    }

    fn sort_by_rank(&self, ids: &mut [ModuleId]) {
        ids.sort_by_key(|id| self.rank.get(id).copied().unwrap_or(usize::MAX));
    }

    /// Serializable view handed to the build orchestrator.
    pub fn to_report(&self) -> PlanReport {
        let modules = self
            .modules
            .iter()
            .map(|desc| PlannedModule {
                name: desc.name,
                kind: desc.kind,
                dependencies: self
                    .dependencies(desc.name)
                    .iter()
                    .map(|d| PlannedDependency {
                        name: d.name,
                        visibility: d.visibility,
                        conditional: d.conditional,
                    })
                    .collect(),
                public_interface: self.public_interface(desc.name),
                include_paths: self.include_paths(desc.name),
                settings: desc.build_options.effective(&self.flags),
            })
            .collect();

        PlanReport {
            flags: self.flags,
            capabilities: self.flags.capabilities().capabilities().map(|c| c.as_str()).collect(),
            entries: self.entries.clone(),
            modules,
            externals: self.externals.clone(),
        }
    }
}

/// JSON form of a [`ModulePlan`].
#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub flags: BuildFlags,
    pub capabilities: Vec<&'static str>,
    pub entries: Vec<ModuleId>,
    pub modules: Vec<PlannedModule>,
    pub externals: Vec<ModuleId>,
}

#[derive(Debug, Serialize)]
pub struct PlannedModule {
    pub name: ModuleId,
    pub kind: ModuleKind,
    pub dependencies: Vec<PlannedDependency>,
    pub public_interface: Vec<ModuleId>,
    pub include_paths: Vec<PathBuf>,
    pub settings: EffectiveSettings,
}

#[derive(Debug, Serialize)]
pub struct PlannedDependency {
    pub name: ModuleId,
    pub visibility: Visibility,
    pub conditional: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::build_options::BuildOptions;
    use crate::resolver::resolve;
    use crate::test_support::{ids, names, registry};

    fn with_include(desc: ModuleDescriptor, public: &str, private: &str) -> ModuleDescriptor {
        desc.with_build_options(BuildOptions {
            public_include_paths: vec![PathBuf::from(public)],
            private_include_paths: vec![PathBuf::from(private)],
            ..Default::default()
        })
    }

    fn layered() -> ModuleRegistry {
        // Editor -private-> Graph -public-> Core -public-> Base
        //                   Graph -private-> Assets
        let mut reg = ModuleRegistry::with_externals(["Engine"]).unwrap();
        for desc in [
            with_include(ModuleDescriptor::new("Base"), "Base/Public", "Base/Private"),
            with_include(
                ModuleDescriptor::new("Core").public(["Base", "Engine"]),
                "Core/Public",
                "Core/Private",
            ),
            with_include(ModuleDescriptor::new("Assets"), "Assets/Public", "Assets/Private"),
            with_include(
                ModuleDescriptor::new("Graph")
                    .public(["Core"])
                    .private(["Assets"]),
                "Graph/Public",
                "Graph/Private",
            ),
            with_include(
                ModuleDescriptor::new("Editor").private(["Graph"]),
                "Editor/Public",
                "Editor/Private",
            ),
        ] {
            reg.register(desc).unwrap();
        }
        reg
    }

    #[test]
    fn test_public_interface_walks_public_edges_only() {
        let reg = layered();
        let plan = resolve(&reg, &ids(&["Editor"]), &BuildFlags::default()).unwrap();

        let iface = plan.public_interface(ModuleId::new("Graph"));
        assert_eq!(names(&iface), vec!["Base", "Core", "Engine"]);

        // Private edge from Editor: nothing re-exported
        assert!(plan.public_interface(ModuleId::new("Editor")).is_empty());
    }

    #[test]
    fn test_visible_modules() {
        let reg = layered();
        let plan = resolve(&reg, &ids(&["Editor"]), &BuildFlags::default()).unwrap();

        // Editor sees Graph and what Graph re-exports, but not Graph's private Assets
        let visible = plan.visible_modules(ModuleId::new("Editor"));
        assert_eq!(names(&visible), vec!["Base", "Core", "Graph", "Engine"]);

        let visible = plan.visible_modules(ModuleId::new("Graph"));
        assert_eq!(names(&visible), vec!["Base", "Core", "Assets", "Engine"]);
    }

    #[test]
    fn test_include_paths() {
        let reg = layered();
        let plan = resolve(&reg, &ids(&["Editor"]), &BuildFlags::default()).unwrap();

        let paths = plan.include_paths(ModuleId::new("Editor"));
        let paths: Vec<_> = paths.iter().map(|p| p.to_string_lossy().into_owned()).collect();
        assert_eq!(
            paths,
            vec![
                "Editor/Public",
                "Editor/Private",
                "Base/Public",
                "Core/Public",
                "Graph/Public",
            ]
        );
    }

    #[test]
    fn test_dependents_and_why() {
        let reg = layered();
        let plan = resolve(&reg, &ids(&["Editor"]), &BuildFlags::default()).unwrap();

        assert_eq!(
            names(&plan.dependents(ModuleId::new("Core"))),
            vec!["Graph"]
        );
        assert_eq!(
            names(&plan.dependents(ModuleId::new("Engine"))),
            vec!["Core"]
        );

        let chain = plan.why(ModuleId::new("Base")).unwrap();
        assert_eq!(names(&chain), vec!["Editor", "Graph", "Core", "Base"]);

        assert!(plan.why(ModuleId::new("Unrelated")).is_none());
    }

    #[test]
    fn test_report_serializes() {
        let reg = registry(&[("A", &["B"], &[]), ("B", &[], &[])]);
        let plan = resolve(&reg, &ids(&["A"]), &BuildFlags::editor()).unwrap();

        let json = serde_json::to_value(plan.to_report()).unwrap();
        assert_eq!(json["modules"][0]["name"], "B");
        assert_eq!(json["modules"][1]["dependencies"][0]["visibility"], "public");
        assert_eq!(json["flags"]["editor"], true);
        assert_eq!(json["capabilities"][0], "editor");
        assert_eq!(json["modules"][0]["settings"]["pch"], "shared");
    }
}
