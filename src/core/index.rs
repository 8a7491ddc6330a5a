use indexmap::IndexMap;
use petgraph::algo::tarjan_scc;
use petgraph::graph::NodeIndex;
use petgraph::{Directed, Direction, Graph};
use tracing::debug;

use super::identity::ArtifactKey;
use super::registry::BinaryRegistry;

/// Edges point from a dependent to its dependency. Node `i` is registry entry `i`.
pub type ReverseGraph = Graph<ArtifactKey, (), Directed>;

/// Forward dependency lists of every registered binary, plus the inverse
/// adjacency used to answer "who depends on X" without scanning.
#[derive(Debug, Clone)]
pub struct DependencyIndex {
    forward: IndexMap<ArtifactKey, Vec<ArtifactKey>>,
    graph: ReverseGraph,
}

impl DependencyIndex {
    /// Every registry key gets an entry, even when it declares nothing.
    /// Dependencies on non-native or unregistered binaries are dropped.
    pub fn build(registry: &BinaryRegistry) -> Self {
        let mut forward = IndexMap::with_capacity(registry.len());
        let mut graph = Graph::with_capacity(registry.len(), registry.len());

        for (key, _) in registry.iter() {
            graph.add_node(key.clone());
        }

        for (position, (key, binary)) in registry.iter().enumerate() {
            let mut dependencies = Vec::with_capacity(binary.dependencies.len());

            for dependency in &binary.dependencies {
                if !dependency.kind.is_native() {
                    debug!(
                        "{} depends on {} binary {}; not tracked",
                        key, dependency.kind, dependency.id
                    );
                    continue;
                }

                let dependency_key = dependency.id.key();
                let Some(target) = registry.get_index_of(&dependency_key) else {
                    debug!("{} depends on unregistered binary {}", key, dependency_key);
                    continue;
                };

                // One reverse edge per pair, however often it is declared
                graph.update_edge(NodeIndex::new(position), NodeIndex::new(target), ());
                dependencies.push(dependency_key);
            }

            forward.insert(key.clone(), dependencies);
        }

        Self { forward, graph }
    }

    pub fn dependencies_of(&self, key: &ArtifactKey) -> Option<&[ArtifactKey]> {
        self.forward.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &ArtifactKey) -> bool {
        self.forward.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Keys whose forward list contains `key`, in registry order.
    pub fn direct_dependents(&self, key: &ArtifactKey) -> Vec<&ArtifactKey> {
        let Some(position) = self.forward.get_index_of(key) else {
            return Vec::new();
        };

        let mut sources: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(NodeIndex::new(position), Direction::Incoming)
            .collect();
        sources.sort_unstable();

        sources
            .into_iter()
            .filter_map(|source| self.graph.node_weight(source))
            .collect()
    }

    /// Same answer as [`Self::direct_dependents`] by walking every entry.
    pub fn scan_dependents(&self, key: &ArtifactKey) -> Vec<&ArtifactKey> {
        self.forward
            .iter()
            .filter(|(_, dependencies)| dependencies.contains(key))
            .map(|(dependent, _)| dependent)
            .collect()
    }

    /// Groups of binaries that depend on each other, including self-loops.
    /// Members and groups are in registry order.
    pub fn cycles(&self) -> Vec<Vec<ArtifactKey>> {
        let mut cycles: Vec<Vec<NodeIndex>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1 || self.graph.find_edge(scc[0], scc[0]).is_some()
            })
            .map(|mut scc| {
                scc.sort_unstable();
                scc
            })
            .collect();
        cycles.sort_unstable_by_key(|scc| scc[0]);

        cycles
            .into_iter()
            .map(|scc| {
                scc.into_iter()
                    .filter_map(|node| self.graph.node_weight(node).cloned())
                    .collect()
            })
            .collect()
    }
}
