use std::collections::HashMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::key::Key;

/// Eager dependency graph of one container.
#[derive(Debug, Default)]
pub(crate) struct DependencyGraph {
    graph: DiGraph<Key, ()>,
    node_indices: HashMap<Key, NodeIndex>,
}

impl DependencyGraph {
    fn node(&mut self, key: &Key) -> NodeIndex {
        if let Some(&index) = self.node_indices.get(key) {
            return index;
        }
        let index = self.graph.add_node(key.clone());
        self.node_indices.insert(key.clone(), index);
        index
    }

    /// `dependent` cannot be created before `dependency`.
    pub(crate) fn add_edge(&mut self, dependent: &Key, dependency: &Key) {
        let from = self.node(dependent);
        let to = self.node(dependency);
        self.graph.update_edge(from, to, ());
    }

    /// Every strongly connected component that forms a cycle, members in
    /// the order they were first added.
    pub(crate) fn find_cycles(&self) -> Vec<Vec<Key>> {
        let mut cycles: Vec<Vec<NodeIndex>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| match component.as_slice() {
                [single] => self.graph.contains_edge(*single, *single),
                _ => true,
            })
            .map(|mut component| {
                component.sort();
                component
            })
            .collect();
        cycles.sort();
        cycles
            .into_iter()
            .map(|component| component.into_iter().map(|index| self.graph[index].clone()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GenericType;

    fn key(name: &str) -> Key {
        Key::of(GenericType::raw(name))
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let mut graph = DependencyGraph::default();
        graph.add_edge(&key("a/A"), &key("a/B"));
        graph.add_edge(&key("a/B"), &key("a/C"));
        graph.add_edge(&key("a/A"), &key("a/C"));
        assert!(graph.find_cycles().is_empty());
    }

    #[test]
    fn finds_a_cycle_and_a_self_loop() {
        let mut graph = DependencyGraph::default();
        graph.add_edge(&key("a/A"), &key("a/B"));
        graph.add_edge(&key("a/B"), &key("a/A"));
        graph.add_edge(&key("a/C"), &key("a/C"));

        let cycles = graph.find_cycles();
        assert_eq!(cycles, vec![vec![key("a/A"), key("a/B")], vec![key("a/C")]]);
    }
}
