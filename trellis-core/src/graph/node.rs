//! Graph Nodes
//!
//! This module defines the node type that lives in the dependency graph.

use indexmap::IndexSet;

use crate::name::Name;

/// A node in the dependency graph.
///
/// Both edge sets keep insertion order, which is what makes load orders
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Nodes that this node depends on, in the order they were declared.
    dependencies: IndexSet<Name>,

    /// Nodes that depend on this node, in the order they were declared.
    dependents: IndexSet<Name>,
}

impl Node {
    /// Create a node with no edges.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dependency (a node that this node needs first).
    ///
    /// Returns `false` if the edge already existed.
    pub fn add_dependency(&mut self, name: Name) -> bool {
        self.dependencies.insert(name)
    }

    /// Get all dependencies.
    pub fn dependencies(&self) -> &IndexSet<Name> {
        &self.dependencies
    }

    /// Record that `name` depends on this node.
    pub fn add_dependent(&mut self, name: Name) -> bool {
        self.dependents.insert(name)
    }

    /// Get all dependents.
    pub fn dependents(&self) -> &IndexSet<Name> {
        &self.dependents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_has_no_edges() {
        let node = Node::new();
        assert!(node.dependencies().is_empty());
        assert!(node.dependents().is_empty());
    }

    #[test]
    fn dependency_management() {
        let mut node = Node::new();

        assert!(node.add_dependency(Name::from("c")));
        assert!(node.add_dependency(Name::from("b")));
        assert!(!node.add_dependency(Name::from("c")));

        let deps: Vec<_> = node.dependencies().iter().map(Name::to_string).collect();
        assert_eq!(deps, ["c", "b"]);
        assert_eq!(node.dependencies().len(), 2);
    }

    #[test]
    fn dependents_keep_order() {
        let mut node = Node::new();
        node.add_dependent(Name::from("z"));
        node.add_dependent(Name::from("a"));

        let dependents: Vec<_> = node.dependents().iter().map(Name::to_string).collect();
        assert_eq!(dependents, ["z", "a"]);
    }
}
