//! Dependency Graph
//!
//! The graph records which names depend on which, and computes the order in
//! which a name and everything it needs must be prepared.
//!
//! # Algorithm
//!
//! `load_order` is a depth-first traversal from the requested name:
//!
//! 1. Visit the dependencies of the current node in the order they were
//!    declared.
//! 2. A dependency that is already finished is skipped.
//! 3. A dependency that is still on the traversal stack closes a cycle, and
//!    the traversal fails with the edge that closed it.
//! 4. Once all dependencies of a node are finished, the node itself is
//!    appended to the order.
//!
//! Cycles are only detected here, never while adding edges, so an edge that
//! is never queried can never fail. The traversal is read-only.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use tracing::{trace, warn};

use super::node::Node;
use crate::error::{Result, ScopeError};
use crate::name::Name;

/// A directed graph of named nodes.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// All nodes in the graph, in creation order.
    nodes: IndexMap<Name, Node>,
}

impl DependencyGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `name` depends on every name in `depends_on`.
    ///
    /// Unknown names are created as empty nodes, `name` first.
    pub fn on<I, N>(&mut self, depends_on: I, name: impl Into<Name>) -> &mut Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Name>,
    {
        let name = name.into();
        self.nodes.entry(name.clone()).or_default();

        for dependency in depends_on {
            let dependency = dependency.into();
            trace!(%name, %dependency, "adding dependency edge");

            self.node_mut(dependency.clone()).add_dependent(name.clone());
            self.node_mut(name.clone()).add_dependency(dependency);
        }

        self
    }

    fn node_mut(&mut self, name: Name) -> &mut Node {
        self.nodes.entry(name).or_default()
    }

    /// The direct dependencies of `name`, without creating it.
    pub fn get(&self, name: &Name) -> Option<&IndexSet<Name>> {
        self.nodes.get(name).map(Node::dependencies)
    }

    /// The names that directly depend on `name`.
    pub fn dependents(&self, name: &Name) -> Option<&IndexSet<Name>> {
        self.nodes.get(name).map(Node::dependents)
    }

    /// `name` and all of its transitive dependencies, every dependency
    /// ordered before the nodes that need it.
    ///
    /// A name the graph has never seen has an order of just itself.
    pub fn load_order(&self, name: &Name) -> Result<IndexSet<Name>> {
        let mut finished = IndexSet::new();
        self.visit(name, &mut finished)?;
        Ok(finished)
    }

    /// One order covering every node, roots visited in creation order.
    pub fn load_all_order(&self) -> Result<IndexSet<Name>> {
        let mut finished = IndexSet::with_capacity(self.nodes.len());
        for name in self.nodes.keys() {
            self.visit(name, &mut finished)?;
        }
        Ok(finished)
    }

    fn visit<'g>(&'g self, root: &'g Name, finished: &mut IndexSet<Name>) -> Result<()> {
        if finished.contains(root) {
            return Ok(());
        }

        let mut in_progress: HashSet<&'g Name> = HashSet::new();
        in_progress.insert(root);

        // Each frame is a node and the index of its next dependency to visit.
        let mut stack: Vec<(&'g Name, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let current = frame.0;
            let next = self
                .nodes
                .get(current)
                .and_then(|node| node.dependencies().get_index(frame.1));

            let Some(dependency) = next else {
                stack.pop();
                in_progress.remove(current);
                finished.insert(current.clone());
                continue;
            };
            frame.1 += 1;

            if finished.contains(dependency) {
                continue;
            }

            if in_progress.contains(dependency) {
                warn!(from = %current, to = %dependency, "dependency cycle detected");
                return Err(ScopeError::DependencyCycle {
                    from: current.clone(),
                    to: dependency.clone(),
                });
            }

            in_progress.insert(dependency);
            stack.push((dependency, 0));
        }

        Ok(())
    }

    /// The names of all nodes, in creation order.
    pub fn names(&self) -> impl Iterator<Item = &Name> {
        self.nodes.keys()
    }

    /// Check whether the graph has a node for `name`.
    pub fn contains(&self, name: &Name) -> bool {
        self.nodes.contains_key(name)
    }

    /// Get the total number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remove every node and edge.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}
