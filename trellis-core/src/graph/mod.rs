//! Dependency Graph
//!
//! This module tracks which named values depend on which, independently of
//! the values themselves.
//!
//! # Overview
//!
//! The graph is a directed graph where:
//!
//! - Nodes are [`Name`](crate::Name)s
//! - Edges are dependencies: if A depends on B, A's node lists B, and B's
//!   node lists A as a dependent
//!
//! The graph grows lazily. Naming an unknown node as a dependency creates it.
//! It may contain cycles; they are reported when a load order is computed.

mod dependency;
mod node;

pub use dependency::DependencyGraph;
pub use node::Node;
