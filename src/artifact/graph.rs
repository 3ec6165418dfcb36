//! Dependency graph over artifact coordinates.
//!
//! Used by the transitive resolver for cycle detection and for ordering
//! the resolved set so every dependency precedes its dependents.

use crate::core::Coordinate;
use crate::core::error::StrataError;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Color states for cycle detection using DFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Node has not been visited.
    White,
    /// Node is currently being visited (in the DFS stack).
    Gray,
    /// Node has been fully visited.
    Black,
}

/// Directed graph of coordinate-to-coordinate dependency edges.
pub struct DependencyGraph {
    graph: DiGraph<Coordinate, ()>,
    node_map: HashMap<Coordinate, NodeIndex>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Add a node to the graph if it doesn't already exist.
    pub fn ensure_node(&mut self, node: Coordinate) -> NodeIndex {
        if let Some(&index) = self.node_map.get(&node) {
            index
        } else {
            let index = self.graph.add_node(node.clone());
            self.node_map.insert(node, index);
            index
        }
    }

    /// Add a dependency edge: `from` depends on `to`.
    pub fn add_dependency(&mut self, from: Coordinate, to: Coordinate) {
        let from_idx = self.ensure_node(from);
        let to_idx = self.ensure_node(to);

        // Avoid duplicate edges
        if !self.graph.contains_edge(from_idx, to_idx) {
            self.graph.add_edge(from_idx, to_idx, ());
        }
    }

    /// Detect cycles using DFS with colors.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::CircularDependency`] carrying the cycle path
    /// when one exists.
    pub fn detect_cycles(&self) -> Result<(), StrataError> {
        let mut colors: HashMap<NodeIndex, Color> = HashMap::new();
        let mut path: Vec<Coordinate> = Vec::new();

        for node in self.graph.node_indices() {
            colors.insert(node, Color::White);
        }

        for node in self.graph.node_indices() {
            if matches!(colors.get(&node), Some(Color::White))
                && let Some(cycle) = self.dfs_visit(node, &mut colors, &mut path)
            {
                let chain =
                    cycle.iter().map(Coordinate::to_string).collect::<Vec<_>>().join(" -> ");
                return Err(StrataError::CircularDependency {
                    chain,
                });
            }
        }

        Ok(())
    }

    /// DFS visit for cycle detection.
    ///
    /// Returns `Some(cycle_path)` if a cycle is detected, `None` otherwise.
    fn dfs_visit(
        &self,
        node: NodeIndex,
        colors: &mut HashMap<NodeIndex, Color>,
        path: &mut Vec<Coordinate>,
    ) -> Option<Vec<Coordinate>> {
        colors.insert(node, Color::Gray);
        path.push(self.graph[node].clone());

        for neighbor in self.graph.neighbors(node) {
            match colors.get(&neighbor) {
                Some(Color::Gray) => {
                    // Found a cycle; a gray node is always on the current path.
                    let cycle_start = path.iter().position(|n| *n == self.graph[neighbor]).unwrap();
                    let mut cycle = path[cycle_start..].to_vec();
                    // Close the loop in the rendered chain
                    cycle.push(self.graph[neighbor].clone());
                    return Some(cycle);
                }
                Some(Color::White) => {
                    if let Some(cycle) = self.dfs_visit(neighbor, colors, path) {
                        return Some(cycle);
                    }
                }
                _ => {}
            }
        }

        path.pop();
        colors.insert(node, Color::Black);
        None
    }

    /// Coordinates in an order where every dependency precedes its
    /// dependents.
    pub fn topological_order(&self) -> Result<Vec<Coordinate>, StrataError> {
        self.detect_cycles()?;

        match toposort(&self.graph, None) {
            Ok(indices) => {
                // Reverse so dependencies come first
                Ok(indices.into_iter().rev().map(|idx| self.graph[idx].clone()).collect())
            }
            Err(_) => Err(StrataError::Other {
                message: "failed to order dependency graph".to_string(),
            }),
        }
    }

    /// True when no node has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Total number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
