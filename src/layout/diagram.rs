//! Laid-out flow diagram.
//!
//! A [`Diagram`] is the output of the layout engine: positioned nodes and the
//! edges connecting them. It can be serialized for a graph widget, turned
//! into a petgraph graph for structural checks, or printed as a plain-text
//! schema.

use std::collections::HashMap;

use petgraph::{
    Direction,
    algo::is_cyclic_directed,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use serde::Serialize;

use crate::{
    MedflowError, Result,
    layout::{
        edge::{DiagramEdge, EdgeStyle},
        node::{DiagramNode, NodeData, NodeId},
    },
};

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Diagram {
    nodes: Vec<DiagramNode>,
    edges: Vec<DiagramEdge>,
}

impl Diagram {
    pub fn new(
        nodes: Vec<DiagramNode>,
        edges: Vec<DiagramEdge>,
    ) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[DiagramNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[DiagramEdge] {
        &self.edges
    }

    pub fn into_parts(self) -> (Vec<DiagramNode>, Vec<DiagramEdge>) {
        (self.nodes, self.edges)
    }

    /// get node by id
    pub fn node(
        &self,
        id: &str,
    ) -> Option<&DiagramNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds a directed graph whose node weights are node ids and whose edge
    /// weights are edge styles.
    pub fn to_graph(&self) -> Result<DiGraph<NodeId, EdgeStyle>> {
        let mut graph: DiGraph<NodeId, EdgeStyle> = DiGraph::new();
        let mut indices: HashMap<&str, NodeIndex> = HashMap::new();

        for node in self.nodes.iter() {
            let idx = graph.add_node(node.id.clone());
            indices.insert(node.id.as_str(), idx);
        }
        for edge in self.edges.iter() {
            let source = indices.get(edge.source.as_str()).ok_or(MedflowError::Flow(format!("edge {} references unknown source node {}", edge.id, edge.source)))?;
            let target = indices.get(edge.target.as_str()).ok_or(MedflowError::Flow(format!("edge {} references unknown target node {}", edge.id, edge.target)))?;
            graph.add_edge(*source, *target, edge.kind);
        }
        Ok(graph)
    }

    /// Whether the diagram is a single simple path: one root, one sink, no
    /// branching and no cycles. A lone node counts as a path.
    pub fn is_linear_path(&self) -> bool {
        let Ok(graph) = self.to_graph() else {
            return false;
        };
        if graph.node_count() == 0 || graph.edge_count() + 1 != graph.node_count() {
            return false;
        }
        if is_cyclic_directed(&graph) {
            return false;
        }
        let roots = graph.node_indices().filter(|idx| graph.neighbors_directed(*idx, Direction::Incoming).count() == 0).count();
        roots == 1
            && graph.node_indices().all(|idx| {
                graph.neighbors_directed(idx, Direction::Incoming).count() <= 1 && graph.neighbors_directed(idx, Direction::Outgoing).count() <= 1
            })
    }

    /// Node ids in edge order, starting from the root.
    ///
    /// Returns an empty list when the diagram is not a linear path.
    pub fn path(&self) -> Vec<NodeId> {
        if !self.is_linear_path() {
            return Vec::new();
        }
        let Ok(graph) = self.to_graph() else {
            return Vec::new();
        };
        let mut current = graph.node_indices().find(|idx| graph.neighbors_directed(*idx, Direction::Incoming).count() == 0);
        let mut ids = Vec::with_capacity(graph.node_count());
        while let Some(idx) = current {
            ids.push(graph[idx].clone());
            current = graph.edges_directed(idx, Direction::Outgoing).next().map(|e| e.target());
        }
        ids
    }

    /// Output a human-readable representation of the diagram
    pub fn schema(&self) -> String {
        let mut lines = Vec::new();

        lines.push("=== Flow Diagram ===".to_string());
        lines.push(format!("Nodes: {}, Edges: {}", self.nodes.len(), self.edges.len()));
        lines.push(String::new());

        lines.push("--- Nodes ---".to_string());
        for node in self.nodes.iter() {
            let mut line = format!("[{}] {} ({}) @ ({}, {})", node.id, node.data.title(), node.kind().as_ref(), node.position.x, node.position.y);
            if let NodeData::Step { duration, cost_badge, .. } = &node.data {
                if let Some(duration) = duration {
                    line.push_str(&format!(" | {}", duration));
                }
                if let Some(badge) = cost_badge {
                    line.push_str(&format!(" | {}", badge.text));
                }
            }
            if let NodeData::End { total_cost: Some(total), .. } = &node.data {
                line.push_str(&format!(" | {}", total));
            }
            lines.push(line);
        }
        lines.push(String::new());

        lines.push("--- Edges ---".to_string());
        for edge in self.edges.iter() {
            lines.push(format!("{} --[{}]--> {} (id: {})", edge.source, edge.kind.as_ref(), edge.target, edge.id));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::node::{NodeStyle, NodeType, Position};

    fn node(id: &str) -> DiagramNode {
        DiagramNode {
            id: id.to_string(),
            node_type: NodeType::Default,
            position: Position::default(),
            data: NodeData::Step {
                label: id.to_string(),
                step_type: Default::default(),
                icon: "help".to_string(),
                color: "#757575".to_string(),
                description: None,
                duration: None,
                cost_badge: None,
            },
            draggable: false,
            style: NodeStyle {
                border_color: "#757575".to_string(),
                border_dashed: false,
                width: None,
            },
        }
    }

    #[test]
    fn test_linear_path() {
        let diagram = Diagram::new(
            vec![node("a"), node("b"), node("c")],
            vec![DiagramEdge::connect("a", "b", EdgeStyle::Entry), DiagramEdge::connect("b", "c", EdgeStyle::Exit)],
        );
        assert!(diagram.is_linear_path());
        assert_eq!(diagram.path(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_single_node_is_path() {
        let diagram = Diagram::new(vec![node("a")], vec![]);
        assert!(diagram.is_linear_path());
        assert_eq!(diagram.path(), vec!["a"]);
    }

    #[test]
    fn test_branching_is_not_path() {
        let diagram = Diagram::new(
            vec![node("a"), node("b"), node("c"), node("d")],
            vec![
                DiagramEdge::connect("a", "b", EdgeStyle::Sequence),
                DiagramEdge::connect("a", "c", EdgeStyle::Sequence),
                DiagramEdge::connect("c", "d", EdgeStyle::Sequence),
            ],
        );
        assert!(!diagram.is_linear_path());
        assert!(diagram.path().is_empty());
    }

    #[test]
    fn test_cycle_is_not_path() {
        let diagram = Diagram::new(
            vec![node("a"), node("b"), node("c")],
            vec![DiagramEdge::connect("b", "c", EdgeStyle::Sequence), DiagramEdge::connect("c", "b", EdgeStyle::Sequence)],
        );
        assert!(!diagram.is_linear_path());
    }

    #[test]
    fn test_unknown_endpoint() {
        let diagram = Diagram::new(vec![node("a")], vec![DiagramEdge::connect("a", "ghost", EdgeStyle::Exit)]);
        let err = diagram.to_graph().unwrap_err();
        assert!(err.to_string().contains("ghost"));
        assert!(!diagram.is_linear_path());
    }

    #[test]
    fn test_empty_diagram_is_not_path() {
        assert!(!Diagram::default().is_linear_path());
    }
}
