//! Diagram edge definitions.

use serde::Serialize;
use strum::AsRefStr;

use crate::layout::{
    consts::{EDGE_STROKE_WIDTH, END_COLOR, SEQUENCE_COLOR, START_COLOR},
    node::NodeId,
};

/// edge id
pub type EdgeId = String;

/// Which segment of the flow an edge draws.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EdgeStyle {
    /// Start node to the first step.
    Entry,
    /// Between two consecutive steps.
    Sequence,
    /// Last step to the end node.
    Exit,
}

impl EdgeStyle {
    pub fn stroke(&self) -> EdgeStroke {
        let color = match self {
            EdgeStyle::Entry => START_COLOR,
            EdgeStyle::Sequence => SEQUENCE_COLOR,
            EdgeStyle::Exit => END_COLOR,
        };
        EdgeStroke {
            stroke: color.to_string(),
            stroke_width: EDGE_STROKE_WIDTH,
        }
    }
}

/// Line attributes of an edge.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStroke {
    pub stroke: String,
    pub stroke_width: u32,
}

/// Directed connection between two diagram nodes.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DiagramEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(rename = "type")]
    pub edge_type: String,
    pub animated: bool,
    pub kind: EdgeStyle,
    pub style: EdgeStroke,
}

impl DiagramEdge {
    /// Creates an edge whose id is derived from its endpoints.
    pub fn connect(
        source: &str,
        target: &str,
        kind: EdgeStyle,
    ) -> Self {
        Self {
            id: format!("e-{}-{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
            edge_type: "default".to_string(),
            animated: false,
            kind,
            style: kind.stroke(),
        }
    }
}
