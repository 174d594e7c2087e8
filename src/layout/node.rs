//! Diagram node definitions.

use serde::Serialize;
use strum::AsRefStr;

use crate::{catalog::StepType, model::FlowOrigin};

/// node id
pub type NodeId = String;

/// Absolute, final coordinate computed by the layout engine.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(
        x: f64,
        y: f64,
    ) -> Self {
        Self { x, y }
    }
}

/// Node type understood by the graph widget.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeType {
    /// Node with only an outgoing handle.
    Input,
    #[default]
    Default,
    /// Node with only an incoming handle.
    Output,
}

/// Role of a node in the diagram.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeKind {
    Start,
    Step,
    End,
    Placeholder,
}

/// Colored chip showing a step's average cost.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CostBadge {
    pub text: String,
    pub color: String,
}

/// Display payload of a node.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeData {
    Start {
        title: String,
        icon: String,
        flow_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        specialty: Option<String>,
    },
    Step {
        label: String,
        step_type: StepType,
        icon: String,
        color: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        cost_badge: Option<CostBadge>,
    },
    End {
        title: String,
        icon: String,
        subtitle: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        total_cost: Option<String>,
    },
    Placeholder {
        title: String,
        icon: String,
        flow_name: String,
        message: String,
        origin: FlowOrigin,
        #[serde(skip_serializing_if = "Option::is_none")]
        badge: Option<String>,
    },
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Start { .. } => NodeKind::Start,
            NodeData::Step { .. } => NodeKind::Step,
            NodeData::End { .. } => NodeKind::End,
            NodeData::Placeholder { .. } => NodeKind::Placeholder,
        }
    }

    /// Main line of text shown on the node.
    pub fn title(&self) -> &str {
        match self {
            NodeData::Start { title, .. } | NodeData::End { title, .. } | NodeData::Placeholder { title, .. } => title,
            NodeData::Step { label, .. } => label,
        }
    }
}

/// Visual frame of a node.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    pub border_color: String,
    pub border_dashed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

/// A positioned node of a laid-out flow.
///
/// Positions are absolute and final. Consumers must render them as-is and
/// keep dragging and automatic layout disabled for these nodes.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DiagramNode {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub position: Position,
    pub data: NodeData,
    /// always false for generated nodes
    pub draggable: bool,
    pub style: NodeStyle,
}

impl DiagramNode {
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }
}
