//! Flow layout engine.
//!
//! Maps a flow's steps to a fixed, single-column diagram. Steps are stacked
//! top to bottom in `order_index` order, optionally bracketed by a start and
//! an end node. Coordinates stored on the steps are never consulted.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    MedflowError, Result,
    format::{format_cost, format_duration},
    layout::{
        consts::*,
        diagram::Diagram,
        edge::{DiagramEdge, EdgeStyle},
        node::{CostBadge, DiagramNode, NodeData, NodeStyle, NodeType, Position},
    },
    model::{FlowModel, FlowOrigin, StepModel},
};

/// Geometry and bracketing options of the layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// vertical distance between consecutive nodes
    pub step_spacing: f64,
    /// width hint attached to every bracketed or step node
    pub node_width: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    pub show_start_node: bool,
    pub show_end_node: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            step_spacing: 180.0,
            node_width: 200.0,
            origin_x: 300.0,
            origin_y: 0.0,
            show_start_node: true,
            show_end_node: true,
        }
    }
}

impl LayoutConfig {
    /// Checks the geometry. Rows must move strictly downwards, so the spacing
    /// has to be a positive finite number.
    pub fn validate(&self) -> Result<()> {
        if !(self.step_spacing.is_finite() && self.step_spacing > 0.0) {
            return Err(MedflowError::Config(format!("layout.step_spacing must be a positive number, got {}", self.step_spacing)));
        }
        if !(self.node_width.is_finite() && self.node_width > 0.0) {
            return Err(MedflowError::Config(format!("layout.node_width must be a positive number, got {}", self.node_width)));
        }
        if !(self.origin_x.is_finite() && self.origin_y.is_finite()) {
            return Err(MedflowError::Config(format!("layout origin must be finite, got ({}, {})", self.origin_x, self.origin_y)));
        }
        Ok(())
    }
}

/// Stateless layout engine; only its configuration is kept between calls.
///
/// # Example
///
/// ```rust
/// use medflow::{FlowLayoutEngine, FlowModel, StepModel};
///
/// let flow = FlowModel::new("flow-1", "General Checkup")
///     .with_step(StepModel::new("consult", "consultation", "Consult"))
///     .with_step(StepModel::new("lab", "laboratory", "Lab Work"));
///
/// let engine = FlowLayoutEngine::builder().step_spacing(250.0).build().unwrap();
/// let diagram = engine.layout(&flow);
/// assert_eq!(diagram.nodes().len(), 4);
/// assert_eq!(diagram.edges().len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FlowLayoutEngine {
    config: LayoutConfig,
}

impl FlowLayoutEngine {
    /// Creates an engine, rejecting invalid geometry with [`MedflowError::Config`].
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn builder() -> LayoutEngineBuilder {
        LayoutEngineBuilder::default()
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lays out a flow.
    ///
    /// A flow without steps yields a single placeholder node and no edges,
    /// whatever the bracketing options say.
    pub fn layout(
        &self,
        flow: &FlowModel,
    ) -> Diagram {
        if flow.is_empty() {
            debug!("layout({}): no steps, emitting placeholder", flow.id);
            return Diagram::new(vec![self.placeholder_node(flow)], Vec::new());
        }

        let steps = flow.sorted_steps();
        let offset = usize::from(self.config.show_start_node);
        let mut nodes = Vec::with_capacity(steps.len() + 2);

        if self.config.show_start_node {
            nodes.push(self.start_node(flow));
        }
        for (idx, step) in steps.iter().enumerate() {
            nodes.push(self.step_node(step, self.row_position(idx + offset)));
        }
        if self.config.show_end_node {
            nodes.push(self.end_node(flow, self.row_position(steps.len() + offset)));
        }

        let edges = self.edges(&steps);
        trace!("layout({}): {} nodes, {} edges", flow.id, nodes.len(), edges.len());

        Diagram::new(nodes, edges)
    }

    fn row_position(
        &self,
        row: usize,
    ) -> Position {
        Position::new(self.config.origin_x, self.config.origin_y + row as f64 * self.config.step_spacing)
    }

    fn edges(
        &self,
        steps: &[&StepModel],
    ) -> Vec<DiagramEdge> {
        let mut edges = Vec::with_capacity(steps.len() + 1);

        if let (true, Some(first)) = (self.config.show_start_node, steps.first()) {
            edges.push(DiagramEdge::connect(START_NODE_ID, &first.id, EdgeStyle::Entry));
        }
        for (from, to) in steps.iter().tuple_windows() {
            edges.push(DiagramEdge::connect(&from.id, &to.id, EdgeStyle::Sequence));
        }
        if let (true, Some(last)) = (self.config.show_end_node, steps.last()) {
            edges.push(DiagramEdge::connect(&last.id, END_NODE_ID, EdgeStyle::Exit));
        }

        edges
    }

    fn frame(
        &self,
        color: &str,
    ) -> NodeStyle {
        NodeStyle {
            border_color: color.to_string(),
            border_dashed: false,
            width: Some(self.config.node_width),
        }
    }

    fn start_node(
        &self,
        flow: &FlowModel,
    ) -> DiagramNode {
        DiagramNode {
            id: START_NODE_ID.to_string(),
            node_type: NodeType::Input,
            position: Position::new(self.config.origin_x, self.config.origin_y),
            data: NodeData::Start {
                title: "Start".to_string(),
                icon: "medical_services".to_string(),
                flow_name: flow.name.clone(),
                specialty: flow.specialty_name.clone().filter(|s| !s.is_empty()),
            },
            draggable: false,
            style: self.frame(START_COLOR),
        }
    }

    fn step_node(
        &self,
        step: &StepModel,
        position: Position,
    ) -> DiagramNode {
        let step_type = step.step_type();
        let style = step_type.style();

        DiagramNode {
            id: step.id.clone(),
            node_type: NodeType::Default,
            position,
            data: NodeData::Step {
                label: step.label.clone(),
                step_type,
                icon: style.icon.to_string(),
                color: style.color.to_string(),
                description: step.description().map(str::to_string),
                duration: step.duration().map(format_duration),
                cost_badge: step.average_cost().map(|cost| CostBadge {
                    text: format_cost(cost),
                    color: style.color.to_string(),
                }),
            },
            draggable: false,
            style: self.frame(style.color),
        }
    }

    fn end_node(
        &self,
        flow: &FlowModel,
        position: Position,
    ) -> DiagramNode {
        DiagramNode {
            id: END_NODE_ID.to_string(),
            node_type: NodeType::Output,
            position,
            data: NodeData::End {
                title: "Completion".to_string(),
                icon: "exit_to_app".to_string(),
                subtitle: "Flow completed".to_string(),
                total_cost: flow.estimated_cost().map(|cost| format!("Total: {}", format_cost(cost))),
            },
            draggable: false,
            style: self.frame(END_COLOR),
        }
    }

    fn placeholder_node(
        &self,
        flow: &FlowModel,
    ) -> DiagramNode {
        let (title, icon, message, badge, color) = match flow.origin {
            FlowOrigin::Generated => (
                "Generated flow",
                "medical_services",
                "Flow generated automatically from practice-management data",
                Some("External data".to_string()),
                GENERATED_COLOR,
            ),
            FlowOrigin::Authored => ("Flow without structure", "warning", "This flow has no steps defined", None, UNSTRUCTURED_COLOR),
        };

        DiagramNode {
            id: PLACEHOLDER_NODE_ID.to_string(),
            node_type: NodeType::Default,
            position: Position::new(self.config.origin_x, self.config.origin_y + PLACEHOLDER_OFFSET_Y),
            data: NodeData::Placeholder {
                title: title.to_string(),
                icon: icon.to_string(),
                flow_name: flow.name.clone(),
                message: message.to_string(),
                origin: flow.origin,
                badge,
            },
            draggable: false,
            style: NodeStyle {
                border_color: color.to_string(),
                border_dashed: true,
                width: None,
            },
        }
    }
}

/// Builder for [`FlowLayoutEngine`]; unset options keep their defaults.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngineBuilder {
    config: LayoutConfig,
}

impl LayoutEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(
        mut self,
        config: LayoutConfig,
    ) -> Self {
        self.config = config;
        self
    }

    pub fn step_spacing(
        mut self,
        spacing: f64,
    ) -> Self {
        self.config.step_spacing = spacing;
        self
    }

    pub fn node_width(
        mut self,
        width: f64,
    ) -> Self {
        self.config.node_width = width;
        self
    }

    pub fn origin(
        mut self,
        x: f64,
        y: f64,
    ) -> Self {
        self.config.origin_x = x;
        self.config.origin_y = y;
        self
    }

    pub fn show_start_node(
        mut self,
        show: bool,
    ) -> Self {
        self.config.show_start_node = show;
        self
    }

    pub fn show_end_node(
        mut self,
        show: bool,
    ) -> Self {
        self.config.show_end_node = show;
        self
    }

    pub fn build(&self) -> Result<FlowLayoutEngine> {
        FlowLayoutEngine::new(self.config.clone())
    }
}
