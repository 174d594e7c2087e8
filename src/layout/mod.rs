pub mod consts;
mod diagram;
mod edge;
mod engine;
mod node;

pub use diagram::Diagram;
pub use edge::{DiagramEdge, EdgeId, EdgeStroke, EdgeStyle};
pub use engine::{FlowLayoutEngine, LayoutConfig, LayoutEngineBuilder};
pub use node::{CostBadge, DiagramNode, NodeData, NodeId, NodeKind, NodeStyle, NodeType, Position};
