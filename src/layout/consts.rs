/// Id of the synthetic node opening a flow.
pub const START_NODE_ID: &str = "start";
/// Id of the synthetic node closing a flow.
pub const END_NODE_ID: &str = "end";
/// Id of the single node shown for a flow without steps.
pub const PLACEHOLDER_NODE_ID: &str = "no-nodes";

/// Vertical offset of the placeholder node from the origin.
pub const PLACEHOLDER_OFFSET_Y: f64 = 200.0;

pub const START_COLOR: &str = "#1976d2";
pub const END_COLOR: &str = "#4caf50";
pub const SEQUENCE_COLOR: &str = "#666";
pub const GENERATED_COLOR: &str = "#2196f3";
pub const UNSTRUCTURED_COLOR: &str = "#ff9800";

pub const EDGE_STROKE_WIDTH: u32 = 2;
