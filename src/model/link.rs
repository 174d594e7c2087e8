use serde::{Deserialize, Serialize};

/// A connection between two steps as persisted by the backend.
///
/// Stored links are carried for round-tripping and statistics only. The
/// diagram's edges are always derived from step order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepLink {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<String>,
    pub source_node_id: String,
    pub target_node_id: String,
    #[serde(default)]
    pub edge_type: String,
}
