//! Cost aggregation and ideal-versus-real flow comparison.

mod compare;
mod summary;

pub use compare::{EfficiencyRating, FlowComparison, FlowDifferences, Recommendation};
pub use summary::{FlowCostSummary, StepTypeCost};
