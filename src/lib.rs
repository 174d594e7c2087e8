//! # Medflow
//!
//! Medflow turns clinical care-pathway flows into fixed, deterministic diagrams.
//! A flow is an ordered sequence of steps (consultation, laboratory, imaging,
//! referral, ...); the layout engine stacks them in a single column, brackets
//! them with start and end nodes and connects them into a linear path ready
//! for a graph widget.
//!
//! ## Core Features
//!
//! - **Deterministic Layout**: positions depend only on step order and configuration
//! - **Step-Type Catalog**: icon, color and label per step-type code, with a neutral fallback
//! - **Cost Analysis**: per-flow cost summaries and ideal-versus-real comparisons
//! - **Pluggable Storage**: collections registered into a store; in-memory backend
//!
//! ## Quick Start
//!
//! ```rust
//! use medflow::{FlowLayoutEngine, FlowModel};
//!
//! let json = r#"{
//!     "id": "flow-1",
//!     "name": "General Checkup",
//!     "nodes": [
//!         {"id": "lab", "stepTypeId": "st-lab", "label": "Lab Work", "orderIndex": 1},
//!         {"id": "consult", "stepTypeId": "st-cons", "label": "Consult", "orderIndex": 0}
//!     ]
//! }"#;
//! let flow = FlowModel::from_json(json).unwrap();
//! let diagram = FlowLayoutEngine::default().layout(&flow);
//!
//! assert_eq!(diagram.path(), vec!["start", "consult", "lab", "end"]);
//! ```

mod builder;
pub mod catalog;
mod common;
mod config;
pub mod cost;
mod error;
pub mod format;
pub mod layout;
mod model;
mod service;
pub mod store;
mod utils;

use std::sync::{Arc, RwLock};

pub use builder::FlowServiceBuilder;
pub use catalog::{StepType, StepTypeStyle};
pub use config::{Config, StoreConfig, StoreType};
pub use error::MedflowError;
pub use layout::{Diagram, DiagramEdge, DiagramNode, EdgeStyle, FlowLayoutEngine, LayoutConfig, NodeData, NodeKind, Position};
pub use model::*;
pub use service::{FlowService, FlowStatistics};

/// Result type alias for Medflow operations.
pub type Result<T> = std::result::Result<T, MedflowError>;

/// Thread-safe shared lock wrapper using Arc<RwLock<T>>.
pub(crate) type ShareLock<T> = Arc<RwLock<T>>;
