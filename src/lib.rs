//! # streamweave-fbp
//!
//! Hierarchical flow-based-programming graph composition engine.
//!
//! ## Architecture
//!
//! - [types]: ports, connections, code and graph nodes, the flow graph and its validation.
//! - [propagation]: execution state and control config pushed down the node tree, honoring
//!   per-node `independent_control`.
//! - [grouping]: boundary port synthesis when collapsing sibling nodes into a graph node, and the
//!   inverse ungroup.
//! - [segments]: per-scope segments of a connection crossing container boundaries.
//! - [control]: [RootControlNode], the global controller, and the [RuntimeRegistry] seam.
//! - [runtime]: a `tokio::sync::watch` based registry whose handles obey pause/resume/stop.
//!
//! Every edit takes an immutable graph and returns a new one.

pub mod config;
#[cfg(test)]
mod config_test;
pub mod control;
pub mod error;
pub mod graph_io;
#[cfg(test)]
mod graph_io_test;
pub mod grouping;
pub mod propagation;
pub mod runtime;
pub mod segments;
#[cfg(test)]
mod segments_test;
pub mod types;

pub use config::EngineConfig;
pub use control::{RootControlNode, RuntimeRegistry};
pub use error::{ConstructionError, ControlError, GroupingError, SnapshotError};
pub use graph_io::{load_flow_graph, load_valid_flow_graph, save_flow_graph};
pub use grouping::{GroupOutcome, group_in_graph, group_nodes, ungroup_in_graph, ungroup_node};
pub use runtime::{ChannelRuntimeRegistry, NodeRuntimeHandle};
pub use segments::connection_segments;
pub use types::{
  CodeNode, Connection, ConnectionSegment, ControlConfig, DataType, ExecutionState,
  FlowExecutionStatus, FlowGraph, GraphNode, Node, NodeCore, PassThruPort, Port, PortDirection,
  Position, ValidationResult,
};
