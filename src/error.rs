//! Error types for graph construction, control, grouping and snapshot I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Hard construction errors: values that can never be part of a well-formed graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConstructionError {
  #[error("Position ({x}, {y}) must have finite, non-negative coordinates")]
  InvalidPosition { x: f64, y: f64 },

  #[error("Pause buffer size must be greater than zero")]
  ZeroPauseBufferSize,

  #[error("Pass-through port '{port_name}' has a blank {field}")]
  BlankEndpoint { port_name: String, field: &'static str },

  #[error("Pass-through port '{port_name}' cannot bridge a node to itself ({node_id})")]
  SelfBridge { port_name: String, node_id: String },

  #[error("Invalid value '{value}' for {key}")]
  InvalidSetting { key: String, value: String },
}

/// Errors returned by [crate::control::RootControlNode] single-node operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
  #[error("Node '{0}' not found in flow graph")]
  NodeNotFound(String),
}

/// Errors returned by grouping and ungrouping. Any error means nothing was built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroupingError {
  #[error("Grouping needs at least 2 nodes, {resolved} of {requested} selected ids resolved")]
  TooFewNodes { requested: usize, resolved: usize },

  #[error("Boundary port for '{port_id}' of node '{node_id}' cannot be built: {reason}")]
  IncompatibleBoundary {
    node_id: String,
    port_id: String,
    reason: String,
  },

  #[error("Node '{0}' not found in flow graph")]
  NodeNotFound(String),

  #[error("Node '{0}' is not a graph node")]
  NotAGraphNode(String),

  #[error("Selected nodes do not share a single parent scope")]
  MixedScopes,

  #[error(transparent)]
  Construction(#[from] ConstructionError),
}

/// Errors returned by flow graph snapshot save/load.
#[derive(Error, Debug)]
pub enum SnapshotError {
  #[error("I/O error on {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Flow graph snapshot {} is malformed: {source}", path.display())]
  Malformed {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Flow graph snapshot {} is invalid: {}", path.display(), errors.join("; "))]
  Invalid { path: PathBuf, errors: Vec<String> },
}
