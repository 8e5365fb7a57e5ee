//! Flow graph snapshots as pretty JSON.
//!
//! Processing logic and runtime handles are not serialized; a loaded graph has no executable nodes
//! until the runtime attaches logic again. Positions and control configs are checked while
//! deserializing, so an out-of-range value surfaces as [SnapshotError::Malformed].

use std::path::Path;

use tracing::{debug, instrument, warn};

use crate::error::SnapshotError;
use crate::types::FlowGraph;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> SnapshotError {
  let path = path.to_path_buf();
  move |source| SnapshotError::Io { path, source }
}

/// Writes `graph` to `path`, creating parent directories.
#[instrument(level = "trace", skip(graph), fields(flow_graph = %graph.id))]
pub fn save_flow_graph(path: &Path, graph: &FlowGraph) -> Result<(), SnapshotError> {
  let json = serde_json::to_string_pretty(graph).map_err(|source| SnapshotError::Malformed {
    path: path.to_path_buf(),
    source,
  })?;
  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).map_err(io_error(path))?;
  }
  std::fs::write(path, json).map_err(io_error(path))?;
  debug!(path = %path.display(), nodes = graph.root_nodes.len(), "saved flow graph snapshot");
  Ok(())
}

/// Reads a snapshot from `path` without running graph validation.
#[instrument(level = "trace")]
pub fn load_flow_graph(path: &Path) -> Result<FlowGraph, SnapshotError> {
  let bytes = std::fs::read(path).map_err(io_error(path))?;
  let graph: FlowGraph =
    serde_json::from_slice(&bytes).map_err(|source| SnapshotError::Malformed {
      path: path.to_path_buf(),
      source,
    })?;
  debug!(flow_graph = %graph.id, nodes = graph.root_nodes.len(), "loaded flow graph snapshot");
  Ok(graph)
}

/// Reads a snapshot and rejects it unless [FlowGraph::validate] passes.
#[instrument(level = "trace")]
pub fn load_valid_flow_graph(path: &Path) -> Result<FlowGraph, SnapshotError> {
  let graph = load_flow_graph(path)?;
  let result = graph.validate();
  if !result.success {
    warn!(flow_graph = %graph.id, errors = result.errors.len(), "snapshot failed validation");
    return Err(SnapshotError::Invalid {
      path: path.to_path_buf(),
      errors: result.errors,
    });
  }
  Ok(graph)
}
