//! Splitting a logical connection into the per-scope segments drawn inside each container.

use std::collections::HashSet;

use tracing::{instrument, trace};

use crate::types::{Connection, ConnectionSegment, FlowGraph, GraphNode, Node};

/// One hop across a container boundary: the child endpoint and the container endpoint.
struct Hop {
  container_id: String,
  container_port_id: String,
  child_node_id: String,
  child_port_id: String,
}

/// Follows `port_id` on `node_id` down through nested containers until a code node is reached.
/// Stops at an endpoint already visited, which only a child sharing its container's id produces.
fn descend(flow: &FlowGraph, node_id: &str, port_id: &str) -> Vec<Hop> {
  let mut hops = Vec::new();
  let mut node_id = node_id.to_string();
  let mut port_id = port_id.to_string();
  let mut visited = HashSet::from([(node_id.clone(), port_id.clone())]);
  while let Some(container) = flow.find_node(&node_id).and_then(Node::as_graph) {
    let Some((child_id, child_port)) = container.resolve_mapping(&port_id) else {
      trace!(container_id = %node_id, port_id = %port_id, "boundary port has no mapping");
      break;
    };
    let hop = hop(container, &port_id, child_id, &child_port.id);
    node_id = hop.child_node_id.clone();
    port_id = hop.child_port_id.clone();
    hops.push(hop);
    if !visited.insert((node_id.clone(), port_id.clone())) {
      trace!(node_id = %node_id, port_id = %port_id, "endpoint revisited, stopping descent");
      break;
    }
  }
  hops
}

fn hop(container: &GraphNode, port_id: &str, child_id: &str, child_port_id: &str) -> Hop {
  Hop {
    container_id: container.core.id.clone(),
    container_port_id: port_id.to_string(),
    child_node_id: child_id.to_string(),
    child_port_id: child_port_id.to_string(),
  }
}

/// Expands `connection` into one segment per scope it passes through, ordered source to target.
///
/// A connection whose endpoints cross N container boundaries yields N+1 segments; consecutive
/// segments meet at the same pass-through port.
#[instrument(level = "trace", skip(connection, flow), fields(connection_id = %connection.id))]
pub fn connection_segments(connection: &Connection, flow: &FlowGraph) -> Vec<ConnectionSegment> {
  let mut pieces: Vec<(String, String, String, String, Option<String>)> = Vec::new();

  for hop in descend(flow, &connection.source_node_id, &connection.source_port_id)
    .into_iter()
    .rev()
  {
    pieces.push((
      hop.child_node_id,
      hop.child_port_id,
      hop.container_id.clone(),
      hop.container_port_id,
      Some(hop.container_id),
    ));
  }
  pieces.push((
    connection.source_node_id.clone(),
    connection.source_port_id.clone(),
    connection.target_node_id.clone(),
    connection.target_port_id.clone(),
    connection.parent_scope_id.clone(),
  ));
  for hop in descend(flow, &connection.target_node_id, &connection.target_port_id) {
    pieces.push((
      hop.container_id.clone(),
      hop.container_port_id,
      hop.child_node_id,
      hop.child_port_id,
      Some(hop.container_id),
    ));
  }

  pieces
    .into_iter()
    .enumerate()
    .map(
      |(i, (source_node_id, source_port_id, target_node_id, target_port_id, scope_node_id))| {
        ConnectionSegment {
          id: format!("{}#{}", connection.id, i),
          source_node_id,
          source_port_id,
          target_node_id,
          target_port_id,
          scope_node_id,
          parent_connection_id: connection.id.clone(),
        }
      },
    )
    .collect()
}
