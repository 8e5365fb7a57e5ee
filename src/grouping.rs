//! Boundary port synthesis: collapsing sibling nodes into a graph node and expanding it again.
//!
//! Grouping keeps every connection that crosses the new boundary alive by synthesizing one
//! pass-through port per internal endpoint. Both directions either fully succeed or return an
//! error; the input graph is only ever borrowed.

use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::GroupingError;
use crate::types::{
  Connection, FlowGraph, GRAPH_NODE_TYPE, GraphNode, Node, NodeCore, PassThruPort, Port,
  PortDirection, PortMapping, Position,
};

/// Result of [group_in_graph].
#[derive(Debug, Clone)]
pub struct GroupOutcome {
  pub flow_graph: FlowGraph,
  pub container_id: String,
}

/// One internal endpoint that needs a boundary port, with every crossing connection using it.
struct BoundaryEndpoint<'a> {
  direction: PortDirection,
  node_id: &'a str,
  port_id: &'a str,
  connections: Vec<&'a Connection>,
}

/// Builds a graph node from the selected nodes of one scope.
///
/// `all_nodes`/`all_connections` are the content of the scope the selection lives in. The caller
/// is responsible for splicing the container into that scope (see [group_in_graph]).
#[instrument(level = "trace", skip(all_nodes, all_connections, config))]
pub fn group_nodes(
  selected_ids: &[&str],
  all_nodes: &[Node],
  all_connections: &[Connection],
  name: &str,
  config: &EngineConfig,
) -> Result<GraphNode, GroupingError> {
  let selection: HashSet<&str> = selected_ids.iter().copied().collect();
  let selected: Vec<&Node> = all_nodes
    .iter()
    .filter(|n| selection.contains(n.id()))
    .collect();
  if selected.len() < 2 {
    return Err(GroupingError::TooFewNodes {
      requested: selection.len(),
      resolved: selected.len(),
    });
  }

  let container_id = Uuid::new_v4().to_string();
  let count = selected.len() as f64;
  let min_x = selected.iter().map(|n| n.position().x()).fold(f64::INFINITY, f64::min);
  let min_y = selected.iter().map(|n| n.position().y()).fold(f64::INFINITY, f64::min);
  let centroid = Position::new(
    selected.iter().map(|n| n.position().x()).sum::<f64>() / count,
    selected.iter().map(|n| n.position().y()).sum::<f64>() / count,
  )?;
  let margin = config.group_margin.max(0.0);
  let children = selected
    .iter()
    .map(|n| -> Result<Node, GroupingError> {
      let p = n.position();
      let shifted = Position::new(p.x() - min_x + margin, p.y() - min_y + margin)?;
      Ok((*n).clone().with_position(shifted))
    })
    .collect::<Result<Vec<_>, _>>()?;

  let mut internal = Vec::new();
  let mut endpoints: Vec<BoundaryEndpoint> = Vec::new();
  for conn in all_connections {
    let source_in = selection.contains(conn.source_node_id.as_str());
    let target_in = selection.contains(conn.target_node_id.as_str());
    let (direction, node_id, port_id) = match (source_in, target_in) {
      (true, true) => {
        internal.push(conn.clone().with_scope(Some(container_id.clone())));
        continue;
      }
      (false, false) => continue,
      (true, false) => (
        PortDirection::Output,
        conn.source_node_id.as_str(),
        conn.source_port_id.as_str(),
      ),
      (false, true) => (
        PortDirection::Input,
        conn.target_node_id.as_str(),
        conn.target_port_id.as_str(),
      ),
    };
    let usable = selected
      .iter()
      .find(|n| n.id() == node_id)
      .and_then(|n| n.port(port_id))
      .is_some_and(|p| p.direction == direction);
    if !usable {
      debug!(
        connection_id = %conn.id,
        node_id,
        port_id,
        "no {} port with this id in the selection, connection left in place",
        direction
      );
      continue;
    }
    match endpoints
      .iter_mut()
      .find(|e| e.node_id == node_id && e.port_id == port_id)
    {
      Some(existing) => existing.connections.push(conn),
      None => endpoints.push(BoundaryEndpoint {
        direction,
        node_id,
        port_id,
        connections: vec![conn],
      }),
    }
  }

  let mut taken = HashSet::new();
  let boundary = endpoints
    .iter()
    .map(|e| build_boundary_port(e, &selected, all_nodes, &container_id, &mut taken))
    .collect::<Result<Vec<(PassThruPort, String)>, GroupingError>>()?;

  let mut core = NodeCore::new(&container_id, name, GRAPH_NODE_TYPE, centroid);
  core.parent_node_id = selected[0].parent_node_id().map(str::to_string);
  core.control_config = config.default_control;
  let mut container = GraphNode::new(core, children, internal);
  for (port, child_port_name) in boundary {
    container = container.with_boundary_port(port, &child_port_name);
  }

  info!(
    container_id = %container_id,
    children = container.child_nodes.len(),
    inputs = container.input_ports.len(),
    outputs = container.output_ports.len(),
    "grouped nodes"
  );
  Ok(container)
}

/// Type-checks every crossing connection of `endpoint` and builds its pass-through port.
///
/// Returns the port plus the name of the child port it maps to.
fn build_boundary_port(
  endpoint: &BoundaryEndpoint,
  selected: &[&Node],
  all_nodes: &[Node],
  container_id: &str,
  taken: &mut HashSet<String>,
) -> Result<(PassThruPort, String), GroupingError> {
  let incompatible = |reason: String| GroupingError::IncompatibleBoundary {
    node_id: endpoint.node_id.to_string(),
    port_id: endpoint.port_id.to_string(),
    reason,
  };

  let internal = selected
    .iter()
    .find(|n| n.id() == endpoint.node_id)
    .and_then(|n| n.port(endpoint.port_id))
    .filter(|p| p.direction == endpoint.direction)
    .ok_or_else(|| incompatible(format!("no {} port with this id", endpoint.direction)))?;

  let mut first_external = None;
  for conn in &endpoint.connections {
    let (ext_node, ext_port) = match endpoint.direction {
      PortDirection::Input => (&conn.source_node_id, &conn.source_port_id),
      PortDirection::Output => (&conn.target_node_id, &conn.target_port_id),
    };
    let external = all_nodes
      .iter()
      .find(|n| n.id() == ext_node.as_str())
      .and_then(|n| n.port(ext_port))
      .ok_or_else(|| {
        incompatible(format!(
          "external endpoint {}:{} of connection '{}' does not resolve",
          ext_node, ext_port, conn.id
        ))
      })?;
    let compatible = match endpoint.direction {
      PortDirection::Input => external.is_compatible_with(internal),
      PortDirection::Output => internal.is_compatible_with(external),
    };
    if !compatible {
      return Err(incompatible(format!(
        "connection '{}' joins {} and {}",
        conn.id, internal.data_type, external.data_type
      )));
    }
    first_external.get_or_insert(external);
  }
  let external = first_external.ok_or_else(|| incompatible("no crossing connection".into()))?;

  let name = unique_name(&internal.name, taken);
  let mut port = Port::new(container_id, name, endpoint.direction, internal.data_type.clone());
  port.required = internal.required;
  let built = match endpoint.direction {
    PortDirection::Input => PassThruPort::new(
      port,
      &external.owning_node_id,
      &external.id,
      endpoint.node_id,
      endpoint.port_id,
    ),
    PortDirection::Output => PassThruPort::new(
      port,
      endpoint.node_id,
      endpoint.port_id,
      &external.owning_node_id,
      &external.id,
    ),
  }
  .map_err(|e| incompatible(e.to_string()))?;
  debug!(port = %built.name(), direction = %endpoint.direction, "synthesized boundary port");
  Ok((built, internal.name.clone()))
}

/// `base`, or `base_2`, `base_3`, ... when already taken.
fn unique_name(base: &str, taken: &mut HashSet<String>) -> String {
  let mut candidate = base.to_string();
  let mut n = 2;
  while taken.contains(&candidate) {
    candidate = format!("{}_{}", base, n);
    n += 1;
  }
  taken.insert(candidate.clone());
  candidate
}

/// Groups `selected_ids` inside `flow` and returns the edited graph.
///
/// The selection may live at the root or inside any graph node, but must share one scope. The
/// container takes the slot of the first selected node; crossing connections keep their ids and
/// are redirected to the synthesized boundary ports.
#[instrument(level = "trace", skip(flow, config))]
pub fn group_in_graph(
  flow: &FlowGraph,
  selected_ids: &[&str],
  name: &str,
  config: &EngineConfig,
) -> Result<GroupOutcome, GroupingError> {
  let scopes: Vec<Option<String>> = selected_ids
    .iter()
    .filter_map(|id| flow.scope_of(id))
    .collect();
  let Some(scope) = scopes.first().cloned() else {
    return Err(GroupingError::TooFewNodes {
      requested: selected_ids.len(),
      resolved: 0,
    });
  };
  if scopes.iter().any(|s| *s != scope) {
    return Err(GroupingError::MixedScopes);
  }
  let (nodes, connections) = flow
    .scope(scope.as_deref())
    .ok_or_else(|| GroupingError::NodeNotFound(scope.clone().unwrap_or_default()))?;

  let selection: HashSet<&str> = selected_ids.iter().copied().collect();
  let mut container = group_nodes(selected_ids, nodes, connections, name, config)?;
  let container_id = container.core.id.clone();
  let enclosing = match scope.as_deref() {
    Some(sid) => flow
      .find_node(sid)
      .and_then(Node::as_graph)
      .map(|outer| route_enclosing_through(outer, &mut container, &selection))
      .transpose()?,
    None => None,
  };

  let mut next_nodes = Vec::with_capacity(nodes.len());
  let mut pending = Some(Node::Graph(container.clone()));
  for node in nodes {
    if selection.contains(node.id()) {
      if let Some(c) = pending.take() {
        next_nodes.push(c);
      }
    } else {
      next_nodes.push(node.clone());
    }
  }

  let mut next_connections = Vec::with_capacity(connections.len());
  for conn in connections {
    let source_in = selection.contains(conn.source_node_id.as_str());
    let target_in = selection.contains(conn.target_node_id.as_str());
    let mut conn = conn.clone();
    match (source_in, target_in) {
      (true, true) => continue,
      (false, false) => {}
      (true, false) => {
        let port = boundary_for(
          &container.output_ports,
          &conn.source_node_id,
          &conn.source_port_id,
        );
        if let Some(port) = port {
          conn.source_node_id = container_id.clone();
          conn.source_port_id = port.id().to_string();
        }
      }
      (false, true) => {
        let port = boundary_for(
          &container.input_ports,
          &conn.target_node_id,
          &conn.target_port_id,
        );
        if let Some(port) = port {
          conn.target_node_id = container_id.clone();
          conn.target_port_id = port.id().to_string();
        }
      }
    }
    next_connections.push(conn);
  }

  let flow_graph = flow
    .with_scope(scope.as_deref(), next_nodes, next_connections)
    .and_then(|g| apply_enclosing(g, enclosing))
    .ok_or_else(|| GroupingError::NodeNotFound(scope.clone().unwrap_or_default()))?;
  info!(container_id = %container_id, scope = ?scope, "group applied to flow graph");
  Ok(GroupOutcome {
    flow_graph,
    container_id,
  })
}

/// Replacement boundary of the graph node enclosing a grouping or ungrouping.
struct EnclosingBoundary {
  id: String,
  input_ports: Vec<PassThruPort>,
  output_ports: Vec<PassThruPort>,
  port_mappings: HashMap<String, PortMapping>,
}

impl EnclosingBoundary {
  fn of(node: &GraphNode) -> Self {
    Self {
      id: node.core.id.clone(),
      input_ports: node.input_ports.clone(),
      output_ports: node.output_ports.clone(),
      port_mappings: node.port_mappings.clone(),
    }
  }
}

fn apply_enclosing(flow: FlowGraph, boundary: Option<EnclosingBoundary>) -> Option<FlowGraph> {
  let Some(b) = boundary else {
    return Some(flow);
  };
  flow.update_node(&b.id, &|n| match n {
    Node::Graph(g) => {
      let mut g = g.clone();
      g.input_ports = b.input_ports.clone();
      g.output_ports = b.output_ports.clone();
      g.port_mappings = b.port_mappings.clone();
      Node::Graph(g)
    }
    other => other.clone(),
  })
}

/// Enclosing boundary ports mapped onto a selected child are routed through `container`: it gains
/// a matching boundary port (or reuses one) and the enclosing mapping points at that port.
fn route_enclosing_through(
  enclosing: &GraphNode,
  container: &mut GraphNode,
  selection: &HashSet<&str>,
) -> Result<EnclosingBoundary, GroupingError> {
  let mut boundary = EnclosingBoundary::of(enclosing);
  let mut taken: HashSet<String> = container
    .boundary_ports()
    .map(|p| p.name().to_string())
    .collect();
  let outer_ports = boundary
    .input_ports
    .iter_mut()
    .chain(boundary.output_ports.iter_mut());
  for outer_port in outer_ports {
    let Some(mapping) = boundary.port_mappings.get_mut(outer_port.name()) else {
      continue;
    };
    if !selection.contains(mapping.child_node_id.as_str()) {
      continue;
    }
    let direction = outer_port.direction();
    let child_port = container
      .child(&mapping.child_node_id)
      .and_then(|c| c.port_by_name(&mapping.child_port_name, direction))
      .cloned()
      .ok_or_else(|| GroupingError::IncompatibleBoundary {
        node_id: mapping.child_node_id.clone(),
        port_id: crate::types::port_id(&mapping.child_node_id, &mapping.child_port_name),
        reason: format!(
          "enclosing port '{}' maps to a missing {} port",
          outer_port.name(),
          direction
        ),
      })?;
    let siblings = match direction {
      PortDirection::Input => &container.input_ports,
      PortDirection::Output => &container.output_ports,
    };
    let inner = match boundary_for(siblings, &child_port.owning_node_id, &child_port.id) {
      Some(existing) => existing.port.clone(),
      None => {
        let name = unique_name(&child_port.name, &mut taken);
        let mut port = Port::new(&container.core.id, name, direction, child_port.data_type.clone());
        port.required = child_port.required;
        let bridged = match direction {
          PortDirection::Input => PassThruPort::new(
            port,
            &enclosing.core.id,
            outer_port.id(),
            &child_port.owning_node_id,
            &child_port.id,
          ),
          PortDirection::Output => PassThruPort::new(
            port,
            &child_port.owning_node_id,
            &child_port.id,
            &enclosing.core.id,
            outer_port.id(),
          ),
        }?;
        let inner = bridged.port.clone();
        *container = container.clone().with_boundary_port(bridged, &child_port.name);
        inner
      }
    };
    debug!(enclosing_port = %outer_port.name(), inner_port = %inner.id, "rerouted enclosing port");
    mapping.child_node_id = container.core.id.clone();
    mapping.child_port_name = inner.name.clone();
    outer_port.set_internal(&container.core.id, &inner.id);
  }
  Ok(boundary)
}

/// Inverse of [route_enclosing_through]: enclosing mappings onto `container` go to its children.
fn route_enclosing_around(enclosing: &GraphNode, container: &GraphNode) -> EnclosingBoundary {
  let mut boundary = EnclosingBoundary::of(enclosing);
  let outer_ports = boundary
    .input_ports
    .iter_mut()
    .chain(boundary.output_ports.iter_mut());
  for outer_port in outer_ports {
    let Some(mapping) = boundary.port_mappings.get_mut(outer_port.name()) else {
      continue;
    };
    if mapping.child_node_id != container.core.id {
      continue;
    }
    let resolved = container
      .boundary_ports()
      .find(|p| p.name() == mapping.child_port_name.as_str())
      .and_then(|p| container.resolve_mapping(p.id()));
    let Some((child_id, child_port)) = resolved else {
      warn!(enclosing_port = %outer_port.name(), "enclosing port mapping cannot be restored");
      continue;
    };
    mapping.child_node_id = child_id.to_string();
    mapping.child_port_name = child_port.name.clone();
    outer_port.set_internal(child_id, &child_port.id);
  }
  boundary
}

fn boundary_for<'a>(
  ports: &'a [PassThruPort],
  node_id: &str,
  port_id: &str,
) -> Option<&'a PassThruPort> {
  ports
    .iter()
    .find(|p| p.internal_node_id() == node_id && p.internal_port_id() == port_id)
}

/// Expands `container` back into `scope_nodes`/`scope_connections`, its enclosing scope.
///
/// Children take the container's slot with `scope` as parent; internal connections move to
/// `scope`. Connections touching the container are redirected through its port mappings; one whose
/// port has no usable mapping cannot be restored and is dropped with a warning.
#[instrument(level = "trace", skip(container, scope_nodes, scope_connections), fields(container_id = %container.core.id))]
pub fn ungroup_node(
  container: &GraphNode,
  scope: Option<&str>,
  scope_nodes: &[Node],
  scope_connections: &[Connection],
) -> (Vec<Node>, Vec<Connection>) {
  let container_id = container.core.id.as_str();
  let parent = scope.map(str::to_string);

  let mut nodes = Vec::with_capacity(scope_nodes.len() + container.child_nodes.len());
  for node in scope_nodes {
    if node.id() == container_id {
      nodes.extend(
        container
          .child_nodes
          .iter()
          .map(|c| c.clone().with_parent(parent.clone())),
      );
    } else {
      nodes.push(node.clone());
    }
  }

  let mut connections =
    Vec::with_capacity(scope_connections.len() + container.internal_connections.len());
  for conn in scope_connections {
    if !conn.touches(container_id) {
      connections.push(conn.clone());
      continue;
    }
    let mut conn = conn.clone();
    let mut restored = true;
    if conn.source_node_id == container_id {
      match container.resolve_mapping(&conn.source_port_id) {
        Some((child_id, port)) => {
          conn.source_node_id = child_id.to_string();
          conn.source_port_id = port.id.clone();
        }
        None => restored = false,
      }
    }
    if conn.target_node_id == container_id {
      match container.resolve_mapping(&conn.target_port_id) {
        Some((child_id, port)) => {
          conn.target_node_id = child_id.to_string();
          conn.target_port_id = port.id.clone();
        }
        None => restored = false,
      }
    }
    if restored {
      connections.push(conn);
    } else {
      warn!(connection_id = %conn.id, "no port mapping for connection endpoint, dropping it");
    }
  }
  connections.extend(
    container
      .internal_connections
      .iter()
      .map(|c| c.clone().with_scope(parent.clone())),
  );

  (nodes, connections)
}

/// Ungroups the graph node `id` wherever it lives in `flow`.
#[instrument(level = "trace", skip(flow))]
pub fn ungroup_in_graph(flow: &FlowGraph, id: &str) -> Result<FlowGraph, GroupingError> {
  let node = flow
    .find_node(id)
    .ok_or_else(|| GroupingError::NodeNotFound(id.to_string()))?;
  let container = node
    .as_graph()
    .ok_or_else(|| GroupingError::NotAGraphNode(id.to_string()))?;
  let scope = flow
    .scope_of(id)
    .ok_or_else(|| GroupingError::NodeNotFound(id.to_string()))?;
  let (scope_nodes, scope_connections) = flow
    .scope(scope.as_deref())
    .ok_or_else(|| GroupingError::NodeNotFound(id.to_string()))?;

  let enclosing = scope
    .as_deref()
    .and_then(|sid| flow.find_node(sid))
    .and_then(Node::as_graph)
    .map(|outer| route_enclosing_around(outer, container));

  let (nodes, connections) =
    ungroup_node(container, scope.as_deref(), scope_nodes, scope_connections);
  let next = flow
    .with_scope(scope.as_deref(), nodes, connections)
    .and_then(|g| apply_enclosing(g, enclosing))
    .ok_or_else(|| GroupingError::NodeNotFound(id.to_string()))?;
  info!(container_id = %id, children = container.child_nodes.len(), "ungrouped graph node");
  Ok(next)
}
