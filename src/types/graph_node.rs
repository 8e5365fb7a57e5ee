//! Container node grouping a subgraph behind a boundary of pass-through ports.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::{Connection, Node, NodeCore, PassThruPort, Port, PortDirection, ValidationResult};

/// Fixed node type of every graph node.
pub const GRAPH_NODE_TYPE: &str = "GraphNode";

/// Target of a boundary port inside the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortMapping {
  pub child_node_id: String,
  pub child_port_name: String,
}

/// A non-executable container node owning its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
  #[serde(flatten)]
  pub core: NodeCore,
  pub input_ports: Vec<PassThruPort>,
  pub output_ports: Vec<PassThruPort>,
  pub child_nodes: Vec<Node>,
  /// Edges between children only.
  pub internal_connections: Vec<Connection>,
  /// Boundary port name to the child port it maps to.
  pub port_mappings: HashMap<String, PortMapping>,
}

impl GraphNode {
  /// Creates a container; children are re-parented to it.
  pub fn new(
    core: NodeCore,
    child_nodes: Vec<Node>,
    internal_connections: Vec<Connection>,
  ) -> Self {
    let mut core = core;
    core.node_type = GRAPH_NODE_TYPE.to_string();
    let id = core.id.clone();
    Self {
      core,
      input_ports: Vec::new(),
      output_ports: Vec::new(),
      child_nodes: child_nodes
        .into_iter()
        .map(|c| c.with_parent(Some(id.clone())))
        .collect(),
      internal_connections,
      port_mappings: HashMap::new(),
    }
  }

  /// Adds a boundary port and its mapping to a child port.
  pub fn with_boundary_port(mut self, port: PassThruPort, child_port_name: &str) -> Self {
    self.port_mappings.insert(
      port.name().to_string(),
      PortMapping {
        child_node_id: port.internal_node_id().to_string(),
        child_port_name: child_port_name.to_string(),
      },
    );
    match port.direction() {
      PortDirection::Input => self.input_ports.push(port),
      PortDirection::Output => self.output_ports.push(port),
    }
    self
  }

  pub fn child(&self, id: &str) -> Option<&Node> {
    self.child_nodes.iter().find(|c| c.id() == id)
  }

  pub fn boundary_ports(&self) -> impl Iterator<Item = &PassThruPort> {
    self.input_ports.iter().chain(self.output_ports.iter())
  }

  pub fn boundary_port(&self, port_id: &str) -> Option<&PassThruPort> {
    self.boundary_ports().find(|p| p.id() == port_id)
  }

  /// Resolves a boundary port id to the child node id and child port it maps to.
  pub fn resolve_mapping(&self, port_id: &str) -> Option<(&str, &Port)> {
    let port = self.boundary_port(port_id)?;
    let mapping = self.port_mappings.get(port.name())?;
    let child = self.child(&mapping.child_node_id)?;
    let child_port = child.port_by_name(&mapping.child_port_name, port.direction())?;
    Some((child.id(), child_port))
  }

  /// Ids of every node strictly below this one.
  pub fn descendant_ids(&self) -> Vec<&str> {
    let mut ids = Vec::new();
    for child in &self.child_nodes {
      ids.push(child.id());
      if let Node::Graph(g) = child {
        ids.extend(g.descendant_ids());
      }
    }
    ids
  }

  /// Container-specific checks; shared node checks are done by [Node::validate].
  pub(crate) fn validate_container(&self) -> ValidationResult {
    let mut errors = Vec::new();
    let id = &self.core.id;

    if self.child_nodes.is_empty() {
      errors.push(format!("Graph node '{}' must have at least one child", id));
    }
    let descendants: HashSet<&str> = self.descendant_ids().into_iter().collect();
    if descendants.contains(id.as_str()) {
      errors.push(format!("Graph node '{}' contains itself", id));
    }
    for child in &self.child_nodes {
      match child.parent_node_id() {
        Some(p) if p == id.as_str() => {}
        Some(p) if descendants.contains(p) => errors.push(format!(
          "Child '{}' of '{}' has circular parent '{}'",
          child.id(),
          id,
          p
        )),
        other => errors.push(format!(
          "Child '{}' of '{}' has parent {:?}",
          child.id(),
          id,
          other
        )),
      }
    }

    for (name, mapping) in &self.port_mappings {
      let direction = self
        .boundary_ports()
        .find(|p| p.name() == name.as_str())
        .map(|p| p.direction());
      let resolved = self.child(&mapping.child_node_id).and_then(|c| match direction {
        Some(d) => c.port_by_name(&mapping.child_port_name, d),
        None => c
          .ports()
          .into_iter()
          .find(|p| p.name == mapping.child_port_name),
      });
      if resolved.is_none() {
        errors.push(format!(
          "Port mapping '{}' of '{}' does not resolve to child port {}:{}",
          name, id, mapping.child_node_id, mapping.child_port_name
        ));
      }
    }
    for port in self.boundary_ports() {
      if !self.port_mappings.contains_key(port.name()) {
        errors.push(format!(
          "Boundary port '{}' of '{}' has no port mapping",
          port.name(),
          id
        ));
      }
    }

    let children: HashSet<&str> = self.child_nodes.iter().map(|c| c.id()).collect();
    for conn in &self.internal_connections {
      if !children.contains(conn.source_node_id.as_str())
        || !children.contains(conn.target_node_id.as_str())
      {
        errors.push(format!(
          "Internal connection '{}' of '{}' must connect two children",
          conn.id, id
        ));
      }
      let mut r = conn.validate();
      if r.success {
        let source = self
          .child(&conn.source_node_id)
          .and_then(|n| n.port(&conn.source_port_id));
        let target = self
          .child(&conn.target_node_id)
          .and_then(|n| n.port(&conn.target_port_id));
        if let (Some(s), Some(t)) = (source, target) {
          r = conn.validate_with_ports(s, t);
        }
      }
      let mut scoped = ValidationResult::ok();
      scoped.merge(&format!("connection '{}'", conn.id), r);
      errors.extend(scoped.errors);
    }

    let mut result = ValidationResult::from_errors(errors);
    for child in &self.child_nodes {
      result.merge(&format!("child '{}'", child.id()), child.validate());
    }
    result
  }
}
