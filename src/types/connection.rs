//! Typed edge between an output port and an input port.

use serde::{Deserialize, Serialize};

use super::{Port, ValidationResult};

/// A directed edge from an output port to an input port, referencing nodes and ports by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
  pub id: String,
  pub source_node_id: String,
  pub source_port_id: String,
  pub target_node_id: String,
  pub target_port_id: String,
  /// Channel capacity; 0 means unbuffered (rendezvous).
  pub channel_capacity: usize,
  /// Graph node owning this edge; `None` for the root scope.
  pub parent_scope_id: Option<String>,
  pub ip_type_id: Option<String>,
}

impl Connection {
  /// Creates an unbuffered root-scope connection.
  pub fn new(
    id: impl Into<String>,
    source_node_id: impl Into<String>,
    source_port_id: impl Into<String>,
    target_node_id: impl Into<String>,
    target_port_id: impl Into<String>,
  ) -> Self {
    Self {
      id: id.into(),
      source_node_id: source_node_id.into(),
      source_port_id: source_port_id.into(),
      target_node_id: target_node_id.into(),
      target_port_id: target_port_id.into(),
      channel_capacity: 0,
      parent_scope_id: None,
      ip_type_id: None,
    }
  }

  /// Connects two ports, taking node and port ids from them.
  pub fn between(id: impl Into<String>, source: &Port, target: &Port) -> Self {
    Self::new(
      id,
      source.owning_node_id.clone(),
      source.id.clone(),
      target.owning_node_id.clone(),
      target.id.clone(),
    )
  }

  pub fn with_capacity(mut self, capacity: usize) -> Self {
    self.channel_capacity = capacity;
    self
  }

  pub fn with_scope(mut self, scope: Option<String>) -> Self {
    self.parent_scope_id = scope;
    self
  }

  pub fn with_ip_type(mut self, ip_type_id: impl Into<String>) -> Self {
    self.ip_type_id = Some(ip_type_id.into());
    self
  }

  pub fn is_buffered(&self) -> bool {
    self.channel_capacity > 0
  }

  pub fn touches(&self, node_id: &str) -> bool {
    self.source_node_id == node_id || self.target_node_id == node_id
  }

  /// Structural checks that need no port lookup.
  pub fn validate(&self) -> ValidationResult {
    let mut errors = Vec::new();
    for (field, value) in [
      ("id", &self.id),
      ("source node id", &self.source_node_id),
      ("source port id", &self.source_port_id),
      ("target node id", &self.target_node_id),
      ("target port id", &self.target_port_id),
    ] {
      if value.trim().is_empty() {
        errors.push(format!("Connection {} must not be blank", field));
      }
    }
    if self.source_node_id == self.target_node_id && self.source_port_id == self.target_port_id {
      errors.push(format!(
        "Connection '{}' connects port '{}' of node '{}' to itself",
        self.id, self.source_port_id, self.source_node_id
      ));
    }
    ValidationResult::from_errors(errors)
  }

  /// [Self::validate] plus checks against the resolved endpoint ports.
  pub fn validate_with_ports(&self, source: &Port, target: &Port) -> ValidationResult {
    let mut result = self.validate();
    let errors = &mut result.errors;
    if source.id != self.source_port_id || source.owning_node_id != self.source_node_id {
      errors.push(format!(
        "Source port '{}' does not match connection source {}:{}",
        source.id, self.source_node_id, self.source_port_id
      ));
    }
    if target.id != self.target_port_id || target.owning_node_id != self.target_node_id {
      errors.push(format!(
        "Target port '{}' does not match connection target {}:{}",
        target.id, self.target_node_id, self.target_port_id
      ));
    }
    if !source.is_output() {
      errors.push(format!("Source port '{}' must be an output port", source.id));
    }
    if !target.is_input() {
      errors.push(format!("Target port '{}' must be an input port", target.id));
    }
    if !source.is_compatible_with(target) {
      errors.push(format!(
        "Port '{}' ({}) is not compatible with port '{}' ({})",
        source.id, source.data_type, target.id, target.data_type
      ));
    }
    result.success = result.errors.is_empty();
    result
  }
}
