//! The closed node hierarchy: terminal code nodes and container graph nodes.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::{
  CodeNode, ControlConfig, ExecutionState, GraphNode, Port, PortDirection, Position,
  ValidationResult,
};

/// Fields shared by every node variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeCore {
  pub id: String,
  pub name: String,
  pub node_type: String,
  pub position: Position,
  pub description: Option<String>,
  pub configuration: HashMap<String, String>,
  /// Back-reference to the containing graph node; never used for traversal.
  pub parent_node_id: Option<String>,
  pub execution_state: ExecutionState,
  pub control_config: ControlConfig,
}

impl NodeCore {
  pub fn new(
    id: impl Into<String>,
    name: impl Into<String>,
    node_type: impl Into<String>,
    position: Position,
  ) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
      node_type: node_type.into(),
      position,
      description: None,
      configuration: HashMap::new(),
      parent_node_id: None,
      execution_state: ExecutionState::Idle,
      control_config: ControlConfig::default(),
    }
  }
}

/// A node in a flow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
  Code(CodeNode),
  Graph(GraphNode),
}

impl Node {
  pub fn core(&self) -> &NodeCore {
    match self {
      Node::Code(n) => &n.core,
      Node::Graph(n) => &n.core,
    }
  }

  pub fn core_mut(&mut self) -> &mut NodeCore {
    match self {
      Node::Code(n) => &mut n.core,
      Node::Graph(n) => &mut n.core,
    }
  }

  pub fn id(&self) -> &str {
    &self.core().id
  }

  pub fn name(&self) -> &str {
    &self.core().name
  }

  pub fn position(&self) -> Position {
    self.core().position
  }

  pub fn parent_node_id(&self) -> Option<&str> {
    self.core().parent_node_id.as_deref()
  }

  pub fn execution_state(&self) -> ExecutionState {
    self.core().execution_state
  }

  pub fn control_config(&self) -> &ControlConfig {
    &self.core().control_config
  }

  pub fn is_independent(&self) -> bool {
    self.core().control_config.independent_control
  }

  pub fn as_graph(&self) -> Option<&GraphNode> {
    match self {
      Node::Graph(g) => Some(g),
      Node::Code(_) => None,
    }
  }

  pub fn as_code(&self) -> Option<&CodeNode> {
    match self {
      Node::Code(c) => Some(c),
      Node::Graph(_) => None,
    }
  }

  /// Returns a copy with a new parent back-reference.
  pub fn with_parent(mut self, parent: Option<String>) -> Self {
    self.core_mut().parent_node_id = parent;
    self
  }

  /// Returns a copy moved to `position`.
  pub fn with_position(mut self, position: Position) -> Self {
    self.core_mut().position = position;
    self
  }

  pub fn input_ports(&self) -> Vec<&Port> {
    match self {
      Node::Code(n) => n.input_ports.iter().collect(),
      Node::Graph(n) => n.input_ports.iter().map(|p| &p.port).collect(),
    }
  }

  pub fn output_ports(&self) -> Vec<&Port> {
    match self {
      Node::Code(n) => n.output_ports.iter().collect(),
      Node::Graph(n) => n.output_ports.iter().map(|p| &p.port).collect(),
    }
  }

  /// Inputs then outputs.
  pub fn ports(&self) -> Vec<&Port> {
    let mut ports = self.input_ports();
    ports.extend(self.output_ports());
    ports
  }

  pub fn port(&self, port_id: &str) -> Option<&Port> {
    self.ports().into_iter().find(|p| p.id == port_id)
  }

  pub fn port_by_name(&self, name: &str, direction: PortDirection) -> Option<&Port> {
    let ports = match direction {
      PortDirection::Input => self.input_ports(),
      PortDirection::Output => self.output_ports(),
    };
    ports.into_iter().find(|p| p.name == name)
  }

  /// Structural validation of this node and, for graph nodes, its whole subtree.
  pub fn validate(&self) -> ValidationResult {
    let core = self.core();
    let mut errors = Vec::new();

    if core.id.trim().is_empty() {
      errors.push("Node id must not be blank".to_string());
    }
    if core.name.trim().is_empty() {
      errors.push(format!("Node '{}' name must not be blank", core.id));
    }
    if core.node_type.trim().is_empty() {
      errors.push(format!("Node '{}' type must not be blank", core.id));
    }
    if Position::new(core.position.x(), core.position.y()).is_err() {
      errors.push(format!("Node '{}' has an invalid position", core.id));
    }
    if core.control_config.pause_buffer_size() == 0 {
      errors.push(format!("Node '{}' pause buffer size must be > 0", core.id));
    }

    let ports = self.ports();
    if ports.is_empty() {
      errors.push(format!("Node '{}' must have at least one port", core.id));
    }
    let mut names = HashSet::new();
    for port in &ports {
      if port.owning_node_id != core.id {
        errors.push(format!(
          "Port '{}' of node '{}' is owned by '{}'",
          port.name, core.id, port.owning_node_id
        ));
      }
      if !names.insert(port.name.as_str()) {
        errors.push(format!(
          "Node '{}' has duplicate port name '{}'",
          core.id, port.name
        ));
      }
    }

    let mut result = ValidationResult::from_errors(errors);
    if let Node::Graph(g) = self {
      let container = g.validate_container();
      result.errors.extend(container.errors);
      result.success = result.errors.is_empty();
    }
    result
  }
}

impl From<CodeNode> for Node {
  fn from(n: CodeNode) -> Self {
    Node::Code(n)
  }
}

impl From<GraphNode> for Node {
  fn from(n: GraphNode) -> Self {
    Node::Graph(n)
  }
}
