//! Top-level flow graph. Every edit returns a new graph value.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::{Connection, Node, ValidationResult};

/// A project's flow graph: root nodes, root-scope connections and descriptive metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
  pub id: String,
  pub name: String,
  /// Semantic version of the graph definition.
  pub version: String,
  pub root_nodes: Vec<Node>,
  pub connections: Vec<Connection>,
  pub metadata: HashMap<String, String>,
  pub target_platforms: Vec<String>,
}

impl FlowGraph {
  pub fn new(id: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
      version: version.into(),
      root_nodes: Vec::new(),
      connections: Vec::new(),
      metadata: HashMap::new(),
      target_platforms: Vec::new(),
    }
  }

  /// Returns a copy with `node` appended to the root nodes.
  pub fn add_node(&self, node: impl Into<Node>) -> Self {
    let mut next = self.clone();
    next.root_nodes.push(node.into().with_parent(None));
    next
  }

  /// Returns a copy without node `id` (and its subtree) and without any connection touching it
  /// in the scope it lived in. Unknown ids yield an unchanged copy.
  pub fn remove_node(&self, id: &str) -> Self {
    let mut next = self.clone();
    match self.scope_of(id) {
      Some(None) => {
        next.root_nodes.retain(|n| n.id() != id);
        next.connections.retain(|c| !c.touches(id));
      }
      Some(Some(parent)) => {
        if let Some(updated) = self.update_node(&parent, &|n| match n {
          Node::Graph(g) => {
            let mut g = g.clone();
            g.child_nodes.retain(|c| c.id() != id);
            g.internal_connections.retain(|c| !c.touches(id));
            Node::Graph(g)
          }
          other => other.clone(),
        }) {
          next = updated;
        }
      }
      None => {}
    }
    next
  }

  pub fn add_connection(&self, connection: Connection) -> Self {
    let mut next = self.clone();
    next.connections.push(connection);
    next
  }

  pub fn remove_connection(&self, connection_id: &str) -> Self {
    let mut next = self.clone();
    next.connections.retain(|c| c.id != connection_id);
    next
  }

  /// Depth-first search over root nodes and their descendants.
  pub fn find_node(&self, id: &str) -> Option<&Node> {
    find_in(&self.root_nodes, id)
  }

  /// Every node in the graph, pre-order.
  pub fn all_nodes(&self) -> Vec<&Node> {
    let mut out = Vec::new();
    collect_all(&self.root_nodes, &mut out);
    out
  }

  /// Scope containing node `id`: `Some(None)` at root, `Some(Some(parent))` when nested.
  pub fn scope_of(&self, id: &str) -> Option<Option<String>> {
    scope_in(&self.root_nodes, None, id)
  }

  /// Nodes and connections of a scope (`None` = root).
  pub fn scope(&self, scope: Option<&str>) -> Option<(&[Node], &[Connection])> {
    match scope {
      None => Some((&self.root_nodes, &self.connections)),
      Some(id) => self
        .find_node(id)
        .and_then(Node::as_graph)
        .map(|g| (g.child_nodes.as_slice(), g.internal_connections.as_slice())),
    }
  }

  /// Returns a copy whose scope content is replaced. `None` when the scope does not exist.
  pub fn with_scope(
    &self,
    scope: Option<&str>,
    nodes: Vec<Node>,
    connections: Vec<Connection>,
  ) -> Option<Self> {
    match scope {
      None => {
        let mut next = self.clone();
        next.root_nodes = nodes;
        next.connections = connections;
        Some(next)
      }
      Some(id) => {
        self.find_node(id)?.as_graph()?;
        self.update_node(id, &|n| match n {
          Node::Graph(g) => {
            let mut g = g.clone();
            g.child_nodes = nodes.clone();
            g.internal_connections = connections.clone();
            Node::Graph(g)
          }
          other => other.clone(),
        })
      }
    }
  }

  /// Returns a copy in which node `id` is replaced by `f(node)`, rebuilding the path to it.
  pub fn update_node(&self, id: &str, f: &dyn Fn(&Node) -> Node) -> Option<Self> {
    let root_nodes = replace_in(&self.root_nodes, id, f)?;
    let mut next = self.clone();
    next.root_nodes = root_nodes;
    Some(next)
  }

  /// Whole-graph structural validation.
  pub fn validate(&self) -> ValidationResult {
    let mut errors = Vec::new();
    if self.id.trim().is_empty() {
      errors.push("Flow graph id must not be blank".to_string());
    }
    if self.name.trim().is_empty() {
      errors.push("Flow graph name must not be blank".to_string());
    }

    let mut seen = HashSet::new();
    for node in self.all_nodes() {
      if !seen.insert(node.id()) {
        errors.push(format!("Duplicate node id '{}'", node.id()));
      }
    }
    for node in &self.root_nodes {
      if let Some(parent) = node.parent_node_id() {
        errors.push(format!(
          "Root node '{}' must not have a parent (found '{}')",
          node.id(),
          parent
        ));
      }
    }

    for conn in &self.connections {
      if conn.parent_scope_id.is_some() {
        errors.push(format!("Root connection '{}' must have no scope", conn.id));
      }
      let source = self
        .root_nodes
        .iter()
        .find(|n| n.id() == conn.source_node_id)
        .and_then(|n| n.port(&conn.source_port_id));
      let target = self
        .root_nodes
        .iter()
        .find(|n| n.id() == conn.target_node_id)
        .and_then(|n| n.port(&conn.target_port_id));
      let r = match (source, target) {
        (Some(s), Some(t)) => conn.validate_with_ports(s, t),
        _ => {
          let mut r = conn.validate();
          r.errors.push(format!(
            "Connection '{}' endpoints do not resolve to root node ports",
            conn.id
          ));
          r.success = false;
          r
        }
      };
      errors.extend(r.errors);
    }

    let mut result = ValidationResult::from_errors(errors);
    for node in &self.root_nodes {
      result.merge(&format!("node '{}'", node.id()), node.validate());
    }
    result
  }
}

fn find_in<'a>(nodes: &'a [Node], id: &str) -> Option<&'a Node> {
  for node in nodes {
    if node.id() == id {
      return Some(node);
    }
    if let Node::Graph(g) = node {
      if let Some(found) = find_in(&g.child_nodes, id) {
        return Some(found);
      }
    }
  }
  None
}

fn collect_all<'a>(nodes: &'a [Node], out: &mut Vec<&'a Node>) {
  for node in nodes {
    out.push(node);
    if let Node::Graph(g) = node {
      collect_all(&g.child_nodes, out);
    }
  }
}

fn scope_in(nodes: &[Node], scope: Option<&str>, id: &str) -> Option<Option<String>> {
  for node in nodes {
    if node.id() == id {
      return Some(scope.map(str::to_string));
    }
    if let Node::Graph(g) = node {
      if let Some(found) = scope_in(&g.child_nodes, Some(g.core.id.as_str()), id) {
        return Some(found);
      }
    }
  }
  None
}

fn replace_in(nodes: &[Node], id: &str, f: &dyn Fn(&Node) -> Node) -> Option<Vec<Node>> {
  for (i, node) in nodes.iter().enumerate() {
    if node.id() == id {
      let mut out = nodes.to_vec();
      out[i] = f(node);
      return Some(out);
    }
    if let Node::Graph(g) = node {
      if let Some(children) = replace_in(&g.child_nodes, id, f) {
        let mut g = g.clone();
        g.child_nodes = children;
        let mut out = nodes.to_vec();
        out[i] = Node::Graph(g);
        return Some(out);
      }
    }
  }
  None
}
