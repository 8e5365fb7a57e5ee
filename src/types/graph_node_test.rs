//! Tests for `GraphNode` boundary mappings and container validation.

use super::{
  CodeNode, Connection, GRAPH_NODE_TYPE, GraphNode, Node, NodeCore, PassThruPort, Port,
  PortDirection, Position,
};

fn child(id: &str) -> Node {
  Node::Code(
    CodeNode::new(id, id, "Transformer", Position::ORIGIN)
      .with_input("in", "Int")
      .with_output("out", "Int"),
  )
}

fn container() -> GraphNode {
  let input = PassThruPort::new(
    Port::new("grp", "in", PortDirection::Input, "Int"),
    "ext",
    "ext.out",
    "a",
    "a.in",
  )
  .unwrap();
  GraphNode::new(
    NodeCore::new("grp", "Group", "Whatever", Position::ORIGIN),
    vec![child("a"), child("b")],
    vec![Connection::new("ic", "a", "a.out", "b", "b.in").with_scope(Some("grp".to_string()))],
  )
  .with_boundary_port(input, "in")
}

#[test]
fn new_sets_type_and_parents() {
  let g = container();
  assert_eq!(g.core.node_type, GRAPH_NODE_TYPE);
  assert!(g.child_nodes.iter().all(|c| c.parent_node_id() == Some("grp")));
  assert_eq!(g.descendant_ids(), vec!["a", "b"]);
}

#[test]
fn resolves_boundary_port_to_child_port() {
  let g = container();
  let (node_id, port) = g.resolve_mapping("grp.in").unwrap();
  assert_eq!(node_id, "a");
  assert_eq!(port.id, "a.in");
  assert!(g.resolve_mapping("grp.missing").is_none());
}

#[test]
fn valid_container_passes() {
  let r = Node::Graph(container()).validate();
  assert!(r.success, "{:?}", r.errors);
}

#[test]
fn empty_container_is_invalid() {
  let mut g = container();
  g.child_nodes.clear();
  g.internal_connections.clear();
  let r = Node::Graph(g).validate();
  assert!(r.errors.iter().any(|e| e.contains("at least one child")));
}

#[test]
fn broken_mapping_is_reported() {
  let mut g = container();
  g.port_mappings.get_mut("in").unwrap().child_port_name = "nope".to_string();
  let r = Node::Graph(g).validate();
  assert!(r.errors.iter().any(|e| e.contains("does not resolve")));
}

#[test]
fn unmapped_boundary_port_is_reported() {
  let mut g = container();
  g.port_mappings.clear();
  let r = Node::Graph(g).validate();
  assert!(r.errors.iter().any(|e| e.contains("has no port mapping")));
}

#[test]
fn foreign_parent_and_external_internal_connection_are_reported() {
  let mut g = container();
  g.child_nodes[1] = g.child_nodes[1].clone().with_parent(Some("other".to_string()));
  g.internal_connections
    .push(Connection::new("bad", "a", "a.out", "ext", "ext.in"));
  let r = Node::Graph(g).validate();
  assert!(r.errors.iter().any(|e| e.contains("Child 'b'")));
  assert!(r.errors.iter().any(|e| e.contains("must connect two children")));
}

#[test]
fn child_errors_are_prefixed() {
  let mut g = container();
  if let Node::Code(c) = &mut g.child_nodes[0] {
    c.core.name = String::new();
  }
  let r = Node::Graph(g).validate();
  assert!(r.errors.iter().any(|e| e.starts_with("child 'a'")));
}

fn inner(id: &str, children: Vec<Node>) -> Node {
  Node::Graph(GraphNode::new(
    NodeCore::new(id, id, "Whatever", Position::ORIGIN),
    children,
    Vec::new(),
  ))
}

#[test]
fn container_nested_under_its_own_id_is_reported() {
  let mut g = container();
  g.child_nodes[1] = inner("nested", vec![child("grp")]).with_parent(Some("grp".to_string()));
  let r = Node::Graph(g).validate();
  assert!(!r.success);
  assert!(
    r.errors.iter().any(|e| e == "Graph node 'grp' contains itself"),
    "{:?}",
    r.errors
  );
}

#[test]
fn child_parented_by_a_descendant_is_reported() {
  let mut g = container();
  g.child_nodes[1] = inner("nested", vec![child("c")]).with_parent(Some("c".to_string()));
  let r = Node::Graph(g).validate();
  assert!(!r.success);
  assert!(
    r.errors
      .iter()
      .any(|e| e == "Child 'nested' of 'grp' has circular parent 'c'"),
    "{:?}",
    r.errors
  );
}
