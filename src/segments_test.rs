//! Tests for connection segment expansion.

use crate::config::EngineConfig;
use crate::grouping::group_in_graph;
use crate::segments::connection_segments;
use crate::types::{
  CodeNode, Connection, FlowGraph, GraphNode, Node, NodeCore, PassThruPort, Port, PortDirection,
  Position,
};

fn code(id: &str, input: Option<&str>, output: Option<&str>) -> Node {
  let mut n = CodeNode::new(id, id, "Transformer", Position::ORIGIN);
  if let Some(name) = input {
    n = n.with_input(name, "Int");
  }
  if let Some(name) = output {
    n = n.with_output(name, "Int");
  }
  Node::Code(n)
}

fn flow() -> FlowGraph {
  FlowGraph::new("g", "G", "1.0.0")
    .add_node(code("src", None, Some("out")))
    .add_node(code("a", Some("in"), Some("out")))
    .add_node(code("b", Some("in"), Some("out")))
    .add_node(code("sink", Some("in"), None))
    .add_connection(Connection::new("c0", "src", "src.out", "a", "a.in"))
    .add_connection(Connection::new("c1", "a", "a.out", "b", "b.in"))
    .add_connection(Connection::new("c2", "b", "b.out", "sink", "sink.in"))
}

#[test]
fn flat_connection_is_one_segment() {
  let g = flow();
  let segs = connection_segments(&g.connections[1], &g);
  assert_eq!(segs.len(), 1);
  assert_eq!(segs[0].id, "c1#0");
  assert_eq!(segs[0].source_port_id, "a.out");
  assert_eq!(segs[0].target_port_id, "b.in");
  assert!(segs[0].is_visible_in(None));
}

#[test]
fn one_boundary_gives_two_segments_sharing_the_port() {
  let out = group_in_graph(&flow(), &["a", "b"], "G", &EngineConfig::default()).unwrap();
  let g = out.flow_graph;
  let c2 = g.connections.iter().find(|c| c.id == "c2").unwrap();
  let segs = connection_segments(c2, &g);
  assert_eq!(segs.len(), 2);
  assert_eq!(segs[0].source_port_id, "b.out");
  assert_eq!(segs[0].target_node_id, out.container_id);
  assert!(segs[0].is_visible_in(Some(out.container_id.as_str())));
  assert_eq!(segs[1].source_port_id, segs[0].target_port_id);
  assert_eq!(segs[1].target_port_id, "sink.in");
  assert!(segs[1].is_visible_in(None));
  assert!(segs.iter().all(|s| s.parent_connection_id == "c2"));
}

#[test]
fn nested_boundaries_on_both_ends() {
  let config = EngineConfig::default();
  let outer = group_in_graph(&flow(), &["a", "b"], "Outer", &config).unwrap();
  let inner = group_in_graph(&outer.flow_graph, &["a", "b"], "Inner", &config).unwrap();
  let g = inner.flow_graph;
  let c0 = g.connections.iter().find(|c| c.id == "c0").unwrap();
  let segs = connection_segments(c0, &g);
  assert_eq!(segs.len(), 3);
  assert_eq!(segs[0].source_port_id, "src.out");
  assert_eq!(segs[0].scope_node_id, None);
  assert_eq!(segs[1].scope_node_id.as_deref(), Some(outer.container_id.as_str()));
  assert_eq!(segs[1].target_node_id, inner.container_id);
  assert_eq!(segs[2].scope_node_id.as_deref(), Some(inner.container_id.as_str()));
  assert_eq!(segs[2].target_port_id, "a.in");
  for pair in segs.windows(2) {
    assert_eq!(pair[0].target_port_id, pair[1].source_port_id);
  }
  let ids: Vec<&str> = segs.iter().map(|s| s.id.as_str()).collect();
  assert_eq!(ids, vec!["c0#0", "c0#1", "c0#2"]);
}

#[test]
fn child_sharing_its_container_id_stops_after_one_hop() {
  let boundary = PassThruPort::new(
    Port::new("g", "out", PortDirection::Output, "Int"),
    "g",
    "g.out",
    "sink",
    "sink.in",
  )
  .unwrap();
  let container = GraphNode::new(
    NodeCore::new("g", "G", "Group", Position::ORIGIN),
    vec![code("g", None, Some("out"))],
    Vec::new(),
  )
  .with_boundary_port(boundary, "out");
  let flow = FlowGraph::new("f", "F", "1.0.0")
    .add_node(Node::Graph(container))
    .add_node(code("sink", Some("in"), None))
    .add_connection(Connection::new("c", "g", "g.out", "sink", "sink.in"));
  let segs = connection_segments(&flow.connections[0], &flow);
  assert_eq!(segs.len(), 2);
  assert_eq!(segs[0].source_port_id, "g.out");
  assert_eq!(segs[0].scope_node_id.as_deref(), Some("g"));
  assert_eq!(segs[1].target_port_id, "sink.in");
}
