//! Tests for flow graph snapshot save/load.

use crate::config::EngineConfig;
use crate::error::SnapshotError;
use crate::graph_io::{load_flow_graph, load_valid_flow_graph, save_flow_graph};
use crate::grouping::group_in_graph;
use crate::types::{CodeNode, Connection, FlowGraph, Node, PortValues, Position};

fn grouped() -> FlowGraph {
  let flow = FlowGraph::new("g", "Snapshot", "2.1.0")
    .add_node(
      CodeNode::new("a", "A", "Source", Position::new(100.0, 100.0).unwrap())
        .with_output("x", "String"),
    )
    .add_node(
      CodeNode::new("b", "B", "Transformer", Position::new(300.0, 200.0).unwrap())
        .with_input("y", "String")
        .with_output("z", "Int"),
    )
    .add_node(
      CodeNode::new("ext", "Ext", "Sink", Position::new(500.0, 200.0).unwrap())
        .with_input("w", "Int"),
    )
    .add_connection(Connection::new("c1", "a", "a.x", "b", "b.y").with_capacity(8))
    .add_connection(Connection::new("c2", "b", "b.z", "ext", "ext.w"));
  group_in_graph(&flow, &["a", "b"], "Group", &EngineConfig::default())
    .unwrap()
    .flow_graph
}

#[test]
fn roundtrip_save_load() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("nested").join("flow.json");
  let graph = grouped();
  save_flow_graph(&path, &graph).unwrap();
  assert!(path.exists());
  let loaded = load_flow_graph(&path).unwrap();
  assert_eq!(loaded, graph);
  assert!(loaded.validate().success);
}

#[test]
fn processing_logic_is_not_persisted() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("flow.json");
  let node = CodeNode::new("n", "N", "Transformer", Position::ORIGIN)
    .with_input("in", "Any")
    .with_logic(|inputs: PortValues| inputs);
  assert!(node.is_executable());
  save_flow_graph(&path, &FlowGraph::new("g", "G", "1.0.0").add_node(node)).unwrap();
  let loaded = load_flow_graph(&path).unwrap();
  let n = loaded.find_node("n").and_then(Node::as_code).unwrap();
  assert!(!n.is_executable());
}

#[test]
fn load_missing_or_invalid_file_names_the_path() {
  let dir = tempfile::tempdir().unwrap();
  let missing = dir.path().join("missing.json");
  match load_flow_graph(&missing) {
    Err(SnapshotError::Io { path, source }) => {
      assert_eq!(path, missing);
      assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
    }
    other => panic!("expected Io, got {other:?}"),
  }
  let bad = dir.path().join("bad.json");
  std::fs::write(&bad, "{ not json").unwrap();
  let err = load_flow_graph(&bad).unwrap_err();
  assert!(matches!(&err, SnapshotError::Malformed { path, .. } if *path == bad));
  assert!(err.to_string().contains("bad.json"));
}

#[test]
fn out_of_range_position_is_rejected_on_load() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("flow.json");
  save_flow_graph(&path, &grouped()).unwrap();
  let json = std::fs::read_to_string(&path).unwrap();
  assert!(json.contains("\"x\": 500.0"));
  std::fs::write(&path, json.replacen("\"x\": 500.0", "\"x\": -1.0", 1)).unwrap();
  let err = load_flow_graph(&path).unwrap_err();
  assert!(matches!(err, SnapshotError::Malformed { .. }), "{err:?}");
  assert!(err.to_string().contains("-1"), "{err}");
}

#[test]
fn validating_load_reports_graph_errors() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("broken.json");
  let broken = FlowGraph::new("g", "Broken", "1.0.0")
    .add_node(CodeNode::new("a", "A", "Source", Position::ORIGIN).with_output("x", "Int"))
    .add_connection(Connection::new("c", "a", "a.x", "ghost", "ghost.in"));
  save_flow_graph(&path, &broken).unwrap();
  assert!(load_flow_graph(&path).is_ok());
  match load_valid_flow_graph(&path) {
    Err(SnapshotError::Invalid { errors, .. }) => assert!(!errors.is_empty()),
    other => panic!("expected Invalid, got {other:?}"),
  }
  let valid = grouped();
  save_flow_graph(&path, &valid).unwrap();
  assert_eq!(load_valid_flow_graph(&path).unwrap(), valid);
}
