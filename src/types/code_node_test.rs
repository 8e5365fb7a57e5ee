//! Tests for `CodeNode` and `Node` shared validation.

use std::collections::HashMap;
use std::sync::Arc;

use super::{CodeNode, Node, Port, PortValues, Position};

fn pos() -> Position {
  Position::new(10.0, 20.0).unwrap()
}

#[test]
fn builder_creates_owned_ports() {
  let n = CodeNode::new("n1", "Upper", "Transformer", pos())
    .with_input("in", "String")
    .with_output("out", "String");
  assert_eq!(n.input_ports[0].id, "n1.in");
  assert_eq!(n.output_ports[0].owning_node_id, "n1");
  assert!(!n.is_executable());
  assert!(Node::Code(n).validate().success);
}

#[test]
fn logic_makes_node_executable() {
  let n = CodeNode::new("n1", "Echo", "Transformer", pos())
    .with_input("in", "Any")
    .with_output("out", "Any")
    .with_logic(|mut inputs: PortValues| {
      let mut out: PortValues = HashMap::new();
      if let Some(v) = inputs.remove("in") {
        out.insert("out".to_string(), v);
      }
      out
    });
  assert!(n.is_executable());

  let mut inputs: PortValues = HashMap::new();
  inputs.insert("in".to_string(), Arc::new(7_i64));
  let out = n.processing_logic.as_ref().unwrap().process(inputs);
  let v = out.get("out").unwrap().clone().downcast::<i64>().unwrap();
  assert_eq!(*v, 7);
}

#[test]
fn node_without_ports_is_invalid() {
  let n = Node::Code(CodeNode::new("n1", "Empty", "Generator", pos()));
  let r = n.validate();
  assert!(!r.success);
  assert!(r.errors.iter().any(|e| e.contains("at least one port")));
}

#[test]
fn blank_name_and_type_are_reported() {
  let n = Node::Code(CodeNode::new("n1", " ", "", pos()).with_output("out", "Int"));
  let r = n.validate();
  assert_eq!(r.errors.len(), 2);
}

#[test]
fn duplicate_port_names_and_foreign_ports_are_reported() {
  let mut n = CodeNode::new("n1", "Dup", "Transformer", pos())
    .with_input("x", "Int")
    .with_output("x", "Int");
  n.input_ports.push(Port::input("other", "y", "Int"));
  let r = Node::Code(n).validate();
  assert!(r.errors.iter().any(|e| e.contains("duplicate port name 'x'")));
  assert!(r.errors.iter().any(|e| e.contains("owned by 'other'")));
}

#[test]
fn serde_skips_runtime_fields() {
  let n = CodeNode::new("n1", "Echo", "Transformer", pos())
    .with_output("out", "Any")
    .with_logic(|inputs: PortValues| inputs);
  let json = serde_json::to_string(&Node::Code(n)).unwrap();
  let back: Node = serde_json::from_str(&json).unwrap();
  let code = back.as_code().unwrap();
  assert!(code.processing_logic.is_none());
  assert_eq!(code.core.name, "Echo");
  assert_eq!(code.output_ports.len(), 1);
}
