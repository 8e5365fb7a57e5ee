//! Tests for `Connection`.

use super::{Connection, Port};

#[test]
fn rejects_self_loop_on_same_port() {
  let c = Connection::new("c1", "A", "A.p", "A", "A.p");
  let r = c.validate();
  assert!(!r.success);
  assert!(r.errors[0].contains("to itself"));
}

#[test]
fn accepts_same_node_different_port() {
  let c = Connection::new("c1", "A", "A.p", "A", "A.q");
  assert!(c.validate().success);
}

#[test]
fn rejects_blank_ids() {
  let c = Connection::new("", "A", "A.out", "B", "");
  let r = c.validate();
  assert!(!r.success);
  assert_eq!(r.errors.len(), 2);
}

#[test]
fn between_takes_ids_from_ports() {
  let out = Port::output("A", "out", "String");
  let inp = Port::input("B", "in", "String");
  let c = Connection::between("c", &out, &inp).with_capacity(4);
  assert_eq!(c.source_node_id, "A");
  assert_eq!(c.source_port_id, "A.out");
  assert_eq!(c.target_node_id, "B");
  assert_eq!(c.target_port_id, "B.in");
  assert!(c.is_buffered());
  assert!(c.validate_with_ports(&out, &inp).success);
}

#[test]
fn validate_with_ports_checks_types() {
  let out = Port::output("A", "out", "String");
  let inp = Port::input("B", "in", "Int");
  let c = Connection::between("c", &out, &inp);
  let r = c.validate_with_ports(&out, &inp);
  assert!(!r.success);
  assert!(r.errors.iter().any(|e| e.contains("not compatible")));
}

#[test]
fn validate_with_ports_checks_directions_and_ids() {
  let a = Port::input("A", "in", "String");
  let b = Port::output("B", "out", "String");
  let c = Connection::new("c", "A", "A.in", "B", "B.out");
  let r = c.validate_with_ports(&a, &b);
  assert!(r.errors.iter().any(|e| e.contains("must be an output")));
  assert!(r.errors.iter().any(|e| e.contains("must be an input")));

  let other = Port::output("X", "out", "String");
  let inp = Port::input("B", "in", "String");
  let c = Connection::new("c", "A", "A.out", "B", "B.in");
  let r = c.validate_with_ports(&other, &inp);
  assert!(r.errors.iter().any(|e| e.contains("does not match")));
}
