//! Terminal, executable node.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{NodeCore, Port, Position};

/// Values keyed by port name. Payloads are type-erased, as in the StreamWeave channels.
pub type PortValues = HashMap<String, Arc<dyn Any + Send + Sync>>;

/// Processing contract fulfilled by the runtime for a code node.
///
/// Receives values keyed by input port name and returns values keyed by output port name.
pub trait ProcessingLogic: Send + Sync {
  fn process(&self, inputs: PortValues) -> PortValues;
}

impl<F> ProcessingLogic for F
where
  F: Fn(PortValues) -> PortValues + Send + Sync,
{
  fn process(&self, inputs: PortValues) -> PortValues {
    self(inputs)
  }
}

/// Shared handle to a node's processing logic. Equality is identity.
#[derive(Clone)]
pub struct ProcessingLogicRef(pub Arc<dyn ProcessingLogic>);

impl ProcessingLogicRef {
  pub fn new(logic: impl ProcessingLogic + 'static) -> Self {
    Self(Arc::new(logic))
  }

  pub fn process(&self, inputs: PortValues) -> PortValues {
    self.0.process(inputs)
  }
}

impl fmt::Debug for ProcessingLogicRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("ProcessingLogicRef(..)")
  }
}

impl PartialEq for ProcessingLogicRef {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

/// A terminal node whose logic is executed by the external runtime. Never has children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeNode {
  #[serde(flatten)]
  pub core: NodeCore,
  pub input_ports: Vec<Port>,
  pub output_ports: Vec<Port>,
  #[serde(skip)]
  pub processing_logic: Option<ProcessingLogicRef>,
  /// Opaque token assigned by the runtime while the node's task is alive.
  #[serde(skip)]
  pub coroutine_handle: Option<String>,
}

impl CodeNode {
  pub fn new(
    id: impl Into<String>,
    name: impl Into<String>,
    node_type: impl Into<String>,
    position: Position,
  ) -> Self {
    Self {
      core: NodeCore::new(id, name, node_type, position),
      input_ports: Vec::new(),
      output_ports: Vec::new(),
      processing_logic: None,
      coroutine_handle: None,
    }
  }

  /// Adds an input port owned by this node.
  pub fn with_input(mut self, name: &str, data_type: &str) -> Self {
    self.input_ports.push(Port::input(&self.core.id, name, data_type));
    self
  }

  /// Adds an output port owned by this node.
  pub fn with_output(mut self, name: &str, data_type: &str) -> Self {
    self
      .output_ports
      .push(Port::output(&self.core.id, name, data_type));
    self
  }

  pub fn with_logic(mut self, logic: impl ProcessingLogic + 'static) -> Self {
    self.processing_logic = Some(ProcessingLogicRef::new(logic));
    self
  }

  /// A code node without processing logic is structurally valid but cannot run.
  pub fn is_executable(&self) -> bool {
    self.processing_logic.is_some()
  }
}
