//! Typed connection points owned by a node.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a port: data enters through inputs and leaves through outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
  Input,
  Output,
}

impl fmt::Display for PortDirection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PortDirection::Input => write!(f, "input"),
      PortDirection::Output => write!(f, "output"),
    }
  }
}

/// Type tag carried by a port. Compatibility is checked by identity, with `Any` as wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataType(String);

impl DataType {
  /// Tag name of the universal wildcard type.
  pub const ANY: &'static str = "Any";

  pub fn new(tag: impl Into<String>) -> Self {
    Self(tag.into())
  }

  pub fn any() -> Self {
    Self(Self::ANY.to_string())
  }

  pub fn is_any(&self) -> bool {
    self.0 == Self::ANY
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// True when both tags are identical or either side is `Any`.
  pub fn accepts(&self, other: &DataType) -> bool {
    self.is_any() || other.is_any() || self == other
  }
}

impl fmt::Display for DataType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for DataType {
  fn from(tag: &str) -> Self {
    Self::new(tag)
  }
}

/// A typed connection point, exclusively owned by the node named in `owning_node_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
  pub id: String,
  pub name: String,
  pub direction: PortDirection,
  pub data_type: DataType,
  pub required: bool,
  pub default_value: Option<serde_json::Value>,
  pub owning_node_id: String,
}

impl Port {
  /// Builds a port whose id is derived from its owner and name (`"{owner}.{name}"`).
  pub fn new(
    owning_node_id: impl Into<String>,
    name: impl Into<String>,
    direction: PortDirection,
    data_type: impl Into<DataType>,
  ) -> Self {
    let owning_node_id = owning_node_id.into();
    let name = name.into();
    Self {
      id: port_id(&owning_node_id, &name),
      name,
      direction,
      data_type: data_type.into(),
      required: false,
      default_value: None,
      owning_node_id,
    }
  }

  pub fn input(
    owning_node_id: impl Into<String>,
    name: impl Into<String>,
    data_type: impl Into<DataType>,
  ) -> Self {
    Self::new(owning_node_id, name, PortDirection::Input, data_type)
  }

  pub fn output(
    owning_node_id: impl Into<String>,
    name: impl Into<String>,
    data_type: impl Into<DataType>,
  ) -> Self {
    Self::new(owning_node_id, name, PortDirection::Output, data_type)
  }

  pub fn required(mut self) -> Self {
    self.required = true;
    self
  }

  pub fn with_default(mut self, value: serde_json::Value) -> Self {
    self.default_value = Some(value);
    self
  }

  pub fn is_input(&self) -> bool {
    self.direction == PortDirection::Input
  }

  pub fn is_output(&self) -> bool {
    self.direction == PortDirection::Output
  }

  /// True when `self` (an output) may feed `target` (an input).
  ///
  /// Exactly one OUTPUT→INPUT pairing is accepted; types must match or either side is `Any`.
  pub fn is_compatible_with(&self, target: &Port) -> bool {
    self.is_output() && target.is_input() && self.data_type.accepts(&target.data_type)
  }
}

/// Derives the id of the port `name` on node `owning_node_id`.
pub fn port_id(owning_node_id: &str, name: &str) -> String {
  format!("{}.{}", owning_node_id, name)
}
