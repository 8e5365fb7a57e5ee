//! Boundary port on a graph node, bridging an external endpoint to an internal child port.

use serde::{Deserialize, Serialize};

use super::{Port, PortDirection};
use crate::error::ConstructionError;

/// A port on a [super::GraphNode] boundary.
///
/// For an input port, upstream is the external source and downstream the internal child.
/// For an output port, upstream is the internal child and downstream the external target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassThruPort {
  pub port: Port,
  pub upstream_node_id: String,
  pub upstream_port_id: String,
  pub downstream_node_id: String,
  pub downstream_port_id: String,
}

impl PassThruPort {
  /// Wraps `port` with its upstream and downstream endpoints.
  pub fn new(
    port: Port,
    upstream_node_id: impl Into<String>,
    upstream_port_id: impl Into<String>,
    downstream_node_id: impl Into<String>,
    downstream_port_id: impl Into<String>,
  ) -> Result<Self, ConstructionError> {
    let pt = Self {
      port,
      upstream_node_id: upstream_node_id.into(),
      upstream_port_id: upstream_port_id.into(),
      downstream_node_id: downstream_node_id.into(),
      downstream_port_id: downstream_port_id.into(),
    };
    for (field, value) in [
      ("upstream node id", &pt.upstream_node_id),
      ("upstream port id", &pt.upstream_port_id),
      ("downstream node id", &pt.downstream_node_id),
      ("downstream port id", &pt.downstream_port_id),
    ] {
      if value.trim().is_empty() {
        return Err(ConstructionError::BlankEndpoint {
          port_name: pt.port.name.clone(),
          field,
        });
      }
    }
    if pt.upstream_node_id == pt.downstream_node_id {
      return Err(ConstructionError::SelfBridge {
        port_name: pt.port.name.clone(),
        node_id: pt.upstream_node_id.clone(),
      });
    }
    Ok(pt)
  }

  pub fn id(&self) -> &str {
    &self.port.id
  }

  pub fn name(&self) -> &str {
    &self.port.name
  }

  pub fn direction(&self) -> PortDirection {
    self.port.direction
  }

  /// The child node this port bridges to or from.
  pub fn internal_node_id(&self) -> &str {
    match self.port.direction {
      PortDirection::Input => &self.downstream_node_id,
      PortDirection::Output => &self.upstream_node_id,
    }
  }

  /// The child port this port bridges to or from.
  pub fn internal_port_id(&self) -> &str {
    match self.port.direction {
      PortDirection::Input => &self.downstream_port_id,
      PortDirection::Output => &self.upstream_port_id,
    }
  }

  /// Points the internal side at another child port, leaving the external side untouched.
  pub fn set_internal(&mut self, node_id: &str, port_id: &str) {
    let (node, port) = match self.port.direction {
      PortDirection::Input => (&mut self.downstream_node_id, &mut self.downstream_port_id),
      PortDirection::Output => (&mut self.upstream_node_id, &mut self.upstream_port_id),
    };
    *node = node_id.to_string();
    *port = port_id.to_string();
  }

  /// The node on the other side of the boundary.
  pub fn external_node_id(&self) -> &str {
    match self.port.direction {
      PortDirection::Input => &self.upstream_node_id,
      PortDirection::Output => &self.downstream_node_id,
    }
  }

  pub fn external_port_id(&self) -> &str {
    match self.port.direction {
      PortDirection::Input => &self.upstream_port_id,
      PortDirection::Output => &self.downstream_port_id,
    }
  }
}
