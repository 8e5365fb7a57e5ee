//! Pushes execution state and control configuration down the node tree.
//!
//! A child whose `independent_control` flag is set is left untouched, together with its
//! whole subtree. Propagation is materialized at push time; there is no deferred resolution.

use tracing::{debug, instrument};

use crate::types::{ControlConfig, ExecutionState, Node};

/// Returns a copy of `node` in `state`.
///
/// For a graph node with `propagate`, every non-independent child is updated recursively.
#[instrument(level = "trace", skip(node), fields(node_id = %node.id()))]
pub fn with_execution_state(node: &Node, state: ExecutionState, propagate: bool) -> Node {
  match node {
    Node::Code(code) => {
      let mut code = code.clone();
      code.core.execution_state = state;
      Node::Code(code)
    }
    Node::Graph(graph) => {
      let mut graph = graph.clone();
      graph.core.execution_state = state;
      if propagate {
        graph.child_nodes = graph
          .child_nodes
          .iter()
          .map(|child| {
            if child.is_independent() {
              debug!(child_id = %child.id(), "independent child keeps its state");
              child.clone()
            } else {
              with_execution_state(child, state, true)
            }
          })
          .collect();
      }
      Node::Graph(graph)
    }
  }
}

/// Returns a copy of `node` with `config`.
///
/// Non-independent children receive `config` with their own `independent_control` bit preserved.
#[instrument(level = "trace", skip(node), fields(node_id = %node.id()))]
pub fn with_control_config(node: &Node, config: ControlConfig, propagate: bool) -> Node {
  match node {
    Node::Code(code) => {
      let mut code = code.clone();
      code.core.control_config = config;
      Node::Code(code)
    }
    Node::Graph(graph) => {
      let mut graph = graph.clone();
      graph.core.control_config = config;
      if propagate {
        graph.child_nodes = graph
          .child_nodes
          .iter()
          .map(|child| {
            if child.is_independent() {
              debug!(child_id = %child.id(), "independent child keeps its config");
              child.clone()
            } else {
              let merged = config.with_independent_control(child.is_independent());
              with_control_config(child, merged, true)
            }
          })
          .collect();
      }
      Node::Graph(graph)
    }
  }
}

/// The configuration the runtime should obey for `node`: always the node's own.
pub fn effective_control_config(node: &Node) -> ControlConfig {
  *node.control_config()
}

impl Node {
  pub fn with_execution_state(&self, state: ExecutionState, propagate: bool) -> Node {
    with_execution_state(self, state, propagate)
  }

  pub fn with_control_config(&self, config: ControlConfig, propagate: bool) -> Node {
    with_control_config(self, config, propagate)
  }

  pub fn effective_control_config(&self) -> ControlConfig {
    effective_control_config(self)
  }
}
