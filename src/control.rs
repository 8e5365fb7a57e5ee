//! Global controller: applies state and configuration changes to a whole flow graph.
//!
//! [RootControlNode] is a short-lived view over a [FlowGraph]. Every operation returns a new graph
//! and leaves the wrapped one untouched; pause, resume and stop are forwarded to the runtime
//! registry after the graph-level change.

use tracing::{info, instrument};

use crate::error::ControlError;
use crate::types::{ControlConfig, ExecutionState, FlowExecutionStatus, FlowGraph, Node};

/// The runtime side of control: maps node ids to running units and forwards signals to them.
pub trait RuntimeRegistry: Send + Sync {
  fn pause_all(&self);
  fn resume_all(&self);
  fn stop_all(&self);
}

/// Controller over one flow graph snapshot, optionally wired to a runtime registry.
#[derive(Clone, Copy)]
pub struct RootControlNode<'a> {
  pub flow_graph: &'a FlowGraph,
  registry: Option<&'a dyn RuntimeRegistry>,
}

impl std::fmt::Debug for RootControlNode<'_> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RootControlNode")
      .field("flow_graph", &self.flow_graph.id)
      .field("registry", &self.registry.is_some())
      .finish()
  }
}

impl<'a> RootControlNode<'a> {
  pub fn new(flow_graph: &'a FlowGraph) -> Self {
    Self {
      flow_graph,
      registry: None,
    }
  }

  pub fn with_registry(mut self, registry: &'a dyn RuntimeRegistry) -> Self {
    self.registry = Some(registry);
    self
  }

  /// Sets every root node to `Running`. The runtime is launched elsewhere, not signalled here.
  pub fn start_all(&self) -> FlowGraph {
    self.set_all(ExecutionState::Running)
  }

  pub fn pause_all(&self) -> FlowGraph {
    let next = self.set_all(ExecutionState::Paused);
    if let Some(registry) = self.registry {
      registry.pause_all();
    }
    next
  }

  pub fn resume_all(&self) -> FlowGraph {
    let next = self.set_all(ExecutionState::Running);
    if let Some(registry) = self.registry {
      registry.resume_all();
    }
    next
  }

  /// Sets every root node back to `Idle` and stops the runtime.
  pub fn stop_all(&self) -> FlowGraph {
    let next = self.set_all(ExecutionState::Idle);
    if let Some(registry) = self.registry {
      registry.stop_all();
    }
    next
  }

  /// Pushes `config` to every root node and, through propagation, their dependent descendants.
  /// Each root keeps its own `independent_control` bit.
  #[instrument(level = "trace", skip(self), fields(flow_graph = %self.flow_graph.id))]
  pub fn apply_config_all(&self, config: ControlConfig) -> FlowGraph {
    self.map_roots(|n| {
      let own = config.with_independent_control(n.is_independent());
      n.with_control_config(own, true)
    })
  }

  /// Sets `state` on node `node_id` (anywhere in the tree) and propagates it to its subtree.
  #[instrument(level = "trace", skip(self), fields(flow_graph = %self.flow_graph.id))]
  pub fn set_node_state(
    &self,
    node_id: &str,
    state: ExecutionState,
  ) -> Result<FlowGraph, ControlError> {
    self.update(node_id, &|n| n.with_execution_state(state, true))
  }

  /// Sets `config` on node `node_id` (anywhere in the tree) and propagates it to its subtree.
  #[instrument(level = "trace", skip(self), fields(flow_graph = %self.flow_graph.id))]
  pub fn set_node_config(
    &self,
    node_id: &str,
    config: ControlConfig,
  ) -> Result<FlowGraph, ControlError> {
    self.update(node_id, &|n| n.with_control_config(config, true))
  }

  pub fn find_node(&self, node_id: &str) -> Option<&'a Node> {
    self.flow_graph.find_node(node_id)
  }

  pub fn execution_status(&self) -> FlowExecutionStatus {
    FlowExecutionStatus::from_flow_graph(self.flow_graph)
  }

  fn set_all(&self, state: ExecutionState) -> FlowGraph {
    info!(flow_graph = %self.flow_graph.id, %state, "applying state to all root nodes");
    self.map_roots(|n| n.with_execution_state(state, true))
  }

  fn map_roots(&self, f: impl Fn(&Node) -> Node) -> FlowGraph {
    let mut next = self.flow_graph.clone();
    next.root_nodes = self.flow_graph.root_nodes.iter().map(f).collect();
    next
  }

  fn update(&self, node_id: &str, f: &dyn Fn(&Node) -> Node) -> Result<FlowGraph, ControlError> {
    if self.find_node(node_id).is_none() {
      return Err(ControlError::NodeNotFound(node_id.to_string()));
    }
    self
      .flow_graph
      .update_node(node_id, f)
      .ok_or_else(|| ControlError::NodeNotFound(node_id.to_string()))
  }
}
