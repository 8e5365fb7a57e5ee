//! Aggregate execution status over every node of a flow graph.

use serde::Serialize;

use super::{ExecutionState, FlowGraph};

/// Per-state tallies plus one derived overall state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlowExecutionStatus {
  pub total_nodes: usize,
  pub idle_count: usize,
  pub running_count: usize,
  pub paused_count: usize,
  pub error_count: usize,
  pub independent_control_count: usize,
  pub overall_state: ExecutionState,
}

impl FlowExecutionStatus {
  /// Walks root nodes and all descendants.
  ///
  /// Overall state priority: any error, else any running, else any paused, else idle.
  pub fn from_flow_graph(graph: &FlowGraph) -> Self {
    let mut status = Self::default();
    for node in graph.all_nodes() {
      status.total_nodes += 1;
      match node.execution_state() {
        ExecutionState::Idle => status.idle_count += 1,
        ExecutionState::Running => status.running_count += 1,
        ExecutionState::Paused => status.paused_count += 1,
        ExecutionState::Error => status.error_count += 1,
      }
      if node.is_independent() {
        status.independent_control_count += 1;
      }
    }
    status.overall_state = if status.error_count > 0 {
      ExecutionState::Error
    } else if status.running_count > 0 {
      ExecutionState::Running
    } else if status.paused_count > 0 {
      ExecutionState::Paused
    } else {
      ExecutionState::Idle
    };
    status
  }
}
