//! Channel-backed runtime registry: per-node handles that cooperatively obey control signals.
//!
//! Each registered node gets a [NodeRuntimeHandle] observing a `tokio::sync::watch` channel of
//! signals. The node's task calls [NodeRuntimeHandle::checkpoint] between units of work; pausing is
//! back-pressure at that point and stopping is cooperative cancellation.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, instrument};

use crate::control::RuntimeRegistry;
use crate::error::ControlError;
use crate::types::{ControlConfig, ExecutionState};

/// What a node has been told so far. A freshly registered node has not been told anything, which
/// keeps "not started" apart from an explicit `Idle` (stop).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
  Registered,
  State(ExecutionState),
}

impl Signal {
  fn state(self) -> ExecutionState {
    match self {
      Signal::Registered => ExecutionState::Idle,
      Signal::State(state) => state,
    }
  }
}

/// Registry of running nodes keyed by node id.
#[derive(Debug, Default)]
pub struct ChannelRuntimeRegistry {
  nodes: Mutex<HashMap<String, watch::Sender<Signal>>>,
}

impl ChannelRuntimeRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  fn nodes(&self) -> MutexGuard<'_, HashMap<String, watch::Sender<Signal>>> {
    self.nodes.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Registers `node_id` (replacing any previous registration) and returns its handle.
  #[instrument(level = "trace", skip(self))]
  pub fn register(&self, node_id: &str, control_config: ControlConfig) -> NodeRuntimeHandle {
    let (tx, rx) = watch::channel(Signal::Registered);
    self.nodes().insert(node_id.to_string(), tx);
    debug!(node_id, "registered runtime node");
    NodeRuntimeHandle {
      node_id: node_id.to_string(),
      control_config,
      signal: rx,
    }
  }

  pub fn unregister(&self, node_id: &str) -> bool {
    self.nodes().remove(node_id).is_some()
  }

  pub fn node_ids(&self) -> Vec<String> {
    let mut ids: Vec<String> = self.nodes().keys().cloned().collect();
    ids.sort();
    ids
  }

  /// Last state signalled to `node_id`.
  pub fn state_of(&self, node_id: &str) -> Option<ExecutionState> {
    self.nodes().get(node_id).map(|tx| tx.borrow().state())
  }

  /// Signals `state` to one node.
  pub fn set_state(&self, node_id: &str, state: ExecutionState) -> Result<(), ControlError> {
    let nodes = self.nodes();
    let tx = nodes
      .get(node_id)
      .ok_or_else(|| ControlError::NodeNotFound(node_id.to_string()))?;
    tx.send_replace(Signal::State(state));
    Ok(())
  }

  /// Launches every registered node.
  pub fn start_all(&self) {
    self.broadcast(ExecutionState::Running);
  }

  fn broadcast(&self, state: ExecutionState) {
    let nodes = self.nodes();
    info!(%state, nodes = nodes.len(), "signalling runtime nodes");
    for tx in nodes.values() {
      tx.send_replace(Signal::State(state));
    }
  }
}

impl RuntimeRegistry for ChannelRuntimeRegistry {
  fn pause_all(&self) {
    self.broadcast(ExecutionState::Paused);
  }

  fn resume_all(&self) {
    self.broadcast(ExecutionState::Running);
  }

  fn stop_all(&self) {
    self.broadcast(ExecutionState::Idle);
  }
}

/// A node task's view of its control signals.
#[derive(Debug)]
pub struct NodeRuntimeHandle {
  pub node_id: String,
  pub control_config: ControlConfig,
  signal: watch::Receiver<Signal>,
}

impl NodeRuntimeHandle {
  pub fn state(&self) -> ExecutionState {
    self.signal.borrow().state()
  }

  /// Call between units of work. Returns `true` when the node may process the next unit and
  /// `false` when it must exit.
  ///
  /// Sleeps `speed_attenuation_ms` first, then waits while paused or not yet started. A signalled
  /// `Idle` means stopped, whether or not the node ever ran. `Error` continues only with
  /// `auto_resume_on_error`. A dropped registry counts as stopped.
  #[instrument(level = "trace", skip(self), fields(node_id = %self.node_id))]
  pub async fn checkpoint(&mut self) -> bool {
    let attenuation = self.control_config.speed_attenuation_ms;
    if attenuation > 0 {
      tokio::time::sleep(Duration::from_millis(attenuation)).await;
    }
    loop {
      let signal = *self.signal.borrow_and_update();
      match signal {
        Signal::State(ExecutionState::Running) => return true,
        Signal::State(ExecutionState::Idle) => return false,
        Signal::State(ExecutionState::Error) => return self.control_config.auto_resume_on_error,
        Signal::Registered | Signal::State(ExecutionState::Paused) => {}
      }
      if self.signal.changed().await.is_err() {
        debug!("runtime registry dropped");
        return false;
      }
    }
  }
}
