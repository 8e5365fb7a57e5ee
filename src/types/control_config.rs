//! Execution state and control configuration carried by every node.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConstructionError;

/// Lifecycle state of a node as seen by the runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionState {
  #[default]
  Idle,
  Running,
  Paused,
  Error,
}

impl fmt::Display for ExecutionState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ExecutionState::Idle => write!(f, "idle"),
      ExecutionState::Running => write!(f, "running"),
      ExecutionState::Paused => write!(f, "paused"),
      ExecutionState::Error => write!(f, "error"),
    }
  }
}

/// Per-node runtime control settings.
///
/// `independent_control` exempts the node (and its subtree) from state and config pushed by a parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawControlConfig")]
pub struct ControlConfig {
  pause_buffer_size: u32,
  pub speed_attenuation_ms: u64,
  pub auto_resume_on_error: bool,
  pub independent_control: bool,
}

#[derive(Deserialize)]
struct RawControlConfig {
  pause_buffer_size: u32,
  speed_attenuation_ms: u64,
  auto_resume_on_error: bool,
  independent_control: bool,
}

impl TryFrom<RawControlConfig> for ControlConfig {
  type Error = ConstructionError;

  fn try_from(raw: RawControlConfig) -> Result<Self, Self::Error> {
    ControlConfig::new(
      raw.pause_buffer_size,
      raw.speed_attenuation_ms,
      raw.auto_resume_on_error,
      raw.independent_control,
    )
  }
}

impl ControlConfig {
  pub const DEFAULT_PAUSE_BUFFER_SIZE: u32 = 100;

  pub fn new(
    pause_buffer_size: u32,
    speed_attenuation_ms: u64,
    auto_resume_on_error: bool,
    independent_control: bool,
  ) -> Result<Self, ConstructionError> {
    if pause_buffer_size == 0 {
      return Err(ConstructionError::ZeroPauseBufferSize);
    }
    Ok(Self {
      pause_buffer_size,
      speed_attenuation_ms,
      auto_resume_on_error,
      independent_control,
    })
  }

  pub fn pause_buffer_size(&self) -> u32 {
    self.pause_buffer_size
  }

  pub fn with_pause_buffer_size(self, size: u32) -> Result<Self, ConstructionError> {
    Self::new(
      size,
      self.speed_attenuation_ms,
      self.auto_resume_on_error,
      self.independent_control,
    )
  }

  pub fn with_speed_attenuation(mut self, ms: u64) -> Self {
    self.speed_attenuation_ms = ms;
    self
  }

  pub fn with_independent_control(mut self, independent: bool) -> Self {
    self.independent_control = independent;
    self
  }

  pub fn with_auto_resume_on_error(mut self, auto_resume: bool) -> Self {
    self.auto_resume_on_error = auto_resume;
    self
  }
}

impl Default for ControlConfig {
  fn default() -> Self {
    Self {
      pause_buffer_size: Self::DEFAULT_PAUSE_BUFFER_SIZE,
      speed_attenuation_ms: 0,
      auto_resume_on_error: false,
      independent_control: false,
    }
  }
}
