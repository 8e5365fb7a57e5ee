//! Tests for `ControlConfig` and `ExecutionState`.

use super::{ControlConfig, ExecutionState};
use crate::error::ConstructionError;

#[test]
fn default_config() {
  let c = ControlConfig::default();
  assert_eq!(c.pause_buffer_size(), 100);
  assert_eq!(c.speed_attenuation_ms, 0);
  assert!(!c.auto_resume_on_error);
  assert!(!c.independent_control);
}

#[test]
fn zero_pause_buffer_is_rejected() {
  assert_eq!(
    ControlConfig::new(0, 10, false, false),
    Err(ConstructionError::ZeroPauseBufferSize)
  );
  assert!(ControlConfig::default().with_pause_buffer_size(0).is_err());
}

#[test]
fn builders_replace_single_fields() {
  let c = ControlConfig::default()
    .with_speed_attenuation(250)
    .with_independent_control(true)
    .with_auto_resume_on_error(true)
    .with_pause_buffer_size(8)
    .unwrap();
  assert_eq!(c, ControlConfig::new(8, 250, true, true).unwrap());
}

#[test]
fn execution_state_defaults_to_idle() {
  assert_eq!(ExecutionState::default(), ExecutionState::Idle);
  assert_eq!(ExecutionState::Paused.to_string(), "paused");
}

#[test]
fn deserializing_checks_pause_buffer_size() {
  let json = serde_json::to_string(&ControlConfig::default().with_speed_attenuation(5)).unwrap();
  let back: ControlConfig = serde_json::from_str(&json).unwrap();
  assert_eq!(back.speed_attenuation_ms, 5);
  let zero = json.replace("\"pause_buffer_size\":100", "\"pause_buffer_size\":0");
  assert_ne!(zero, json);
  assert!(serde_json::from_str::<ControlConfig>(&zero).is_err());
}
