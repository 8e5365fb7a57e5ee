//! Tests for `EngineConfig`.

use std::collections::HashMap;

use crate::config::{DEFAULT_GROUP_MARGIN, EngineConfig};
use crate::error::ConstructionError;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
  let map: HashMap<String, String> = pairs
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
  move |key| map.get(key).cloned()
}

#[test]
fn defaults_without_overrides() {
  let c = EngineConfig::from_lookup(lookup(&[])).unwrap();
  assert_eq!(c, EngineConfig::default());
  assert_eq!(c.group_margin, DEFAULT_GROUP_MARGIN);
}

#[test]
fn overrides_are_applied() {
  let c = EngineConfig::from_lookup(lookup(&[
    ("FBP_PAUSE_BUFFER_SIZE", "16"),
    ("FBP_SPEED_ATTENUATION_MS", " 250 "),
    ("FBP_AUTO_RESUME_ON_ERROR", "true"),
    ("FBP_GROUP_MARGIN", "10"),
  ]))
  .unwrap();
  assert_eq!(c.default_control.pause_buffer_size(), 16);
  assert_eq!(c.default_control.speed_attenuation_ms, 250);
  assert!(c.default_control.auto_resume_on_error);
  assert_eq!(c.group_margin, 10.0);
}

#[test]
fn zero_pause_buffer_is_rejected() {
  let r = EngineConfig::from_lookup(lookup(&[("FBP_PAUSE_BUFFER_SIZE", "0")]));
  assert_eq!(r, Err(ConstructionError::ZeroPauseBufferSize));
}

#[test]
fn unparsable_and_negative_values_are_rejected() {
  let r = EngineConfig::from_lookup(lookup(&[("FBP_SPEED_ATTENUATION_MS", "fast")]));
  assert!(matches!(r, Err(ConstructionError::InvalidSetting { .. })));
  let r = EngineConfig::from_lookup(lookup(&[("FBP_GROUP_MARGIN", "-5")]));
  assert!(matches!(r, Err(ConstructionError::InvalidSetting { .. })));
}
