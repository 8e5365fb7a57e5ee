//! Engine configuration: control defaults and grouping layout, overridable from the environment.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use crate::error::ConstructionError;
use crate::types::ControlConfig;

/// Environment variable for the default pause buffer size.
pub const ENV_PAUSE_BUFFER_SIZE: &str = "FBP_PAUSE_BUFFER_SIZE";
/// Environment variable for the default speed attenuation (ms).
pub const ENV_SPEED_ATTENUATION_MS: &str = "FBP_SPEED_ATTENUATION_MS";
/// Environment variable for the default auto-resume-on-error flag.
pub const ENV_AUTO_RESUME_ON_ERROR: &str = "FBP_AUTO_RESUME_ON_ERROR";
/// Environment variable for the margin around grouped children.
pub const ENV_GROUP_MARGIN: &str = "FBP_GROUP_MARGIN";

/// Margin added around children when they are moved into a new container.
pub const DEFAULT_GROUP_MARGIN: f64 = 50.0;

/// Settings used when the engine creates nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
  /// Control config given to containers created by grouping.
  pub default_control: ControlConfig,
  /// Margin between a container's edge and its shifted children.
  pub group_margin: f64,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      default_control: ControlConfig::default(),
      group_margin: DEFAULT_GROUP_MARGIN,
    }
  }
}

impl EngineConfig {
  /// Defaults overridden by `FBP_*` environment variables.
  pub fn from_env() -> Result<Self, ConstructionError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Defaults overridden by whatever `lookup` returns for the `FBP_*` keys.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConstructionError> {
    let mut config = Self::default();
    let mut control = config.default_control;
    if let Some(size) = parse::<u32>(&lookup, ENV_PAUSE_BUFFER_SIZE)? {
      control = control.with_pause_buffer_size(size)?;
    }
    if let Some(ms) = parse::<u64>(&lookup, ENV_SPEED_ATTENUATION_MS)? {
      control = control.with_speed_attenuation(ms);
    }
    if let Some(auto) = parse::<bool>(&lookup, ENV_AUTO_RESUME_ON_ERROR)? {
      control = control.with_auto_resume_on_error(auto);
    }
    if let Some(margin) = parse::<f64>(&lookup, ENV_GROUP_MARGIN)? {
      if !margin.is_finite() || margin < 0.0 {
        return Err(ConstructionError::InvalidSetting {
          key: ENV_GROUP_MARGIN.to_string(),
          value: margin.to_string(),
        });
      }
      config.group_margin = margin;
    }
    config.default_control = control;
    debug!(?config, "engine config loaded");
    Ok(config)
  }
}

fn parse<T: FromStr>(
  lookup: &impl Fn(&str) -> Option<String>,
  key: &str,
) -> Result<Option<T>, ConstructionError> {
  match lookup(key) {
    None => Ok(None),
    Some(raw) => raw
      .trim()
      .parse::<T>()
      .map(Some)
      .map_err(|_| ConstructionError::InvalidSetting {
        key: key.to_string(),
        value: raw,
      }),
  }
}
