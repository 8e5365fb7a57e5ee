//! Canvas position of a node.

use serde::{Deserialize, Serialize};

use crate::error::ConstructionError;

/// Canvas position. Both coordinates are always finite and non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
  x: f64,
  y: f64,
}

#[derive(Deserialize)]
struct RawPosition {
  x: f64,
  y: f64,
}

impl TryFrom<RawPosition> for Position {
  type Error = ConstructionError;

  fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
    Position::new(raw.x, raw.y)
  }
}

impl Position {
  pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

  pub fn new(x: f64, y: f64) -> Result<Self, ConstructionError> {
    if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
      return Err(ConstructionError::InvalidPosition { x, y });
    }
    Ok(Self { x, y })
  }

  pub fn x(&self) -> f64 {
    self.x
  }

  pub fn y(&self) -> f64 {
    self.y
  }
}
