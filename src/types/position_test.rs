//! Tests for `Position`.

use super::Position;
use crate::error::ConstructionError;

#[test]
fn accepts_non_negative() {
  let p = Position::new(0.0, 12.5).unwrap();
  assert_eq!(p.x(), 0.0);
  assert_eq!(p.y(), 12.5);
}

#[test]
fn rejects_negative_coordinates() {
  assert_eq!(
    Position::new(-1.0, 3.0),
    Err(ConstructionError::InvalidPosition { x: -1.0, y: 3.0 })
  );
  assert!(Position::new(1.0, -0.5).is_err());
}

#[test]
fn rejects_non_finite() {
  assert!(Position::new(f64::INFINITY, 0.0).is_err());
  assert!(Position::new(0.0, f64::NAN).is_err());
}

#[test]
fn deserializing_checks_coordinates() {
  let p: Position = serde_json::from_str(r#"{"x": 4.0, "y": 2.5}"#).unwrap();
  assert_eq!(p, Position::new(4.0, 2.5).unwrap());
  let err = serde_json::from_str::<Position>(r#"{"x": -3.0, "y": 1.0}"#).unwrap_err();
  assert!(err.to_string().contains("non-negative"), "{err}");
}
