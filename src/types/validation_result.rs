//! Aggregated outcome of a structural validation pass.

use serde::Serialize;

/// Result of a `validate()` call: never an error, always a list of human-readable problems.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
  pub success: bool,
  pub errors: Vec<String>,
}

impl ValidationResult {
  pub fn from_errors(errors: Vec<String>) -> Self {
    Self {
      success: errors.is_empty(),
      errors,
    }
  }

  pub fn ok() -> Self {
    Self::from_errors(vec![])
  }

  /// Appends another result's errors, prefixing each with `context`.
  pub fn merge(&mut self, context: &str, other: ValidationResult) {
    self
      .errors
      .extend(other.errors.into_iter().map(|e| format!("{}: {}", context, e)));
    self.success = self.errors.is_empty();
  }
}
