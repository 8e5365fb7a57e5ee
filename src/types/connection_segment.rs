//! The part of a logical connection visible in one nesting scope.

use serde::{Deserialize, Serialize};

/// One per-scope piece of a [super::Connection] that crosses graph-node boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSegment {
  pub id: String,
  pub source_node_id: String,
  pub source_port_id: String,
  pub target_node_id: String,
  pub target_port_id: String,
  /// Scope the segment is drawn in; `None` for the root.
  pub scope_node_id: Option<String>,
  pub parent_connection_id: String,
}

impl ConnectionSegment {
  pub fn is_visible_in(&self, scope: Option<&str>) -> bool {
    self.scope_node_id.as_deref() == scope
  }
}
