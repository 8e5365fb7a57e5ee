//! Flow graph value types: ports, connections, the node hierarchy and the flow graph itself.
//!
//! All types are plain values. Edits produce new values; nothing here holds shared mutable state.

mod code_node;
#[cfg(test)]
mod code_node_test;
mod connection;
mod connection_segment;
#[cfg(test)]
mod connection_test;
mod control_config;
#[cfg(test)]
mod control_config_test;
mod flow_execution_status;
mod flow_graph;
mod graph_node;
#[cfg(test)]
mod graph_node_test;
mod node;
mod pass_thru_port;
mod port;
mod position;
#[cfg(test)]
mod position_test;
mod validation_result;

pub use code_node::{CodeNode, PortValues, ProcessingLogic, ProcessingLogicRef};
pub use connection::Connection;
pub use connection_segment::ConnectionSegment;
pub use control_config::{ControlConfig, ExecutionState};
pub use flow_execution_status::FlowExecutionStatus;
pub use flow_graph::FlowGraph;
pub use graph_node::{GRAPH_NODE_TYPE, GraphNode, PortMapping};
pub use node::{Node, NodeCore};
pub use pass_thru_port::PassThruPort;
pub use port::{DataType, Port, PortDirection, port_id};
pub use position::Position;
pub use validation_result::ValidationResult;
