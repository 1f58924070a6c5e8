//! Node identity derivation.
//!
//! Identity strings decide which steps collapse into one graph node, so the
//! prefix scheme below must stay stable: `tx_`, `srv_`, `flow_`, `svc_`, or the
//! raw type name for anything else. Steps with a blank key get a positional id
//! scoped to their (route, step) coordinates and never merge.

use super::record::{NodeKind, StepRecord};

impl NodeKind {
	/// Prefix that qualifies the semantic key in the node id.
	pub fn id_prefix(&self) -> &str {
		match self {
			NodeKind::Transaction { .. } => "tx",
			NodeKind::Server { .. } => "srv",
			NodeKind::Flow { .. } => "flow",
			NodeKind::Service { .. } => "svc",
			NodeKind::Unknown { type_name, .. } => type_name,
		}
	}
}

/// Identity of an already-classified step at `(route_index, step_index)`.
pub fn node_id(kind: &NodeKind, route_index: usize, step_index: usize) -> String {
	let prefix = kind.id_prefix();
	match kind.semantic_key() {
		"" => format!("{prefix}_{route_index}_{step_index}"),
		key => format!("{prefix}_{key}"),
	}
}

/// Identity of a raw step record.
pub fn step_id(record: &StepRecord, route_index: usize, step_index: usize) -> String {
	node_id(&NodeKind::from_record(record), route_index, step_index)
}
