//! Normalization of loosely-typed route step records.
//!
//! The backend returns steps as JSON objects whose identifying fields vary by
//! step type and sometimes by casing (`transactionKey` vs `TRANSACTION_KEY`).
//! Everything here degrades to empty strings instead of failing, and
//! [`NodeKind::from_record`] closes the shape into a typed enum for the rest of
//! the crate.

use serde_json::{Map, Value};

/// A single step of a backtrace route, exactly as received.
pub type StepRecord = Map<String, Value>;

/// Alias lists, highest priority first.
const TRANSACTION_KEY_FIELDS: &[&str] = &["transactionKey", "TRANSACTION_KEY", "label"];
const SERVER_KEY_FIELDS: &[&str] = &["serverKey", "SERVER_KEY"];
const FLOW_NAME_FIELDS: &[&str] = &["flowName", "FLOW_NAME", "label"];
const LABEL_FIELDS: &[&str] = &["label"];

/// Type name used when a step carries no `type`.
pub const UNTYPED: &str = "node";

/// Trimmed text form of a scalar JSON value.
///
/// `null`, missing values, objects and arrays all read as the empty string.
pub fn scalar_text(value: Option<&Value>) -> String {
	match value {
		Some(Value::String(s)) => s.trim().to_string(),
		Some(Value::Number(n)) => n.to_string(),
		Some(Value::Bool(b)) => b.to_string(),
		_ => String::new(),
	}
}

fn first_populated(record: &StepRecord, fields: &[&str]) -> String {
	fields
		.iter()
		.map(|field| scalar_text(record.get(*field)))
		.find(|text| !text.is_empty())
		.unwrap_or_default()
}

/// Transaction key: `transactionKey`, `TRANSACTION_KEY`, then `label`.
pub fn transaction_key(record: &StepRecord) -> String {
	first_populated(record, TRANSACTION_KEY_FIELDS)
}

/// Server key: `serverKey`, then `SERVER_KEY`. No label fallback.
pub fn server_key(record: &StepRecord) -> String {
	first_populated(record, SERVER_KEY_FIELDS)
}

/// Flow name: `flowName`, `FLOW_NAME`, then `label`.
pub fn flow_name(record: &StepRecord) -> String {
	first_populated(record, FLOW_NAME_FIELDS)
}

/// Generic `label` field.
pub fn label(record: &StepRecord) -> String {
	first_populated(record, LABEL_FIELDS)
}

/// The trimmed `type` field, possibly empty.
pub fn step_type(record: &StepRecord) -> String {
	scalar_text(record.get("type"))
}

/// Copy a step out as a record; anything that is not an object reads as empty.
pub fn as_record(step: &Value) -> StepRecord {
	step.as_object().cloned().unwrap_or_default()
}

/// The closed set of step types, each with the semantic key that identifies it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Transaction { key: String },
	Flow { name: String },
	Service { label: String },
	Server { key: String },
	/// Any other `type`, including a missing one (named [`UNTYPED`]).
	Unknown { type_name: String, label: String },
}

/// Visual category of a node. Unknown types are drawn like flows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleKind {
	Transaction,
	Flow,
	Service,
	Server,
}

impl NodeKind {
	/// Classify a record by its `type` field and extract its semantic key.
	pub fn from_record(record: &StepRecord) -> Self {
		match step_type(record).as_str() {
			"transaction" => NodeKind::Transaction {
				key: transaction_key(record),
			},
			"flow" => NodeKind::Flow {
				name: flow_name(record),
			},
			"service" => NodeKind::Service {
				label: label(record),
			},
			"server" => NodeKind::Server {
				key: server_key(record),
			},
			"" => NodeKind::Unknown {
				type_name: UNTYPED.to_string(),
				label: label(record),
			},
			other => NodeKind::Unknown {
				type_name: other.to_string(),
				label: label(record),
			},
		}
	}

	/// The type name as it appears in records.
	pub fn type_name(&self) -> &str {
		match self {
			NodeKind::Transaction { .. } => "transaction",
			NodeKind::Flow { .. } => "flow",
			NodeKind::Service { .. } => "service",
			NodeKind::Server { .. } => "server",
			NodeKind::Unknown { type_name, .. } => type_name,
		}
	}

	/// The value that identifies the real-world entity, possibly empty.
	pub fn semantic_key(&self) -> &str {
		match self {
			NodeKind::Transaction { key } | NodeKind::Server { key } => key,
			NodeKind::Flow { name } => name,
			NodeKind::Service { label } | NodeKind::Unknown { label, .. } => label,
		}
	}

	/// Color category used by the canvas and the minimap.
	pub fn style_kind(&self) -> StyleKind {
		match self {
			NodeKind::Transaction { .. } => StyleKind::Transaction,
			NodeKind::Service { .. } => StyleKind::Service,
			NodeKind::Server { .. } => StyleKind::Server,
			NodeKind::Flow { .. } | NodeKind::Unknown { .. } => StyleKind::Flow,
		}
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn record(value: Value) -> StepRecord {
		as_record(&value)
	}

	#[test]
	fn missing_and_null_fields_read_as_empty() {
		let r = record(json!({ "transactionKey": null }));
		assert_eq!(transaction_key(&r), "");
		assert_eq!(server_key(&r), "");
		assert_eq!(flow_name(&r), "");
		assert_eq!(label(&r), "");
		assert_eq!(step_type(&r), "");
	}

	#[test]
	fn scalars_are_coerced_and_trimmed() {
		let r = record(json!({ "serverKey": 4021, "label": "  edge-01  ", "flowName": true }));
		assert_eq!(server_key(&r), "4021");
		assert_eq!(label(&r), "edge-01");
		assert_eq!(flow_name(&r), "true");
	}

	#[test]
	fn nested_values_are_not_identifying() {
		let r = record(json!({ "label": { "nested": 1 }, "serverKey": [1, 2] }));
		assert_eq!(label(&r), "");
		assert_eq!(server_key(&r), "");
	}

	#[test]
	fn upper_snake_aliases_are_equivalent() {
		let camel = record(json!({ "transactionKey": "T1" }));
		let upper = record(json!({ "TRANSACTION_KEY": "T1" }));
		assert_eq!(transaction_key(&camel), transaction_key(&upper));

		let upper_flow = record(json!({ "FLOW_NAME": " CancelOrder " }));
		assert_eq!(flow_name(&upper_flow), "CancelOrder");

		let upper_server = record(json!({ "SERVER_KEY": "AGENT_1" }));
		assert_eq!(server_key(&upper_server), "AGENT_1");
	}

	#[test]
	fn alias_priority_prefers_first_populated() {
		let r = record(json!({
			"transactionKey": "   ",
			"TRANSACTION_KEY": "T2",
			"label": "fallback",
		}));
		assert_eq!(transaction_key(&r), "T2");

		let both = record(json!({ "flowName": "F1", "FLOW_NAME": "F2" }));
		assert_eq!(flow_name(&both), "F1");
	}

	#[test]
	fn label_is_the_last_resort_except_for_servers() {
		let r = record(json!({ "label": "generic" }));
		assert_eq!(transaction_key(&r), "generic");
		assert_eq!(flow_name(&r), "generic");
		assert_eq!(server_key(&r), "");
	}

	#[test]
	fn non_object_steps_are_empty_records() {
		assert!(as_record(&json!("just a string")).is_empty());
		assert!(as_record(&Value::Null).is_empty());
	}

	#[test]
	fn kinds_are_resolved_from_type() {
		let tx = record(json!({ "type": " transaction ", "TRANSACTION_KEY": "T9" }));
		assert_eq!(
			NodeKind::from_record(&tx),
			NodeKind::Transaction { key: "T9".into() }
		);

		let untyped = record(json!({ "label": "orphan" }));
		let kind = NodeKind::from_record(&untyped);
		assert_eq!(kind.type_name(), UNTYPED);
		assert_eq!(kind.semantic_key(), "orphan");

		let queue = record(json!({ "type": "queue", "label": "Q1" }));
		let kind = NodeKind::from_record(&queue);
		assert_eq!(kind.type_name(), "queue");
		assert_eq!(kind.style_kind(), StyleKind::Flow);
	}
}
