//! Type-specific projection of a node record for the detail panel.

use serde_json::{Map, Value};

use super::record::{NodeKind, StepRecord};

/// Fields shown for services and flows, in display order.
const FLOW_FIELDS: &[&str] = &["flowName", "flowKey", "serverKey", "flowGroupName"];

/// Fields shown for transactions, in display order.
const TRANSACTION_FIELDS: &[&str] = &[
	"serverKey",
	"transactionKey",
	"transactionName",
	"owner",
	"createUserId",
	"createTs",
	"modifyTs",
];

/// Placeholder for empty values in the detail table.
pub const PLACEHOLDER: &str = "-";

/// One row of the detail table. `None` means the record has no value for it.
#[derive(Clone, Debug, PartialEq)]
pub struct DetailField {
	pub key: String,
	pub value: Option<Value>,
}

/// Project a record onto the fields relevant to its type.
///
/// Whitelisted fields read `details.<field>` first, then the root-level field,
/// and are always present. Other types show their `details` object as is.
pub fn project_details(record: &StepRecord) -> Vec<DetailField> {
	let details = record.get("details").and_then(Value::as_object);

	let whitelist = match NodeKind::from_record(record) {
		NodeKind::Service { .. } | NodeKind::Flow { .. } => FLOW_FIELDS,
		NodeKind::Transaction { .. } => TRANSACTION_FIELDS,
		NodeKind::Server { .. } | NodeKind::Unknown { .. } => {
			return details
				.map(|d| {
					d.iter()
						.map(|(key, value)| DetailField {
							key: key.clone(),
							value: Some(value.clone()),
						})
						.collect()
				})
				.unwrap_or_default();
		}
	};

	whitelist
		.iter()
		.map(|&key| DetailField {
			key: key.to_string(),
			value: pick(details, record, key),
		})
		.collect()
}

fn pick(details: Option<&Map<String, Value>>, record: &StepRecord, key: &str) -> Option<Value> {
	details
		.and_then(|d| d.get(key))
		.filter(|v| !v.is_null())
		.or_else(|| record.get(key).filter(|v| !v.is_null()))
		.cloned()
}

/// Text shown in the value column.
///
/// Missing, null and empty-string values render as [`PLACEHOLDER`]; nested
/// objects and arrays are pretty-printed JSON.
pub fn display_value(value: Option<&Value>) -> String {
	match value {
		None | Some(Value::Null) => PLACEHOLDER.to_string(),
		Some(Value::String(s)) if s.is_empty() => PLACEHOLDER.to_string(),
		Some(Value::String(s)) => s.clone(),
		Some(Value::Number(n)) => n.to_string(),
		Some(Value::Bool(b)) => b.to_string(),
		Some(nested) => serde_json::to_string_pretty(nested).unwrap_or_else(|_| nested.to_string()),
	}
}

/// Whether a value renders as a block of JSON rather than inline text.
pub fn is_structured(value: Option<&Value>) -> bool {
	matches!(value, Some(Value::Object(_) | Value::Array(_)))
}
