//! Journey graph construction from backtrace routes.
//!
//! Routes are walked in input order. Each step resolves to a node id; the first
//! step seen for an id creates the node and keeps its full record, later steps
//! with the same id only contribute edges. Consecutive steps within a route are
//! joined by a directed edge, and edges are never deduplicated.

use std::collections::HashMap;

use serde_json::Value;

use super::identity::node_id;
use super::record::{NodeKind, StepRecord, StyleKind, as_record};

/// A deduplicated entity in the journey graph.
#[derive(Clone, Debug, PartialEq)]
pub struct JourneyNode {
	/// Derived identity key, see [`node_id`].
	pub id: String,
	pub kind: NodeKind,
	/// The first record seen for this id, untouched.
	pub record: StepRecord,
	/// Plain display label; truncation is up to the renderer.
	pub label: String,
}

impl JourneyNode {
	/// Color category of this node.
	pub fn style(&self) -> StyleKind {
		self.kind.style_kind()
	}
}

/// A directed hop between consecutive steps of one route.
#[derive(Clone, Debug, PartialEq)]
pub struct JourneyEdge {
	/// Unique within one build.
	pub id: String,
	pub source: String,
	pub target: String,
	/// Index of the source node in [`JourneyGraph::nodes`].
	pub source_index: usize,
	/// Index of the target node in [`JourneyGraph::nodes`].
	pub target_index: usize,
	/// Color category of the step this edge points at.
	pub style: StyleKind,
}

/// Nodes in first-seen order plus edges in emission order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JourneyGraph {
	pub nodes: Vec<JourneyNode>,
	pub edges: Vec<JourneyEdge>,
}

impl JourneyGraph {
	/// Build from a raw `{ "routes": [...] }` payload.
	pub fn from_response(response: &Value) -> Self {
		build_journey(&routes_from_response(response))
	}

	/// True when there is nothing to draw.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Look up a node by its identity key.
	pub fn node(&self, id: &str) -> Option<&JourneyNode> {
		self.nodes.iter().find(|node| node.id == id)
	}
}

/// Extract the routes array from a backend payload; anything malformed is empty.
pub fn routes_from_response(response: &Value) -> Vec<Value> {
	response
		.get("routes")
		.and_then(Value::as_array)
		.cloned()
		.unwrap_or_default()
}

/// Display label for a step of the given kind.
pub fn node_label(kind: &NodeKind) -> String {
	match kind {
		NodeKind::Transaction { key } => format!("TX: {key}"),
		NodeKind::Server { key } => format!("SERVER: {key}"),
		NodeKind::Flow { name } => name.clone(),
		NodeKind::Service { label } | NodeKind::Unknown { label, .. } => label.clone(),
	}
}

/// Build the deduplicated journey graph for an ordered routes collection.
///
/// Each route is expected to be a JSON array of step objects. Routes that are
/// not arrays contribute nothing; steps that are not objects behave as empty
/// records and still occupy their position.
pub fn build_journey(routes: &[Value]) -> JourneyGraph {
	let mut graph = JourneyGraph::default();
	let mut index_of: HashMap<String, usize> = HashMap::new();
	let mut edge_counter = 0usize;

	for (route_index, route) in routes.iter().enumerate() {
		let Some(steps) = route.as_array() else {
			continue;
		};
		let mut previous: Option<usize> = None;

		for (step_index, step) in steps.iter().enumerate() {
			let record = as_record(step);
			let kind = NodeKind::from_record(&record);
			let id = node_id(&kind, route_index, step_index);
			let style = kind.style_kind();

			let current = match index_of.get(&id) {
				Some(&existing) => existing,
				None => {
					let label = node_label(&kind);
					graph.nodes.push(JourneyNode {
						id: id.clone(),
						kind,
						record,
						label,
					});
					index_of.insert(id.clone(), graph.nodes.len() - 1);
					graph.nodes.len() - 1
				}
			};

			if let Some(prev) = previous {
				let source = graph.nodes[prev].id.clone();
				graph.edges.push(JourneyEdge {
					id: format!("e_{route_index}_{step_index}_{source}_to_{id}_{edge_counter}"),
					source,
					target: id,
					source_index: prev,
					target_index: current,
					style,
				});
				edge_counter += 1;
			}

			previous = Some(current);
		}
	}

	graph
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use proptest::prelude::*;
	use serde_json::json;

	use super::*;

	fn routes(value: Value) -> Vec<Value> {
		value.as_array().cloned().unwrap_or_default()
	}

	#[test]
	fn service_then_transaction() {
		let graph = build_journey(&routes(json!([[
			{ "type": "service", "label": "A" },
			{ "type": "transaction", "transactionKey": "T1" },
		]])));

		let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["svc_A", "tx_T1"]);
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(graph.edges[0].source, "svc_A");
		assert_eq!(graph.edges[0].target, "tx_T1");
		assert_eq!(graph.edges[0].style, StyleKind::Transaction);
	}

	#[test]
	fn same_flow_in_two_single_step_routes() {
		let graph = build_journey(&routes(json!([
			[{ "type": "flow", "flowName": "F1" }],
			[{ "type": "flow", "flowName": "F1" }],
		])));
		assert_eq!(graph.nodes.len(), 1);
		assert_eq!(graph.nodes[0].id, "flow_F1");
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn empty_routes_give_an_empty_graph() {
		let graph = build_journey(&[]);
		assert!(graph.is_empty());
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn malformed_payloads_give_an_empty_graph() {
		for payload in [
			json!(null),
			json!({}),
			json!({ "routes": "nope" }),
			json!({ "routes": [42, "x", null, {}] }),
			json!([]),
		] {
			let graph = JourneyGraph::from_response(&payload);
			assert!(graph.is_empty(), "payload {payload} should build nothing");
		}
	}

	#[test]
	fn first_seen_record_wins() {
		let graph = build_journey(&routes(json!([
			[{ "type": "transaction", "transactionKey": "T1", "details": { "owner": "first" } }],
			[{ "type": "transaction", "TRANSACTION_KEY": "T1", "details": { "owner": "second" } }],
		])));
		assert_eq!(graph.nodes.len(), 1);
		assert_eq!(graph.nodes[0].record["details"]["owner"], "first");
	}

	#[test]
	fn labels_follow_the_node_type() {
		let graph = build_journey(&routes(json!([[
			{ "type": "transaction", "TRANSACTION_KEY": "T7" },
			{ "type": "server", "serverKey": "AGENT" },
			{ "type": "flow", "label": "OnlyLabel" },
			{ "type": "service", "label": "Svc" },
			{ "type": "queue", "label": "Q" },
			{ "type": "server" },
		]])));
		let labels: Vec<_> = graph.nodes.iter().map(|n| n.label.as_str()).collect();
		assert_eq!(labels, ["TX: T7", "SERVER: AGENT", "OnlyLabel", "Svc", "Q", "SERVER: "]);
	}

	#[test]
	fn repeated_pairs_keep_distinct_edges() {
		let route = json!([
			{ "type": "service", "label": "A" },
			{ "type": "flow", "flowName": "F" },
		]);
		let graph = build_journey(&[route.clone(), route]);
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(graph.edges.len(), 2);
		assert_ne!(graph.edges[0].id, graph.edges[1].id);
		assert_eq!(graph.edges[0].id, "e_0_1_svc_A_to_flow_F_0");
		assert_eq!(graph.edges[1].id, "e_1_1_svc_A_to_flow_F_1");
	}

	#[test]
	fn edges_point_at_shared_nodes_by_index() {
		let graph = build_journey(&routes(json!([
			[{ "type": "service", "label": "A" }, { "type": "server", "serverKey": "S" }],
			[{ "type": "flow", "flowName": "B" }, { "type": "server", "SERVER_KEY": "S" }],
		])));
		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(graph.edges[0].target_index, graph.edges[1].target_index);
		assert_eq!(graph.node("srv_S").map(|n| n.style()), Some(StyleKind::Server));
	}

	#[test]
	fn non_object_steps_still_occupy_a_position() {
		let graph = build_journey(&routes(json!([[
			{ "type": "service", "label": "A" },
			"garbage",
			{ "type": "service", "label": "B" },
		]])));
		let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["svc_A", "node_0_1", "svc_B"]);
		assert_eq!(graph.edges.len(), 2);
	}

	fn arb_step() -> impl Strategy<Value = Value> {
		(
			prop::sample::select(vec!["transaction", "flow", "service", "server"]),
			prop::option::of("[A-D]"),
		)
			.prop_map(|(ty, key)| match key {
				Some(key) => json!({
					"type": ty,
					"transactionKey": key,
					"serverKey": key,
					"flowName": key,
					"label": key,
				}),
				None => json!({ "type": ty }),
			})
	}

	fn arb_routes() -> impl Strategy<Value = Vec<Value>> {
		prop::collection::vec(
			prop::collection::vec(arb_step(), 0..6).prop_map(Value::Array),
			0..6,
		)
	}

	proptest! {
		#[test]
		fn edge_count_is_sum_of_route_lengths_minus_one(routes in arb_routes()) {
			let graph = build_journey(&routes);
			let expected: usize = routes
				.iter()
				.filter_map(Value::as_array)
				.map(|steps| steps.len().saturating_sub(1))
				.sum();
			prop_assert_eq!(graph.edges.len(), expected);
		}

		#[test]
		fn node_ids_are_unique_and_edges_resolve(routes in arb_routes()) {
			let graph = build_journey(&routes);
			let ids: HashSet<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
			prop_assert_eq!(ids.len(), graph.nodes.len());

			let edge_ids: HashSet<_> = graph.edges.iter().map(|e| e.id.as_str()).collect();
			prop_assert_eq!(edge_ids.len(), graph.edges.len());

			for edge in &graph.edges {
				prop_assert_eq!(&graph.nodes[edge.source_index].id, &edge.source);
				prop_assert_eq!(&graph.nodes[edge.target_index].id, &edge.target);
			}
		}

		#[test]
		fn identical_keyed_steps_merge(routes in arb_routes()) {
			let graph = build_journey(&routes);
			let mut keyed: HashSet<(String, String)> = HashSet::new();
			for step in routes.iter().filter_map(Value::as_array).flatten() {
				let kind = NodeKind::from_record(&as_record(step));
				if !kind.semantic_key().is_empty() {
					keyed.insert((kind.type_name().to_string(), kind.semantic_key().to_string()));
				}
			}
			let keyed_nodes = graph
				.nodes
				.iter()
				.filter(|n| !n.kind.semantic_key().is_empty())
				.count();
			prop_assert_eq!(keyed_nodes, keyed.len());
		}

		#[test]
		fn rebuilding_is_deterministic(routes in arb_routes()) {
			prop_assert_eq!(build_journey(&routes), build_journey(&routes));
		}
	}
}
