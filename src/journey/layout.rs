//! Layered top-to-bottom layout for the journey graph.
//!
//! Ranking, crossing reduction and coordinate assignment come from
//! `rust-sugiyama`, which lays out each weakly connected component on its own
//! unit grid. This module maps those coordinates onto fixed-size node boxes:
//! ranks become rows `node_height + rank_sep` apart with edges flowing down,
//! horizontal spacing is scaled so the tightest neighbours in a row sit
//! `node_width + node_sep` apart, and components are packed left to right.

use std::collections::{BTreeSet, HashMap};

use log::debug;
use rust_sugiyama::configure::Config;

use super::builder::JourneyGraph;

/// Geometry fed to the layout; sizes are in world units.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	pub node_width: f64,
	pub node_height: f64,
	/// Horizontal gap between boxes in the same rank.
	pub node_sep: f64,
	/// Vertical gap between ranks.
	pub rank_sep: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			node_width: 220.0,
			node_height: 60.0,
			node_sep: 50.0,
			rank_sep: 80.0,
		}
	}
}

/// Top-left corner of a node box.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

/// A node placed inside one component: column offset and rank.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Placement {
	node: usize,
	column_x: f64,
	rank: usize,
}

const EPSILON: f64 = 1e-6;

/// Compute positions for every node of `graph`, index-aligned with `graph.nodes`.
pub fn layout_journey(graph: &JourneyGraph, config: &LayoutConfig) -> Vec<Position> {
	let node_count = graph.nodes.len();
	let pairs: Vec<(u32, u32)> = graph
		.edges
		.iter()
		.filter(|edge| edge.source_index != edge.target_index)
		.map(|edge| (edge.source_index as u32, edge.target_index as u32))
		.collect::<BTreeSet<_>>()
		.into_iter()
		.collect();

	let mut components: Vec<Vec<Placement>> = Vec::new();
	let mut placed = vec![false; node_count];

	if !pairs.is_empty() {
		let layouts = rust_sugiyama::from_edges(&pairs)
			.with_config(Config::default())
			.build();
		for (layout, _width, _height) in layouts {
			let raw: Vec<(usize, f64, f64)> = layout
				.into_iter()
				.filter(|(vertex, _)| *vertex < node_count)
				.map(|(vertex, (x, y))| (vertex, x as f64, y as f64))
				.collect();
			if raw.is_empty() {
				continue;
			}
			for &(vertex, _, _) in &raw {
				placed[vertex] = true;
			}
			components.push(normalize_component(&raw, &pairs, config));
		}
	}

	for (node, done) in placed.iter().enumerate() {
		if !done {
			components.push(vec![Placement {
				node,
				column_x: 0.0,
				rank: 0,
			}]);
		}
	}

	// First-seen order of the nodes decides the left-to-right order of components.
	components.sort_by_key(|component| component.iter().map(|p| p.node).min().unwrap_or(usize::MAX));
	debug!(
		"rca-journey: laid out {} nodes in {} components",
		node_count,
		components.len()
	);

	pack_components(&components, node_count, config)
}

/// Convert one component's raw coordinates into ranks and scaled columns.
fn normalize_component(
	raw: &[(usize, f64, f64)],
	pairs: &[(u32, u32)],
	config: &LayoutConfig,
) -> Vec<Placement> {
	let mut levels: Vec<f64> = raw.iter().map(|&(_, _, y)| y).collect();
	levels.sort_by(f64::total_cmp);
	levels.dedup_by(|a, b| (*a - *b).abs() < EPSILON);
	let level_of = |y: f64| {
		levels
			.iter()
			.position(|level| (level - y).abs() < EPSILON)
			.unwrap_or(0)
	};

	let mut rank: HashMap<usize, usize> = raw.iter().map(|&(v, _, y)| (v, level_of(y))).collect();

	// The layout's y axis may grow either way; flip so most edges point down.
	let (mut down, mut up) = (0usize, 0usize);
	for &(s, t) in pairs {
		if let (Some(rs), Some(rt)) = (rank.get(&(s as usize)), rank.get(&(t as usize))) {
			if rs < rt {
				down += 1;
			} else if rs > rt {
				up += 1;
			}
		}
	}
	if up > down {
		let deepest = levels.len().saturating_sub(1);
		for r in rank.values_mut() {
			*r = deepest - *r;
		}
	}

	let unit = column_unit(raw, &rank);
	let min_x = raw.iter().map(|&(_, x, _)| x).fold(f64::INFINITY, f64::min);
	let step = config.node_width + config.node_sep;

	raw.iter()
		.map(|&(node, x, _)| Placement {
			node,
			column_x: (x - min_x) / unit * step,
			rank: rank.get(&node).copied().unwrap_or(0),
		})
		.collect()
}

/// Smallest horizontal distance between two nodes sharing a rank, or between
/// any two nodes when every rank holds a single node.
fn column_unit(raw: &[(usize, f64, f64)], rank: &HashMap<usize, usize>) -> f64 {
	let mut by_rank: HashMap<usize, Vec<f64>> = HashMap::new();
	for &(v, x, _) in raw {
		by_rank.entry(rank.get(&v).copied().unwrap_or(0)).or_default().push(x);
	}

	let min_gap = |xs: &mut Vec<f64>| {
		xs.sort_by(f64::total_cmp);
		xs.windows(2)
			.map(|w| w[1] - w[0])
			.filter(|gap| *gap > EPSILON)
			.fold(f64::INFINITY, f64::min)
	};

	let same_rank = by_rank.values_mut().map(min_gap).fold(f64::INFINITY, f64::min);
	if same_rank.is_finite() {
		return same_rank;
	}
	let mut all: Vec<f64> = raw.iter().map(|&(_, x, _)| x).collect();
	let any = min_gap(&mut all);
	if any.is_finite() { any } else { 1.0 }
}

/// Lay components side by side and convert anchors to top-left corners.
fn pack_components(
	components: &[Vec<Placement>],
	node_count: usize,
	config: &LayoutConfig,
) -> Vec<Position> {
	let mut positions = vec![Position::default(); node_count];
	let (half_w, half_h) = (config.node_width / 2.0, config.node_height / 2.0);
	let row = config.node_height + config.rank_sep;
	let mut cursor = 0.0;

	for component in components {
		let widest = component.iter().map(|p| p.column_x).fold(0.0, f64::max);
		for placement in component {
			let anchor_x = cursor + placement.column_x + half_w;
			let anchor_y = placement.rank as f64 * row + half_h;
			positions[placement.node] = Position {
				x: anchor_x - half_w,
				y: anchor_y - half_h,
			};
		}
		cursor += widest + config.node_width + config.node_sep * 2.0;
	}

	positions
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;
	use serde_json::{Value, json};

	use super::*;
	use crate::journey::builder::build_journey;

	fn graph(value: Value) -> JourneyGraph {
		build_journey(value.as_array().map(Vec::as_slice).unwrap_or_default())
	}

	fn overlaps(a: Position, b: Position, config: &LayoutConfig) -> bool {
		a.x < b.x + config.node_width
			&& b.x < a.x + config.node_width
			&& a.y < b.y + config.node_height
			&& b.y < a.y + config.node_height
	}

	#[test]
	fn empty_graph_has_no_positions() {
		assert!(layout_journey(&JourneyGraph::default(), &LayoutConfig::default()).is_empty());
	}

	#[test]
	fn chain_flows_top_to_bottom() {
		let g = graph(json!([[
			{ "type": "service", "label": "A" },
			{ "type": "flow", "flowName": "B" },
			{ "type": "transaction", "transactionKey": "C" },
		]]));
		let config = LayoutConfig::default();
		let positions = layout_journey(&g, &config);
		assert_eq!(positions.len(), 3);
		assert!(positions[0].y < positions[1].y);
		assert!(positions[1].y < positions[2].y);
		assert_eq!(positions[0].y, 0.0);
		assert_eq!(positions[1].y - positions[0].y, config.node_height + config.rank_sep);
	}

	#[test]
	fn isolated_and_disconnected_nodes_do_not_overlap() {
		let g = graph(json!([
			[{ "type": "flow", "flowName": "F1" }],
			[{ "type": "service", "label": "A" }, { "type": "server", "serverKey": "S" }],
			[{ "type": "flow", "flowName": "F2" }],
			[{ "type": "service", "label": "B" }, { "type": "server", "serverKey": "S" }],
		]));
		let config = LayoutConfig::default();
		let positions = layout_journey(&g, &config);
		assert_eq!(positions.len(), g.nodes.len());
		for i in 0..positions.len() {
			for j in (i + 1)..positions.len() {
				assert!(
					!overlaps(positions[i], positions[j], &config),
					"{} overlaps {}",
					g.nodes[i].id,
					g.nodes[j].id
				);
			}
		}
	}

	#[test]
	fn branching_routes_share_nodes_and_flow_down() {
		let g = graph(json!([
			[
				{ "type": "transaction", "transactionKey": "T1" },
				{ "type": "flow", "flowName": "F1" },
				{ "type": "service", "label": "CancelEmail" },
			],
			[
				{ "type": "transaction", "transactionKey": "T2" },
				{ "type": "flow", "flowName": "F1" },
				{ "type": "service", "label": "CancelEmail" },
			],
			[
				{ "type": "server", "serverKey": "S1" },
				{ "type": "flow", "flowName": "F2" },
				{ "type": "service", "label": "CancelEmail" },
			],
		]));
		let config = LayoutConfig::default();
		let positions = layout_journey(&g, &config);
		assert_eq!(positions.len(), g.nodes.len());
		for edge in &g.edges {
			assert!(
				positions[edge.source_index].y < positions[edge.target_index].y,
				"{} is not above {}",
				edge.source,
				edge.target
			);
		}
		for i in 0..positions.len() {
			for j in (i + 1)..positions.len() {
				assert!(!overlaps(positions[i], positions[j], &config));
			}
		}
	}

	fn arb_flow_routes() -> impl Strategy<Value = Vec<Value>> {
		let step = (0u8..8).prop_map(|n| json!({ "type": "flow", "flowName": format!("F{n}") }));
		prop::collection::vec(prop::collection::vec(step, 1..5).prop_map(Value::Array), 1..5)
	}

	proptest! {
		#![proptest_config(ProptestConfig::with_cases(64))]

		#[test]
		fn laid_out_boxes_never_overlap(routes in arb_flow_routes()) {
			let g = build_journey(&routes);
			let config = LayoutConfig::default();
			let positions = layout_journey(&g, &config);
			prop_assert_eq!(positions.len(), g.nodes.len());
			for i in 0..positions.len() {
				for j in (i + 1)..positions.len() {
					prop_assert!(!overlaps(positions[i], positions[j], &config));
				}
			}
		}
	}

	#[test]
	fn self_loops_are_ignored_by_the_layout() {
		let g = graph(json!([[
			{ "type": "transaction", "transactionKey": "T" },
			{ "type": "transaction", "transactionKey": "T" },
		]]));
		assert_eq!(g.edges.len(), 1);
		let positions = layout_journey(&g, &LayoutConfig::default());
		assert_eq!(positions, vec![Position { x: 0.0, y: 0.0 }]);
	}

	#[test]
	fn normalization_flips_upward_axes() {
		// Raw y grows upward here: the source sits at 0, its targets at -10.
		let raw = [(0, 0.0, 0.0), (1, 0.0, -10.0), (2, 10.0, -10.0)];
		let pairs = [(0, 1), (0, 2)];
		let config = LayoutConfig::default();
		let placed = normalize_component(&raw, &pairs, &config);
		let rank = |n: usize| placed.iter().find(|p| p.node == n).map(|p| p.rank);
		assert_eq!(rank(0), Some(0));
		assert_eq!(rank(1), Some(1));
		assert_eq!(rank(2), Some(1));

		let column = |n: usize| placed.iter().find(|p| p.node == n).map(|p| p.column_x);
		assert_eq!(column(2), Some(config.node_width + config.node_sep));
	}

	#[test]
	fn normalization_keeps_downward_axes() {
		let raw = [(0, 5.0, 0.0), (1, 5.0, 3.0)];
		let placed = normalize_component(&raw, &[(0, 1)], &LayoutConfig::default());
		assert_eq!(placed[0].rank, 0);
		assert_eq!(placed[1].rank, 1);
		assert_eq!(placed[0].column_x, 0.0);
		assert_eq!(placed[1].column_x, 0.0);
	}

	#[test]
	fn positions_are_centered_on_anchors() {
		let config = LayoutConfig::default();
		let components = vec![vec![Placement {
			node: 0,
			column_x: 0.0,
			rank: 1,
		}]];
		let positions = pack_components(&components, 1, &config);
		let anchor_y = (config.node_height + config.rank_sep) + config.node_height / 2.0;
		assert_eq!(positions[0].y, anchor_y - config.node_height / 2.0);
		assert_eq!(positions[0].x, 0.0);
	}
}
