//! Canvas state and interaction tracking.
//!
//! Holds the laid-out node boxes, the pan/zoom transform, in-progress pointer
//! gestures and hover highlight intensities. Nothing here touches the DOM, so
//! the component only forwards pointer coordinates and reads back what to draw.

use std::collections::{HashMap, HashSet};

use crate::journey::{JourneyGraph, LayoutConfig, Position, StyleKind};

/// Pointer travel (screen pixels) below which a press counts as a click.
const CLICK_SLOP: f64 = 4.0;

/// Padding around the graph when fitting it into view, in screen pixels.
const FIT_PADDING: f64 = 40.0;

/// Axis-aligned rectangle in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

impl Rect {
	pub fn contains(&self, px: f64, py: f64) -> bool {
		px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
	}

	/// Smallest rectangle covering both.
	pub fn union(&self, other: &Rect) -> Rect {
		let x = self.x.min(other.x);
		let y = self.y.min(other.y);
		Rect {
			x,
			y,
			width: (self.x + self.width).max(other.x + other.width) - x,
			height: (self.y + self.height).max(other.y + other.height) - y,
		}
	}
}

/// A laid-out node as the canvas draws it.
#[derive(Clone, Debug)]
pub struct NodeBox {
	pub id: String,
	pub label: String,
	pub style: StyleKind,
	pub rect: Rect,
}

impl NodeBox {
	/// Where outgoing edges leave the box.
	pub fn bottom_center(&self) -> (f64, f64) {
		(self.rect.x + self.rect.width / 2.0, self.rect.y + self.rect.height)
	}

	/// Where incoming edges enter the box.
	pub fn top_center(&self) -> (f64, f64) {
		(self.rect.x + self.rect.width / 2.0, self.rect.y)
	}
}

/// A drawn edge, referring to node boxes by index.
#[derive(Clone, Copy, Debug)]
pub struct EdgeLine {
	pub source: usize,
	pub target: usize,
	pub style: StyleKind,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%), kept within the configured bounds.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Smooth hover highlighting.
///
/// Each node has an intensity in [0, 1] that eases towards 1 while the node is
/// hovered or adjacent to the hovered node, and back to 0 otherwise.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	pub hovered: Option<usize>,
	target_set: HashSet<usize>,
	intensity: HashMap<usize, f64>,
	cached_max: f64,
}

impl HighlightState {
	/// Update the hovered node and recompute the target highlight set.
	pub fn set_hover(&mut self, node: Option<usize>, edges: &[EdgeLine]) {
		if self.hovered == node {
			return;
		}
		self.hovered = node;
		self.target_set.clear();

		if let Some(idx) = node {
			self.target_set.insert(idx);
			for edge in edges {
				if edge.source == idx {
					self.target_set.insert(edge.target);
				} else if edge.target == idx {
					self.target_set.insert(edge.source);
				}
			}
		}
	}

	/// Ease intensities towards their targets: value += (target - value) * (1 - e^(-speed * dt)).
	pub fn tick(&mut self, dt: f64) {
		const FADE_IN_SPEED: f64 = 6.0;
		const FADE_OUT_SPEED: f64 = 4.0;

		let fade_in = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out = (-FADE_OUT_SPEED * dt).exp();

		for &idx in &self.target_set {
			let value = self.intensity.entry(idx).or_insert(0.0);
			*value += (1.0 - *value) * fade_in;
		}

		let mut new_max: f64 = 0.0;
		let targets = &self.target_set;
		self.intensity.retain(|idx, value| {
			if !targets.contains(idx) {
				*value *= fade_out;
			}
			new_max = new_max.max(*value);
			*value > 0.005
		});
		self.cached_max = new_max;
	}

	pub fn node_intensity(&self, idx: usize) -> f64 {
		self.intensity.get(&idx).copied().unwrap_or(0.0)
	}

	/// Geometric mean of both endpoints, so edges follow their nodes smoothly.
	pub fn edge_intensity(&self, source: usize, target: usize) -> f64 {
		(self.node_intensity(source) * self.node_intensity(target)).sqrt()
	}

	/// Maximum intensity of any node, used to dim everything else.
	pub fn max_intensity(&self) -> f64 {
		self.cached_max
	}
}

/// Where a pointer press started and whether it has moved since.
#[derive(Clone, Copy, Debug)]
struct Press {
	x: f64,
	y: f64,
	node: Option<usize>,
	moved: bool,
}

/// Maps world coordinates into the minimap rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimapProjection {
	/// Minimap rectangle on screen.
	pub frame: Rect,
	/// World area the minimap shows.
	pub world: Rect,
	pub scale: f64,
	offset_x: f64,
	offset_y: f64,
}

impl MinimapProjection {
	/// World point to minimap screen point.
	pub fn project(&self, wx: f64, wy: f64) -> (f64, f64) {
		(
			self.frame.x + self.offset_x + (wx - self.world.x) * self.scale,
			self.frame.y + self.offset_y + (wy - self.world.y) * self.scale,
		)
	}

	/// World rectangle to minimap screen rectangle.
	pub fn project_rect(&self, rect: &Rect) -> Rect {
		let (x, y) = self.project(rect.x, rect.y);
		Rect {
			x,
			y,
			width: rect.width * self.scale,
			height: rect.height * self.scale,
		}
	}
}

/// Everything the canvas needs to draw and interact with one journey graph.
pub struct JourneyCanvasState {
	pub nodes: Vec<NodeBox>,
	pub edges: Vec<EdgeLine>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub highlight: HighlightState,
	pub selected: Option<usize>,
	pub width: f64,
	pub height: f64,
	pub min_zoom: f64,
	pub max_zoom: f64,
	/// Seconds since creation, drives the edge dash animation.
	pub flow_time: f64,
	press: Option<Press>,
}

impl JourneyCanvasState {
	/// Build from a graph and its layout, fitted to a `width` x `height` view.
	pub fn new(
		graph: &JourneyGraph,
		positions: &[Position],
		layout: &LayoutConfig,
		width: f64,
		height: f64,
		zoom_bounds: (f64, f64),
	) -> Self {
		let nodes = graph
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let position = positions.get(i).copied().unwrap_or_default();
				NodeBox {
					id: node.id.clone(),
					label: node.label.clone(),
					style: node.style(),
					rect: Rect {
						x: position.x,
						y: position.y,
						width: layout.node_width,
						height: layout.node_height,
					},
				}
			})
			.collect();

		let edges = graph
			.edges
			.iter()
			.map(|edge| EdgeLine {
				source: edge.source_index,
				target: edge.target_index,
				style: edge.style,
			})
			.collect();

		let mut state = Self {
			nodes,
			edges,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			highlight: HighlightState::default(),
			selected: None,
			width,
			height,
			min_zoom: zoom_bounds.0,
			max_zoom: zoom_bounds.1,
			flow_time: 0.0,
			press: None,
		};
		state.fit_view();
		state
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node under a screen point. Later nodes are drawn on top.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.nodes.iter().rposition(|node| node.rect.contains(gx, gy))
	}

	/// World rectangle covering every node.
	pub fn bounds(&self) -> Option<Rect> {
		let mut rects = self.nodes.iter().map(|node| node.rect);
		let first = rects.next()?;
		Some(rects.fold(first, |acc, rect| acc.union(&rect)))
	}

	/// World rectangle currently visible on the canvas.
	pub fn viewport(&self) -> Rect {
		let (x, y) = self.screen_to_graph(0.0, 0.0);
		Rect {
			x,
			y,
			width: self.width / self.transform.k,
			height: self.height / self.transform.k,
		}
	}

	/// Center the graph and zoom so it fits, within the zoom bounds.
	pub fn fit_view(&mut self) {
		let Some(bounds) = self.bounds() else {
			self.transform = ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0_f64.clamp(self.min_zoom, self.max_zoom),
			};
			return;
		};
		let avail_w = (self.width - 2.0 * FIT_PADDING).max(1.0);
		let avail_h = (self.height - 2.0 * FIT_PADDING).max(1.0);
		let k = (avail_w / bounds.width)
			.min(avail_h / bounds.height)
			.clamp(self.min_zoom, self.max_zoom);
		let (cx, cy) = (bounds.x + bounds.width / 2.0, bounds.y + bounds.height / 2.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}

	/// Zoom by `factor` keeping the world point under (sx, sy) fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(self.min_zoom, self.max_zoom);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Zoom around the canvas center.
	pub fn zoom_by(&mut self, factor: f64) {
		self.zoom_at(self.width / 2.0, self.height / 2.0, factor);
	}

	/// Pointer pressed: grab the node under it, or start panning.
	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		let node = self.node_at_position(sx, sy);
		self.press = Some(Press {
			x: sx,
			y: sy,
			node,
			moved: false,
		});

		if let Some(idx) = node {
			self.drag = DragState {
				active: true,
				node: Some(idx),
				start_x: sx,
				start_y: sy,
				node_start_x: self.nodes[idx].rect.x,
				node_start_y: self.nodes[idx].rect.y,
			};
		} else {
			self.pan = PanState {
				active: true,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	/// Pointer moved: update hover, then drag or pan once past the click slop.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if !self.drag.active {
			let hovered = self.node_at_position(sx, sy);
			self.set_hover(hovered);
		}

		if let Some(press) = self.press.as_mut() {
			if !press.moved && (sx - press.x).hypot(sy - press.y) > CLICK_SLOP {
				press.moved = true;
			}
			if !press.moved {
				return;
			}
		}

		if self.drag.active {
			if let Some(idx) = self.drag.node {
				let k = self.transform.k;
				self.nodes[idx].rect.x = self.drag.node_start_x + (sx - self.drag.start_x) / k;
				self.nodes[idx].rect.y = self.drag.node_start_y + (sy - self.drag.start_y) / k;
			}
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		}
	}

	/// Pointer released. Returns the node that was clicked, if the press was a
	/// click on a node rather than a drag or pan.
	pub fn pointer_up(&mut self) -> Option<usize> {
		let clicked = self
			.press
			.take()
			.filter(|press| !press.moved)
			.and_then(|press| press.node);
		self.drag = DragState::default();
		self.pan = PanState::default();
		if clicked.is_some() {
			self.selected = clicked;
		}
		clicked
	}

	/// Pointer left the canvas: abandon any gesture and clear hover.
	pub fn pointer_leave(&mut self) {
		self.press = None;
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.set_hover(None);
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		self.highlight.set_hover(node, &self.edges);
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
		self.highlight.tick(dt);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Follow the container width. Returns true when the canvas must be resized.
	pub fn sync_width(&mut self, width: f64) -> bool {
		if (width - self.width).abs() < 0.5 {
			return false;
		}
		self.resize(width, self.height);
		true
	}

	/// Fit the whole graph into a `frame_width` x `frame_height` minimap placed
	/// `margin` pixels from the bottom-right corner of the canvas.
	pub fn minimap(&self, frame_width: f64, frame_height: f64, margin: f64) -> Option<MinimapProjection> {
		let world = self.bounds()?.union(&self.viewport());
		let scale = (frame_width / world.width).min(frame_height / world.height);
		if !scale.is_finite() || scale <= 0.0 {
			return None;
		}
		Some(MinimapProjection {
			frame: Rect {
				x: self.width - frame_width - margin,
				y: self.height - frame_height - margin,
				width: frame_width,
				height: frame_height,
			},
			world,
			scale,
			offset_x: (frame_width - world.width * scale) / 2.0,
			offset_y: (frame_height - world.height * scale) / 2.0,
		})
	}
}
