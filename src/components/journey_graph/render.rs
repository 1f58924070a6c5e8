//! Canvas rendering for the journey graph.
//!
//! Drawing happens in passes so later layers sit on top:
//! 1. Background fill (screen space) and dotted grid (world space)
//! 2. Edges with animated dashes and arrowheads (world space)
//! 3. Node boxes and labels (world space)
//! 4. Minimap overlay (screen space)

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{JourneyCanvasState, NodeBox, Rect};
use super::theme::Theme;

/// Grid dots closer than this many screen pixels are not drawn.
const MIN_DOT_SPACING: f64 = 6.0;

const ELLIPSIS: &str = "…";

/// Attempt to smooth values that would otherwise cause abrupt visual changes.
fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Renders the complete graph to the canvas.
pub fn render(state: &JourneyCanvasState, ctx: &CanvasRenderingContext2d, config: &ScaleConfig, theme: &Theme) {
	let scale = ScaledValues::new(config, state.transform.k);

	ctx.set_fill_style_str(&theme.background.color.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_grid(state, ctx, theme);
	draw_edges(state, ctx, config, &scale, theme);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();

	draw_minimap(state, ctx, theme);
}

fn draw_grid(state: &JourneyCanvasState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let gap = theme.background.dot_gap;
	if gap <= 0.0 || gap * state.transform.k < MIN_DOT_SPACING {
		return;
	}
	let view = state.viewport();
	let radius = theme.background.dot_size / 2.0;

	ctx.set_fill_style_str(&theme.background.dot_color.to_css());
	ctx.begin_path();
	let mut x = (view.x / gap).floor() * gap;
	while x <= view.x + view.width {
		let mut y = (view.y / gap).floor() * gap;
		while y <= view.y + view.height {
			ctx.move_to(x + radius, y);
			let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
			y += gap;
		}
		x += gap;
	}
	ctx.fill();
}

/// Control points of the cubic curve from a source's bottom edge to a target's
/// top edge. Both handles sit at the vertical midpoint so the curve leaves and
/// enters vertically.
pub fn edge_curve(from: (f64, f64), to: (f64, f64)) -> [(f64, f64); 4] {
	let mid_y = (from.1 + to.1) / 2.0;
	[from, (from.0, mid_y), (to.0, mid_y), to]
}

/// Unit direction of the curve where it meets the target.
fn arrival_direction(curve: &[(f64, f64); 4]) -> (f64, f64) {
	let (dx, dy) = (curve[3].0 - curve[2].0, curve[3].1 - curve[2].1);
	let len = dx.hypot(dy);
	if len < 0.001 { (0.0, 1.0) } else { (dx / len, dy / len) }
}

fn draw_edges(
	state: &JourneyCanvasState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let dash_offset = scale.dash_offset(state.flow_time, config.edge.flow_speed);
	let max_t = smooth_step(state.highlight.max_intensity());

	for edge in &state.edges {
		let (Some(source), Some(target)) = (state.nodes.get(edge.source), state.nodes.get(edge.target)) else {
			continue;
		};
		let edge_t = smooth_step(state.highlight.edge_intensity(edge.source, edge.target));

		let (alpha, width) = if edge_t > 0.01 {
			(0.8 + 0.2 * edge_t, scale.edge_line_width * (1.0 + 0.4 * edge_t))
		} else if max_t > 0.01 {
			(0.8 - 0.5 * max_t, scale.edge_line_width)
		} else {
			(0.8, scale.edge_line_width)
		};

		let color = theme.kind_colors(edge.style).border;
		ctx.set_stroke_style_str(&color.with_alpha(alpha * color.a).to_css());
		// Solid lines look thinner than dashed ones at the same width.
		ctx.set_line_width(width * (1.0 + 0.3 * (1.0 - scale.dash_alpha)));

		let effective_gap = scale.dash_pattern.1 * scale.dash_alpha;
		if effective_gap > 0.1 {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(scale.dash_pattern.0),
				&JsValue::from_f64(effective_gap),
			));
			ctx.set_line_dash_offset(dash_offset);
		} else {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		let mut curve = edge_curve(source.bottom_center(), target.top_center());
		let (ux, uy) = arrival_direction(&curve);
		let tip = curve[3];
		// Stop the line at the arrowhead base so it does not poke through.
		curve[3] = (tip.0 - ux * scale.arrow_size, tip.1 - uy * scale.arrow_size);

		ctx.begin_path();
		ctx.move_to(curve[0].0, curve[0].1);
		ctx.bezier_curve_to(curve[1].0, curve[1].1, curve[2].0, curve[2].1, curve[3].0, curve[3].1);
		ctx.stroke();

		if scale.arrow_alpha > 0.0 {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
			ctx.set_fill_style_str(&color.with_alpha(alpha * scale.arrow_alpha).to_css());
			let (back_x, back_y) = (tip.0 - ux * scale.arrow_size, tip.1 - uy * scale.arrow_size);
			let (px, py) = (-uy * scale.arrow_size * 0.5, ux * scale.arrow_size * 0.5);

			ctx.begin_path();
			ctx.move_to(tip.0, tip.1);
			ctx.line_to(back_x + px, back_y + py);
			ctx.line_to(back_x - px, back_y - py);
			ctx.close_path();
			ctx.fill();
		}
	}

	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn rounded_rect_path(ctx: &CanvasRenderingContext2d, rect: &Rect, radius: f64) {
	let r = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
	let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn draw_nodes(state: &JourneyCanvasState, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	let max_t = smooth_step(state.highlight.max_intensity());

	for (idx, node) in state.nodes.iter().enumerate() {
		let node_t = smooth_step(state.highlight.node_intensity(idx));
		let dim = theme.node.dim_strength * max_t * (1.0 - node_t);
		draw_node(ctx, node, scale, theme, 1.0 - dim, node_t, state.selected == Some(idx));
	}
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &NodeBox,
	scale: &ScaledValues,
	theme: &Theme,
	alpha: f64,
	hover_t: f64,
	selected: bool,
) {
	let colors = theme.kind_colors(node.style);
	let style = &theme.node;

	ctx.set_global_alpha(alpha);

	ctx.save();
	ctx.set_shadow_color(&style.shadow_color.to_css());
	ctx.set_shadow_blur(style.shadow_blur * (1.0 + hover_t));
	ctx.set_shadow_offset_y(2.0);
	rounded_rect_path(ctx, &node.rect, style.corner_radius);
	ctx.set_fill_style_str(&colors.background.lighten(0.5 * hover_t).to_css());
	ctx.fill();
	ctx.restore();

	rounded_rect_path(ctx, &node.rect, style.corner_radius);
	ctx.set_stroke_style_str(&colors.border.to_css());
	ctx.set_line_width(style.border_width * (1.0 + 0.4 * hover_t));
	ctx.stroke();

	if selected {
		let offset = scale.ring_offset;
		let ring = Rect {
			x: node.rect.x - offset,
			y: node.rect.y - offset,
			width: node.rect.width + 2.0 * offset,
			height: node.rect.height + 2.0 * offset,
		};
		rounded_rect_path(ctx, &ring, style.corner_radius + offset);
		ctx.set_stroke_style_str(&style.selected_color.to_css());
		ctx.set_line_width(scale.ring_width);
		ctx.stroke();
	}

	if scale.show_labels {
		ctx.set_font(&scale.label_font);
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		ctx.set_fill_style_str(&style.text_color.to_css());
		let max_width = node.rect.width - 2.0 * scale.label_padding;
		let text = truncate_label(&node.label, max_width, |s| {
			ctx.measure_text(s).map(|m| m.width()).unwrap_or(0.0)
		});
		let _ = ctx.fill_text(
			&text,
			node.rect.x + node.rect.width / 2.0,
			node.rect.y + node.rect.height / 2.0,
		);
	}

	ctx.set_global_alpha(1.0);
}

/// Shorten `label` with a trailing ellipsis until `measure` says it fits.
pub fn truncate_label(label: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> String {
	if measure(label) <= max_width {
		return label.to_string();
	}
	let chars: Vec<char> = label.chars().collect();
	let mut keep = chars.len();
	while keep > 0 {
		keep -= 1;
		let candidate: String = chars[..keep].iter().collect::<String>().trim_end().to_string() + ELLIPSIS;
		if measure(&candidate) <= max_width {
			return candidate;
		}
	}
	ELLIPSIS.to_string()
}

/// Strips of `frame` not covered by `inner`: top, bottom, left, right.
pub fn mask_strips(frame: &Rect, inner: &Rect) -> Vec<Rect> {
	let left = inner.x.clamp(frame.x, frame.x + frame.width);
	let right = (inner.x + inner.width).clamp(left, frame.x + frame.width);
	let top = inner.y.clamp(frame.y, frame.y + frame.height);
	let bottom = (inner.y + inner.height).clamp(top, frame.y + frame.height);

	[
		Rect {
			x: frame.x,
			y: frame.y,
			width: frame.width,
			height: top - frame.y,
		},
		Rect {
			x: frame.x,
			y: bottom,
			width: frame.width,
			height: frame.y + frame.height - bottom,
		},
		Rect {
			x: frame.x,
			y: top,
			width: left - frame.x,
			height: bottom - top,
		},
		Rect {
			x: right,
			y: top,
			width: frame.x + frame.width - right,
			height: bottom - top,
		},
	]
	.into_iter()
	.filter(|strip| strip.width > 0.0 && strip.height > 0.0)
	.collect()
}

fn draw_minimap(state: &JourneyCanvasState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let style = &theme.minimap;
	let Some(map) = state.minimap(style.width, style.height, style.margin) else {
		return;
	};
	let frame = map.frame;

	ctx.set_fill_style_str(&style.background.to_css());
	ctx.fill_rect(frame.x, frame.y, frame.width, frame.height);

	for node in &state.nodes {
		let r = map.project_rect(&node.rect);
		ctx.set_fill_style_str(&theme.kind_colors(node.style).border.to_css());
		ctx.fill_rect(r.x, r.y, r.width.max(1.0), r.height.max(1.0));
	}

	let viewport = map.project_rect(&state.viewport());
	ctx.set_fill_style_str(&style.mask.to_css());
	for strip in mask_strips(&frame, &viewport) {
		ctx.fill_rect(strip.x, strip.y, strip.width, strip.height);
	}

	ctx.set_stroke_style_str(&style.border.to_css());
	ctx.set_line_width(1.0);
	ctx.stroke_rect(viewport.x, viewport.y, viewport.width, viewport.height);
	ctx.stroke_rect(frame.x, frame.y, frame.width, frame.height);
}
