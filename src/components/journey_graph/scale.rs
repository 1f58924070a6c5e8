//! Zoom-dependent scaling configuration for canvas visuals.
//!
//! Node boxes always live in world space, so they grow and shrink with the
//! zoom factor `k`. Strokes, arrowheads and label visibility need finer
//! control, which is collected here.
//!
//! # Scaling Behaviors
//!
//! - [`ScaleBehavior::World`]: scales with zoom like the boxes do.
//! - [`ScaleBehavior::Screen`]: constant pixel size, divides by `k` to cancel
//!   the canvas transform.
//! - [`ScaleBehavior::Clamped`]: world-space scaling kept within min/max
//!   screen-pixel bounds.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value for a base value at zoom `k`, ready for drawing
	/// after the canvas transform has been applied.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Defines how alpha/opacity scales with zoom level.
#[derive(Clone, Debug)]
pub enum AlphaBehavior {
	/// Constant alpha regardless of zoom.
	Constant,
	/// Fully visible at `full_alpha_k`, fades to zero at `zero_alpha_k`.
	Fade {
		zero_alpha_k: f64,
		full_alpha_k: f64,
	},
}

impl AlphaBehavior {
	/// Compute alpha multiplier for a given zoom level.
	pub fn apply(&self, k: f64) -> f64 {
		match self {
			AlphaBehavior::Constant => 1.0,
			AlphaBehavior::Fade {
				zero_alpha_k,
				full_alpha_k,
			} => {
				if zero_alpha_k == full_alpha_k {
					return 1.0;
				}
				((k - zero_alpha_k) / (full_alpha_k - zero_alpha_k)).clamp(0.0, 1.0)
			}
		}
	}
}

/// Edge stroke scaling.
#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// Base line width in world units.
	pub line_width: f64,
	pub width_behavior: ScaleBehavior,
	/// Dash pattern (dash, gap) in world units.
	pub dash_pattern: (f64, f64),
	/// Dash animation speed (world units per second).
	pub flow_speed: f64,
	/// When faded out, animated edges become solid lines.
	pub dash_alpha_behavior: AlphaBehavior,
}

/// Arrowhead scaling.
#[derive(Clone, Debug)]
pub struct ArrowScaleConfig {
	/// Base arrow length in world units.
	pub size: f64,
	pub size_behavior: ScaleBehavior,
	pub alpha_behavior: AlphaBehavior,
}

/// Label scaling.
#[derive(Clone, Debug)]
pub struct LabelScaleConfig {
	/// Font size in world units.
	pub font_size: f64,
	/// Horizontal padding inside the box in world units.
	pub padding: f64,
	/// Labels smaller than this many screen pixels are skipped.
	pub min_screen_size: f64,
}

/// Selection and hover ring scaling.
#[derive(Clone, Debug)]
pub struct RingScaleConfig {
	pub width: f64,
	pub width_behavior: ScaleBehavior,
	/// Gap between box border and ring.
	pub offset: f64,
}

/// Complete scale configuration.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub edge: EdgeScaleConfig,
	pub arrow: ArrowScaleConfig,
	pub label: LabelScaleConfig,
	pub ring: RingScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			edge: EdgeScaleConfig {
				line_width: 2.0,
				width_behavior: ScaleBehavior::Clamped {
					min_screen: 1.0,
					max_screen: 4.0,
				},
				dash_pattern: (5.0, 5.0),
				flow_speed: 20.0,
				dash_alpha_behavior: AlphaBehavior::Fade {
					zero_alpha_k: 0.3,
					full_alpha_k: 0.6,
				},
			},
			arrow: ArrowScaleConfig {
				size: 10.0,
				size_behavior: ScaleBehavior::World,
				alpha_behavior: AlphaBehavior::Constant,
			},
			label: LabelScaleConfig {
				font_size: 12.0,
				padding: 6.0,
				min_screen_size: 4.0,
			},
			ring: RingScaleConfig {
				width: 2.0,
				width_behavior: ScaleBehavior::Screen,
				offset: 4.0,
			},
		}
	}
}

/// Pre-computed scale values for a specific zoom level.
///
/// Create this once per frame and pass it to rendering functions.
/// All sizes are in world-space (ready to use after canvas transform).
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub edge_line_width: f64,
	pub dash_pattern: (f64, f64),
	/// Dash pattern visibility [0, 1]. At 0, edges are solid lines.
	pub dash_alpha: f64,
	pub arrow_size: f64,
	pub arrow_alpha: f64,
	/// Label font string (e.g., "600 12px sans-serif").
	pub label_font: String,
	pub label_padding: f64,
	pub show_labels: bool,
	pub ring_width: f64,
	pub ring_offset: f64,
}

impl ScaledValues {
	/// Compute scaled values from configuration and current zoom level.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		Self {
			edge_line_width: config.edge.width_behavior.apply(config.edge.line_width, k),
			dash_pattern: config.edge.dash_pattern,
			dash_alpha: config.edge.dash_alpha_behavior.apply(k),
			arrow_size: config.arrow.size_behavior.apply(config.arrow.size, k),
			arrow_alpha: config.arrow.alpha_behavior.apply(k),
			label_font: format!("600 {}px sans-serif", config.label.font_size),
			label_padding: config.label.padding,
			show_labels: config.label.font_size * k >= config.label.min_screen_size,
			ring_width: config.ring.width_behavior.apply(config.ring.width, k),
			ring_offset: config.ring.offset,
		}
	}

	/// Compute dash offset for the flow animation.
	pub fn dash_offset(&self, flow_time: f64, flow_speed: f64) -> f64 {
		-flow_time * flow_speed
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamped_widths_respect_screen_bounds() {
		let behavior = ScaleBehavior::Clamped {
			min_screen: 1.0,
			max_screen: 4.0,
		};
		// Zoomed far out the stroke grows in world units to stay 1px on screen.
		assert_eq!(behavior.apply(2.0, 0.25), 4.0);
		// Zoomed far in it shrinks to stay at most 4px.
		assert_eq!(behavior.apply(2.0, 4.0), 1.0);
		assert_eq!(behavior.apply(2.0, 1.0), 2.0);
	}

	#[test]
	fn screen_sizes_cancel_zoom() {
		assert_eq!(ScaleBehavior::Screen.apply(2.0, 2.0), 1.0);
		assert_eq!(ScaleBehavior::World.apply(2.0, 2.0), 2.0);
	}

	#[test]
	fn dashes_fade_out_when_zoomed_out() {
		let fade = AlphaBehavior::Fade {
			zero_alpha_k: 0.3,
			full_alpha_k: 0.6,
		};
		assert_eq!(fade.apply(0.2), 0.0);
		assert_eq!(fade.apply(1.0), 1.0);
		assert!((fade.apply(0.45) - 0.5).abs() < 1e-9);
		assert_eq!(AlphaBehavior::Constant.apply(0.01), 1.0);
	}

	#[test]
	fn labels_hide_below_readable_size() {
		let config = ScaleConfig::default();
		assert!(ScaledValues::new(&config, 1.0).show_labels);
		assert!(!ScaledValues::new(&config, 0.2).show_labels);
	}
}
