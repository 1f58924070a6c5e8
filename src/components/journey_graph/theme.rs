//! Visual theming for the journey canvas.
//!
//! One [`Theme`] is created at startup and handed to the canvas. Node and edge
//! colors are keyed by [`StyleKind`], so every node type has a border color
//! (also used for its edges and minimap dot) and a light background.

use crate::journey::StyleKind;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Opaque color from a `0xRRGGBB` literal.
	pub const fn hex(rgb: u32) -> Self {
		Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Border and background color of one node type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KindColors {
	/// Box border, edge stroke and minimap color.
	pub border: Color,
	/// Box fill.
	pub background: Color,
}

/// Colors for every [`StyleKind`].
#[derive(Clone, Debug)]
pub struct KindPalette {
	pub transaction: KindColors,
	pub flow: KindColors,
	pub service: KindColors,
	pub server: KindColors,
}

impl KindPalette {
	/// Orange transactions, blue flows, green services, yellow servers.
	pub fn standard() -> Self {
		Self {
			transaction: KindColors {
				border: Color::hex(0xFF9800),
				background: Color::hex(0xFFF3E0),
			},
			flow: KindColors {
				border: Color::hex(0x1976D2),
				background: Color::hex(0xE3F2FD),
			},
			service: KindColors {
				border: Color::hex(0x43A047),
				background: Color::hex(0xE8F5E9),
			},
			server: KindColors {
				border: Color::hex(0xFBC02D),
				background: Color::hex(0xFFFDE7),
			},
		}
	}

	pub fn get(&self, kind: StyleKind) -> KindColors {
		match kind {
			StyleKind::Transaction => self.transaction,
			StyleKind::Flow => self.flow,
			StyleKind::Service => self.service,
			StyleKind::Server => self.server,
		}
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Canvas fill
	pub color: Color,
	/// Color of the dotted grid
	pub dot_color: Color,
	/// Grid spacing in world units
	pub dot_gap: f64,
	/// Dot diameter in world units
	pub dot_size: f64,
}

/// Node box style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub text_color: Color,
	pub border_width: f64,
	pub corner_radius: f64,
	pub shadow_color: Color,
	pub shadow_blur: f64,
	/// Ring drawn around the selected node
	pub selected_color: Color,
	/// How far unrelated nodes fade while another is hovered (0.0 = not at all)
	pub dim_strength: f64,
}

/// Minimap overlay style. Sizes are screen pixels.
#[derive(Clone, Debug)]
pub struct MinimapStyle {
	pub width: f64,
	pub height: f64,
	/// Distance from the bottom-right corner of the canvas
	pub margin: f64,
	pub background: Color,
	pub border: Color,
	/// Fill of the area outside the current viewport
	pub mask: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub node: NodeStyle,
	pub minimap: MinimapStyle,
	pub kinds: KindPalette,
}

impl Theme {
	/// Light blue canvas with a dotted grid (default)
	pub fn light() -> Self {
		Self {
			name: "light",
			background: BackgroundStyle {
				color: Color::rgb(237, 246, 254),
				dot_color: Color::rgba(33, 150, 243, 0.18),
				dot_gap: 22.0,
				dot_size: 2.0,
			},
			node: NodeStyle {
				text_color: Color::hex(0x072246),
				border_width: 2.5,
				corner_radius: 12.0,
				shadow_color: Color::rgba(12, 50, 80, 0.11),
				shadow_blur: 8.0,
				selected_color: Color::hex(0x0B1F33),
				dim_strength: 0.6,
			},
			minimap: MinimapStyle {
				width: 200.0,
				height: 150.0,
				margin: 12.0,
				background: Color::rgb(255, 255, 255),
				border: Color::rgba(25, 118, 210, 0.25),
				mask: Color::rgba(240, 240, 240, 0.6),
			},
			kinds: KindPalette::standard(),
		}
	}

	/// Dark slate canvas for dimmed rooms
	pub fn midnight() -> Self {
		Self {
			name: "midnight",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				dot_color: Color::rgba(140, 160, 180, 0.18),
				dot_gap: 22.0,
				dot_size: 2.0,
			},
			node: NodeStyle {
				text_color: Color::hex(0x072246),
				border_width: 2.5,
				corner_radius: 12.0,
				shadow_color: Color::rgba(0, 0, 0, 0.4),
				shadow_blur: 10.0,
				selected_color: Color::rgb(255, 255, 255),
				dim_strength: 0.7,
			},
			minimap: MinimapStyle {
				width: 200.0,
				height: 150.0,
				margin: 12.0,
				background: Color::rgb(30, 35, 42),
				border: Color::rgba(140, 160, 180, 0.4),
				mask: Color::rgba(10, 12, 16, 0.6),
			},
			kinds: KindPalette::standard(),
		}
	}

	/// Look a theme up by name, falling back to [`Theme::light`].
	pub fn by_name(name: &str) -> Self {
		match name.trim() {
			"midnight" => Self::midnight(),
			_ => Self::light(),
		}
	}

	/// Colors of one node type.
	pub fn kind_colors(&self, kind: StyleKind) -> KindColors {
		self.kinds.get(kind)
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hex_literals_match_css() {
		assert_eq!(Color::hex(0xFF9800).to_css(), "#ff9800");
		assert_eq!(Color::hex(0x1976D2).with_alpha(0.5).to_css(), "rgba(25, 118, 210, 0.5)");
	}

	#[test]
	fn every_kind_has_distinct_borders() {
		let theme = Theme::default();
		let kinds = [StyleKind::Transaction, StyleKind::Flow, StyleKind::Service, StyleKind::Server];
		for (i, a) in kinds.iter().enumerate() {
			for b in &kinds[i + 1..] {
				assert_ne!(theme.kind_colors(*a).border, theme.kind_colors(*b).border);
			}
		}
	}

	#[test]
	fn unknown_theme_names_fall_back_to_light() {
		assert_eq!(Theme::by_name("midnight").name, "midnight");
		assert_eq!(Theme::by_name("neon").name, "light");
	}

	#[test]
	fn lighten_moves_towards_white() {
		let c = Color::rgb(0, 100, 200).lighten(0.5);
		assert_eq!((c.r, c.g, c.b), (127, 177, 227));
	}
}
