//! Runtime configuration read from the host page.
//!
//! The page may embed `<script type="application/json" id="rca-config">` with
//! any subset of the fields below; everything missing takes its default.

use serde::Deserialize;

/// Application settings.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
	/// Base URL of the RCA backend, without the `/rca/backtrace` suffix.
	pub api_base_url: String,
	/// Budget for one backtrace request.
	pub request_timeout_ms: u32,
	/// Lower zoom bound of the journey canvas.
	pub min_zoom: f64,
	/// Upper zoom bound of the journey canvas.
	pub max_zoom: f64,
	/// Height of the journey canvas in pixels.
	pub canvas_height: f64,
	/// Canvas theme name, `light` or `midnight`.
	pub theme: String,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			api_base_url: "http://localhost:8080/api".to_string(),
			request_timeout_ms: 60_000,
			min_zoom: 0.45,
			max_zoom: 2.0,
			canvas_height: 520.0,
			theme: "light".to_string(),
		}
	}
}

impl AppConfig {
	/// Parse the JSON embedded in the page.
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	/// Zoom bounds as `(min, max)`, repaired if the page supplied nonsense.
	pub fn zoom_bounds(&self) -> (f64, f64) {
		let defaults = Self::default();
		let min = if self.min_zoom.is_finite() && self.min_zoom > 0.0 {
			self.min_zoom
		} else {
			defaults.min_zoom
		};
		let max = if self.max_zoom.is_finite() && self.max_zoom >= min {
			self.max_zoom
		} else {
			min.max(defaults.max_zoom)
		};
		(min, max)
	}
}
