//! rca-journey: interactive root-cause-analysis journey graphs.
//!
//! This crate provides a WASM application that asks a backend for the parent
//! routes of a service or flow, merges them into one deduplicated directed
//! graph, lays it out top to bottom and renders it on a canvas with pan/zoom,
//! hover highlighting and a per-node detail drawer.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod api;
pub mod components;
pub mod config;
pub mod error;
pub mod journey;
pub mod search;

pub use components::journey_graph::{JourneyCanvas, Theme};
pub use components::wizard::RcaWizard;
pub use config::AppConfig;
pub use error::SearchError;
pub use journey::{JourneyEdge, JourneyGraph, JourneyNode, build_journey, layout_journey};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("rca-journey: logging initialized");
}

/// Load settings from a script element with id="rca-config".
/// A missing element means defaults; malformed JSON is logged and ignored.
fn load_app_config() -> AppConfig {
	let Some(json_text) = config_script_text() else {
		return AppConfig::default();
	};

	match AppConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"rca-journey: config loaded, backend {} (timeout {} ms)",
				config.api_base_url, config.request_timeout_ms
			);
			config
		}
		Err(e) => {
			warn!("rca-journey: failed to parse config: {}", e);
			AppConfig::default()
		}
	}
}

fn config_script_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("rca-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Main application component.
/// Reads the page configuration and renders the RCA wizard.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_app_config();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="RCA Wizard" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<RcaWizard config=config />
	}
}
