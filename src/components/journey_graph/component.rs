//! Leptos component wrapping the journey graph canvas.
//!
//! The component creates an HTML canvas, lays out whatever graph the `graph`
//! signal holds and wires mouse/wheel handlers for panning, zooming, node
//! dragging and selection. An animation loop runs via `requestAnimationFrame`
//! for the flowing edge dashes and hover fades.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::scale::ScaleConfig;
use super::state::JourneyCanvasState;
use super::theme::Theme;
use crate::journey::{JourneyGraph, JourneyNode, LayoutConfig, layout_journey};

/// Zoom step of the overlay buttons.
const BUTTON_ZOOM: f64 = 1.2;

/// Canvas state plus the visual configuration it is drawn with.
struct CanvasContext {
	state: JourneyCanvasState,
	scale: ScaleConfig,
	theme: Theme,
}

fn pointer_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?;
	let rect = canvas.get_bounding_client_rect();
	Some((ev.client_x() as f64 - rect.left(), ev.client_y() as f64 - rect.top()))
}

/// Canvas width follows the parent container.
fn container_width(canvas: &HtmlCanvasElement) -> f64 {
	canvas
		.parent_element()
		.map(|p| p.client_width() as f64)
		.filter(|w| *w > 0.0)
		.unwrap_or(800.0)
}

/// Decide whether the frame loop goes on. Once the canvas is detached the
/// slot holding the frame callback is emptied, which drops the callback and
/// everything it captured, so an unmounted canvas leaves nothing behind.
///
/// The callback may be the one currently running; wasm-bindgen defers freeing
/// it until it returns.
fn keep_running<T>(connected: bool, slot: &RefCell<Option<T>>) -> bool {
	if !connected {
		drop(slot.borrow_mut().take());
	}
	connected
}

/// Renders a journey graph with a layered layout on a canvas element.
///
/// Every time `graph` changes the layout is recomputed and the view is fitted
/// to the new graph. Clicking a node (press and release without moving) calls
/// `on_select` with it.
#[component]
pub fn JourneyCanvas(
	#[prop(into)] graph: Signal<JourneyGraph>,
	#[prop(into)] on_select: Callback<JourneyNode>,
	#[prop(default = (0.45, 2.0))] zoom_bounds: (f64, f64),
	#[prop(default = 520.0)] height: f64,
	#[prop(optional)] theme: Theme,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<CanvasContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init) = (context.clone(), animate);

	Effect::new(move |_| {
		let current = graph.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas;
		let Some(window) = web_sys::window() else {
			warn!("rca-journey: no window, canvas disabled");
			return;
		};

		let w = container_width(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(height as u32);

		let layout = LayoutConfig::default();
		let positions = layout_journey(&current, &layout);
		debug!(
			"rca-journey: laid out {} nodes, {} edges",
			current.nodes.len(),
			current.edges.len()
		);
		*context_init.borrow_mut() = Some(CanvasContext {
			state: JourneyCanvasState::new(&current, &positions, &layout, w, height, zoom_bounds),
			scale: ScaleConfig::default(),
			theme: theme.clone(),
		});

		if animate_init.borrow().is_some() {
			return;
		}

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(obj)) => match obj.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					warn!("rca-journey: 2d context has unexpected type");
					return;
				}
			},
			_ => {
				warn!("rca-journey: canvas 2d context unavailable");
				return;
			}
		};

		let (context_anim, animate_inner, canvas_anim) = (context_init.clone(), animate_init.clone(), canvas.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !keep_running(canvas_anim.is_connected(), &*animate_inner) {
				debug!("rca-journey: canvas detached, animation stopped");
				return;
			}
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				let nw = container_width(&canvas_anim);
				if c.state.sync_width(nw) {
					canvas_anim.set_width(nw as u32);
				}
				c.state.tick(0.016);
				render::render(&c.state, &ctx, &c.scale, &c.theme);
			}
			let Some(win) = web_sys::window() else {
				return;
			};
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.state.pointer_down(x, y);
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			c.state.pointer_move(x, y);
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		// Release the borrow before handing control to the parent.
		let clicked = context_mu.borrow_mut().as_mut().and_then(|c| c.state.pointer_up());
		let Some(idx) = clicked else {
			return;
		};
		if let Some(node) = graph.with_untracked(|g| g.nodes.get(idx).cloned()) {
			info!("rca-journey: selected node {}", node.id);
			on_select.run(node);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.pointer_leave();
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			c.state.zoom_at(x, y, factor);
		}
	};

	let context_zi = context.clone();
	let on_zoom_in = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_zi.borrow_mut() {
			c.state.zoom_by(BUTTON_ZOOM);
		}
	};

	let context_zo = context.clone();
	let on_zoom_out = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_zo.borrow_mut() {
			c.state.zoom_by(1.0 / BUTTON_ZOOM);
		}
	};

	let context_fit = context;
	let on_fit = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_fit.borrow_mut() {
			c.state.fit_view();
		}
	};

	view! {
		<div class="journey-canvas" style=format!("position: relative; width: 100%; height: {height}px;")>
			<canvas
				node_ref=canvas_ref
				class="journey-canvas-surface"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab; border-radius: 12px;"
			/>
			<div
				class="journey-canvas-controls"
				style="position: absolute; top: 12px; left: 12px; display: flex; flex-direction: column; gap: 4px;"
			>
				<button type="button" title="Zoom in" on:click=on_zoom_in>"+"</button>
				<button type="button" title="Zoom out" on:click=on_zoom_out>"−"</button>
				<button type="button" title="Fit view" on:click=on_fit>"⤢"</button>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn detached_canvas_releases_its_frame_callback() {
		let slot = RefCell::new(Some(String::from("frame")));
		assert!(keep_running(true, &slot));
		assert!(slot.borrow().is_some());

		assert!(!keep_running(false, &slot));
		assert!(slot.borrow().is_none());
	}

	#[test]
	fn released_slot_captures_are_dropped() {
		let captured = Rc::new(());
		let slot = RefCell::new(Some(Rc::clone(&captured)));
		assert_eq!(Rc::strong_count(&captured), 2);
		keep_running(false, &slot);
		assert_eq!(Rc::strong_count(&captured), 1);
	}
}
