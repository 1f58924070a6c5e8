//! Journey graph canvas component.
//!
//! Renders a laid-out journey graph on an HTML canvas with:
//! - Layered top-to-bottom positions from [`crate::journey::layout_journey`]
//! - Pan, bounded zoom, zoom buttons and node dragging
//! - Smooth hover highlighting of a node and its neighbours
//! - Click-to-select, reported through a callback
//! - A minimap showing the visible area
//!
//! # Example
//!
//! ```ignore
//! use rca_journey::{JourneyCanvas, JourneyGraph};
//!
//! let graph = Signal::derive(move || JourneyGraph::from_response(&payload));
//! view! { <JourneyCanvas graph=graph on_select=move |node| log::info!("{}", node.id) /> }
//! ```

mod component;
mod render;
pub mod scale;
mod state;
pub mod theme;

pub use component::JourneyCanvas;
pub use theme::Theme;
