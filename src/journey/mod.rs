//! Journey graph core: record normalization, node identity, graph building,
//! layered layout and detail projection.
//!
//! Everything in here is pure and browser-independent; the canvas component
//! only consumes [`JourneyGraph`] and the positions from [`layout_journey`].

pub mod builder;
pub mod detail;
pub mod identity;
pub mod layout;
pub mod record;

pub use builder::{JourneyEdge, JourneyGraph, JourneyNode, build_journey, node_label, routes_from_response};
pub use detail::{DetailField, display_value, project_details};
pub use identity::{node_id, step_id};
pub use layout::{LayoutConfig, Position, layout_journey};
pub use record::{NodeKind, StepRecord, StyleKind};
