//! UI components.

pub mod detail_panel;
pub mod journey_graph;
pub mod wizard;
