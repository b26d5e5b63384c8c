//! Leptos components.

pub mod orbit_graph;
