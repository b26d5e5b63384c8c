//! Orbital network graph: attendees on three concentric rings around the
//! current user, edges weighted by relationship strength.

mod component;
pub mod config;
pub mod layout;
mod render;
mod state;
mod types;

pub use component::OrbitGraphCanvas;
pub use config::{AnimationConfig, ConfigError, DeviceProfile, EdgeConfig, GraphConfig};
pub use layout::{compute_layout, split_counts};
pub use state::{HoverState, OrbitGraphState, connect_headline};
pub use types::{
	AttendeeNode, NetworkData, OpportunityMatch, OrbitLayout, OrbitNode, RelationshipEdge, Ring,
	ViewportClass,
};
