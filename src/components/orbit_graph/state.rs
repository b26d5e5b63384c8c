use log::debug;

use super::config::GraphConfig;
use super::layout::compute_layout;
use super::types::{AttendeeNode, NetworkData, OpportunityMatch, OrbitLayout, OrbitNode, ViewportClass};

/// Rotation direction per ring; the middle ring counter-rotates.
const RING_DIRECTIONS: [f64; 3] = [1.0, -1.0, 1.0];
/// Seconds a pulse takes along the edge at zero strength.
const PULSE_BASE_PERIOD: f64 = 4.0;
const GRAPH_LABEL: &str = "Interactive Networking Graph";

/// Pointer hover and its label fade.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	/// Hovered node key.
	pub key: Option<String>,
	/// 0..1 fade for the hover label.
	pub highlight_t: f64,
}

/// Everything the render loop reads, owned by the canvas component.
pub struct OrbitGraphState {
	/// Validated tuning.
	pub config: GraphConfig,
	/// Inputs of the current layout.
	pub data: NetworkData,
	/// Positions before rotation.
	pub layout: OrbitLayout,
	/// Canvas size in pixels.
	pub width: f64,
	/// See `width`.
	pub height: f64,
	/// Current ring rotation in degrees.
	pub rotation: [f64; 3],
	/// Pointer hover.
	pub hover: HoverState,
	/// Keyboard focus, by node key. Only real attendees take focus.
	pub focus: Option<String>,
	/// False while the canvas is off screen.
	pub animation_running: bool,
	/// Seconds of animation, drives the edge pulses.
	pub flow_time: f64,
	/// Dims the graph.
	pub is_loading: bool,
	/// Draws only the background.
	pub has_error: bool,
}

impl OrbitGraphState {
	/// Lays out `data` for the class of `width`.
	pub fn new(config: GraphConfig, data: NetworkData, width: f64, height: f64) -> Self {
		let viewport = config.viewport_class(width);
		let layout = layout_for(&config, &data, viewport);
		Self {
			config,
			data,
			layout,
			width,
			height,
			rotation: [0.0; 3],
			hover: HoverState::default(),
			focus: None,
			animation_running: true,
			flow_time: 0.0,
			is_loading: false,
			has_error: false,
		}
	}

	/// Class of the current layout.
	pub fn viewport(&self) -> ViewportClass {
		self.layout.viewport
	}

	/// Canvas centre, where the current user sits.
	pub fn center(&self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	/// Records the new size. Recomputes only when the device class flips;
	/// returns whether it did.
	pub fn set_viewport(&mut self, width: f64, height: f64) -> bool {
		self.width = width;
		self.height = height;
		let class = self.config.viewport_class(width);
		if class == self.layout.viewport {
			return false;
		}
		debug!("viewport class {:?} -> {:?}", self.layout.viewport, class);
		self.layout = layout_for(&self.config, &self.data, class);
		self.drop_stale_targets();
		true
	}

	/// Relayouts when the data changed.
	pub fn set_data(&mut self, data: NetworkData) {
		if data == self.data {
			return;
		}
		self.data = data;
		self.layout = layout_for(&self.config, &self.data, self.layout.viewport);
		self.drop_stale_targets();
	}

	/// Overlay flags; geometry is untouched.
	pub fn set_status(&mut self, is_loading: bool, has_error: bool) {
		self.is_loading = is_loading;
		self.has_error = has_error;
	}

	/// Pauses or resumes the animation loop. Geometry is unaffected.
	pub fn set_visible(&mut self, visible: bool) {
		if self.animation_running != visible {
			debug!("orbit animation {}", if visible { "resumed" } else { "paused" });
		}
		self.animation_running = visible;
	}

	/// Screen position of a ring node after rotation.
	pub fn screen_position(&self, ring: usize, node: &OrbitNode) -> (f64, f64) {
		let (cx, cy) = self.center();
		let (sin, cos) = self.rotation[ring].to_radians().sin_cos();
		(
			cx + node.x * cos - node.y * sin,
			cy + node.x * sin + node.y * cos,
		)
	}

	/// Half the profile's avatar size.
	pub fn node_radius(&self) -> f64 {
		f64::from(self.layout.node_size) / 2.0
	}

	/// Topmost real attendee under the point. Placeholders are not hit targets.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<&OrbitNode> {
		let radius = self.node_radius();
		let mut found = None;
		for (ring, nodes) in self.layout.rings.iter().enumerate() {
			for node in nodes.nodes.iter().filter(|n| !n.is_placeholder()) {
				let (x, y) = self.screen_position(ring, node);
				if (x - sx).hypot(y - sy) <= radius {
					found = Some(node);
				}
			}
		}
		found
	}

	/// Restarts the label fade when the key changes.
	pub fn set_hover(&mut self, key: Option<String>) {
		if self.hover.key == key {
			return;
		}
		self.hover.key = key;
		self.hover.highlight_t = 0.0;
	}

	/// Whether `key` is under the pointer.
	pub fn is_hovered(&self, key: &str) -> bool {
		self.hover.key.as_deref() == Some(key)
	}

	/// Hover update from a pointer position; returns the CSS cursor to show.
	pub fn hover_at(&mut self, sx: f64, sy: f64) -> &'static str {
		let hovered = self.node_at_position(sx, sy).map(|n| n.key.clone());
		let cursor = if hovered.is_some() { "pointer" } else { "default" };
		self.set_hover(hovered);
		cursor
	}

	/// Steps keyboard focus through real attendees in ring order, inner
	/// first. Without `wrap`, stepping past either end releases focus.
	/// Returns whether a node holds focus afterwards.
	pub fn move_focus(&mut self, forward: bool, wrap: bool) -> bool {
		let keys: Vec<&str> = self
			.layout
			.nodes()
			.filter(|n| !n.is_placeholder())
			.map(|n| n.key.as_str())
			.collect();
		let len = keys.len();
		let current = self
			.focus
			.as_deref()
			.and_then(|key| keys.iter().position(|k| *k == key));
		let next = match (current, forward) {
			_ if len == 0 => None,
			(None, true) => Some(0),
			(None, false) => Some(len - 1),
			(Some(i), true) if i + 1 < len => Some(i + 1),
			(Some(i), false) if i > 0 => Some(i - 1),
			(Some(_), true) => wrap.then_some(0),
			(Some(_), false) => wrap.then_some(len - 1),
		};
		self.focus = next.map(|i| keys[i].to_string());
		self.focus.is_some()
	}

	/// Drops keyboard focus.
	pub fn clear_focus(&mut self) {
		self.focus = None;
	}

	/// Whether `key` holds keyboard focus.
	pub fn is_focused(&self, key: &str) -> bool {
		self.focus.as_deref() == Some(key)
	}

	/// Attendee Enter or Space would open.
	pub fn focused_attendee(&self) -> Option<&AttendeeNode> {
		let key = self.focus.as_deref()?;
		self.layout.find(key)?.attendee.as_ref()
	}

	/// Accessible name for the canvas, naming the focused attendee if any.
	pub fn aria_label(&self) -> String {
		match self.focused_attendee() {
			Some(attendee) => format!("View profile for {}", attendee.display_name),
			None => GRAPH_LABEL.to_string(),
		}
	}

	/// Progress 0..1 of the pulse dot along an edge of this strength.
	pub fn pulse_progress(&self, strength: f64) -> f64 {
		let period = (PULSE_BASE_PERIOD - strength * 2.0).max(0.5);
		(self.flow_time % period) / period
	}

	/// Advances rotation, pulses and the hover fade by `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		if !self.animation_running {
			return;
		}
		self.flow_time += dt;
		for (ring, angle) in self.rotation.iter_mut().enumerate() {
			let period = self.config.animation.orbit_periods[ring];
			if period > 0.0 {
				*angle = (*angle + RING_DIRECTIONS[ring] * 360.0 * dt / period).rem_euclid(360.0);
			}
		}
		if self.hover.key.is_some() {
			self.hover.highlight_t = (self.hover.highlight_t + dt * 4.0).min(1.0);
		}
	}

	/// Screen reader line describing the graph.
	pub fn status_message(&self) -> String {
		if self.is_loading {
			"Loading network connections...".to_string()
		} else if self.has_error {
			"Failed to load network graph.".to_string()
		} else {
			format!(
				"Showing {} attendees in the network.",
				self.layout.attendee_count()
			)
		}
	}

	fn drop_stale_targets(&mut self) {
		let stale = match self.hover.key.as_deref() {
			Some(key) => self.layout.find(key).is_none(),
			None => false,
		};
		if stale {
			self.set_hover(None);
		}
		if self.focus.as_deref().is_some_and(|key| self.layout.find(key).is_none()) {
			self.focus = None;
		}
	}
}

/// Centre headline, shown unless a match suggestion takes its place.
pub fn connect_headline(
	matchmaking_enabled: bool,
	opportunities: &[OpportunityMatch],
	total_count: usize,
) -> Option<String> {
	(!matchmaking_enabled || opportunities.is_empty()).then(|| format!("Connect with {total_count}+"))
}

fn layout_for(config: &GraphConfig, data: &NetworkData, viewport: ViewportClass) -> OrbitLayout {
	compute_layout(
		&data.attendees,
		&data.relationships,
		&data.opportunities,
		config,
		viewport,
	)
}

#[cfg(test)]
mod tests {
	use approx::assert_abs_diff_eq;

	use super::*;
	use crate::components::orbit_graph::types::AttendeeNode;

	fn data(n: usize) -> NetworkData {
		NetworkData {
			attendees: (0..n)
				.map(|i| AttendeeNode {
					person_id: format!("p{i}"),
					display_name: format!("Person {i}"),
					..AttendeeNode::default()
				})
				.collect(),
			..NetworkData::default()
		}
	}

	#[test]
	fn resize_within_class_keeps_layout() {
		let mut state = OrbitGraphState::new(GraphConfig::default(), data(30), 1200.0, 800.0);
		let before = state.layout.clone();
		assert!(!state.set_viewport(1000.0, 700.0));
		assert_eq!(state.layout, before);
		assert_eq!(state.center(), (500.0, 350.0));
	}

	#[test]
	fn crossing_breakpoint_recomputes() {
		let mut state = OrbitGraphState::new(GraphConfig::default(), data(30), 1200.0, 800.0);
		assert_eq!(state.layout.attendee_count(), 30);
		assert!(state.set_viewport(500.0, 800.0));
		assert_eq!(state.viewport(), ViewportClass::Mobile);
		assert_eq!(state.layout.attendee_count(), 20);
		assert!(state.set_viewport(1024.0, 800.0));
		assert_eq!(state.layout.attendee_count(), 30);
	}

	#[test]
	fn hit_test_finds_first_inner_node() {
		let state = OrbitGraphState::new(GraphConfig::default(), data(15), 1000.0, 1000.0);
		// inner ring node 0 sits at (center + 100, center)
		let hit = state.node_at_position(600.0, 500.0).map(|n| n.key.clone());
		assert_eq!(hit.as_deref(), Some("p0"));
		assert!(state.node_at_position(500.0, 500.0).is_none());
	}

	#[test]
	fn placeholders_are_not_hit() {
		let state = OrbitGraphState::new(GraphConfig::default(), data(0), 1000.0, 1000.0);
		assert!(state.node_at_position(600.0, 500.0).is_none());
	}

	#[test]
	fn rotation_moves_hit_targets() {
		let mut state = OrbitGraphState::new(GraphConfig::default(), data(15), 1000.0, 1000.0);
		state.tick(15.0); // a quarter turn of the 60 s inner ring
		assert_abs_diff_eq!(state.rotation[0], 90.0, epsilon = 1e-9);
		let hit = state.node_at_position(500.0, 600.0).map(|n| n.key.clone());
		assert_eq!(hit.as_deref(), Some("p0"));
		assert!(state.rotation[1] > 180.0);
	}

	#[test]
	fn paused_animation_does_not_advance() {
		let mut state = OrbitGraphState::new(GraphConfig::default(), data(3), 1000.0, 1000.0);
		state.set_visible(false);
		state.tick(1.0);
		assert_eq!(state.rotation, [0.0; 3]);
		assert_eq!(state.flow_time, 0.0);
	}

	#[test]
	fn status_overlays_do_not_touch_geometry() {
		let mut state = OrbitGraphState::new(GraphConfig::default(), data(12), 1000.0, 1000.0);
		let before = state.layout.clone();
		state.set_status(true, false);
		assert_eq!(state.status_message(), "Loading network connections...");
		state.set_status(false, true);
		assert_eq!(state.status_message(), "Failed to load network graph.");
		state.set_status(false, false);
		assert_eq!(state.status_message(), "Showing 12 attendees in the network.");
		assert_eq!(state.layout, before);
	}

	#[test]
	fn hover_at_picks_cursor() {
		let mut state = OrbitGraphState::new(GraphConfig::default(), data(15), 1000.0, 1000.0);
		assert_eq!(state.hover_at(600.0, 500.0), "pointer");
		assert!(state.is_hovered("p0"));
		assert_eq!(state.hover_at(500.0, 500.0), "default");
		assert!(state.hover.key.is_none());
	}

	#[test]
	fn focus_cycles_over_attendees_only() {
		// 4 attendees pad to 15 slots; placeholders never take focus
		let mut state = OrbitGraphState::new(GraphConfig::default(), data(4), 1000.0, 1000.0);
		let mut order = Vec::new();
		while state.move_focus(true, false) {
			order.extend(state.focus.clone());
		}
		assert_eq!(order, vec!["p0", "p1", "p2", "p3"]);
		assert!(state.focus.is_none());

		assert!(state.move_focus(false, true));
		assert_eq!(state.focus.as_deref(), Some("p3"));
		assert!(state.move_focus(true, true));
		assert_eq!(state.focus.as_deref(), Some("p0"));
	}

	#[test]
	fn empty_graph_takes_no_focus() {
		let mut state = OrbitGraphState::new(GraphConfig::default(), data(0), 1000.0, 1000.0);
		assert!(!state.move_focus(true, true));
		assert_eq!(state.aria_label(), "Interactive Networking Graph");
	}

	#[test]
	fn focused_attendee_names_the_canvas() {
		let mut state = OrbitGraphState::new(GraphConfig::default(), data(3), 1000.0, 1000.0);
		state.move_focus(true, true);
		state.move_focus(true, true);
		assert_eq!(
			state.focused_attendee().map(|a| a.person_id.as_str()),
			Some("p1")
		);
		assert_eq!(state.aria_label(), "View profile for Person 1");
	}

	#[test]
	fn headline_gives_way_to_matches() {
		let matches = [OpportunityMatch {
			candidate_person_id: "p1".into(),
			..OpportunityMatch::default()
		}];
		assert_eq!(connect_headline(false, &matches, 40).as_deref(), Some("Connect with 40+"));
		assert_eq!(connect_headline(true, &[], 12).as_deref(), Some("Connect with 12+"));
		assert_eq!(connect_headline(true, &matches, 40), None);
	}

	#[test]
	fn stale_focus_cleared_on_new_data() {
		let mut state = OrbitGraphState::new(GraphConfig::default(), data(5), 1000.0, 1000.0);
		state.focus = Some("p4".into());
		state.set_data(data(5));
		assert_eq!(state.focus.as_deref(), Some("p4"));
		state.set_data(data(2));
		assert!(state.focus.is_none());
	}

	#[test]
	fn stale_hover_cleared_on_new_data() {
		let mut state = OrbitGraphState::new(GraphConfig::default(), data(5), 1000.0, 1000.0);
		state.set_hover(Some("p4".into()));
		state.set_data(data(2));
		assert!(state.hover.key.is_none());
	}
}
