//! Ring placement for the orbital view.

use std::collections::{HashMap, HashSet};

use super::config::GraphConfig;
use super::types::{
	AttendeeNode, OpportunityMatch, OrbitLayout, OrbitNode, RelationshipEdge, Ring, ViewportClass,
};

/// Places attendees on three concentric rings.
///
/// Pure and deterministic: the same inputs and viewport class always give
/// the same positions. Never fails; missing data degrades to placeholders,
/// zero strength and no opportunity flag.
pub fn compute_layout(
	attendees: &[AttendeeNode],
	relationships: &[RelationshipEdge],
	opportunities: &[OpportunityMatch],
	config: &GraphConfig,
	viewport: ViewportClass,
) -> OrbitLayout {
	let profile = config.profile(viewport);

	// Duplicate targets: the last edge wins.
	let strengths: HashMap<&str, f64> = relationships
		.iter()
		.map(|edge| (edge.target_person_id.as_str(), edge.strength))
		.collect();
	let matches: HashSet<&str> = opportunities
		.iter()
		.map(|op| op.candidate_person_id.as_str())
		.collect();

	let mut display: Vec<Option<&AttendeeNode>> =
		attendees.iter().take(profile.max_nodes).map(Some).collect();
	if display.len() < config.min_nodes {
		display.resize(config.min_nodes, None);
	}

	let [count1, count2] = split_counts(display.len(), config.orbit_distribution);
	let len = display.len();
	let end1 = count1.min(len);
	let end2 = (count1 + count2).min(len);
	let slices = [&display[..end1], &display[end1..end2], &display[end2..]];
	let offsets = [0, count1, count1 + count2];

	let rings = std::array::from_fn(|ring| {
		let radius = profile.orbit_radii[ring];
		let members = slices[ring];
		let n = members.len();
		let nodes = members
			.iter()
			.enumerate()
			.map(|(i, attendee)| {
				let angle = (i as f64 / n as f64) * 360.0;
				let radian = angle.to_radians();
				let person_id = attendee
					.map(|a| a.person_id.as_str())
					.filter(|id| !id.is_empty());
				OrbitNode {
					attendee: attendee.cloned(),
					x: radian.cos() * radius,
					y: radian.sin() * radius,
					strength: person_id
						.and_then(|id| strengths.get(id).copied())
						.unwrap_or(0.0),
					is_opportunity: person_id.is_some_and(|id| matches.contains(id)),
					key: match person_id {
						Some(id) => id.to_string(),
						None => format!("placeholder-{}", offsets[ring] + i),
					},
				}
			})
			.collect();
		Ring { radius, nodes }
	});

	OrbitLayout {
		viewport,
		node_size: profile.node_size,
		rings,
	}
}

/// Sizes of the inner and middle rings: `ceil(len * ratio)` each. The outer
/// ring takes what is left, which may be less than its ratio or nothing.
pub fn split_counts(len: usize, distribution: [f64; 3]) -> [usize; 2] {
	let ceil = |ratio: f64| (len as f64 * ratio).ceil().max(0.0) as usize;
	[ceil(distribution[0]), ceil(distribution[1])]
}

#[cfg(test)]
mod tests {
	use approx::assert_abs_diff_eq;
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::orbit_graph::config::DeviceProfile;

	fn attendees(n: usize) -> Vec<AttendeeNode> {
		(0..n)
			.map(|i| AttendeeNode {
				person_id: format!("p{i}"),
				display_name: format!("Person {i}"),
				image_url: None,
				tags: vec![],
			})
			.collect()
	}

	fn edge(target: &str, strength: f64) -> RelationshipEdge {
		RelationshipEdge {
			source_person_id: "me".into(),
			target_person_id: target.into(),
			strength,
		}
	}

	fn desktop(list: &[AttendeeNode]) -> OrbitLayout {
		compute_layout(list, &[], &[], &GraphConfig::default(), ViewportClass::Desktop)
	}

	#[test]
	fn twelve_attendees_pad_to_fifteen() {
		let layout = desktop(&attendees(12));
		assert_eq!(layout.ring_sizes(), [3, 6, 6]);
		assert_eq!(layout.attendee_count(), 12);
		assert_eq!(layout.placeholder_count(), 3);
	}

	#[test]
	fn node_counts_follow_min_and_max() {
		let config = GraphConfig::default();
		for (n, class) in [
			(0, ViewportClass::Desktop),
			(14, ViewportClass::Desktop),
			(15, ViewportClass::Desktop),
			(49, ViewportClass::Desktop),
			(80, ViewportClass::Desktop),
			(7, ViewportClass::Mobile),
			(35, ViewportClass::Mobile),
		] {
			let layout = compute_layout(&attendees(n), &[], &[], &config, class);
			let k = config.profile(class).max_nodes;
			let shown = n.min(k);
			assert_eq!(layout.attendee_count(), shown, "n={n} {class:?}");
			assert_eq!(layout.nodes().count(), shown.max(config.min_nodes), "n={n} {class:?}");
		}
	}

	#[test]
	fn partition_uses_ceil_on_first_two_rings() {
		let config = GraphConfig::default();
		for len in [15usize, 20, 23, 50] {
			let layout = compute_layout(&attendees(len), &[], &[], &config, ViewportClass::Desktop);
			let c1 = (len as f64 * 0.2).ceil() as usize;
			let c2 = (len as f64 * 0.35).ceil() as usize;
			assert_eq!(layout.ring_sizes(), [c1, c2, len - c1 - c2], "len={len}");
		}
		// 23 -> 5, 9, 9
		assert_eq!(split_counts(23, config.orbit_distribution), [5, 9]);
	}

	#[test]
	fn tiny_lists_leave_outer_ring_short_or_empty() {
		let config = GraphConfig {
			min_nodes: 0,
			..GraphConfig::default()
		};
		let sizes = |n| {
			compute_layout(&attendees(n), &[], &[], &config, ViewportClass::Desktop).ring_sizes()
		};
		assert_eq!(sizes(1), [1, 0, 0]);
		assert_eq!(sizes(2), [1, 1, 0]);
		assert_eq!(sizes(3), [1, 2, 0]);
		assert_eq!(sizes(4), [1, 2, 1]);
		assert_eq!(sizes(0), [0, 0, 0]);
	}

	#[test]
	fn empty_input_is_all_placeholders() {
		let layout = desktop(&[]);
		assert_eq!(layout.ring_sizes(), [3, 6, 6]);
		assert_eq!(layout.placeholder_count(), 15);
		assert!(layout.nodes().all(|n| n.strength == 0.0 && !n.is_opportunity));
	}

	#[test]
	fn ring_angles_are_evenly_spaced() {
		let layout = desktop(&attendees(20));
		for ring in &layout.rings {
			let n = ring.nodes.len();
			let first = &ring.nodes[0];
			assert_abs_diff_eq!(first.x, ring.radius, epsilon = 1e-9);
			assert_abs_diff_eq!(first.y, 0.0, epsilon = 1e-9);
			for (i, node) in ring.nodes.iter().enumerate() {
				let expected = (360.0 * i as f64 / n as f64).to_radians();
				let angle = node.y.atan2(node.x).rem_euclid(std::f64::consts::TAU);
				assert_abs_diff_eq!(angle, expected, epsilon = 1e-9);
				assert_abs_diff_eq!(node.x.hypot(node.y), ring.radius, epsilon = 1e-9);
			}
		}
	}

	#[test]
	fn mobile_profile_uses_its_radii() {
		let layout = compute_layout(
			&attendees(30),
			&[],
			&[],
			&GraphConfig::default(),
			ViewportClass::Mobile,
		);
		assert_eq!(layout.node_size, 32);
		assert_eq!(layout.attendee_count(), 20);
		let radii: Vec<f64> = layout.rings.iter().map(|r| r.radius).collect();
		assert_eq!(radii, DeviceProfile::mobile().orbit_radii.to_vec());
	}

	#[test]
	fn last_edge_for_a_target_wins() {
		let layout = compute_layout(
			&attendees(3),
			&[edge("p1", 0.2), edge("p1", 0.9)],
			&[],
			&GraphConfig::default(),
			ViewportClass::Desktop,
		);
		assert_eq!(layout.find("p1").map(|n| n.strength), Some(0.9));
		assert_eq!(layout.find("p0").map(|n| n.strength), Some(0.0));
	}

	#[test]
	fn opportunities_flag_matching_nodes() {
		let layout = compute_layout(
			&attendees(5),
			&[],
			&[OpportunityMatch {
				candidate_person_id: "p3".into(),
				..OpportunityMatch::default()
			}],
			&GraphConfig::default(),
			ViewportClass::Desktop,
		);
		let flagged: Vec<&str> =
			layout.nodes().filter(|n| n.is_opportunity).map(|n| n.key.as_str()).collect();
		assert_eq!(flagged, vec!["p3"]);
	}

	#[test]
	fn keys_are_unique_across_rings() {
		let layout = desktop(&attendees(4));
		let keys: HashSet<&str> = layout.nodes().map(|n| n.key.as_str()).collect();
		assert_eq!(keys.len(), 15);
		assert!(keys.contains("placeholder-4"));
		assert!(keys.contains("placeholder-14"));
	}

	#[test]
	fn recomputation_is_bit_identical() {
		let list = attendees(37);
		let edges = vec![edge("p2", 0.4), edge("p30", 0.8)];
		let config = GraphConfig::default();
		let a = compute_layout(&list, &edges, &[], &config, ViewportClass::Desktop);
		let b = compute_layout(&list, &edges, &[], &config, ViewportClass::Desktop);
		let bits = |l: &OrbitLayout| -> Vec<(String, u64, u64)> {
			l.nodes()
				.map(|n| (n.key.clone(), n.x.to_bits(), n.y.to_bits()))
				.collect()
		};
		assert_eq!(bits(&a), bits(&b));
	}

	#[test]
	fn edge_visibility_matches_threshold() {
		let config = GraphConfig::default();
		let layout = compute_layout(
			&attendees(2),
			&[edge("p0", 0.0), edge("p1", 1e-9)],
			&[],
			&config,
			ViewportClass::Desktop,
		);
		let p0 = layout.find("p0").unwrap();
		let p1 = layout.find("p1").unwrap();
		assert!(!config.edge_visible(p0.strength));
		assert!(config.edge_visible(p1.strength));
	}
}
