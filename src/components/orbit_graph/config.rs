//! Graph configuration with the per-device defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::ViewportClass;

const RATIO_TOLERANCE: f64 = 1e-6;

/// Why a [`GraphConfig`] was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
	/// Ring shares do not add up to one.
	#[error("orbit distribution must sum to 1.0, got {0}")]
	DistributionSum(f64),
	/// A ring share is below zero.
	#[error("orbit distribution ratio {0} is negative")]
	NegativeRatio(f64),
	/// A ring radius is zero, negative or NaN.
	#[error("{profile} orbit radius {radius} must be positive")]
	Radius {
		/// `"mobile"` or `"desktop"`.
		profile: &'static str,
		/// The offending radius.
		radius: f64,
	},
	/// A profile caps the graph at zero nodes.
	#[error("{0} profile must allow at least one node")]
	NoNodes(&'static str),
}

/// Size and capacity for one device class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
	/// Ring radii in pixels: inner, middle, outer.
	pub orbit_radii: [f64; 3],
	/// Attendees beyond this are not placed.
	pub max_nodes: usize,
	/// Avatar diameter in pixels.
	pub node_size: u32,
}

impl DeviceProfile {
	/// Phone-sized rings.
	pub fn mobile() -> Self {
		Self {
			orbit_radii: [60.0, 110.0, 160.0],
			max_nodes: 20,
			node_size: 32,
		}
	}

	/// Desktop rings, also the widest capacity.
	pub fn desktop() -> Self {
		Self {
			orbit_radii: [100.0, 200.0, 300.0],
			max_nodes: 50,
			node_size: 48,
		}
	}

	fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
		if self.max_nodes == 0 {
			return Err(ConfigError::NoNodes(name));
		}
		match self.orbit_radii.iter().find(|r| !(**r > 0.0)) {
			Some(&radius) => Err(ConfigError::Radius {
				profile: name,
				radius,
			}),
			None => Ok(()),
		}
	}
}

/// Edge drawing thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeConfig {
	/// Edges at or below this strength are not drawn.
	pub min_strength: f64,
	/// Edges above this strength get the animated pulse.
	pub pulse_threshold: f64,
}

impl Default for EdgeConfig {
	fn default() -> Self {
		Self {
			min_strength: 0.0,
			pulse_threshold: 0.5,
		}
	}
}

/// Ring rotation speeds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
	/// Seconds per full revolution for each ring.
	pub orbit_periods: [f64; 3],
}

impl Default for AnimationConfig {
	fn default() -> Self {
		Self {
			orbit_periods: [60.0, 90.0, 120.0],
		}
	}
}

/// Everything tunable about the orbital view.
///
/// Deserializes from partial JSON; missing keys keep their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Viewport widths below this use the mobile profile.
	pub mobile_breakpoint: u32,
	/// Used below the breakpoint.
	pub mobile: DeviceProfile,
	/// Used at or above the breakpoint.
	pub desktop: DeviceProfile,
	/// Share of the displayed list per ring. Must sum to 1.0.
	pub orbit_distribution: [f64; 3],
	/// Placeholders pad the list up to this many nodes.
	pub min_nodes: usize,
	/// Edge thresholds.
	pub edges: EdgeConfig,
	/// Rotation periods.
	pub animation: AnimationConfig,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			mobile_breakpoint: 768,
			mobile: DeviceProfile::mobile(),
			desktop: DeviceProfile::desktop(),
			orbit_distribution: [0.2, 0.35, 0.45],
			min_nodes: 15,
			edges: EdgeConfig::default(),
			animation: AnimationConfig::default(),
		}
	}
}

impl GraphConfig {
	/// Checks ratios and both device profiles.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if let Some(&ratio) = self.orbit_distribution.iter().find(|r| **r < 0.0) {
			return Err(ConfigError::NegativeRatio(ratio));
		}
		let sum: f64 = self.orbit_distribution.iter().sum();
		if (sum - 1.0).abs() > RATIO_TOLERANCE {
			return Err(ConfigError::DistributionSum(sum));
		}
		self.mobile.validate("mobile")?;
		self.desktop.validate("desktop")
	}

	/// Device class for a viewport width.
	pub fn viewport_class(&self, width: f64) -> ViewportClass {
		ViewportClass::from_width(width, self.mobile_breakpoint)
	}

	/// Profile for a device class.
	pub fn profile(&self, class: ViewportClass) -> &DeviceProfile {
		match class {
			ViewportClass::Mobile => &self.mobile,
			ViewportClass::Desktop => &self.desktop,
		}
	}

	/// Strict: a strength equal to the threshold draws nothing.
	pub fn edge_visible(&self, strength: f64) -> bool {
		strength > self.edges.min_strength
	}

	/// Strict, like [`Self::edge_visible`].
	pub fn edge_pulses(&self, strength: f64) -> bool {
		strength > self.edges.pulse_threshold
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_validate() {
		assert_eq!(GraphConfig::default().validate(), Ok(()));
	}

	#[test]
	fn distribution_must_sum_to_one() {
		let config = GraphConfig {
			orbit_distribution: [0.2, 0.3, 0.3],
			..GraphConfig::default()
		};
		assert!(matches!(config.validate(), Err(ConfigError::DistributionSum(_))));
	}

	#[test]
	fn negative_ratio_rejected() {
		let config = GraphConfig {
			orbit_distribution: [-0.2, 0.7, 0.5],
			..GraphConfig::default()
		};
		assert_eq!(config.validate(), Err(ConfigError::NegativeRatio(-0.2)));
	}

	#[test]
	fn bad_profile_rejected() {
		let mut config = GraphConfig::default();
		config.mobile.orbit_radii[1] = 0.0;
		assert!(matches!(
			config.validate(),
			Err(ConfigError::Radius {
				profile: "mobile",
				..
			})
		));
		config.mobile = DeviceProfile::mobile();
		config.desktop.max_nodes = 0;
		assert_eq!(config.validate(), Err(ConfigError::NoNodes("desktop")));
	}

	#[test]
	fn breakpoint_is_exclusive() {
		let config = GraphConfig::default();
		assert_eq!(config.viewport_class(767.0), ViewportClass::Mobile);
		assert_eq!(config.viewport_class(768.0), ViewportClass::Desktop);
	}

	#[test]
	fn edge_thresholds_are_strict() {
		let config = GraphConfig::default();
		assert!(!config.edge_visible(0.0));
		assert!(config.edge_visible(f64::EPSILON));
		assert!(!config.edge_pulses(0.5));
		assert!(config.edge_pulses(0.51));
	}

	#[test]
	fn partial_json_overrides() {
		let config: GraphConfig =
			serde_json::from_str(r#"{"min_nodes": 5, "mobile_breakpoint": 600}"#).unwrap();
		assert_eq!(config.min_nodes, 5);
		assert_eq!(config.mobile_breakpoint, 600);
		assert_eq!(config.desktop, DeviceProfile::desktop());
	}
}
