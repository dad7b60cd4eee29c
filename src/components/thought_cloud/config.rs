use glam::DVec3;
use serde::Deserialize;

use super::error::ThoughtError;

/// Tunable constants for the thought cloud. None of these are load-bearing;
/// they only shape how the cloud looks and moves.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct VisualizerConfig {
	pub camera: CameraConfig,
	pub marker: MarkerConfig,
	pub links: LinkConfig,
	pub lighting: LightingConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
	pub home_position: [f64; 3],
	pub home_target: [f64; 3],
	/// Offset from a focused node to the camera eye.
	pub focus_offset: [f64; 3],
	pub fov_degrees: f64,
	/// Fraction of the remaining distance covered per frame.
	pub damping: f64,
	pub settle_epsilon: f64,
	/// Overview orbit speed in radians per second.
	pub auto_rotate_speed: f64,
	pub min_distance: f64,
	pub max_distance: f64,
	/// Radians of orbit per dragged pixel.
	pub rotate_sensitivity: f64,
	/// Distance multiplier per wheel notch.
	pub zoom_step: f64,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarkerConfig {
	pub base_radius: f64,
	pub pulse_amplitude: f64,
	/// Angular frequency of the idle pulse in radians per second.
	pub pulse_frequency: f64,
	pub selected_scale: f64,
	pub selected_lerp: f64,
	pub hover_scale: f64,
	/// Self-rotation in radians per second.
	pub spin_rate: f64,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LinkConfig {
	pub max_neighbors: usize,
	pub opacity: f64,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct LightingConfig {
	pub hemisphere_intensity: f64,
	pub directional_position: [f64; 3],
	pub directional_intensity: f64,
}

impl Default for CameraConfig {
	fn default() -> Self {
		Self {
			home_position: [0.0, 0.0, 5.0],
			home_target: [0.0, 0.0, 0.0],
			focus_offset: [0.0, 0.0, 3.5],
			fov_degrees: 45.0,
			damping: 0.05,
			settle_epsilon: 0.1,
			auto_rotate_speed: 0.021,
			min_distance: 3.0,
			max_distance: 30.0,
			rotate_sensitivity: 0.005,
			zoom_step: 1.1,
		}
	}
}

impl Default for MarkerConfig {
	fn default() -> Self {
		Self {
			base_radius: 0.15,
			pulse_amplitude: 0.05,
			pulse_frequency: 0.8,
			selected_scale: 1.5,
			selected_lerp: 0.1,
			hover_scale: 1.2,
			spin_rate: 0.12,
		}
	}
}

impl Default for LinkConfig {
	fn default() -> Self {
		Self {
			max_neighbors: 4,
			opacity: 0.6,
		}
	}
}

impl Default for LightingConfig {
	fn default() -> Self {
		Self {
			hemisphere_intensity: 0.55,
			directional_position: [3.0, 10.0, 10.0],
			directional_intensity: 0.6,
		}
	}
}

impl CameraConfig {
	pub fn home_position(&self) -> DVec3 {
		DVec3::from_array(self.home_position)
	}

	pub fn home_target(&self) -> DVec3 {
		DVec3::from_array(self.home_target)
	}

	pub fn focus_offset(&self) -> DVec3 {
		DVec3::from_array(self.focus_offset)
	}
}

impl VisualizerConfig {
	/// Parse a (possibly partial) JSON config; missing keys keep defaults.
	pub fn from_json(json: &str) -> Result<Self, ThoughtError> {
		Ok(serde_json::from_str(json)?)
	}
}
