use super::config::MarkerConfig;

/// Per-marker animation state, kept across frames and filter changes.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerAnimation {
	pub rotation: f64,
	pub scale: f64,
	/// 0..1 hover glow, eased like the scale.
	pub hover_t: f64,
}

impl Default for MarkerAnimation {
	fn default() -> Self {
		Self {
			rotation: 0.0,
			scale: 1.0,
			hover_t: 0.0,
		}
	}
}

impl MarkerAnimation {
	/// Advance one frame. `elapsed` is wall-clock seconds since the cloud
	/// mounted, `dt` the seconds since the previous frame.
	pub fn update(&mut self, cfg: &MarkerConfig, elapsed: f64, dt: f64, selected: bool, hovered: bool) {
		self.rotation = (self.rotation + cfg.spin_rate * dt) % std::f64::consts::TAU;
		if selected {
			self.scale += (cfg.selected_scale - self.scale) * cfg.selected_lerp;
		} else {
			self.scale = idle_pulse(cfg, elapsed);
		}
		let target = if hovered { 1.0 } else { 0.0 };
		self.hover_t += (target - self.hover_t) * 0.2;
	}

	/// Render scale including the hover boost.
	pub fn display_scale(&self, cfg: &MarkerConfig) -> f64 {
		self.scale * (1.0 + (cfg.hover_scale - 1.0) * self.hover_t)
	}
}

fn idle_pulse(cfg: &MarkerConfig, elapsed: f64) -> f64 {
	1.0 + (elapsed * cfg.pulse_frequency).sin() * cfg.pulse_amplitude
}
