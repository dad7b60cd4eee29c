use std::f64::consts::PI;

use glam::DVec3;
use log::debug;

use super::config::CameraConfig;
use super::types::DisplayNode;

const POLAR_MARGIN: f64 = 0.01;
const NEAR_PLANE: f64 = 0.05;

#[derive(Clone, Debug, PartialEq)]
pub enum CameraMode {
	Overview,
	Focused(String),
}

/// Eye/look-at pair, current and desired.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraState {
	pub current_position: DVec3,
	pub current_target: DVec3,
	pub desired_position: DVec3,
	pub desired_target: DVec3,
}

/// Owns the camera: retargets on selection change and eases toward the
/// target every frame. Nothing else writes camera state.
#[derive(Clone, Debug)]
pub struct CameraDirector {
	cfg: CameraConfig,
	state: CameraState,
	mode: CameraMode,
	animating: bool,
}

impl CameraDirector {
	pub fn new(cfg: CameraConfig) -> Self {
		let (position, target) = (cfg.home_position(), cfg.home_target());
		Self {
			cfg,
			state: CameraState {
				current_position: position,
				current_target: target,
				desired_position: position,
				desired_target: target,
			},
			mode: CameraMode::Overview,
			animating: false,
		}
	}

	#[cfg(test)]
	pub fn state(&self) -> &CameraState {
		&self.state
	}

	#[cfg(test)]
	pub fn mode(&self) -> &CameraMode {
		&self.mode
	}

	/// Point the camera at `selection`, or back home when there is none.
	/// Only the desired values move; the current pose catches up in `tick`.
	pub fn retarget(&mut self, selection: Option<&DisplayNode>) {
		let mode = match selection {
			Some(node) => CameraMode::Focused(node.id.clone()),
			None => CameraMode::Overview,
		};
		if mode == self.mode {
			return;
		}
		debug!("camera {:?} -> {:?}", self.mode, mode);

		match selection {
			Some(node) => {
				self.state.desired_position = node.position + self.cfg.focus_offset();
				self.state.desired_target = node.position;
			}
			None => {
				self.state.desired_position = self.cfg.home_position();
				self.state.desired_target = self.cfg.home_target();
			}
		}
		self.mode = mode;
		self.animating = true;
	}

	/// Advance one animation frame.
	pub fn tick(&mut self, dt: f64) {
		if self.animating {
			self.ease_step();
		} else if self.mode == CameraMode::Overview {
			self.rotate_left(self.cfg.auto_rotate_speed * dt);
		}
	}

	/// Move the current pose a fixed fraction of the way to the desired one.
	pub fn ease_step(&mut self) {
		let s = &mut self.state;
		s.current_position = s.current_position.lerp(s.desired_position, self.cfg.damping);
		s.current_target = s.current_target.lerp(s.desired_target, self.cfg.damping);
		if self.is_settled() {
			self.animating = false;
		}
	}

	/// Both remaining distances are under the settle epsilon.
	pub fn is_settled(&self) -> bool {
		let s = &self.state;
		s.current_position.distance(s.desired_position) < self.cfg.settle_epsilon
			&& s.current_target.distance(s.desired_target) < self.cfg.settle_epsilon
	}

	#[cfg(test)]
	pub fn is_animating(&self) -> bool {
		self.animating
	}

	/// Orbit by a pointer drag, in pixels.
	pub fn orbit_drag(&mut self, dx: f64, dy: f64) {
		self.rotate_left(-dx * self.cfg.rotate_sensitivity);
		self.rotate_up(-dy * self.cfg.rotate_sensitivity);
	}

	/// Zoom by wheel direction: positive moves out, negative moves in.
	pub fn zoom(&mut self, direction: f64) {
		let factor = if direction > 0.0 {
			self.cfg.zoom_step
		} else {
			1.0 / self.cfg.zoom_step
		};
		let s = &mut self.state;
		let offset = s.current_position - s.current_target;
		let distance = (offset.length() * factor).clamp(self.cfg.min_distance, self.cfg.max_distance);
		s.current_position = s.current_target + offset.normalize_or_zero() * distance;
	}

	fn rotate_left(&mut self, angle: f64) {
		let (radius, theta, phi) = self.spherical();
		self.set_spherical(radius, theta + angle, phi);
	}

	fn rotate_up(&mut self, angle: f64) {
		let (radius, theta, phi) = self.spherical();
		self.set_spherical(radius, theta, phi + angle);
	}

	/// Eye offset from the look-at point as (radius, azimuth, polar).
	fn spherical(&self) -> (f64, f64, f64) {
		let offset = self.state.current_position - self.state.current_target;
		let radius = offset.length();
		if radius == 0.0 {
			return (0.0, 0.0, PI / 2.0);
		}
		let theta = offset.x.atan2(offset.z);
		let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
		(radius, theta, phi)
	}

	fn set_spherical(&mut self, radius: f64, theta: f64, phi: f64) {
		let phi = phi.clamp(POLAR_MARGIN, PI - POLAR_MARGIN);
		let offset = DVec3::new(
			radius * phi.sin() * theta.sin(),
			radius * phi.cos(),
			radius * phi.sin() * theta.cos(),
		);
		self.state.current_position = self.state.current_target + offset;
	}

	/// Projection for the current pose onto a `width` x `height` viewport.
	pub fn view(&self, width: f64, height: f64) -> CameraView {
		CameraView::new(
			self.state.current_position,
			self.state.current_target,
			self.cfg.fov_degrees,
			width,
			height,
		)
	}
}

/// A point projected to screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
	pub x: f64,
	pub y: f64,
	/// Distance along the view axis.
	pub depth: f64,
	/// Pixels per world unit at this depth.
	pub scale: f64,
}

/// Perspective projection of a fixed camera pose.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraView {
	pub eye: DVec3,
	pub forward: DVec3,
	right: DVec3,
	up: DVec3,
	focal: f64,
	width: f64,
	height: f64,
}

impl CameraView {
	pub fn new(eye: DVec3, target: DVec3, fov_degrees: f64, width: f64, height: f64) -> Self {
		let forward = (target - eye).try_normalize().unwrap_or(DVec3::NEG_Z);
		let right = forward
			.cross(DVec3::Y)
			.try_normalize()
			.unwrap_or_else(|| forward.cross(DVec3::NEG_Z).normalize_or_zero());
		let up = right.cross(forward);
		let focal = (height / 2.0) / (fov_degrees.to_radians() / 2.0).tan();
		Self {
			eye,
			forward,
			right,
			up,
			focal,
			width,
			height,
		}
	}

	pub fn width(&self) -> f64 {
		self.width
	}

	pub fn height(&self) -> f64 {
		self.height
	}

	/// `None` when the point is behind (or too close to) the eye.
	pub fn project(&self, point: DVec3) -> Option<Projected> {
		let d = point - self.eye;
		let depth = d.dot(self.forward);
		if depth <= NEAR_PLANE {
			return None;
		}
		let scale = self.focal / depth;
		Some(Projected {
			x: self.width / 2.0 + d.dot(self.right) * scale,
			y: self.height / 2.0 - d.dot(self.up) * scale,
			depth,
			scale,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::thought_cloud::types::Rgb;

	fn node(id: &str, position: DVec3) -> DisplayNode {
		DisplayNode {
			id: id.into(),
			title: id.into(),
			excerpt: String::new(),
			position,
			label: 0,
			color: Rgb::for_label(0),
		}
	}

	fn remaining(d: &CameraDirector) -> (f64, f64) {
		let s = d.state();
		(
			s.current_position.distance(s.desired_position),
			s.current_target.distance(s.desired_target),
		)
	}

	#[test]
	fn starts_settled_in_overview() {
		let d = CameraDirector::new(CameraConfig::default());
		assert_eq!(d.mode(), &CameraMode::Overview);
		assert!(d.is_settled());
		assert!(!d.is_animating());
	}

	#[test]
	fn focus_sets_desired_without_snapping() {
		let mut d = CameraDirector::new(CameraConfig::default());
		let n = node("a", DVec3::new(2.0, 1.0, -1.0));
		d.retarget(Some(&n));
		let s = d.state();
		assert_eq!(s.desired_target, n.position);
		assert_eq!(s.desired_position, n.position + DVec3::new(0.0, 0.0, 3.5));
		assert_eq!(s.current_position, DVec3::new(0.0, 0.0, 5.0));
		assert_eq!(d.mode(), &CameraMode::Focused("a".into()));
	}

	#[test]
	fn converges_monotonically() {
		let mut d = CameraDirector::new(CameraConfig::default());
		let n = node("far", DVec3::new(14.0, -9.0, 6.0));
		d.retarget(Some(&n));
		let mut prev = remaining(&d);
		let mut frames = 0;
		while !d.is_settled() {
			d.tick(1.0 / 60.0);
			let now = remaining(&d);
			assert!(now.0 < prev.0 || now.0 == 0.0);
			assert!(now.1 < prev.1 || now.1 == 0.0);
			prev = now;
			frames += 1;
			assert!(frames < 200, "camera failed to settle");
		}
		assert!(!d.is_animating());
	}

	#[test]
	fn focused_to_focused_retargets_directly() {
		let mut d = CameraDirector::new(CameraConfig::default());
		let (a, b) = (node("a", DVec3::X), node("b", DVec3::Y * 4.0));
		d.retarget(Some(&a));
		d.tick(0.016);
		d.retarget(Some(&b));
		assert_eq!(d.mode(), &CameraMode::Focused("b".into()));
		assert_eq!(d.state().desired_target, b.position);
	}

	#[test]
	fn clearing_returns_home() {
		let cfg = CameraConfig::default();
		let mut d = CameraDirector::new(cfg.clone());
		d.retarget(Some(&node("a", DVec3::X * 3.0)));
		for _ in 0..300 {
			d.tick(0.016);
		}
		d.retarget(None);
		assert_eq!(d.mode(), &CameraMode::Overview);
		assert_eq!(d.state().desired_position, cfg.home_position());
		assert_eq!(d.state().desired_target, cfg.home_target());
	}

	#[test]
	fn auto_rotates_only_in_overview() {
		let mut d = CameraDirector::new(CameraConfig::default());
		let start = d.state().current_position;
		d.tick(1.0);
		let moved = d.state().current_position;
		assert!(start.distance(moved) > 1e-4);
		// orbiting keeps the distance to the look-at point
		assert!((moved.length() - start.length()).abs() < 1e-9);

		d.retarget(Some(&node("a", DVec3::ZERO)));
		while d.is_animating() {
			d.tick(0.016);
		}
		let held = d.state().current_position;
		for _ in 0..100 {
			d.tick(0.016);
		}
		assert_eq!(d.state().current_position, held);
	}

	#[test]
	fn zoom_is_clamped() {
		let cfg = CameraConfig::default();
		let mut d = CameraDirector::new(cfg.clone());
		for _ in 0..100 {
			d.zoom(1.0);
		}
		let s = d.state();
		assert!((s.current_position.distance(s.current_target) - cfg.max_distance).abs() < 1e-9);
		for _ in 0..100 {
			d.zoom(-1.0);
		}
		let s = d.state();
		assert!((s.current_position.distance(s.current_target) - cfg.min_distance).abs() < 1e-9);
	}

	#[test]
	fn orbit_drag_never_flips_over_the_pole() {
		let mut d = CameraDirector::new(CameraConfig::default());
		d.orbit_drag(0.0, -10_000.0);
		let s = d.state();
		let offset = s.current_position - s.current_target;
		assert!(offset.y < offset.length());
		assert!((offset.length() - 5.0).abs() < 1e-9);
	}

	#[test]
	fn projects_target_to_center() {
		let view = CameraView::new(DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO, 45.0, 800.0, 600.0);
		let p = view.project(DVec3::ZERO).unwrap();
		assert!((p.x - 400.0).abs() < 1e-9 && (p.y - 300.0).abs() < 1e-9);
		assert!((p.depth - 5.0).abs() < 1e-9);

		let right = view.project(DVec3::X).unwrap();
		let up = view.project(DVec3::Y).unwrap();
		assert!(right.x > 400.0);
		assert!(up.y < 300.0);
		assert!(view.project(DVec3::new(0.0, 0.0, 10.0)).is_none());
	}

	#[test]
	fn nearer_points_appear_larger() {
		let view = CameraView::new(DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO, 45.0, 800.0, 600.0);
		let near = view.project(DVec3::new(0.0, 0.0, 2.0)).unwrap();
		let far = view.project(DVec3::new(0.0, 0.0, -5.0)).unwrap();
		assert!(near.scale > far.scale);
	}
}
