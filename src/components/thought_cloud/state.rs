use std::collections::HashMap;

use log::debug;

use super::camera::CameraDirector;
use super::config::VisualizerConfig;
use super::marker::MarkerAnimation;
use super::neighbors::{LinkSegment, neighbor_links};
use super::scene::{Lighting, SceneFrame, SceneInput, compose};
use super::types::DisplayNode;

/// Pointer travel, in pixels, below which a press/release is a click.
pub const CLICK_TOLERANCE: f64 = 4.0;

/// What a finished click landed on.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneEvent {
	NodeClicked(String),
	BackgroundClicked,
}

#[derive(Clone, Debug, Default)]
pub struct PointerState {
	pub down: bool,
	pub dragged: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub last_x: f64,
	pub last_y: f64,
}

/// Runtime of one mounted canvas. Rebuilt from scratch whenever the thought
/// list is replaced; survives filter and selection changes.
pub struct CloudState {
	pub cfg: VisualizerConfig,
	pub camera: CameraDirector,
	pub pointer: PointerState,
	pub hovered: Option<String>,
	pub width: f64,
	pub height: f64,
	nodes: Vec<DisplayNode>,
	selected: Option<String>,
	links: Vec<LinkSegment>,
	animations: HashMap<String, MarkerAnimation>,
	lighting: Lighting,
	elapsed: f64,
	frame: SceneFrame,
}

impl CloudState {
	pub fn new(cfg: VisualizerConfig, width: f64, height: f64) -> Self {
		let mut state = Self {
			camera: CameraDirector::new(cfg.camera.clone()),
			lighting: Lighting::from_config(&cfg.lighting),
			cfg,
			pointer: PointerState::default(),
			hovered: None,
			width,
			height,
			nodes: Vec::new(),
			selected: None,
			links: Vec::new(),
			animations: HashMap::new(),
			elapsed: 0.0,
			frame: SceneFrame::default(),
		};
		state.recompose();
		state
	}

	#[cfg(test)]
	pub fn links(&self) -> &[LinkSegment] {
		&self.links
	}

	#[cfg(test)]
	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	/// Seconds of animation since the canvas mounted.
	pub fn elapsed(&self) -> f64 {
		self.elapsed
	}

	pub fn frame(&self) -> &SceneFrame {
		&self.frame
	}

	/// Replace the active node set. Marker animations carry over for nodes
	/// that stay visible.
	pub fn set_nodes(&mut self, nodes: Vec<DisplayNode>) {
		self.animations
			.retain(|id, _| nodes.iter().any(|n| &n.id == id));
		for node in &nodes {
			self.animations.entry(node.id.clone()).or_default();
		}
		self.hovered = self
			.hovered
			.take()
			.filter(|h| nodes.iter().any(|n| &n.id == h));
		self.nodes = nodes;
		let selected = self.selected.take();
		self.set_selection(selected);
	}

	/// Apply a selection decided by the shell. Ids outside the node set clear.
	pub fn set_selection(&mut self, id: Option<String>) {
		let node = id
			.as_deref()
			.and_then(|id| self.nodes.iter().find(|n| n.id == id));
		self.camera.retarget(node);
		self.links = neighbor_links(node, &self.nodes, self.cfg.links.max_neighbors);
		self.selected = node.map(|n| n.id.clone());
		self.recompose();
	}

	pub fn tick(&mut self, dt: f64) {
		self.elapsed += dt;
		self.camera.tick(dt);
		for node in &self.nodes {
			let selected = self.selected.as_deref() == Some(node.id.as_str());
			let hovered = self.hovered.as_deref() == Some(node.id.as_str());
			if let Some(anim) = self.animations.get_mut(&node.id) {
				anim.update(&self.cfg.marker, self.elapsed, dt, selected, hovered);
			}
		}
		self.recompose();
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.recompose();
	}

	fn recompose(&mut self) {
		let view = self.camera.view(self.width, self.height);
		self.frame = compose(
			&SceneInput {
				nodes: &self.nodes,
				animations: &self.animations,
				selected: self.selected.as_deref(),
				links: &self.links,
			},
			&view,
			&self.lighting,
			&self.cfg,
		);
	}

	pub fn node_at_position(&self, x: f64, y: f64) -> Option<String> {
		self.frame.marker_at(x, y).map(str::to_owned)
	}

	pub fn set_hover(&mut self, node: Option<String>) {
		if self.hovered != node {
			debug!("hover {:?}", node);
			self.hovered = node;
		}
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.pointer = PointerState {
			down: true,
			dragged: false,
			start_x: x,
			start_y: y,
			last_x: x,
			last_y: y,
		};
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if !self.pointer.down {
			let hovered = self.node_at_position(x, y);
			self.set_hover(hovered);
			return;
		}
		let (sx, sy) = (x - self.pointer.start_x, y - self.pointer.start_y);
		if (sx * sx + sy * sy).sqrt() > CLICK_TOLERANCE {
			self.pointer.dragged = true;
		}
		if self.pointer.dragged {
			self.camera
				.orbit_drag(x - self.pointer.last_x, y - self.pointer.last_y);
		}
		self.pointer.last_x = x;
		self.pointer.last_y = y;
	}

	/// Finish a press. Returns the click target unless the press became a drag.
	pub fn pointer_up(&mut self, x: f64, y: f64) -> Option<SceneEvent> {
		let pointer = std::mem::take(&mut self.pointer);
		if !pointer.down || pointer.dragged {
			return None;
		}
		Some(match self.node_at_position(x, y) {
			Some(id) => SceneEvent::NodeClicked(id),
			None => SceneEvent::BackgroundClicked,
		})
	}

	pub fn pointer_leave(&mut self) {
		self.pointer = PointerState::default();
		self.set_hover(None);
	}

	pub fn wheel(&mut self, delta_y: f64) {
		self.camera.zoom(delta_y);
	}
}

#[cfg(test)]
mod tests {
	use glam::DVec3;

	use super::*;
	use crate::components::thought_cloud::camera::CameraMode;
	use crate::components::thought_cloud::types::Rgb;

	fn node(id: &str, label: u32, position: DVec3) -> DisplayNode {
		DisplayNode {
			id: id.into(),
			title: id.into(),
			excerpt: String::new(),
			position,
			label,
			color: Rgb::for_label(label),
		}
	}

	fn cloud() -> Vec<DisplayNode> {
		vec![
			node("a", 0, DVec3::ZERO),
			node("b", 0, DVec3::new(1.0, 0.5, 0.0)),
			node("c", 1, DVec3::new(-1.5, -0.5, 0.0)),
		]
	}

	fn state() -> CloudState {
		let mut s = CloudState::new(VisualizerConfig::default(), 800.0, 600.0);
		s.set_nodes(cloud());
		s
	}

	fn screen_pos(s: &CloudState, id: &str) -> (f64, f64) {
		let m = s.frame().markers.iter().find(|m| m.id == id).unwrap();
		(m.x, m.y)
	}

	#[test]
	fn selection_drives_camera_and_links() {
		let mut s = state();
		s.set_selection(Some("a".into()));
		assert_eq!(s.selected(), Some("a"));
		assert_eq!(s.camera.mode(), &CameraMode::Focused("a".into()));
		assert_eq!(s.links().len(), 1);

		s.set_selection(None);
		assert_eq!(s.camera.mode(), &CameraMode::Overview);
		assert!(s.links().is_empty());
	}

	#[test]
	fn unknown_selection_clears() {
		let mut s = state();
		s.set_selection(Some("zzz".into()));
		assert_eq!(s.selected(), None);
		assert_eq!(s.camera.mode(), &CameraMode::Overview);
	}

	#[test]
	fn filtering_out_selection_returns_to_overview() {
		let mut s = state();
		s.set_selection(Some("c".into()));
		s.set_nodes(cloud().into_iter().filter(|n| n.id != "c").collect());
		assert_eq!(s.selected(), None);
		assert_eq!(s.camera.mode(), &CameraMode::Overview);
		assert_eq!(s.frame().markers.len(), 2);
	}

	#[test]
	fn filter_keeps_surviving_selection() {
		let mut s = state();
		s.set_selection(Some("a".into()));
		s.set_nodes(cloud().into_iter().filter(|n| n.id != "c").collect());
		assert_eq!(s.selected(), Some("a"));
	}

	#[test]
	fn click_hits_marker_or_background() {
		let mut s = state();
		let (x, y) = screen_pos(&s, "b");
		s.pointer_down(x, y);
		assert_eq!(s.pointer_up(x, y), Some(SceneEvent::NodeClicked("b".into())));

		s.pointer_down(5.0, 5.0);
		assert_eq!(s.pointer_up(5.0, 5.0), Some(SceneEvent::BackgroundClicked));
	}

	#[test]
	fn drag_orbits_without_clicking() {
		let mut s = state();
		let before = s.camera.state().current_position;
		let (x, y) = screen_pos(&s, "b");
		s.pointer_down(x, y);
		s.pointer_move(x + 40.0, y);
		s.pointer_move(x + 80.0, y + 10.0);
		assert_eq!(s.pointer_up(x + 80.0, y + 10.0), None);
		assert_ne!(s.camera.state().current_position, before);
	}

	#[test]
	fn hover_follows_pointer() {
		let mut s = state();
		let (x, y) = screen_pos(&s, "c");
		s.pointer_move(x, y);
		assert_eq!(s.hovered.as_deref(), Some("c"));
		s.pointer_leave();
		assert_eq!(s.hovered, None);
	}

	#[test]
	fn selected_marker_grows_over_frames() {
		let mut s = state();
		s.set_selection(Some("b".into()));
		for _ in 0..120 {
			s.tick(1.0 / 60.0);
		}
		let b = s.frame().markers.iter().find(|m| m.id == "b").unwrap();
		assert!(b.selected);
		assert!(s.camera.state().current_target.distance(DVec3::new(1.0, 0.5, 0.0)) < 0.2);
	}
}
