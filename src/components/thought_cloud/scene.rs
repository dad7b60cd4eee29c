use std::collections::HashMap;

use glam::DVec3;

use super::camera::CameraView;
use super::config::{LightingConfig, VisualizerConfig};
use super::marker::MarkerAnimation;
use super::neighbors::LinkSegment;
use super::types::{DisplayNode, Rgb};

/// Extra pixels around a marker that still count as a hit.
pub const HIT_SLOP: f64 = 4.0;

/// Ground bounce color of the hemisphere light, as a brightness factor.
const GROUND_LEVEL: f64 = 0x44 as f64 / 255.0;

/// Hemisphere fill plus one directional light.
#[derive(Clone, Debug, PartialEq)]
pub struct Lighting {
	pub hemisphere_intensity: f64,
	pub directional: DVec3,
	pub directional_intensity: f64,
}

impl Lighting {
	pub fn from_config(cfg: &LightingConfig) -> Self {
		Self {
			hemisphere_intensity: cfg.hemisphere_intensity,
			directional: DVec3::from_array(cfg.directional_position).normalize_or_zero(),
			directional_intensity: cfg.directional_intensity,
		}
	}

	/// Brightness factor for a surface facing `normal`.
	pub fn brightness(&self, normal: DVec3) -> f64 {
		let n = normal.normalize_or_zero();
		let sky_mix = n.y * 0.5 + 0.5;
		let hemisphere = self.hemisphere_intensity * (GROUND_LEVEL + (1.0 - GROUND_LEVEL) * sky_mix);
		let direct = self.directional_intensity * n.dot(self.directional).max(0.0);
		hemisphere + direct
	}
}

/// One marker, ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerSprite {
	pub id: String,
	pub x: f64,
	pub y: f64,
	pub depth: f64,
	pub radius: f64,
	pub rotation: f64,
	/// Shaded body color.
	pub fill: Rgb,
	/// Facet facing the directional light.
	pub highlight: Rgb,
	pub base: Rgb,
	pub selected: bool,
	pub hover_t: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkSprite {
	pub from: (f64, f64),
	pub to: (f64, f64),
	pub color: Rgb,
	pub opacity: f64,
}

/// Everything the renderer needs for one frame. Markers are ordered back to
/// front.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneFrame {
	pub width: f64,
	pub height: f64,
	pub markers: Vec<MarkerSprite>,
	pub links: Vec<LinkSprite>,
}

impl SceneFrame {
	/// Front-most marker under a screen point.
	pub fn marker_at(&self, x: f64, y: f64) -> Option<&str> {
		self.markers
			.iter()
			.rev()
			.find(|m| {
				let (dx, dy) = (m.x - x, m.y - y);
				(dx * dx + dy * dy).sqrt() <= m.radius + HIT_SLOP
			})
			.map(|m| m.id.as_str())
	}
}

/// What the composer reads; it owns none of it.
pub struct SceneInput<'a> {
	pub nodes: &'a [DisplayNode],
	pub animations: &'a HashMap<String, MarkerAnimation>,
	pub selected: Option<&'a str>,
	pub links: &'a [LinkSegment],
}

/// Place lights, markers and links for the given camera view.
pub fn compose(input: &SceneInput<'_>, view: &CameraView, lighting: &Lighting, cfg: &VisualizerConfig) -> SceneFrame {
	let default_anim = MarkerAnimation::default();
	let mut markers: Vec<MarkerSprite> = input
		.nodes
		.iter()
		.filter_map(|node| {
			let p = view.project(node.position)?;
			let anim = input.animations.get(&node.id).unwrap_or(&default_anim);
			let to_eye = view.eye - node.position;
			let toward_light = (to_eye.normalize_or_zero() + lighting.directional).normalize_or_zero();
			Some(MarkerSprite {
				id: node.id.clone(),
				x: p.x,
				y: p.y,
				depth: p.depth,
				radius: cfg.marker.base_radius * anim.display_scale(&cfg.marker) * p.scale,
				rotation: anim.rotation,
				fill: node.color.shade(lighting.brightness(to_eye)),
				highlight: node.color.shade(lighting.brightness(toward_light) * 1.15),
				base: node.color,
				selected: input.selected == Some(node.id.as_str()),
				hover_t: anim.hover_t,
			})
		})
		.collect();
	markers.sort_by(|a, b| b.depth.total_cmp(&a.depth));

	let links = input
		.links
		.iter()
		.filter_map(|link| {
			let (a, b) = (view.project(link.from)?, view.project(link.to)?);
			Some(LinkSprite {
				from: (a.x, a.y),
				to: (b.x, b.y),
				color: link.color,
				opacity: cfg.links.opacity,
			})
		})
		.collect();

	SceneFrame {
		width: view.width(),
		height: view.height(),
		markers,
		links,
	}
}
