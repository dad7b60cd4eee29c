use glam::DVec3;
use log::warn;
use serde::Deserialize;

use super::error::ThoughtError;
use super::normalize::center_positions;

/// Cluster palette, indexed by `label % PALETTE.len()`.
pub const PALETTE: &[Rgb] = &[
	Rgb(0xbe, 0x12, 0x3c),
	Rgb(0x0e, 0xa5, 0xe9),
	Rgb(0x16, 0xa3, 0x4a),
	Rgb(0xd9, 0x77, 0x06),
	Rgb(0x8b, 0x5c, 0xf6),
	Rgb(0xec, 0x48, 0x99),
	Rgb(0xf5, 0x9e, 0x0b),
	Rgb(0x14, 0xb8, 0xa6),
	Rgb(0x63, 0x66, 0xf1),
	Rgb(0x84, 0xcc, 0x16),
];

/// An sRGB display color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
	/// Resolve the palette color for a cluster label.
	pub fn for_label(label: u32) -> Self {
		PALETTE[label as usize % PALETTE.len()]
	}

	/// Multiply each channel by `factor`, saturating at white.
	pub fn shade(self, factor: f64) -> Self {
		let f = |c: u8| (c as f64 * factor).round().clamp(0.0, 255.0) as u8;
		Self(f(self.0), f(self.1), f(self.2))
	}

	pub fn css(self) -> String {
		format!("rgb({}, {}, {})", self.0, self.1, self.2)
	}

	pub fn css_alpha(self, alpha: f64) -> String {
		format!("rgba({}, {}, {}, {})", self.0, self.1, self.2, alpha)
	}
}

/// A thought as delivered by the backend, already embedded and clustered.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ThoughtRecord {
	pub id: String,
	pub title: String,
	pub excerpt: String,
	/// Absolute coordinates. A `null` entry is how upstream serializes a
	/// non-finite number.
	pub position: Vec<Option<f64>>,
	pub label: u32,
	#[serde(default)]
	pub created_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ThoughtPayload {
	Envelope { thoughts: Vec<serde_json::Value> },
	Bare(Vec<serde_json::Value>),
}

/// Parse a thought list, either a bare array or `{"thoughts": [...]}`.
///
/// Only the outer shape can fail; a record that does not fit is logged and
/// dropped on its own.
pub fn parse_thoughts(json: &str) -> Result<Vec<ThoughtRecord>, ThoughtError> {
	let values = match serde_json::from_str(json)? {
		ThoughtPayload::Envelope { thoughts } => thoughts,
		ThoughtPayload::Bare(thoughts) => thoughts,
	};
	Ok(values
		.into_iter()
		.enumerate()
		.filter_map(|(i, value)| match serde_json::from_value(value) {
			Ok(record) => Some(record),
			Err(e) => {
				warn!("skipping thought #{i}: {}", ThoughtError::from(e));
				None
			}
		})
		.collect())
}

/// A thought placed in the cloud: normalized position plus resolved color.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayNode {
	pub id: String,
	pub title: String,
	pub excerpt: String,
	pub position: DVec3,
	pub label: u32,
	pub color: Rgb,
}

impl DisplayNode {
	/// Validate a record. The position is kept absolute; callers recenter.
	pub fn try_from_record(record: &ThoughtRecord) -> Result<Self, ThoughtError> {
		let &[x, y, z] = record.position.as_slice() else {
			return Err(ThoughtError::PositionArity {
				id: record.id.clone(),
				found: record.position.len(),
			});
		};
		let (Some(x), Some(y), Some(z)) = (x, y, z) else {
			return Err(ThoughtError::NonFinitePosition {
				id: record.id.clone(),
			});
		};
		let position = DVec3::new(x, y, z);
		if !position.is_finite() {
			return Err(ThoughtError::NonFinitePosition {
				id: record.id.clone(),
			});
		}
		Ok(Self {
			id: record.id.clone(),
			title: record.title.clone(),
			excerpt: record.excerpt.clone(),
			position,
			label: record.label,
			color: Rgb::for_label(record.label),
		})
	}
}

/// Build the display set for a thought list. Malformed records are logged and
/// skipped; the survivors are recentered on their centroid.
pub fn build_display_nodes(records: &[ThoughtRecord]) -> Vec<DisplayNode> {
	let mut nodes: Vec<DisplayNode> = records
		.iter()
		.filter_map(|record| match DisplayNode::try_from_record(record) {
			Ok(node) => Some(node),
			Err(e) => {
				warn!("skipping thought: {e}");
				None
			}
		})
		.collect();
	if nodes.is_empty() {
		return nodes;
	}

	let raw: Vec<DVec3> = nodes.iter().map(|n| n.position).collect();
	for (node, position) in nodes.iter_mut().zip(center_positions(&raw)) {
		node.position = position;
	}
	nodes
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(id: &str, position: Vec<f64>, label: u32) -> ThoughtRecord {
		ThoughtRecord {
			id: id.into(),
			title: format!("title {id}"),
			excerpt: format!("excerpt {id}"),
			position: position.into_iter().map(Some).collect(),
			label,
			created_at: None,
		}
	}

	#[test]
	fn same_label_same_color() {
		assert_eq!(Rgb::for_label(3), Rgb::for_label(3));
		for k in 0..25 {
			assert_eq!(Rgb::for_label(k), Rgb::for_label(k + PALETTE.len() as u32));
		}
	}

	#[test]
	fn large_labels_resolve() {
		assert_eq!(Rgb::for_label(u32::MAX), PALETTE[u32::MAX as usize % PALETTE.len()]);
	}

	#[test]
	fn malformed_records_are_skipped() {
		let records = vec![
			record("a", vec![1.0, 2.0, 3.0], 0),
			record("short", vec![1.0, 2.0], 0),
			record("nan", vec![1.0, f64::NAN, 3.0], 1),
			record("inf", vec![f64::INFINITY, 0.0, 0.0], 1),
			record("b", vec![3.0, 2.0, 1.0], 1),
		];
		let nodes = build_display_nodes(&records);
		let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["a", "b"]);
		assert_eq!(nodes[0].position, DVec3::new(-1.0, 0.0, 1.0));
		assert_eq!(nodes[1].position, DVec3::new(1.0, 0.0, -1.0));
	}

	#[test]
	fn arity_error_reports_count() {
		let err = DisplayNode::try_from_record(&record("x", vec![1.0; 4], 0)).unwrap_err();
		assert!(matches!(err, ThoughtError::PositionArity { found: 4, .. }));
	}

	#[test]
	fn empty_and_all_invalid_lists_yield_no_nodes() {
		assert!(build_display_nodes(&[]).is_empty());
		assert!(build_display_nodes(&[record("bad", vec![], 0)]).is_empty());
	}

	#[test]
	fn parses_envelope_and_bare_array() {
		let bare = r#"[{"id":"1","title":"t","excerpt":"e","position":[0,1,2],"label":2}]"#;
		let envelope = r#"{"thoughts":[{"id":"1","title":"t","excerpt":"e","position":[0,1,2],"label":2,"created_at":"2025-01-01T00:00:00Z"}]}"#;
		let a = parse_thoughts(bare).unwrap();
		let b = parse_thoughts(envelope).unwrap();
		assert_eq!(a.len(), 1);
		assert_eq!(a[0].position, vec![Some(0.0), Some(1.0), Some(2.0)]);
		assert_eq!(b[0].created_at.as_deref(), Some("2025-01-01T00:00:00Z"));
	}

	#[test]
	fn null_coordinate_drops_only_that_thought() {
		let json = r#"{"thoughts":[
			{"id":"ok","title":"t","excerpt":"e","position":[0,1,2],"label":0},
			{"id":"nan","title":"t","excerpt":"e","position":[0,null,2],"label":0},
			{"id":"no-title","excerpt":"e","position":[1,1,1],"label":0},
			{"id":"ok2","title":"t","excerpt":"e","position":[2,1,0],"label":1}
		]}"#;
		let records = parse_thoughts(json).unwrap();
		assert_eq!(records.len(), 3);
		assert!(matches!(
			DisplayNode::try_from_record(&records[1]),
			Err(ThoughtError::NonFinitePosition { .. })
		));
		let ids: Vec<String> = build_display_nodes(&records).into_iter().map(|n| n.id).collect();
		assert_eq!(ids, ["ok", "ok2"]);
	}

	#[test]
	fn rejects_garbage_payload() {
		assert!(matches!(parse_thoughts("{\"nope\": 1}"), Err(ThoughtError::Payload(_))));
	}

	#[test]
	fn shade_saturates() {
		assert_eq!(Rgb(200, 100, 0).shade(2.0), Rgb(255, 200, 0));
		assert_eq!(Rgb(200, 100, 0).shade(0.5), Rgb(100, 50, 0));
	}
}
