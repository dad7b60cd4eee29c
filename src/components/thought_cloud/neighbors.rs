use glam::DVec3;

use super::types::{DisplayNode, Rgb};

/// A drawn segment from the selected node to one of its neighbors.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkSegment {
	pub from: DVec3,
	pub to: DVec3,
	pub color: Rgb,
}

/// The `k` same-label nodes closest to `selected`, nearest first.
///
/// Ties keep their order in `nodes`.
pub fn nearest_neighbors<'a>(
	selected: &DisplayNode,
	nodes: &'a [DisplayNode],
	k: usize,
) -> Vec<&'a DisplayNode> {
	let mut candidates: Vec<(f64, &DisplayNode)> = nodes
		.iter()
		.filter(|n| n.label == selected.label && n.id != selected.id)
		.map(|n| (n.position.distance(selected.position), n))
		.collect();
	candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
	candidates.into_iter().take(k).map(|(_, n)| n).collect()
}

/// Link geometry for the current selection; empty without one.
pub fn neighbor_links(selected: Option<&DisplayNode>, nodes: &[DisplayNode], k: usize) -> Vec<LinkSegment> {
	let Some(selected) = selected else {
		return Vec::new();
	};
	nearest_neighbors(selected, nodes, k)
		.into_iter()
		.map(|n| LinkSegment {
			from: selected.position,
			to: n.position,
			color: selected.color,
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

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
			node("sel", 1, DVec3::ZERO),
			node("far", 1, DVec3::X * 9.0),
			node("other-label", 2, DVec3::X * 0.1),
			node("near", 1, DVec3::Y),
			node("mid", 1, DVec3::Z * 3.0),
			node("tie-a", 1, DVec3::X * 2.0),
			node("tie-b", 1, DVec3::Y * -2.0),
			node("mid2", 1, DVec3::Z * -5.0),
		]
	}

	#[test]
	fn at_most_four_same_label_sorted() {
		let nodes = cloud();
		let sel = &nodes[0];
		let found = nearest_neighbors(sel, &nodes, 4);
		assert_eq!(found.len(), 4);
		assert!(found.iter().all(|n| n.label == sel.label && n.id != sel.id));
		let dists: Vec<f64> = found.iter().map(|n| n.position.distance(sel.position)).collect();
		assert!(dists.windows(2).all(|w| w[0] <= w[1]));
		let ids: Vec<&str> = found.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["near", "tie-a", "tie-b", "mid"]);
	}

	#[test]
	fn no_same_label_peers_means_no_links() {
		let nodes = cloud();
		let lonely = &nodes[2];
		assert!(nearest_neighbors(lonely, &nodes, 4).is_empty());
		assert!(neighbor_links(Some(lonely), &nodes, 4).is_empty());
	}

	#[test]
	fn no_selection_means_no_links() {
		assert!(neighbor_links(None, &cloud(), 4).is_empty());
	}

	#[test]
	fn links_start_at_selection() {
		let nodes = cloud();
		let links = neighbor_links(Some(&nodes[3]), &nodes, 4);
		assert_eq!(links.len(), 4);
		for link in &links {
			assert_eq!(link.from, nodes[3].position);
			assert_eq!(link.color, nodes[3].color);
		}
		assert_eq!(links[0].to, DVec3::ZERO);
	}
}
