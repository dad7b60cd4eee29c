use glam::DVec3;

/// Translate `positions` so their centroid sits at the origin.
///
/// The input must be non-empty; callers skip rendering for empty thought
/// lists rather than normalizing nothing.
pub fn center_positions(positions: &[DVec3]) -> Vec<DVec3> {
	debug_assert!(!positions.is_empty(), "cannot center an empty point set");
	let centroid = positions.iter().copied().sum::<DVec3>() / positions.len() as f64;
	positions.iter().map(|p| *p - centroid).collect()
}
