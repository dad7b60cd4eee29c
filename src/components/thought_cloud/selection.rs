//! View state for the thought cloud: the search query and the selection.
//!
//! Every transition returns a fresh snapshot, so the shell can hold the state
//! in a single signal and tests can drive it without a DOM.

use log::debug;

use super::types::DisplayNode;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
	pub query: String,
	/// Id of the selected node, always one of the active nodes.
	pub selected: Option<String>,
}

impl ViewState {
	/// Select `id`. Selecting something outside the active set clears instead.
	pub fn select(&self, id: &str, active: &[DisplayNode]) -> Self {
		let selected = active.iter().any(|n| n.id == id).then(|| id.to_string());
		debug!("select {id} -> {selected:?}");
		Self {
			query: self.query.clone(),
			selected,
		}
	}

	/// Click behavior: focus an unselected node, unfocus the selected one.
	pub fn toggle(&self, id: &str, active: &[DisplayNode]) -> Self {
		if self.selected.as_deref() == Some(id) {
			self.clear()
		} else {
			self.select(id, active)
		}
	}

	pub fn clear(&self) -> Self {
		Self {
			query: self.query.clone(),
			selected: None,
		}
	}

	/// Change the filter, dropping a selection the new filter hides.
	pub fn set_query(&self, query: impl Into<String>, nodes: &[DisplayNode]) -> Self {
		let query = query.into();
		let selected = self.selected.clone().filter(|id| {
			nodes
				.iter()
				.any(|n| &n.id == id && matches_query(n, &query))
		});
		Self { query, selected }
	}

	/// The selected node, if it is still among `active`.
	pub fn selected_node<'a>(&self, active: &'a [DisplayNode]) -> Option<&'a DisplayNode> {
		let id = self.selected.as_deref()?;
		active.iter().find(|n| n.id == id)
	}
}

/// Case-insensitive substring match on title, excerpt, or label.
/// A blank query matches everything; otherwise whitespace is significant.
pub fn matches_query(node: &DisplayNode, query: &str) -> bool {
	if query.trim().is_empty() {
		return true;
	}
	let query = query.to_lowercase();
	node.title.to_lowercase().contains(&query)
		|| node.excerpt.to_lowercase().contains(&query)
		|| node.label.to_string().contains(&query)
}

/// Nodes visible under `query`, in their original order.
pub fn filter_nodes(nodes: &[DisplayNode], query: &str) -> Vec<DisplayNode> {
	nodes
		.iter()
		.filter(|n| matches_query(n, query))
		.cloned()
		.collect()
}
