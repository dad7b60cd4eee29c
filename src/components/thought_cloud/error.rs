use thiserror::Error;

/// Failures while turning upstream payloads into renderable nodes.
#[derive(Debug, Error)]
pub enum ThoughtError {
	#[error("thought {id}: expected 3 coordinates, found {found}")]
	PositionArity { id: String, found: usize },

	#[error("thought {id}: position has a non-finite coordinate")]
	NonFinitePosition { id: String },

	#[error("invalid payload: {0}")]
	Payload(#[from] serde_json::Error),
}
