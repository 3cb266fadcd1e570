pub mod affinity;
pub mod constraints;
pub mod hard_filter;
pub mod preferences;
pub mod quest;
pub mod quest_gate;
pub mod quest_status;
pub mod ranking;
pub mod session;
pub mod slug;
pub mod time_serde;

/// A stored enum value did not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown {kind} value {value:?}.")]
pub struct ParseError {
	pub kind: &'static str,
	pub value: String,
}
impl ParseError {
	pub(crate) fn new(kind: &'static str, value: &str) -> Self {
		Self { kind, value: value.to_string() }
	}
}
