use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseError;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
	Draft,
	Open,
	Closed,
	Completed,
	Cancelled,
}
impl QuestStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Draft => "draft",
			Self::Open => "open",
			Self::Closed => "closed",
			Self::Completed => "completed",
			Self::Cancelled => "cancelled",
		}
	}

	pub fn is_terminal(self) -> bool {
		matches!(self, Self::Completed | Self::Cancelled)
	}

	pub fn can_transition_to(self, next: Self) -> bool {
		match (self, next) {
			(Self::Draft, Self::Open | Self::Cancelled) => true,
			(Self::Open, Self::Closed | Self::Completed | Self::Cancelled) => true,
			(Self::Closed, Self::Open | Self::Completed | Self::Cancelled) => true,
			_ => false,
		}
	}
}
impl FromStr for QuestStatus {
	type Err = ParseError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"draft" => Ok(Self::Draft),
			"open" => Ok(Self::Open),
			"closed" => Ok(Self::Closed),
			"completed" => Ok(Self::Completed),
			"cancelled" => Ok(Self::Cancelled),
			_ => Err(ParseError::new("quest status", value)),
		}
	}
}

/// Moderation state, independent of the scheduling lifecycle.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
	Pending,
	Approved,
	Rejected,
}
impl ReviewStatus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Pending => "pending",
			Self::Approved => "approved",
			Self::Rejected => "rejected",
		}
	}
}
impl FromStr for ReviewStatus {
	type Err = ParseError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"pending" => Ok(Self::Pending),
			"approved" => Ok(Self::Approved),
			"rejected" => Ok(Self::Rejected),
			_ => Err(ParseError::new("review status", value)),
		}
	}
}
