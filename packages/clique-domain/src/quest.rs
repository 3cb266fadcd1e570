use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::quest_status::{QuestStatus, ReviewStatus};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Quest {
	pub quest_id: Uuid,
	pub slug: String,
	pub title: String,
	pub description: Option<String>,
	#[serde(default, with = "crate::time_serde::option")]
	pub starts_at: Option<OffsetDateTime>,
	#[serde(default, with = "crate::time_serde::option")]
	pub ends_at: Option<OffsetDateTime>,
	pub status: QuestStatus,
	pub review_status: ReviewStatus,
	pub capacity: Option<i32>,
	pub created_by: Uuid,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl Quest {
	/// Whether the quest is visible to matching at all.
	pub fn is_matchable(&self) -> bool {
		self.status == QuestStatus::Open && self.review_status == ReviewStatus::Approved
	}
}
