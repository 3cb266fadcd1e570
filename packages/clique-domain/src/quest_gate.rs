use std::collections::HashSet;

use time::OffsetDateTime;

use crate::{affinity::Affinity, preferences};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectCode {
	RejectEmptyTitle,
	RejectTitleTooLong,
	RejectInvalidCapacity,
	RejectInvalidSchedule,
	RejectInvalidTrait,
	RejectDuplicateTrait,
}
impl RejectCode {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::RejectEmptyTitle => "REJECT_EMPTY_TITLE",
			Self::RejectTitleTooLong => "REJECT_TITLE_TOO_LONG",
			Self::RejectInvalidCapacity => "REJECT_INVALID_CAPACITY",
			Self::RejectInvalidSchedule => "REJECT_INVALID_SCHEDULE",
			Self::RejectInvalidTrait => "REJECT_INVALID_TRAIT",
			Self::RejectDuplicateTrait => "REJECT_DUPLICATE_TRAIT",
		}
	}

	pub fn message(self) -> &'static str {
		match self {
			Self::RejectEmptyTitle => "title must be non-empty.",
			Self::RejectTitleTooLong => "title exceeds the configured maximum length.",
			Self::RejectInvalidCapacity => "capacity must be greater than zero.",
			Self::RejectInvalidSchedule => "ends_at must not precede starts_at.",
			Self::RejectInvalidTrait => "trait_key must be non-empty and weight must be 0-100.",
			Self::RejectDuplicateTrait => "trait_key values must be unique.",
		}
	}

	/// Request field the rejection points at.
	pub fn field(self) -> &'static str {
		match self {
			Self::RejectEmptyTitle | Self::RejectTitleTooLong => "title",
			Self::RejectInvalidCapacity => "capacity",
			Self::RejectInvalidSchedule => "ends_at",
			Self::RejectInvalidTrait | Self::RejectDuplicateTrait => "affinities",
		}
	}
}

pub struct QuestDraft<'a> {
	pub title: &'a str,
	pub capacity: Option<i32>,
	pub starts_at: Option<OffsetDateTime>,
	pub ends_at: Option<OffsetDateTime>,
}

pub fn quest_gate(draft: &QuestDraft<'_>, cfg: &clique_config::Config) -> Result<(), RejectCode> {
	let title = draft.title.trim();

	if title.is_empty() {
		return Err(RejectCode::RejectEmptyTitle);
	}
	if title.chars().count() as u32 > cfg.matching.max_title_chars {
		return Err(RejectCode::RejectTitleTooLong);
	}
	if draft.capacity.is_some_and(|capacity| capacity <= 0) {
		return Err(RejectCode::RejectInvalidCapacity);
	}
	if let (Some(starts_at), Some(ends_at)) = (draft.starts_at, draft.ends_at)
		&& ends_at < starts_at
	{
		return Err(RejectCode::RejectInvalidSchedule);
	}

	Ok(())
}

/// Normalizes trait keys in place and rejects blank, out-of-range, or repeated entries.
pub fn affinity_gate(affinities: &mut [Affinity]) -> Result<(), RejectCode> {
	let mut seen = HashSet::new();

	for affinity in affinities.iter_mut() {
		affinity.trait_key = preferences::normalize_trait_key(&affinity.trait_key);

		if affinity.trait_key.is_empty() || affinity.weight > preferences::MAX_TRAIT_WEIGHT {
			return Err(RejectCode::RejectInvalidTrait);
		}
		if !seen.insert(affinity.trait_key.clone()) {
			return Err(RejectCode::RejectDuplicateTrait);
		}
	}

	Ok(())
}
