use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
	affinity::{self, Affinity},
	constraints::QuestConstraints,
	hard_filter,
	preferences::{MatchingFilters, UserTraits},
	quest::Quest,
};

/// A quest joined with its companion rows, ready to be filtered and scored.
#[derive(Clone, Debug)]
pub struct QuestCandidate {
	pub quest: Quest,
	pub constraints: Option<QuestConstraints>,
	pub affinities: Vec<Affinity>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct FilteredQuest {
	pub quest: Quest,
	pub constraints: Option<QuestConstraints>,
	pub affinities: Vec<Affinity>,
	pub match_score: u8,
	pub match_reason: Option<String>,
	pub top_trait: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Exclusion {
	pub quest: Quest,
	pub reason: String,
}

#[derive(Clone, Debug, Default)]
pub struct RankOutcome {
	pub items: Vec<FilteredQuest>,
	pub excluded: Vec<Exclusion>,
}

pub fn rank_quests(
	candidates: Vec<QuestCandidate>,
	filters: &MatchingFilters,
	traits: &UserTraits,
	today: Date,
	neutral_score: u8,
) -> Vec<FilteredQuest> {
	rank_quests_with_exclusions(candidates, filters, traits, today, neutral_score).items
}

/// Applies the hard filter then the affinity scorer to each candidate exactly once.
///
/// Survivors are ordered by score descending, then start date ascending with undated quests
/// last. The sort is stable, so complete ties keep their input order.
pub fn rank_quests_with_exclusions(
	candidates: Vec<QuestCandidate>,
	filters: &MatchingFilters,
	traits: &UserTraits,
	today: Date,
	neutral_score: u8,
) -> RankOutcome {
	let mut outcome = RankOutcome::default();

	for QuestCandidate { quest, constraints, affinities } in candidates {
		let verdict = hard_filter::passes_hard_filter(constraints.as_ref(), filters, today);

		if !verdict.passes {
			let reason = verdict.reason.unwrap_or_default();

			outcome.excluded.push(Exclusion { quest, reason });

			continue;
		}

		let scored =
			affinity::calculate_affinity_score_with_neutral(&affinities, traits, neutral_score);
		let (match_reason, top_trait) = match scored.top_match {
			Some(top) => (Some(top.explanation), Some(top.trait_key)),
			None => (None, None),
		};

		outcome.items.push(FilteredQuest {
			quest,
			constraints,
			affinities,
			match_score: scored.score,
			match_reason,
			top_trait,
		});
	}

	outcome.items.sort_by(compare_ranked);

	outcome
}

fn compare_ranked(left: &FilteredQuest, right: &FilteredQuest) -> Ordering {
	right.match_score.cmp(&left.match_score).then_with(|| {
		match (left.quest.starts_at, right.quest.starts_at) {
			(Some(a), Some(b)) => a.cmp(&b),
			(Some(_), None) => Ordering::Less,
			(None, Some(_)) => Ordering::Greater,
			(None, None) => Ordering::Equal,
		}
	})
}
