//! Ranking-only affinity between a quest's trait weights and a user's trait weights.
//!
//! The score is a plain weighted average of the user's weights, weighted by the quest's weights,
//! over the traits both sides share. It is not normalized against a population.

use serde::{Deserialize, Serialize};

use crate::preferences::UserTraits;

pub const DEFAULT_NEUTRAL_SCORE: u8 = 50;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct Affinity {
	pub trait_key: String,
	pub weight: u8,
	pub explanation: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct TopMatch {
	pub trait_key: String,
	pub explanation: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct AffinityScore {
	pub score: u8,
	pub top_match: Option<TopMatch>,
}

pub fn calculate_affinity_score(affinities: &[Affinity], traits: &UserTraits) -> AffinityScore {
	calculate_affinity_score_with_neutral(affinities, traits, DEFAULT_NEUTRAL_SCORE)
}

pub fn calculate_affinity_score_with_neutral(
	affinities: &[Affinity],
	traits: &UserTraits,
	neutral_score: u8,
) -> AffinityScore {
	let mut score_sum = 0.0_f64;
	let mut weight_sum = 0.0_f64;
	let mut best: Option<(&Affinity, f64)> = None;

	for affinity in affinities {
		let Some(user_weight) = traits.get(&affinity.trait_key) else {
			continue;
		};
		let quest_weight = affinity.weight as f64;
		let contribution = quest_weight * user_weight as f64 / 100.0;

		score_sum += contribution;
		weight_sum += quest_weight;

		if best.map(|(_, top)| contribution > top).unwrap_or(true) {
			best = Some((affinity, contribution));
		}
	}

	if weight_sum <= 0.0 {
		return AffinityScore { score: neutral_score, top_match: None };
	}

	let score = (score_sum / weight_sum * 100.0).clamp(0.0, 100.0).round() as u8;
	let top_match = best.map(|(affinity, _)| TopMatch {
		trait_key: affinity.trait_key.clone(),
		explanation: affinity
			.explanation
			.as_deref()
			.map(str::trim)
			.filter(|text| !text.is_empty())
			.map(str::to_string)
			.unwrap_or_else(|| format!("Matches your {} side", affinity.trait_key)),
	});

	AffinityScore { score, top_match }
}
