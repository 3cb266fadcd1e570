use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use clique_domain::{
	affinity::Affinity,
	constraints::QuestConstraints,
	preferences::{MatchingFilters, UserTraits},
	quest::Quest,
	ranking::{self, FilteredQuest, QuestCandidate},
};
use clique_storage::queries;

use crate::{Caller, CliqueService, Error, Result};

/// Matching inputs. Any part left out is derived from the caller's stored preferences.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MatchRequest {
	#[serde(default)]
	pub filters: Option<MatchingFilters>,
	#[serde(default)]
	pub traits: Option<UserTraits>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchResponse {
	pub items: Vec<FilteredQuest>,
	pub excluded_count: usize,
}

impl CliqueService {
	pub async fn match_quests(&self, caller: &Caller, req: MatchRequest) -> Result<MatchResponse> {
		let today = OffsetDateTime::now_utc().date();

		self.match_quests_on(caller, req, today).await
	}

	/// Same as [`Self::match_quests`] with an explicit calendar date for age checks.
	pub async fn match_quests_on(
		&self,
		caller: &Caller,
		req: MatchRequest,
		today: Date,
	) -> Result<MatchResponse> {
		let (filters, traits) = match (req.filters, req.traits) {
			(Some(filters), Some(traits)) => (filters, traits),
			(filters, traits) => {
				let preferences = self.load_preferences(caller.user_id).await?;

				(
					filters.unwrap_or_else(|| MatchingFilters::from_preferences(&preferences)),
					traits.unwrap_or_else(|| UserTraits::from_preferences(&preferences)),
				)
			},
		};

		self.rank_open_quests(&filters, &traits, today).await
	}

	/// Ranks quests for a user purely from their stored preferences.
	pub async fn match_for_user(&self, user_id: Uuid) -> Result<MatchResponse> {
		let preferences = self.load_preferences(user_id).await?;
		let filters = MatchingFilters::from_preferences(&preferences);
		let traits = UserTraits::from_preferences(&preferences);

		self.rank_open_quests(&filters, &traits, OffsetDateTime::now_utc().date()).await
	}

	/// Fetches open, approved quests and ranks them for the given inputs.
	pub async fn rank_open_quests(
		&self,
		filters: &MatchingFilters,
		traits: &UserTraits,
		today: Date,
	) -> Result<MatchResponse> {
		let candidates = self.load_candidates().await?;
		let candidate_count = candidates.len();
		let outcome = ranking::rank_quests_with_exclusions(
			candidates,
			filters,
			traits,
			today,
			self.cfg.matching.neutral_score,
		);

		for exclusion in &outcome.excluded {
			tracing::debug!(
				quest_id = %exclusion.quest.quest_id,
				reason = exclusion.reason.as_str(),
				"Quest excluded by hard filter."
			);
		}

		tracing::info!(
			candidates = candidate_count,
			matched = outcome.items.len(),
			excluded = outcome.excluded.len(),
			"Ranked quests."
		);

		Ok(MatchResponse { excluded_count: outcome.excluded.len(), items: outcome.items })
	}

	pub(crate) async fn load_preferences(&self, user_id: Uuid) -> Result<Value> {
		let profile = queries::fetch_profile(&self.db.pool, user_id)
			.await?
			.ok_or_else(|| Error::NotFound { message: "Profile does not exist.".to_string() })?;

		Ok(profile.preferences)
	}

	async fn load_candidates(&self) -> Result<Vec<QuestCandidate>> {
		let quests = queries::fetch_matchable_quests(&self.db.pool)
			.await?
			.into_iter()
			.map(Quest::try_from)
			.collect::<Result<Vec<_>, _>>()?;

		if quests.is_empty() {
			return Ok(Vec::new());
		}

		let quest_ids: Vec<Uuid> = quests.iter().map(|quest| quest.quest_id).collect();
		let mut constraints = self.load_constraints(&quest_ids).await?;
		let mut affinities = self.load_affinities(&quest_ids).await?;

		Ok(quests
			.into_iter()
			.map(|quest| QuestCandidate {
				constraints: constraints.remove(&quest.quest_id),
				affinities: affinities.remove(&quest.quest_id).unwrap_or_default(),
				quest,
			})
			.collect())
	}

	pub(crate) async fn load_constraints(
		&self,
		quest_ids: &[Uuid],
	) -> Result<HashMap<Uuid, QuestConstraints>> {
		let mut by_quest = HashMap::new();

		for row in queries::fetch_constraints(&self.db.pool, quest_ids).await? {
			let quest_id = row.quest_id;

			by_quest.insert(quest_id, QuestConstraints::try_from(row)?);
		}

		Ok(by_quest)
	}

	pub(crate) async fn load_affinities(
		&self,
		quest_ids: &[Uuid],
	) -> Result<HashMap<Uuid, Vec<Affinity>>> {
		let mut by_quest: HashMap<Uuid, Vec<Affinity>> = HashMap::new();

		for row in queries::fetch_affinities(&self.db.pool, quest_ids).await? {
			let quest_id = row.quest_id;

			by_quest.entry(quest_id).or_default().push(Affinity::try_from(row)?);
		}

		Ok(by_quest)
	}
}
