use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use clique_domain::{
	affinity::Affinity,
	constraints::QuestConstraints,
	quest::Quest,
	quest_gate::{self, QuestDraft},
	quest_status::{QuestStatus, ReviewStatus},
	slug,
};
use clique_storage::{models::QuestRow, queries};

use crate::{Caller, CliqueService, Error, Result};

const MAX_SLUG_ATTEMPTS: u32 = 1_000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateQuestRequest {
	pub title: String,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default, with = "clique_domain::time_serde::option")]
	pub starts_at: Option<OffsetDateTime>,
	#[serde(default, with = "clique_domain::time_serde::option")]
	pub ends_at: Option<OffsetDateTime>,
	#[serde(default)]
	pub capacity: Option<i32>,
	#[serde(default)]
	pub constraints: Option<QuestConstraints>,
	#[serde(default)]
	pub affinities: Vec<Affinity>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetConstraintsRequest {
	pub constraints: QuestConstraints,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetAffinitiesRequest {
	pub affinities: Vec<Affinity>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionQuestRequest {
	pub status: QuestStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewQuestRequest {
	pub review_status: ReviewStatus,
}

/// A quest joined with its companion rows.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestDetail {
	pub quest: Quest,
	pub constraints: Option<QuestConstraints>,
	pub affinities: Vec<Affinity>,
}

impl CliqueService {
	pub async fn create_quest(
		&self,
		caller: &Caller,
		req: CreateQuestRequest,
	) -> Result<QuestDetail> {
		caller.require_author()?;

		let title = req.title.trim().to_string();

		quest_gate::quest_gate(
			&QuestDraft {
				title: &title,
				capacity: req.capacity,
				starts_at: req.starts_at,
				ends_at: req.ends_at,
			},
			&self.cfg,
		)?;

		let mut affinities = req.affinities;

		quest_gate::affinity_gate(&mut affinities)?;

		let now = OffsetDateTime::now_utc();
		let quest_id = Uuid::new_v4();
		let mut tx = self.db.pool.begin().await?;
		let slug = unique_slug(&mut tx, &title).await?;
		let row = QuestRow {
			quest_id,
			slug,
			title,
			description: req
				.description
				.map(|description| description.trim().to_string())
				.filter(|description| !description.is_empty()),
			starts_at: req.starts_at,
			ends_at: req.ends_at,
			status: QuestStatus::Draft.as_str().to_string(),
			review_status: ReviewStatus::Pending.as_str().to_string(),
			capacity: req.capacity,
			created_by: caller.user_id,
			created_at: now,
			updated_at: now,
		};

		queries::insert_quest(&mut *tx, &row).await?;

		if let Some(constraints) = req.constraints.as_ref() {
			queries::upsert_constraints(&mut *tx, quest_id, constraints, now).await?;
		}
		if !affinities.is_empty() {
			queries::replace_affinities(&mut tx, quest_id, &affinities).await?;
		}

		tx.commit().await?;

		tracing::info!(
			%quest_id,
			slug = row.slug.as_str(),
			created_by = %caller.user_id,
			"Quest created."
		);

		Ok(QuestDetail {
			quest: Quest::try_from(row)?,
			constraints: req.constraints,
			affinities,
		})
	}

	/// Members only see quests that are open and approved. Authors see every quest.
	pub async fn get_quest(&self, caller: &Caller, quest_id: Uuid) -> Result<QuestDetail> {
		let quest = self.load_quest(quest_id).await?;

		if !quest.is_matchable() && !caller.role.can_author_quests() {
			return Err(quest_not_found(quest_id));
		}

		self.load_detail(quest).await
	}

	pub async fn set_constraints(
		&self,
		caller: &Caller,
		quest_id: Uuid,
		req: SetConstraintsRequest,
	) -> Result<QuestDetail> {
		caller.require_author()?;

		let quest = self.load_quest(quest_id).await?;

		queries::upsert_constraints(
			&self.db.pool,
			quest_id,
			&req.constraints,
			OffsetDateTime::now_utc(),
		)
		.await?;

		self.load_detail(quest).await
	}

	pub async fn set_affinities(
		&self,
		caller: &Caller,
		quest_id: Uuid,
		req: SetAffinitiesRequest,
	) -> Result<QuestDetail> {
		caller.require_author()?;

		let mut affinities = req.affinities;

		quest_gate::affinity_gate(&mut affinities)?;

		let mut tx = self.db.pool.begin().await?;
		let row = queries::fetch_quest_for_update(&mut tx, quest_id).await?;

		queries::replace_affinities(&mut tx, quest_id, &affinities).await?;

		tx.commit().await?;

		tracing::info!(%quest_id, count = affinities.len(), "Quest affinities replaced.");

		self.load_detail(Quest::try_from(row)?).await
	}

	pub async fn transition_quest(
		&self,
		caller: &Caller,
		quest_id: Uuid,
		req: TransitionQuestRequest,
	) -> Result<Quest> {
		caller.require_admin()?;

		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await?;
		let mut quest = Quest::try_from(queries::fetch_quest_for_update(&mut tx, quest_id).await?)?;

		if !quest.status.can_transition_to(req.status) {
			return Err(Error::Conflict {
				message: format!(
					"Quest cannot move from {} to {}.",
					quest.status.as_str(),
					req.status.as_str()
				),
			});
		}

		queries::update_quest_status(&mut *tx, quest_id, req.status, now).await?;

		tx.commit().await?;

		tracing::info!(
			%quest_id,
			from = quest.status.as_str(),
			to = req.status.as_str(),
			"Quest status changed."
		);

		quest.status = req.status;
		quest.updated_at = now;

		Ok(quest)
	}

	pub async fn review_quest(
		&self,
		caller: &Caller,
		quest_id: Uuid,
		req: ReviewQuestRequest,
	) -> Result<Quest> {
		caller.require_admin()?;

		let now = OffsetDateTime::now_utc();
		let updated =
			queries::update_review_status(&self.db.pool, quest_id, req.review_status, now).await?;

		if updated == 0 {
			return Err(quest_not_found(quest_id));
		}

		tracing::info!(%quest_id, review_status = req.review_status.as_str(), "Quest reviewed.");

		self.load_quest(quest_id).await
	}

	async fn load_quest(&self, quest_id: Uuid) -> Result<Quest> {
		let row = queries::fetch_quest(&self.db.pool, quest_id)
			.await?
			.ok_or_else(|| quest_not_found(quest_id))?;

		Ok(Quest::try_from(row)?)
	}

	async fn load_detail(&self, quest: Quest) -> Result<QuestDetail> {
		let ids = [quest.quest_id];
		let constraints = self.load_constraints(&ids).await?.remove(&quest.quest_id);
		let affinities =
			self.load_affinities(&ids).await?.remove(&quest.quest_id).unwrap_or_default();

		Ok(QuestDetail { quest, constraints, affinities })
	}
}

async fn unique_slug(conn: &mut sqlx::PgConnection, title: &str) -> Result<String> {
	let base = slug::slugify(title);

	if !queries::slug_exists(&mut *conn, &base).await? {
		return Ok(base);
	}

	for n in 2..=MAX_SLUG_ATTEMPTS {
		let candidate = slug::with_suffix(&base, n);

		if !queries::slug_exists(&mut *conn, &candidate).await? {
			return Ok(candidate);
		}
	}

	Err(Error::Conflict { message: format!("No free slug remains for {base:?}.") })
}

fn quest_not_found(quest_id: Uuid) -> Error {
	Error::NotFound { message: format!("Quest {quest_id} does not exist.") }
}
