use serde_json::Value;
use sqlx::{Executor, PgConnection, Postgres};
use time::OffsetDateTime;
use uuid::Uuid;

use clique_domain::{
	affinity::Affinity,
	constraints::QuestConstraints,
	quest_status::{QuestStatus, ReviewStatus},
};

use crate::{
	Error, Result,
	models::{ProfileRow, QuestAffinityRow, QuestConstraintsRow, QuestRow, SessionRow},
};

const QUEST_COLUMNS: &str = "\
quest_id, slug, title, description, starts_at, ends_at, status, review_status, capacity, \
created_by, created_at, updated_at";

pub async fn fetch_matchable_quests<'e, E>(executor: E) -> Result<Vec<QuestRow>>
where
	E: Executor<'e, Database = Postgres>,
{
	let sql = format!(
		"\
SELECT {QUEST_COLUMNS}
FROM quests
WHERE status = 'open' AND review_status = 'approved'
ORDER BY starts_at ASC NULLS LAST, quest_id ASC"
	);
	let rows = sqlx::query_as::<_, QuestRow>(&sql).fetch_all(executor).await?;

	Ok(rows)
}

pub async fn fetch_quest<'e, E>(executor: E, quest_id: Uuid) -> Result<Option<QuestRow>>
where
	E: Executor<'e, Database = Postgres>,
{
	let sql = format!("SELECT {QUEST_COLUMNS} FROM quests WHERE quest_id = $1");
	let row = sqlx::query_as::<_, QuestRow>(&sql).bind(quest_id).fetch_optional(executor).await?;

	Ok(row)
}

pub async fn fetch_quest_for_update(conn: &mut PgConnection, quest_id: Uuid) -> Result<QuestRow> {
	let sql = format!("SELECT {QUEST_COLUMNS} FROM quests WHERE quest_id = $1 FOR UPDATE");

	sqlx::query_as::<_, QuestRow>(&sql)
		.bind(quest_id)
		.fetch_optional(conn)
		.await?
		.ok_or_else(|| Error::NotFound(format!("Quest {quest_id} does not exist.")))
}

pub async fn slug_exists<'e, E>(executor: E, slug: &str) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM quests WHERE slug = $1)")
		.bind(slug)
		.fetch_one(executor)
		.await?;

	Ok(exists)
}

pub async fn insert_quest<'e, E>(executor: E, quest: &QuestRow) -> Result<()>
where
	E: Executor<'e, Database = Postgres>,
{
	sqlx::query(
		"\
INSERT INTO quests (
	quest_id,
	slug,
	title,
	description,
	starts_at,
	ends_at,
	status,
	review_status,
	capacity,
	created_by,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
	)
	.bind(quest.quest_id)
	.bind(quest.slug.as_str())
	.bind(quest.title.as_str())
	.bind(quest.description.as_deref())
	.bind(quest.starts_at)
	.bind(quest.ends_at)
	.bind(quest.status.as_str())
	.bind(quest.review_status.as_str())
	.bind(quest.capacity)
	.bind(quest.created_by)
	.bind(quest.created_at)
	.bind(quest.updated_at)
	.execute(executor)
	.await
	.map_err(|err| {
		if err.as_database_error().is_some_and(|db_err| db_err.is_unique_violation()) {
			Error::DuplicateSlug(quest.slug.clone())
		} else {
			Error::Sqlx(err)
		}
	})?;

	Ok(())
}

pub async fn update_quest_status<'e, E>(
	executor: E,
	quest_id: Uuid,
	status: QuestStatus,
	now: OffsetDateTime,
) -> Result<()>
where
	E: Executor<'e, Database = Postgres>,
{
	sqlx::query("UPDATE quests SET status = $1, updated_at = $2 WHERE quest_id = $3")
		.bind(status.as_str())
		.bind(now)
		.bind(quest_id)
		.execute(executor)
		.await?;

	Ok(())
}

pub async fn update_review_status<'e, E>(
	executor: E,
	quest_id: Uuid,
	review_status: ReviewStatus,
	now: OffsetDateTime,
) -> Result<u64>
where
	E: Executor<'e, Database = Postgres>,
{
	let result =
		sqlx::query("UPDATE quests SET review_status = $1, updated_at = $2 WHERE quest_id = $3")
			.bind(review_status.as_str())
			.bind(now)
			.bind(quest_id)
			.execute(executor)
			.await?;

	Ok(result.rows_affected())
}

pub async fn fetch_constraints<'e, E>(
	executor: E,
	quest_ids: &[Uuid],
) -> Result<Vec<QuestConstraintsRow>>
where
	E: Executor<'e, Database = Postgres>,
{
	let rows = sqlx::query_as::<_, QuestConstraintsRow>(
		"\
SELECT quest_id, alcohol, age_requirement, accessibility, physical_intensity
FROM quest_constraints
WHERE quest_id = ANY($1)",
	)
	.bind(quest_ids)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn upsert_constraints<'e, E>(
	executor: E,
	quest_id: Uuid,
	constraints: &QuestConstraints,
	now: OffsetDateTime,
) -> Result<()>
where
	E: Executor<'e, Database = Postgres>,
{
	sqlx::query(
		"\
INSERT INTO quest_constraints (
	quest_id,
	alcohol,
	age_requirement,
	accessibility,
	physical_intensity,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6)
ON CONFLICT (quest_id) DO UPDATE
SET
	alcohol = EXCLUDED.alcohol,
	age_requirement = EXCLUDED.age_requirement,
	accessibility = EXCLUDED.accessibility,
	physical_intensity = EXCLUDED.physical_intensity,
	updated_at = EXCLUDED.updated_at",
	)
	.bind(quest_id)
	.bind(constraints.alcohol.map(|value| value.as_str()))
	.bind(constraints.age_requirement.map(|value| value.as_str()))
	.bind(constraints.accessibility.map(|value| value.as_str()))
	.bind(constraints.physical_intensity.map(|value| value.as_str()))
	.bind(now)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn fetch_affinities<'e, E>(
	executor: E,
	quest_ids: &[Uuid],
) -> Result<Vec<QuestAffinityRow>>
where
	E: Executor<'e, Database = Postgres>,
{
	let rows = sqlx::query_as::<_, QuestAffinityRow>(
		"\
SELECT affinity_id, quest_id, trait_key, weight, explanation
FROM quest_personality_affinities
WHERE quest_id = ANY($1)
ORDER BY quest_id, trait_key",
	)
	.bind(quest_ids)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

/// Replaces the full affinity set of a quest. Callers run this inside a transaction.
pub async fn replace_affinities(
	conn: &mut PgConnection,
	quest_id: Uuid,
	affinities: &[Affinity],
) -> Result<()> {
	sqlx::query("DELETE FROM quest_personality_affinities WHERE quest_id = $1")
		.bind(quest_id)
		.execute(&mut *conn)
		.await?;

	for affinity in affinities {
		sqlx::query(
			"\
INSERT INTO quest_personality_affinities (affinity_id, quest_id, trait_key, weight, explanation)
VALUES ($1, $2, $3, $4, $5)",
		)
		.bind(Uuid::new_v4())
		.bind(quest_id)
		.bind(affinity.trait_key.as_str())
		.bind(affinity.weight as i16)
		.bind(affinity.explanation.as_deref())
		.execute(&mut *conn)
		.await?;
	}

	Ok(())
}

pub async fn fetch_profile<'e, E>(executor: E, user_id: Uuid) -> Result<Option<ProfileRow>>
where
	E: Executor<'e, Database = Postgres>,
{
	let row = sqlx::query_as::<_, ProfileRow>(
		"\
SELECT user_id, display_name, role, preferences, created_at, updated_at
FROM profiles
WHERE user_id = $1",
	)
	.bind(user_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

pub async fn upsert_profile<'e, E>(
	executor: E,
	user_id: Uuid,
	display_name: &str,
	role: &str,
	preferences: &Value,
	now: OffsetDateTime,
) -> Result<()>
where
	E: Executor<'e, Database = Postgres>,
{
	sqlx::query(
		"\
INSERT INTO profiles (user_id, display_name, role, preferences, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $5)
ON CONFLICT (user_id) DO UPDATE
SET
	display_name = EXCLUDED.display_name,
	role = EXCLUDED.role,
	preferences = EXCLUDED.preferences,
	updated_at = EXCLUDED.updated_at",
	)
	.bind(user_id)
	.bind(display_name)
	.bind(role)
	.bind(preferences)
	.bind(now)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn update_preferences<'e, E>(
	executor: E,
	user_id: Uuid,
	preferences: &Value,
	now: OffsetDateTime,
) -> Result<u64>
where
	E: Executor<'e, Database = Postgres>,
{
	let result =
		sqlx::query("UPDATE profiles SET preferences = $1, updated_at = $2 WHERE user_id = $3")
			.bind(preferences)
			.bind(now)
			.bind(user_id)
			.execute(executor)
			.await?;

	Ok(result.rows_affected())
}

pub async fn fetch_live_session<'e, E>(
	executor: E,
	token: &str,
	now: OffsetDateTime,
) -> Result<Option<SessionRow>>
where
	E: Executor<'e, Database = Postgres>,
{
	let row = sqlx::query_as::<_, SessionRow>(
		"\
SELECT token, user_id, created_at, expires_at
FROM sessions
WHERE token = $1 AND expires_at > $2",
	)
	.bind(token)
	.bind(now)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

pub async fn insert_session<'e, E>(
	executor: E,
	token: &str,
	user_id: Uuid,
	now: OffsetDateTime,
	expires_at: OffsetDateTime,
) -> Result<()>
where
	E: Executor<'e, Database = Postgres>,
{
	sqlx::query(
		"INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES ($1, $2, $3, $4)",
	)
	.bind(token)
	.bind(user_id)
	.bind(now)
	.bind(expires_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn purge_expired_sessions<'e, E>(executor: E, now: OffsetDateTime) -> Result<u64>
where
	E: Executor<'e, Database = Postgres>,
{
	let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
		.bind(now)
		.execute(executor)
		.await?;

	Ok(result.rows_affected())
}
