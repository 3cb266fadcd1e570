use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use clique_domain::{
	affinity::Affinity, constraints::QuestConstraints, quest::Quest, session::Role,
};

use crate::{Error, Result};

#[derive(Debug, sqlx::FromRow)]
pub struct QuestRow {
	pub quest_id: Uuid,
	pub slug: String,
	pub title: String,
	pub description: Option<String>,
	pub starts_at: Option<OffsetDateTime>,
	pub ends_at: Option<OffsetDateTime>,
	pub status: String,
	pub review_status: String,
	pub capacity: Option<i32>,
	pub created_by: Uuid,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
impl TryFrom<QuestRow> for Quest {
	type Error = Error;

	fn try_from(row: QuestRow) -> Result<Self> {
		Ok(Self {
			quest_id: row.quest_id,
			slug: row.slug,
			title: row.title,
			description: row.description,
			starts_at: row.starts_at,
			ends_at: row.ends_at,
			status: parse_column(&row.status)?,
			review_status: parse_column(&row.review_status)?,
			capacity: row.capacity,
			created_by: row.created_by,
			created_at: row.created_at,
			updated_at: row.updated_at,
		})
	}
}

#[derive(Debug, sqlx::FromRow)]
pub struct QuestConstraintsRow {
	pub quest_id: Uuid,
	pub alcohol: Option<String>,
	pub age_requirement: Option<String>,
	pub accessibility: Option<String>,
	pub physical_intensity: Option<String>,
}
impl TryFrom<QuestConstraintsRow> for QuestConstraints {
	type Error = Error;

	fn try_from(row: QuestConstraintsRow) -> Result<Self> {
		Ok(Self {
			alcohol: parse_optional_column(row.alcohol.as_deref())?,
			age_requirement: parse_optional_column(row.age_requirement.as_deref())?,
			accessibility: parse_optional_column(row.accessibility.as_deref())?,
			physical_intensity: parse_optional_column(row.physical_intensity.as_deref())?,
		})
	}
}

#[derive(Debug, sqlx::FromRow)]
pub struct QuestAffinityRow {
	pub affinity_id: Uuid,
	pub quest_id: Uuid,
	pub trait_key: String,
	pub weight: i16,
	pub explanation: Option<String>,
}
impl TryFrom<QuestAffinityRow> for Affinity {
	type Error = Error;

	fn try_from(row: QuestAffinityRow) -> Result<Self> {
		let weight = u8::try_from(row.weight)
			.ok()
			.filter(|weight| *weight <= 100)
			.ok_or_else(|| {
				Error::InvalidRow(format!(
					"Affinity {} has out-of-range weight {}.",
					row.affinity_id, row.weight
				))
			})?;

		Ok(Self { trait_key: row.trait_key, weight, explanation: row.explanation })
	}
}

#[derive(Debug, sqlx::FromRow)]
pub struct ProfileRow {
	pub user_id: Uuid,
	pub display_name: String,
	pub role: String,
	pub preferences: Value,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
impl ProfileRow {
	pub fn role(&self) -> Result<Role> {
		parse_column(&self.role)
	}
}

#[derive(Debug, sqlx::FromRow)]
pub struct SessionRow {
	pub token: String,
	pub user_id: Uuid,
	pub created_at: OffsetDateTime,
	pub expires_at: OffsetDateTime,
}

fn parse_column<T>(value: &str) -> Result<T>
where
	T: std::str::FromStr<Err = clique_domain::ParseError>,
{
	value.parse().map_err(|err: clique_domain::ParseError| Error::InvalidRow(err.to_string()))
}

fn parse_optional_column<T>(value: Option<&str>) -> Result<Option<T>>
where
	T: std::str::FromStr<Err = clique_domain::ParseError>,
{
	value.map(parse_column).transpose()
}
