//! RFC 3339 timestamp and `YYYY-MM-DD` date (de)serializers for `#[serde(with = ...)]`.

pub mod date_option;
pub mod option;

use serde::{Deserialize, Deserializer, Serializer};
use time::{OffsetDateTime, error::Parse, format_description::well_known::Rfc3339};

pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	let formatted = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;

	serializer.serialize_str(&formatted)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = String::deserialize(deserializer)?;

	parse(&raw).map_err(serde::de::Error::custom)
}

fn parse(raw: &str) -> Result<OffsetDateTime, Parse> {
	OffsetDateTime::parse(raw.trim(), &Rfc3339)
}
