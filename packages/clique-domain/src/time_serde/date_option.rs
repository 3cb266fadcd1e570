//! Optional calendar dates as `YYYY-MM-DD` strings.

use serde::{Deserialize as _, Deserializer, Serializer};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

pub(crate) const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
	format_description!("[year]-[month]-[day]");

pub fn serialize<S>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	match value {
		Some(value) => {
			let formatted = value.format(DATE_FORMAT).map_err(serde::ser::Error::custom)?;

			serializer.serialize_str(&formatted)
		},
		None => serializer.serialize_none(),
	}
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<String>::deserialize(deserializer)?;

	match raw {
		Some(value) => Date::parse(&value, DATE_FORMAT).map(Some).map_err(serde::de::Error::custom),
		None => Ok(None),
	}
}
