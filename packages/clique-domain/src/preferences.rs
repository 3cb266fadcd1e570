//! Derivation of matching inputs from a profile's stored preference blob.
//!
//! The blob is user-editable JSON, so every field is read leniently: a missing or malformed
//! field means "no preference" rather than an error.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::Date;

use crate::constraints::PhysicalIntensity;

pub const MAX_TRAIT_WEIGHT: u8 = 100;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlcoholPreference {
	NoAlcohol,
	Ok,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct MatchingFilters {
	pub alcohol_preference: Option<AlcoholPreference>,
	#[serde(default, with = "crate::time_serde::date_option")]
	pub birthdate: Option<Date>,
	#[serde(default)]
	pub requires_accessibility: bool,
	pub physical_intensity_preference: Option<PhysicalIntensity>,
}
impl MatchingFilters {
	pub fn from_preferences(preferences: &Value) -> Self {
		let alcohol_preference = match str_field(preferences, "alcohol") {
			Some("no_alcohol") => Some(AlcoholPreference::NoAlcohol),
			Some("ok") => Some(AlcoholPreference::Ok),
			Some(other) => {
				tracing::warn!(value = other, "Ignoring unknown alcohol preference.");

				None
			},
			None => None,
		};
		let birthdate = str_field(preferences, "birthdate").and_then(|raw| {
			let parsed = Date::parse(raw, crate::time_serde::date_option::DATE_FORMAT).ok();

			if parsed.is_none() {
				tracing::warn!(value = raw, "Ignoring malformed birthdate preference.");
			}

			parsed
		});
		let requires_accessibility =
			preferences.get("accessibility_needs").and_then(Value::as_bool).unwrap_or(false);
		let physical_intensity_preference = str_field(preferences, "physical_intensity")
			.and_then(|raw| {
				let parsed = raw.parse().ok();

				if parsed.is_none() {
					tracing::warn!(value = raw, "Ignoring unknown physical intensity preference.");
				}

				parsed
			});

		Self {
			alcohol_preference,
			birthdate,
			requires_accessibility,
			physical_intensity_preference,
		}
	}
}

/// Sparse trait-key to weight map. Weights are always within `0..=100`.
///
/// Deserialization goes through [`UserTraits::insert`], so traits sent by clients are normalized
/// exactly like traits read from a stored preference blob.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UserTraits(HashMap<String, u8>);
impl UserTraits {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_preferences(preferences: &Value) -> Self {
		match preferences.get("traits").and_then(Value::as_object) {
			Some(map) => Self::from_raw_weights(map),
			None => Self::new(),
		}
	}

	fn from_raw_weights<'a, I>(entries: I) -> Self
	where
		I: IntoIterator<Item = (&'a String, &'a Value)>,
	{
		let mut traits = Self::new();

		for (key, value) in entries {
			match value.as_f64() {
				Some(weight) => traits.insert(key, weight),
				None => {
					tracing::warn!(trait_key = key.as_str(), "Ignoring non-numeric trait weight.")
				},
			}
		}

		traits
	}

	/// Inserts a trait, normalizing the key and clamping the weight. Blank keys are dropped.
	pub fn insert(&mut self, key: &str, weight: f64) {
		let key = normalize_trait_key(key);

		if key.is_empty() || !weight.is_finite() {
			return;
		}

		let weight = weight.round().clamp(0.0, MAX_TRAIT_WEIGHT as f64) as u8;

		self.0.insert(key, weight);
	}

	pub fn get(&self, key: &str) -> Option<u8> {
		self.0.get(key).copied()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl<'de> Deserialize<'de> for UserTraits {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = HashMap::<String, Value>::deserialize(deserializer)?;

		Ok(Self::from_raw_weights(&raw))
	}
}
impl<K> FromIterator<(K, u8)> for UserTraits
where
	K: AsRef<str>,
{
	fn from_iter<I: IntoIterator<Item = (K, u8)>>(iter: I) -> Self {
		let mut traits = Self::new();

		for (key, weight) in iter {
			traits.insert(key.as_ref(), weight as f64);
		}

		traits
	}
}

pub fn normalize_trait_key(key: &str) -> String {
	key.trim().to_lowercase()
}

fn str_field<'a>(preferences: &'a Value, field: &str) -> Option<&'a str> {
	preferences.get(field).and_then(Value::as_str).map(str::trim).filter(|value| !value.is_empty())
}
