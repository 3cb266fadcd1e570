//! Hard-exclusion attributes attached to a quest.
//!
//! Each attribute is optional. A quest without a constraints row, or with an attribute left
//! unset, never excludes anyone on that attribute.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseError;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlcoholRole {
	None,
	Incidental,
	Primary,
}
impl AlcoholRole {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Incidental => "incidental",
			Self::Primary => "primary",
		}
	}
}
impl FromStr for AlcoholRole {
	type Err = ParseError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"none" => Ok(Self::None),
			"incidental" => Ok(Self::Incidental),
			"primary" => Ok(Self::Primary),
			_ => Err(ParseError::new("alcohol", value)),
		}
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum AgeRequirement {
	#[serde(rename = "all_ages")]
	AllAges,
	#[serde(rename = "18_plus")]
	EighteenPlus,
	#[serde(rename = "21_plus")]
	TwentyOnePlus,
}
impl AgeRequirement {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::AllAges => "all_ages",
			Self::EighteenPlus => "18_plus",
			Self::TwentyOnePlus => "21_plus",
		}
	}

	pub fn minimum_age(self) -> Option<i32> {
		match self {
			Self::AllAges => None,
			Self::EighteenPlus => Some(18),
			Self::TwentyOnePlus => Some(21),
		}
	}
}
impl FromStr for AgeRequirement {
	type Err = ParseError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"all_ages" => Ok(Self::AllAges),
			"18_plus" => Ok(Self::EighteenPlus),
			"21_plus" => Ok(Self::TwentyOnePlus),
			_ => Err(ParseError::new("age_requirement", value)),
		}
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
	WheelchairFriendly,
	NotWheelchairFriendly,
	Unknown,
}
impl Accessibility {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::WheelchairFriendly => "wheelchair_friendly",
			Self::NotWheelchairFriendly => "not_wheelchair_friendly",
			Self::Unknown => "unknown",
		}
	}
}
impl FromStr for Accessibility {
	type Err = ParseError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"wheelchair_friendly" => Ok(Self::WheelchairFriendly),
			"not_wheelchair_friendly" => Ok(Self::NotWheelchairFriendly),
			"unknown" => Ok(Self::Unknown),
			_ => Err(ParseError::new("accessibility", value)),
		}
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicalIntensity {
	Low,
	Medium,
	High,
}
impl PhysicalIntensity {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Low => "low",
			Self::Medium => "medium",
			Self::High => "high",
		}
	}
}
impl FromStr for PhysicalIntensity {
	type Err = ParseError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value {
			"low" => Ok(Self::Low),
			"medium" => Ok(Self::Medium),
			"high" => Ok(Self::High),
			_ => Err(ParseError::new("physical_intensity", value)),
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct QuestConstraints {
	pub alcohol: Option<AlcoholRole>,
	pub age_requirement: Option<AgeRequirement>,
	pub accessibility: Option<Accessibility>,
	pub physical_intensity: Option<PhysicalIntensity>,
}
