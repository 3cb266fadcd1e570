use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
	constraints::{Accessibility, AlcoholRole, PhysicalIntensity, QuestConstraints},
	preferences::{AlcoholPreference, MatchingFilters},
};

pub const REASON_ALCOHOL: &str = "Excludes drinking-focused quests";
pub const REASON_AGE_21: &str = "Requires age 21+";
pub const REASON_AGE_18: &str = "Requires age 18+";
pub const REASON_ACCESSIBILITY: &str = "Not wheelchair accessible";
pub const REASON_INTENSITY: &str = "Too physically intense";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct HardFilterResult {
	pub passes: bool,
	pub reason: Option<String>,
}
impl HardFilterResult {
	fn pass() -> Self {
		Self { passes: true, reason: None }
	}

	fn fail(reason: &str) -> Self {
		Self { passes: false, reason: Some(reason.to_string()) }
	}
}

/// Decides whether a quest is eligible for a user at all.
///
/// Missing constraints always pass. The intensity rule is one-directional: a user preferring low
/// intensity never sees high-intensity quests, while a user preferring high intensity still sees
/// low-intensity ones.
pub fn passes_hard_filter(
	constraints: Option<&QuestConstraints>,
	filters: &MatchingFilters,
	today: Date,
) -> HardFilterResult {
	let Some(constraints) = constraints else {
		return HardFilterResult::pass();
	};

	if filters.alcohol_preference == Some(AlcoholPreference::NoAlcohol)
		&& constraints.alcohol == Some(AlcoholRole::Primary)
	{
		return HardFilterResult::fail(REASON_ALCOHOL);
	}

	if let Some(birthdate) = filters.birthdate
		&& let Some(minimum) = constraints.age_requirement.and_then(|req| req.minimum_age())
		&& age_on(birthdate, today) < minimum
	{
		let reason = if minimum >= 21 { REASON_AGE_21 } else { REASON_AGE_18 };

		return HardFilterResult::fail(reason);
	}

	if filters.requires_accessibility
		&& constraints.accessibility == Some(Accessibility::NotWheelchairFriendly)
	{
		return HardFilterResult::fail(REASON_ACCESSIBILITY);
	}
	if filters.physical_intensity_preference == Some(PhysicalIntensity::Low)
		&& constraints.physical_intensity == Some(PhysicalIntensity::High)
	{
		return HardFilterResult::fail(REASON_INTENSITY);
	}

	HardFilterResult::pass()
}

/// Whole years between `birthdate` and `today`, counting a birthday only once it has arrived.
pub fn age_on(birthdate: Date, today: Date) -> i32 {
	let mut age = today.year() - birthdate.year();
	let birthday_pending = (today.month() as u8, today.day())
		< (birthdate.month() as u8, birthdate.day());

	if birthday_pending {
		age -= 1;
	}

	age
}
