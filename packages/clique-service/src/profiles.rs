use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use clique_domain::preferences::{MatchingFilters, UserTraits};
use clique_storage::queries;

use crate::{Caller, CliqueService, Error, Result};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdatePreferencesRequest {
	pub preferences: Value,
}

/// The stored preference blob next to the matching inputs derived from it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PreferencesResponse {
	pub preferences: Value,
	pub filters: MatchingFilters,
	pub traits: UserTraits,
}
impl PreferencesResponse {
	fn derive(preferences: Value) -> Self {
		Self {
			filters: MatchingFilters::from_preferences(&preferences),
			traits: UserTraits::from_preferences(&preferences),
			preferences,
		}
	}
}

impl CliqueService {
	pub async fn get_preferences(&self, caller: &Caller) -> Result<PreferencesResponse> {
		let preferences = self.load_preferences(caller.user_id).await?;

		Ok(PreferencesResponse::derive(preferences))
	}

	pub async fn update_preferences(
		&self,
		caller: &Caller,
		req: UpdatePreferencesRequest,
	) -> Result<PreferencesResponse> {
		if !req.preferences.is_object() {
			return Err(Error::InvalidRequest {
				message: "preferences must be a JSON object.".to_string(),
			});
		}

		let updated = queries::update_preferences(
			&self.db.pool,
			caller.user_id,
			&req.preferences,
			OffsetDateTime::now_utc(),
		)
		.await?;

		if updated == 0 {
			return Err(Error::NotFound { message: "Profile does not exist.".to_string() });
		}

		tracing::info!(user_id = %caller.user_id, "Preferences updated.");

		Ok(PreferencesResponse::derive(req.preferences))
	}
}
