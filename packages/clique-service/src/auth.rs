use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use clique_domain::session::{Role, SessionEvent, SessionState};
use clique_storage::queries;

use crate::{CliqueService, Error, Result};

/// An authenticated, profile-backed caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Caller {
	pub user_id: Uuid,
	pub role: Role,
}
impl Caller {
	pub fn require_author(&self) -> Result<()> {
		if self.role.can_author_quests() {
			return Ok(());
		}

		Err(Error::Forbidden { message: "Creator or admin role is required.".to_string() })
	}

	pub fn require_admin(&self) -> Result<()> {
		if self.role.is_admin() {
			return Ok(());
		}

		Err(Error::Forbidden { message: "Admin role is required.".to_string() })
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IssueSessionRequest {
	pub user_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IssueSessionResponse {
	pub token: String,
	#[serde(with = "clique_domain::time_serde")]
	pub expires_at: OffsetDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PurgeReport {
	pub purged_sessions: u64,
}

impl CliqueService {
	/// Drives a fresh [`SessionState`] from a presented bearer token to a ready caller.
	pub async fn authenticate(&self, token: &str) -> Result<Caller> {
		let now = OffsetDateTime::now_utc();
		let mut state = SessionState::default();

		state.apply(SessionEvent::TokenPresented { token: token.to_string() })?;

		let token = match &state {
			SessionState::Authenticating { token } => token.clone(),
			_ =>
				return Err(Error::Unauthorized {
					message: "Session is not authenticating.".to_string(),
				}),
		};
		let session = queries::fetch_live_session(&self.db.pool, &token, now).await?;

		match session {
			Some(session) => state.apply(SessionEvent::TokenVerified { user_id: session.user_id })?,
			None => {
				state.apply(SessionEvent::TokenRejected)?;

				return Err(Error::Unauthorized {
					message: "Bearer token is invalid or expired.".to_string(),
				});
			},
		}

		let user_id = state.user_id().ok_or_else(|| Error::Unauthorized {
			message: "Session has no user.".to_string(),
		})?;
		let profile = queries::fetch_profile(&self.db.pool, user_id).await?;

		match profile {
			Some(profile) => state.apply(SessionEvent::ProfileLoaded { role: profile.role()? })?,
			None => {
				state.apply(SessionEvent::ProfileMissing)?;
				tracing::warn!(%user_id, "Session refers to a missing profile.");

				return Err(Error::Unauthorized { message: "Profile does not exist.".to_string() });
			},
		}

		let (user_id, role) = state.ready().ok_or_else(|| Error::Unauthorized {
			message: "Session did not reach a ready state.".to_string(),
		})?;

		tracing::debug!(%user_id, role = role.as_str(), "Caller authenticated.");

		Ok(Caller { user_id, role })
	}

	pub async fn issue_session(&self, req: IssueSessionRequest) -> Result<IssueSessionResponse> {
		let now = OffsetDateTime::now_utc();
		let expires_at = now
			.checked_add(Duration::hours(self.cfg.security.session_ttl_hours))
			.ok_or_else(|| Error::InvalidRequest {
				message: "security.session_ttl_hours puts expiry out of range.".to_string(),
			})?;

		if queries::fetch_profile(&self.db.pool, req.user_id).await?.is_none() {
			return Err(Error::NotFound { message: "Profile does not exist.".to_string() });
		}

		let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());

		queries::insert_session(&self.db.pool, &token, req.user_id, now, expires_at).await?;

		Ok(IssueSessionResponse { token, expires_at })
	}

	pub async fn purge_expired_sessions(&self) -> Result<PurgeReport> {
		let purged_sessions =
			queries::purge_expired_sessions(&self.db.pool, OffsetDateTime::now_utc()).await?;

		tracing::info!(purged_sessions, "Purged expired sessions.");

		Ok(PurgeReport { purged_sessions })
	}
}
